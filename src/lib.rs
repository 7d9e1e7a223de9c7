pub mod ai;
pub mod app;
pub mod config;
pub mod errors;
pub mod layout;
pub mod model;
pub mod reducers;
pub mod storage;
pub mod store;
pub mod tree;
pub mod ui;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use layout::{LayoutConfig, LayoutEngine};
pub use model::{MindMap, Node, NodeId, ThemeColor};
pub use store::MindMapStore;
