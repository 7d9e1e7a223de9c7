use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

pub type NodeId = String;

pub const STORAGE_VERSION: &str = "1.0";
pub const DEFAULT_MAP_TITLE: &str = "New Mind Map";
pub const DEFAULT_NODE_CONTENT: &str = "New idea";

/// Canvas point where a fresh root is placed before the first layout pass.
pub const CANVAS_CENTER: Position = Position { x: 400.0, y: 300.0 };

/// Current time truncated to whole milliseconds, the precision kept on disk.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    Sunshine,
    Blossom,
    #[default]
    Ocean,
    Forest,
    Lavender,
    Sunset,
    Mist,
    Mint,
}

impl ThemeColor {
    pub const ALL: [ThemeColor; 8] = [
        ThemeColor::Sunshine,
        ThemeColor::Blossom,
        ThemeColor::Ocean,
        ThemeColor::Forest,
        ThemeColor::Lavender,
        ThemeColor::Sunset,
        ThemeColor::Mist,
        ThemeColor::Mint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeColor::Sunshine => "sunshine",
            ThemeColor::Blossom => "blossom",
            ThemeColor::Ocean => "ocean",
            ThemeColor::Forest => "forest",
            ThemeColor::Lavender => "lavender",
            ThemeColor::Sunset => "sunset",
            ThemeColor::Mist => "mist",
            ThemeColor::Mint => "mint",
        }
    }

    /// Looks a colour up by its serialized name, falling back to the first
    /// palette entry for unknown names.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or(Self::ALL[0])
    }

    /// Accent colour as an `(r, g, b)` triple.
    pub fn accent(self) -> (u8, u8, u8) {
        match self {
            ThemeColor::Sunshine => (0xFC, 0xD3, 0x4D),
            ThemeColor::Blossom => (0xFB, 0x71, 0x85),
            ThemeColor::Ocean => (0x60, 0xA5, 0xFA),
            ThemeColor::Forest => (0x34, 0xD3, 0x99),
            ThemeColor::Lavender => (0xA7, 0x8B, 0xFA),
            ThemeColor::Sunset => (0xF5, 0x9E, 0x0B),
            ThemeColor::Mist => (0x64, 0x74, 0x8B),
            ThemeColor::Mint => (0x14, 0xB8, 0xA6),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub content: String,
    pub parent_id: Option<NodeId>,
    pub color: ThemeColor,
    pub position: Position,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_ai_generated: bool,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, content: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        let stamp = now();
        Self {
            id: id.into(),
            content: content.into(),
            parent_id,
            color: ThemeColor::default(),
            position: Position::default(),
            created_at: stamp,
            updated_at: stamp,
            is_ai_generated: false,
        }
    }

    /// A fresh child of `parent_id` with a generated id.
    pub fn child_of(parent_id: &str, content: impl Into<String>, color: ThemeColor) -> Self {
        let mut node = Self::new(generate_node_id(), content, Some(parent_id.to_string()));
        node.color = color;
        node
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMap {
    pub id: String,
    pub title: String,
    pub nodes: Vec<Node>,
    pub theme: ThemeColor,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl MindMap {
    /// A map holding a single root node whose content is the title.
    pub fn new(title: impl Into<String>, theme: ThemeColor) -> Self {
        let title = title.into();
        let stamp = now();

        let mut root = Node::new(generate_node_id(), title.clone(), None);
        root.color = theme;
        root.position = CANVAS_CENTER;
        root.created_at = stamp;
        root.updated_at = stamp;

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            nodes: vec![root],
            theme,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_node(id).is_some()
    }

    /// First node without a parent.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.is_root())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub default_theme: ThemeColor,
    pub auto_save: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_theme: ThemeColor::Ocean,
            auto_save: true,
        }
    }
}

/// Partial update merged into [`Preferences`]; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub default_theme: Option<ThemeColor>,
    pub auto_save: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    pub version: String,
    pub mindmaps: Vec<MindMap>,
    pub current_map_id: String,
    pub preferences: Preferences,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION.to_string(),
            mindmaps: Vec::new(),
            current_map_id: String::new(),
            preferences: Preferences::default(),
        }
    }
}

pub fn generate_node_id() -> NodeId {
    format!("node-{}", uuid::Uuid::new_v4())
}

/// RFC 3339 strings with millisecond precision, e.g. `2024-05-01T09:30:00.123Z`.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
