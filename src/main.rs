use ai_mindmap::{actions, ai, app, event, storage, store, ui};

use ai::{AiError, CommandIdeaGenerator, IdeaGenerator, IdeaRequest};
use anyhow::Result;
use app::AppState;
use clap::Parser;
use ai_mindmap::config::{load_config, AppConfig, CliArgs};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use storage::{FileStore, KeyValueStore, MemoryStore};
use store::MindMapStore;

type IdeaResult = Result<Vec<String>, AiError>;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Load configuration
    let config = load_config(&args)?;

    if args.debug_config {
        println!("Configuration:");
        println!("{:#?}", config);
        return Ok(());
    }

    init_logging(&config);

    let store = open_store(&config);
    let mut app = AppState::new(config, store);

    if let Some(path) = app.config.import.clone() {
        actions::import_map(&mut app, &path)?;
    }

    if let Some(path) = app.config.export.clone() {
        let written = actions::export_map(&app, &path)?;
        println!("Exported current map to {}", written.display());
        return Ok(());
    }

    app.ensure_current_map();

    let generator: Option<Arc<dyn IdeaGenerator>> = app
        .config
        .idea_command
        .clone()
        .map(|cmd| Arc::new(CommandIdeaGenerator::new(cmd)) as Arc<dyn IdeaGenerator>);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Clear the terminal
    terminal.clear()?;

    // Run the main loop
    let res = run_app(&mut terminal, &mut app, generator);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors from the main loop
    if let Err(err) = res {
        log::error!("main loop failed: {}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

// The terminal belongs to the UI, so log lines go to a file
fn init_logging(config: &AppConfig) {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };

    let result = env_logger::Builder::new()
        .parse_filters(&config.log_level)
        .format_timestamp_millis()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    if let Err(e) = result {
        eprintln!("Logging disabled: {}", e);
    }
}

fn open_store(config: &AppConfig) -> MindMapStore {
    let backend: Box<dyn KeyValueStore> = if config.ephemeral {
        log::info!("ephemeral session, nothing is written to disk");
        Box::new(MemoryStore::new())
    } else {
        log::info!("storing mind maps in {}", config.data_dir.display());
        Box::new(FileStore::new(config.data_dir.clone()))
    };
    MindMapStore::load(backend, config.storage_key.clone())
}

fn spawn_request(generator: Arc<dyn IdeaGenerator>, request: IdeaRequest, tx: Sender<IdeaResult>) {
    thread::spawn(move || {
        let result = generator.generate(&request);
        // The receiver is gone only when the app is shutting down
        let _ = tx.send(result);
    });
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    generator: Option<Arc<dyn IdeaGenerator>>,
) -> Result<()> {
    let (tx, rx): (Sender<IdeaResult>, Receiver<IdeaResult>) = mpsc::channel();

    while app.running {
        // Draw the UI
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if let Some(action) = event::handle_events(app)? {
            app.clear_message();
            actions::execute_action(action, app)?;
        }

        // Hand a freshly claimed idea request to a worker
        if let Some(request) = app.pending_request.take() {
            match generator.clone() {
                Some(generator) => spawn_request(generator, request, tx.clone()),
                None => actions::apply_ideas(app, Err(AiError::NotConfigured)),
            }
        }

        // Apply settled requests on this thread
        while let Ok(result) = rx.try_recv() {
            actions::apply_ideas(app, result);
        }
    }

    Ok(())
}
