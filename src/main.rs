use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use env_logger::{Env, Target};
use log::{info, warn};
use ping_bars::{App, AppConfig, AppError, SurgeProber};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        original_hook(panic_info);
    }));
}

/// The UI owns stdout and stderr, so logs go to a file.
fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| AppError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let mut app = App::new(SurgeProber::new(), config);
    match AppConfig::get_config_path() {
        Ok(path) => app = app.with_config_path(path),
        Err(e) => warn!("targets will not be remembered: {e}"),
    }

    setup_panic_hook();
    let _guard = TerminalGuard::new()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    app.run(&mut terminal).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = loaded {
        warn!("using default config: {e}");
    }
    info!("starting ping-bars {}", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Alas, there's been an error: {e}");
            ExitCode::FAILURE
        }
    }
}
