pub mod app;
pub mod block_scale;
pub mod config;
pub mod dns_cache;
pub mod error;
pub mod history;
pub mod input;
pub mod keymap;
pub mod persist;
pub mod ping;
pub mod ping_executor;
pub mod rtt_window;
pub mod scheduler;
pub mod session;
pub mod ui;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, PersistError, PingError};
pub use ping::{PingOutcome, ProbeReport, Sample};
pub use ping_executor::{Prober, SurgeProber};
pub use session::{Effect, Event, KeyCommand, Phase, SessionState};
