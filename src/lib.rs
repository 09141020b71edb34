pub mod aggregator;
pub mod app;
pub mod chart;
pub mod config;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod practice;
pub mod source;
pub mod state;
pub mod storage;
pub mod ui;

pub use aggregator::NoteAggregator;
pub use app::router;
pub use config::Config;
pub use source::{LoadOutcome, NoteSource};
pub use state::AppState;
pub use storage::load_preferences;
