use crate::config::Config;
use crate::models::Preferences;
use crate::source::NoteSource;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared by all handlers. Notes are not cached here; each request loads its own snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<NoteSource>,
    pub prefs: Arc<Mutex<Preferences>>,
}

impl AppState {
    pub fn new(config: Config, source: NoteSource, prefs: Preferences) -> Self {
        Self {
            config: Arc::new(config),
            source: Arc::new(source),
            prefs: Arc::new(Mutex::new(prefs)),
        }
    }
}
