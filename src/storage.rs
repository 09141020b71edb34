use crate::errors::AppError;
use crate::models::Preferences;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Reads the saved theme preference. A missing or unreadable file yields the defaults.
pub async fn load_preferences(path: &Path) -> Preferences {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                Preferences::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
        Err(err) => {
            error!("failed to read preferences file: {err}");
            Preferences::default()
        }
    }
}

pub async fn persist_preferences(path: &Path, prefs: &Preferences) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(prefs).map_err(AppError::internal)?;
    fs::write(path, payload).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Theme;
    use std::path::PathBuf;

    fn unique_prefs_path() -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("learning_log_prefs_{}_{}", std::process::id(), nanos));
        path.push("preferences.json");
        path
    }

    #[tokio::test]
    async fn missing_file_gives_light_theme() {
        let prefs = load_preferences(&unique_prefs_path()).await;
        assert_eq!(prefs.theme, Theme::Light);
    }

    #[tokio::test]
    async fn persisted_theme_survives_reload() {
        let path = unique_prefs_path();
        persist_preferences(&path, &Preferences { theme: Theme::Desert })
            .await
            .unwrap();
        assert_eq!(load_preferences(&path).await.theme, Theme::Desert);
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_defaults() {
        let path = unique_prefs_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{\"theme\":\"neon\"}").unwrap();
        assert_eq!(load_preferences(&path).await.theme, Theme::Light);
    }
}
