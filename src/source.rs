use crate::config::{Config, NotesLocation};
use crate::dates::date_key;
use crate::models::{LoadStatus, NoteDocument};
use chrono::NaiveDate;
use futures::future::join_all;
use std::{path::PathBuf, time::Duration};
use tokio::fs;
use tracing::{debug, info, warn};

/// Why a single note could not be retrieved. These never leave
/// [`NoteSource::load`]; they are logged and the date is reported as missing.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("note for {date} is not a valid document: {source}")]
    Parse {
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("retrieval of note for {date} timed out after {timeout:?}")]
    Timeout { date: NaiveDate, timeout: Duration },
}

#[derive(Debug, Clone)]
enum Backend {
    Directory(PathBuf),
    Remote {
        client: reqwest::Client,
        base_url: String,
    },
}

/// Retrieves dated note documents, one `<YYYY-MM-DD>.json` resource per date.
#[derive(Debug, Clone)]
pub struct NoteSource {
    backend: Backend,
    timeout: Duration,
}

/// Everything one call to [`NoteSource::load`] produced.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub requested: usize,
    pub documents: Vec<NoteDocument>,
    pub missing: Vec<NaiveDate>,
}

impl LoadOutcome {
    pub fn status(&self) -> LoadStatus {
        if self.requested > 0 && self.documents.is_empty() {
            LoadStatus::NoData
        } else if self.missing.is_empty() {
            LoadStatus::Complete
        } else {
            LoadStatus::Partial
        }
    }
}

impl NoteSource {
    pub fn directory(root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            backend: Backend::Directory(root.into()),
            timeout,
        }
    }

    pub fn remote(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            backend: Backend::Remote { client, base_url },
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        match &config.notes {
            NotesLocation::Directory(root) => Ok(Self::directory(root.clone(), config.fetch_timeout)),
            NotesLocation::Remote(url) => Self::remote(url.clone(), config.fetch_timeout),
        }
    }

    /// Retrieves every date concurrently and waits for all of them to settle.
    /// Failed retrievals are dropped and listed in [`LoadOutcome::missing`].
    pub async fn load(&self, dates: &[NaiveDate]) -> LoadOutcome {
        let results = join_all(
            dates
                .iter()
                .map(|&date| async move { (date, self.fetch(date).await) }),
        )
        .await;

        let mut outcome = LoadOutcome {
            requested: dates.len(),
            documents: Vec::with_capacity(dates.len()),
            missing: Vec::new(),
        };
        for (date, result) in results {
            match result {
                Ok(document) => {
                    debug!("loaded note for {date}");
                    outcome.documents.push(document);
                }
                Err(err) => {
                    warn!("skipping note for {date}: {err}");
                    outcome.missing.push(date);
                }
            }
        }

        info!(
            requested = outcome.requested,
            loaded = outcome.documents.len(),
            missing = outcome.missing.len(),
            "note load finished"
        );
        outcome
    }

    pub async fn fetch(&self, date: NaiveDate) -> Result<NoteDocument, SourceError> {
        match tokio::time::timeout(self.timeout, self.fetch_unbounded(date)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                date,
                timeout: self.timeout,
            }),
        }
    }

    async fn fetch_unbounded(&self, date: NaiveDate) -> Result<NoteDocument, SourceError> {
        let file_name = format!("{}.json", date_key(date));
        let bytes = match &self.backend {
            Backend::Directory(root) => {
                let path = root.join(file_name);
                match fs::read(&path).await {
                    Ok(bytes) => bytes,
                    Err(source) => return Err(SourceError::Io { path, source }),
                }
            }
            Backend::Remote { client, base_url } => {
                let url = format!("{base_url}/{file_name}");
                let response = match client.get(&url).send().await {
                    Ok(response) => response,
                    Err(source) => return Err(SourceError::Request { url, source }),
                };
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status { url, status });
                }
                match response.bytes().await {
                    Ok(body) => body.to_vec(),
                    Err(source) => return Err(SourceError::Request { url, source }),
                }
            }
        };

        let document: NoteDocument =
            serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse { date, source })?;
        if document.date != date {
            warn!(
                "note requested for {date} is dated {}; keeping it under its own date",
                document.date
            );
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("learning_log_{tag}_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    fn write_note(dir: &PathBuf, date: &str, body: &str) {
        std::fs::write(dir.join(format!("{date}.json")), body).unwrap();
    }

    fn source(dir: &PathBuf) -> NoteSource {
        NoteSource::directory(dir.clone(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn load_keeps_good_notes_and_drops_failures() {
        let dir = scratch_dir("partial");
        write_note(
            &dir,
            "2025-07-19",
            r#"{"date":"2025-07-19","topic":"Greetings","vocabulary":[{"arabic":"ماء","english":"Water"}]}"#,
        );
        write_note(&dir, "2025-07-20", r#"{"date":"2025-07-20","topic":"Food"}"#);
        write_note(&dir, "2025-07-17", "{not json");

        let outcome = source(&dir)
            .load(&[day(18), day(19), day(20), day(17)])
            .await;

        assert_eq!(outcome.requested, 4);
        let mut loaded: Vec<_> = outcome.documents.iter().map(|doc| doc.date).collect();
        loaded.sort();
        assert_eq!(loaded, vec![day(19), day(20)]);
        assert_eq!(outcome.missing, vec![day(18), day(17)]);
        assert_eq!(outcome.status(), LoadStatus::Partial);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn load_with_every_date_failing_reports_no_data() {
        let dir = scratch_dir("empty");
        let outcome = source(&dir).load(&[day(18), day(19)]).await;
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.status(), LoadStatus::NoData);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn load_without_dates_is_complete_and_empty() {
        let dir = scratch_dir("none");
        let outcome = source(&dir).load(&[]).await;
        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.status(), LoadStatus::Complete);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn note_filed_under_another_date_keeps_its_own_date() {
        let dir = scratch_dir("mismatch");
        write_note(&dir, "2025-07-18", r#"{"date":"2025-07-19","topic":"misfiled"}"#);
        write_note(&dir, "2025-07-19", r#"{"date":"2025-07-19","topic":"filed"}"#);

        let fetched = source(&dir).fetch(day(18)).await.unwrap();
        assert_eq!(fetched.date, day(19));

        let outcome = source(&dir).load(&[day(18), day(19)]).await;
        assert_eq!(outcome.status(), LoadStatus::Complete);
        assert!(outcome.documents.iter().all(|doc| doc.date == day(19)));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn fetch_classifies_failures() {
        let dir = scratch_dir("errors");
        write_note(&dir, "2025-07-17", r#"{"topic":"no date"}"#);

        let missing = source(&dir).fetch(day(18)).await.unwrap_err();
        assert!(matches!(missing, SourceError::Io { .. }));

        let malformed = source(&dir).fetch(day(17)).await.unwrap_err();
        assert!(matches!(malformed, SourceError::Parse { date, .. } if date == day(17)));

        let _ = std::fs::remove_dir_all(dir);
    }
}
