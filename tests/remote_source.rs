use axum::{Router, extract::Path, http::StatusCode, routing::get};
use chrono::NaiveDate;
use learning_log::{NoteAggregator, NoteSource, models::LoadStatus};
use std::time::Duration;
use tokio::net::TcpListener;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

async fn note_file(Path(file): Path<String>) -> (StatusCode, String) {
    match file.as_str() {
        "2025-07-19.json" => (
            StatusCode::OK,
            r#"{"date":"2025-07-19","topic":"Basics","vocabulary":[{"arabic":"ماء","english":"Water"},{"arabic":"شكرا","english":"Thank you"}]}"#
                .to_string(),
        ),
        "2025-07-20.json" => (
            StatusCode::OK,
            r#"{"date":"2025-07-20","topic":"Home","vocabulary":[{"arabic":"ماء","english":"Water"},{"arabic":"كتاب","english":"Book"},{"arabic":"باب","english":"Door"}],"sentences":[{"arabic":"الباب مفتوح","english":"The door is open"}]}"#
                .to_string(),
        ),
        "2025-07-17.json" => (StatusCode::OK, "<html>not json</html>".to_string()),
        "2025-07-16.json" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, r#"{"date":"2025-07-16"}"#.to_string())
        }
        "2025-07-15.json" => (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
        _ => (StatusCode::NOT_FOUND, "not found".to_string()),
    }
}

async fn serve_notes() -> String {
    let app = Router::new().route("/notes/:file", get(note_file));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/notes/")
}

#[tokio::test]
async fn remote_source_drops_failed_dates() {
    let base_url = serve_notes().await;
    let source = NoteSource::remote(base_url, Duration::from_millis(500)).unwrap();

    let outcome = source
        .load(&[day(15), day(16), day(17), day(18), day(19), day(20)])
        .await;

    let mut loaded: Vec<NaiveDate> = outcome.documents.iter().map(|doc| doc.date).collect();
    loaded.sort();
    assert_eq!(loaded, vec![day(19), day(20)]);
    assert_eq!(outcome.missing, vec![day(15), day(16), day(17), day(18)]);
    assert_eq!(outcome.status(), LoadStatus::Partial);

    let stats = NoteAggregator::from_outcome(outcome).statistics();
    assert_eq!(stats.total_vocabulary, 5);
    assert_eq!(stats.top_frequency[0].english, "Water");
    assert_eq!(stats.top_frequency[0].count, 2);
}

#[tokio::test]
async fn remote_source_reports_no_data_when_nothing_loads() {
    let base_url = serve_notes().await;
    let source = NoteSource::remote(base_url, Duration::from_millis(500)).unwrap();

    let outcome = source.load(&[day(1), day(2), day(3)]).await;
    assert!(outcome.documents.is_empty());
    assert_eq!(outcome.status(), LoadStatus::NoData);
}

#[tokio::test]
async fn slow_note_times_out() {
    let base_url = serve_notes().await;
    let source = NoteSource::remote(base_url, Duration::from_millis(200)).unwrap();

    let err = source.fetch(day(16)).await.unwrap_err();
    assert!(matches!(
        err,
        learning_log::source::SourceError::Timeout { date, .. } if date == day(16)
    ));
}
