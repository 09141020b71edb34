use crate::aggregator::NoteAggregator;
use crate::errors::AppError;
use crate::models::{
    FeedResponse, LoadStatus, PracticeParams, SortKey, StatsResponse, Theme, ThemeRequest,
    ThemeResponse, ToggleThemeForm, VocabularyParams, VocabularyQuery, VocabularyResponse,
};
use crate::practice::{build_deck, wrap_index};
use crate::state::AppState;
use crate::storage::persist_preferences;
use crate::ui::{self, Page};
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, Redirect},
};
use tracing::info;

type PageResponse = (StatusCode, Html<String>);

/// One load cycle: retrieve every configured date and aggregate the result.
async fn load_notes(state: &AppState) -> NoteAggregator {
    let outcome = state.source.load(&state.config.dates).await;
    NoteAggregator::from_outcome(outcome)
}

async fn current_theme(state: &AppState) -> Theme {
    state.prefs.lock().await.theme
}

fn vocabulary_query(params: VocabularyParams) -> Result<VocabularyQuery, AppError> {
    let sort = match params.sort.as_deref().map(str::trim) {
        None | Some("") => SortKey::default(),
        Some(value) => value.parse::<SortKey>().map_err(AppError::bad_request)?,
    };
    Ok(VocabularyQuery {
        filter: params.q,
        sort,
    })
}

/// Path and query of the current request, echoed back by the theme toggle.
fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map_or("/", |target| target.as_str())
}

/// Only our own pages are valid redirect targets; anything else goes home.
fn redirect_target(back: Option<String>) -> String {
    back.filter(|target| {
        let path = target.split(['?', '#']).next().unwrap_or_default();
        !target.chars().any(|c| c == '\\' || c.is_control())
            && Page::ALL.iter().any(|page| page.href() == path)
    })
    .unwrap_or_else(|| "/".to_string())
}

fn unavailable(theme: Theme, page: Page, retry: &str) -> PageResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Html(ui::render_unavailable(theme, page, retry)),
    )
}

pub async fn index(State(state): State<AppState>, uri: Uri) -> PageResponse {
    let back = request_target(&uri);
    let theme = current_theme(&state).await;
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return unavailable(theme, Page::Home, back);
    }
    (
        StatusCode::OK,
        Html(ui::render_feed(theme, back, &notes.feed())),
    )
}

pub async fn vocabulary_page(
    State(state): State<AppState>,
    Query(params): Query<VocabularyParams>,
    uri: Uri,
) -> Result<PageResponse, AppError> {
    let back = request_target(&uri);
    let query = vocabulary_query(params)?;
    let theme = current_theme(&state).await;
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return Ok(unavailable(theme, Page::Vocabulary, back));
    }
    let records = notes.vocabulary(&query);
    Ok((
        StatusCode::OK,
        Html(ui::render_vocabulary(theme, back, &query, &records)),
    ))
}

pub async fn stats_page(State(state): State<AppState>, uri: Uri) -> PageResponse {
    let back = request_target(&uri);
    let theme = current_theme(&state).await;
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return unavailable(theme, Page::Stats, back);
    }
    (
        StatusCode::OK,
        Html(ui::render_stats(theme, back, &notes.statistics())),
    )
}

/// Practice works without notes; the starter deck covers that case.
pub async fn practice_page(
    State(state): State<AppState>,
    Query(params): Query<PracticeParams>,
    uri: Uri,
) -> PageResponse {
    let theme = current_theme(&state).await;
    let notes = load_notes(&state).await;
    let deck = build_deck(&notes.vocabulary(&VocabularyQuery::default()));
    let index = wrap_index(params.card.unwrap_or(0), deck.len());
    (
        StatusCode::OK,
        Html(ui::render_practice(theme, request_target(&uri), &deck, index)),
    )
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    Form(form): Form<ToggleThemeForm>,
) -> Result<Redirect, AppError> {
    change_theme(&state, Theme::toggled).await?;
    Ok(Redirect::to(&redirect_target(form.back)))
}

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: current_theme(&state).await,
    })
}

pub async fn update_theme(
    State(state): State<AppState>,
    Json(payload): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, AppError> {
    let theme: Theme = payload.theme.parse().map_err(AppError::bad_request)?;
    change_theme(&state, |_| theme).await?;
    Ok(Json(ThemeResponse { theme }))
}

async fn change_theme(
    state: &AppState,
    change: impl FnOnce(Theme) -> Theme,
) -> Result<Theme, AppError> {
    let mut prefs = state.prefs.lock().await;
    let theme = change(prefs.theme);
    prefs.theme = theme;
    persist_preferences(&state.config.prefs_path, &prefs).await?;
    info!("theme set to {theme}");
    Ok(theme)
}

pub async fn api_feed(State(state): State<AppState>) -> Result<Json<FeedResponse>, AppError> {
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return Err(AppError::no_data());
    }
    Ok(Json(FeedResponse {
        status: notes.status(),
        missing: notes.missing().to_vec(),
        notes: notes.feed(),
    }))
}

pub async fn api_vocabulary(
    State(state): State<AppState>,
    Query(params): Query<VocabularyParams>,
) -> Result<Json<VocabularyResponse>, AppError> {
    let query = vocabulary_query(params)?;
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return Err(AppError::no_data());
    }
    Ok(Json(VocabularyResponse {
        status: notes.status(),
        missing: notes.missing().to_vec(),
        records: notes.vocabulary(&query),
    }))
}

pub async fn api_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let notes = load_notes(&state).await;
    if notes.status() == LoadStatus::NoData {
        return Err(AppError::no_data());
    }
    Ok(Json(StatsResponse {
        status: notes.status(),
        missing: notes.missing().to_vec(),
        statistics: notes.statistics(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(back: &str) -> String {
        redirect_target(Some(back.to_string()))
    }

    #[test]
    fn redirect_keeps_own_pages_with_their_query() {
        assert_eq!(target("/stats"), "/stats");
        assert_eq!(
            target("/vocabulary?q=water&sort=word-asc"),
            "/vocabulary?q=water&sort=word-asc"
        );
        assert_eq!(target("/practice?card=2"), "/practice?card=2");
        assert_eq!(redirect_target(None), "/");
    }

    #[test]
    fn redirect_refuses_other_hosts_and_unknown_paths() {
        assert_eq!(target("//evil.example"), "/");
        assert_eq!(target("/\\evil.example"), "/");
        assert_eq!(target("/\\/evil.example"), "/");
        assert_eq!(target("https://evil.example/stats"), "/");
        assert_eq!(target("/stats\r\nLocation: //evil.example"), "/");
        assert_eq!(target("/api/theme"), "/");
    }

    #[test]
    fn request_target_includes_query() {
        let uri: Uri = "/vocabulary?q=book".parse().unwrap();
        assert_eq!(request_target(&uri), "/vocabulary?q=book");
        let bare: Uri = "/stats".parse().unwrap();
        assert_eq!(request_target(&bare), "/stats");
    }
}
