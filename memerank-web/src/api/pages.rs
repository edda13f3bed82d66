//! Page routes
//!
//! All pages are rendered from embedded HTML templates with placeholder
//! substitution. Actions (rating, navigation) live in [`super::rating`] and
//! come back to these pages via redirects.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, Redirect},
};
use serde::Deserialize;
use std::sync::atomic::Ordering;
use tracing::info;
use uuid::Uuid;

use super::ApiError;
use crate::{qr, ranking, AppState};
use memerank_common::Error;

const HOME_HTML: &str = include_str!("../ui/home.html");
const RATE_HTML: &str = include_str!("../ui/rate.html");
const RESULTS_HTML: &str = include_str!("../ui/results.html");
const WAITING_HTML: &str = include_str!("../ui/waiting.html");

/// GET /
///
/// Home page: welcome text, a QR code encoding the page URL for mobile
/// access, and the Start Rating link.
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(state.public_addr.as_str());
    let page_url = format!("http://{}/", host);

    let qr_data_url = qr::data_url(&page_url)?;

    let page = HOME_HTML
        .replace("{{QR_DATA_URL}}", &qr_data_url)
        .replace("{{PAGE_URL}}", &page_url);
    Ok(Html(page))
}

/// GET /rate
///
/// Mints a fresh user id and redirects into that user's rating flow.
pub async fn start_rating() -> Redirect {
    let user_id = Uuid::new_v4();
    info!("New user connected: {}", user_id);
    Redirect::to(&format!("/rate/{}", user_id))
}

/// GET /rate/:user_id
///
/// Rating page for the session's current meme: image, name, progress, five
/// rating buttons (the session's previous rating highlighted) and
/// Previous/Next controls.
pub async fn rating_page(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let session = state.sessions.get_or_create(user_id).await;
    let meme = state
        .catalog
        .get(session.current_index)
        .ok_or_else(|| Error::Internal(format!("cursor out of range: {}", session.current_index)))?;

    let given = session.ratings_given.get(&session.current_index).copied();
    let total = state.catalog.len();

    let page = RATE_HTML
        .replace("{{USER_ID}}", &user_id.to_string())
        .replace("{{MEME_NAME}}", &meme.name)
        .replace("{{MEME_FILE}}", &meme.file_name)
        .replace("{{RATING_BUTTONS}}", &rating_buttons_html(user_id, given))
        .replace("{{PROGRESS_VALUE}}", &session.current_index.to_string())
        .replace("{{PROGRESS_MAX}}", &total.to_string())
        .replace("{{POSITION}}", &(session.current_index + 1).to_string())
        .replace("{{TOTAL}}", &total.to_string());
    Ok(Html(page))
}

/// Build the five rating buttons, highlighting the previously-given rating
fn rating_buttons_html(user_id: Uuid, given: Option<u8>) -> String {
    let mut buttons = String::new();
    for value in 1..=5u8 {
        let selected = if given == Some(value) { " selected" } else { "" };
        buttons.push_str(&format!(
            "<a class=\"btn rating{}\" href=\"/rate/{}/score/{}\">{}</a>\n",
            selected, user_id, value, value
        ));
    }
    buttons
}

/// GET /finish
///
/// Closes the ranking gate; from here on /results shows the leaderboard.
pub async fn finish(State(state): State<AppState>) -> Redirect {
    state.ranking_closed.store(true, Ordering::SeqCst);
    info!("Ranking closed for viewing");
    Redirect::to("/results")
}

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    /// Set by the completion redirect so Start Over can reset that session
    pub user: Option<Uuid>,
}

/// GET /results
///
/// Leaderboard once the gate is closed, waiting view before that.
pub async fn results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Html<String> {
    if !state.ranking_closed.load(Ordering::SeqCst) {
        return Html(WAITING_HTML.to_string());
    }

    let ranked = ranking::rank(&state.catalog).await;

    let mut entries = String::new();
    for (index, meme) in ranked.iter().enumerate() {
        entries.push_str(&format!(
            concat!(
                "<div class=\"entry\">",
                "<p>{} place, average score: {:.2}</p>",
                "<img src=\"/memes/{}\" alt=\"{}\">",
                "</div>\n"
            ),
            index + 1,
            meme.average,
            meme.file_name,
            meme.name
        ));
    }

    let start_over_url = query
        .user
        .map(|u| format!("/reset/{}", u))
        .unwrap_or_else(|| "/".to_string());

    Html(
        RESULTS_HTML
            .replace("{{ENTRIES}}", &entries)
            .replace("{{START_OVER_URL}}", &start_over_url),
    )
}

/// GET /reset/:user_id
///
/// Resets the acting session (cursor to 0, highlights cleared) and returns
/// home. Persisted ratings and other sessions are untouched.
pub async fn reset(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Redirect {
    state.sessions.reset(user_id).await;
    info!("Session {} reset", user_id);
    Redirect::to("/")
}
