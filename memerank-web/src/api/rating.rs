//! Rating and navigation actions
//!
//! Every action receives the acting user id in the path and redirects back
//! into the page flow; the handlers hold no state of their own.

use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::info;
use uuid::Uuid;

use super::ApiError;
use crate::{ranking, AppState};

/// GET /rate/:user_id/score/:rating
///
/// Records a rating for the session's current meme and advances. Redirects
/// to the results view when the session has rated the whole sequence.
pub async fn submit_rating(
    State(state): State<AppState>,
    Path((user_id, rating)): Path<(Uuid, u8)>,
) -> Result<Redirect, ApiError> {
    let outcome = ranking::rate(&state, user_id, rating).await?;

    if outcome.completed {
        info!("User {} reached the end of the sequence", user_id);
        Ok(Redirect::to(&format!("/results?user={}", user_id)))
    } else {
        Ok(Redirect::to(&format!("/rate/{}", user_id)))
    }
}

/// GET /rate/:user_id/next
///
/// Advances the cursor without recording a score. Wrapping around the end
/// of the sequence lands on the results view, as with a final rating.
pub async fn next_meme(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Redirect {
    let next_index = state.sessions.advance(user_id).await;

    if next_index == 0 {
        Redirect::to(&format!("/results?user={}", user_id))
    } else {
        Redirect::to(&format!("/rate/{}", user_id))
    }
}

/// GET /rate/:user_id/prev
///
/// Steps the cursor back without recording a score.
pub async fn prev_meme(State(state): State<AppState>, Path(user_id): Path<Uuid>) -> Redirect {
    state.sessions.retreat(user_id).await;
    Redirect::to(&format!("/rate/{}", user_id))
}
