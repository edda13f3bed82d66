//! Rating engine and leaderboard aggregation

use crate::catalog::Catalog;
use crate::AppState;
use memerank_common::{Error, Result};
use tracing::info;
use uuid::Uuid;

/// Outcome of one rating action
#[derive(Debug, Clone, Copy)]
pub struct RateOutcome {
    /// New cursor position for the session
    pub next_index: usize,
    /// True when the cursor wrapped to 0: the session has rated the whole
    /// sequence and should be shown the results view
    pub completed: bool,
}

/// One leaderboard entry
#[derive(Debug, Clone)]
pub struct RankedMeme {
    pub name: String,
    pub file_name: String,
    pub average: f64,
    pub votes: usize,
}

/// Record a rating against the session's current meme.
///
/// Order matters: the rating row is persisted first, and nothing in memory
/// is mutated if that write fails, keeping the score lists consistent with
/// the durable store. On success the score is appended, the session's local
/// highlight map is updated, and the cursor advances.
///
/// An out-of-range rating is rejected with `Error::InvalidRating` and no
/// state change (not clamped).
pub async fn rate(state: &AppState, user_id: Uuid, rating: u8) -> Result<RateOutcome> {
    if !(1..=5).contains(&rating) {
        return Err(Error::InvalidRating(rating));
    }

    let index = state.sessions.current_index(user_id).await;
    let meme = state
        .catalog
        .get(index)
        .ok_or_else(|| Error::Internal(format!("session cursor out of range: {}", index)))?;

    memerank_common::db::insert_rating(&state.db, &user_id.to_string(), &meme.name, rating)
        .await?;

    state.catalog.push_score(index, rating).await;
    state.sessions.record_rating(user_id, index, rating).await;
    let next_index = state.sessions.advance(user_id).await;

    info!(
        "User {} rated meme '{}' with {}",
        user_id, meme.name, rating
    );

    Ok(RateOutcome {
        next_index,
        completed: next_index == 0,
    })
}

/// Rank all memes by average score, descending.
///
/// The sort is stable, so memes with equal averages keep catalog order.
/// Memes with no scores average 0.0.
pub async fn rank(catalog: &Catalog) -> Vec<RankedMeme> {
    let averages = catalog.averages().await;

    let mut ranked: Vec<RankedMeme> = Vec::with_capacity(catalog.len());
    for (index, meme) in catalog.memes().iter().enumerate() {
        ranked.push(RankedMeme {
            name: meme.name.clone(),
            file_name: meme.file_name.clone(),
            average: averages[index],
            votes: catalog.score_count(index).await,
        });
    }

    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked
}
