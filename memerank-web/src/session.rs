//! Per-user rating session state
//!
//! Each browser session gets its own cursor into the catalog and its own
//! record of which rating it gave each meme (used to highlight the buttons
//! on revisit). Sessions live only in process memory and are lost on
//! restart; the persisted rating rows are not.
//!
//! Concurrent users must never observe each other's cursor position, so all
//! state is keyed by user id in a registry rather than held process-wide.

use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One user's transient rating state
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    /// Current catalog index, always in [0, item_count)
    pub current_index: usize,
    /// Ratings this session has given, keyed by catalog index
    pub ratings_given: HashMap<usize, u8>,
}

impl Session {
    fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_index: 0,
            ratings_given: HashMap::new(),
        }
    }
}

/// Registry of live sessions, keyed by user id
///
/// Uses RwLock for concurrent read access with short writes.
pub struct SessionRegistry {
    /// Catalog size, fixed at startup. Never zero: catalog load is
    /// startup-fatal on an empty directory.
    item_count: usize,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl SessionRegistry {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of a session, creating it at cursor 0 on first sight
    pub async fn get_or_create(&self, user_id: Uuid) -> Session {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id))
            .clone()
    }

    /// Current cursor position for a session
    pub async fn current_index(&self, user_id: Uuid) -> usize {
        self.get_or_create(user_id).await.current_index
    }

    /// Cyclic cursor increment. Returns the new index; 0 means the session
    /// wrapped around and has seen the whole sequence.
    pub async fn advance(&self, user_id: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        session.current_index = (session.current_index + 1) % self.item_count;
        session.current_index
    }

    /// Cyclic cursor decrement, inverse of [`advance`](Self::advance)
    pub async fn retreat(&self, user_id: Uuid) -> usize {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        session.current_index = (session.current_index + self.item_count - 1) % self.item_count;
        session.current_index
    }

    /// Remember the rating this session gave a meme (for button highlighting)
    pub async fn record_rating(&self, user_id: Uuid, index: usize, rating: u8) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        session.ratings_given.insert(index, rating);
    }

    /// Reset one session: cursor to 0, local highlights cleared.
    ///
    /// Only the acting session is touched; persisted rating rows and other
    /// sessions are unaffected.
    pub async fn reset(&self, user_id: Uuid) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(user_id));
        session.current_index = 0;
        session.ratings_given.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_starts_at_zero() {
        let registry = SessionRegistry::new(3);
        let user = Uuid::new_v4();

        let session = registry.get_or_create(user).await;
        assert_eq!(session.user_id, user);
        assert_eq!(session.current_index, 0);
        assert!(session.ratings_given.is_empty());
    }

    #[tokio::test]
    async fn test_advance_wraps() {
        let registry = SessionRegistry::new(3);
        let user = Uuid::new_v4();

        assert_eq!(registry.advance(user).await, 1);
        assert_eq!(registry.advance(user).await, 2);
        assert_eq!(registry.advance(user).await, 0);
    }

    #[tokio::test]
    async fn test_retreat_is_inverse_of_advance() {
        let registry = SessionRegistry::new(5);
        let user = Uuid::new_v4();

        // From every starting index, advance then retreat restores the cursor
        for _ in 0..5 {
            let before = registry.current_index(user).await;
            registry.advance(user).await;
            assert_eq!(registry.retreat(user).await, before);
            registry.advance(user).await;
        }
    }

    #[tokio::test]
    async fn test_retreat_from_zero_wraps_to_last() {
        let registry = SessionRegistry::new(4);
        let user = Uuid::new_v4();

        assert_eq!(registry.retreat(user).await, 3);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new(3);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        registry.advance(alice).await;
        registry.advance(alice).await;

        assert_eq!(registry.current_index(alice).await, 2);
        assert_eq!(registry.current_index(bob).await, 0);
    }

    #[tokio::test]
    async fn test_reset_clears_only_acting_session() {
        let registry = SessionRegistry::new(3);
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        registry.record_rating(alice, 0, 5).await;
        registry.advance(alice).await;
        registry.record_rating(bob, 0, 2).await;
        registry.advance(bob).await;

        registry.reset(alice).await;

        let alice_session = registry.get_or_create(alice).await;
        assert_eq!(alice_session.current_index, 0);
        assert!(alice_session.ratings_given.is_empty());

        let bob_session = registry.get_or_create(bob).await;
        assert_eq!(bob_session.current_index, 1);
        assert_eq!(bob_session.ratings_given.get(&0), Some(&2));
    }
}
