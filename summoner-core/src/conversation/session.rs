//! Conversation session

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::config::SessionConfig;

use super::context::ConversationContext;
use super::history::{Turn, TurnHistory};

/// State of one conversation.
///
/// Owns the context and history; the assistant itself holds none. Passed
/// mutably into every [`Assistant::respond`](crate::assistant::Assistant::respond)
/// call.
#[derive(Debug)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    pub context: ConversationContext,
    history: TurnHistory,
    cancel: CancellationToken,
}

impl Session {
    pub fn new() -> Self {
        Self::with_capacity(TurnHistory::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(history_capacity: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            context: ConversationContext::new(),
            history: TurnHistory::new(history_capacity),
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::with_capacity(config.history_capacity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    /// Record a committed reply.
    pub fn commit(&mut self, query: impl Into<String>, reply: impl Into<String>) {
        self.history.push(Turn::new(query, reply));
    }

    /// Token observed by in-flight outbound calls.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort in-flight calls. Later turns start with a fresh token.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
    }

    /// Replace a cancelled token so the next turn can run.
    pub fn rearm(&mut self) {
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
    }

    /// Drop context and history, keeping the id.
    pub fn reset(&mut self) {
        self.context = ConversationContext::new();
        self.history.clear();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert!(!session.id().is_empty());
        assert!(session.history().is_empty());
        assert_eq!(session.history().capacity(), 5);
        assert!(session.context.subject.is_none());
    }

    #[test]
    fn test_commit_is_bounded() {
        let mut session = Session::with_capacity(3);
        for i in 0..4 {
            session.commit(format!("q{}", i), "r");
        }
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().iter().next().unwrap().query, "q1");
    }

    #[test]
    fn test_cancel_and_rearm() {
        let mut session = Session::new();
        let token = session.cancellation();
        session.cancel();
        assert!(token.is_cancelled());

        session.rearm();
        assert!(!session.cancellation().is_cancelled());
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        session.context.subject = Some("Ahri".to_string());
        session.commit("q", "r");
        let id = session.id().to_string();

        session.reset();
        assert!(session.context.subject.is_none());
        assert!(session.history().is_empty());
        assert_eq!(session.id(), id);
    }
}
