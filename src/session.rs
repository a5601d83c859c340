//! Lifetime bookkeeping for per-page-view state.
//!
//! Every page that keeps state across triggers owns a session holding a
//! [`SessionStamp`]. The stamp logs when the session is created and again
//! when it is disposed, either explicitly or by being dropped with its page.

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug)]
pub struct SessionStamp {
    kind: &'static str,
    id: Uuid,
    started_at: DateTime<Utc>,
}

impl SessionStamp {
    pub fn new(kind: &'static str) -> Self {
        let stamp = Self {
            kind,
            id: Uuid::new_v4(),
            started_at: Utc::now(),
        };
        tracing::info!(
            session = %stamp.id,
            started_at = %stamp.started_at.to_rfc3339(),
            "{} session created",
            kind
        );
        stamp
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

impl Drop for SessionStamp {
    fn drop(&mut self) {
        let lived_ms = (Utc::now() - self.started_at).num_milliseconds();
        tracing::info!(
            session = %self.id,
            lived_ms,
            "{} session disposed",
            self.kind
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamps_are_unique() {
        let before = Utc::now();
        let a = SessionStamp::new("quiz");
        let b = SessionStamp::new("quiz");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.kind(), "quiz");
        assert!(a.started_at() >= before);
        assert!(a.started_at() <= Utc::now());
    }
}
