//! # Notices
//!
//! Transient success/error banners shown after a view action.
//!
//! A notice carries its own expiry instead of a timer task: readers ask for
//! the notice "as of now" and an expired one simply reads as absent. Timed
//! on `tokio::time::Instant` so paused-clock tests can step past it.

use std::time::Duration;

use serde::{Serialize, Serializer};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One banner message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    /// `None` keeps the notice until replaced or cleared.
    #[serde(skip)]
    pub expires_at: Option<Instant>,
}

impl Notice {
    pub fn success(text: impl Into<String>, ttl: Duration) -> Self {
        Notice {
            text: text.into(),
            kind: NoticeKind::Success,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    pub fn error(text: impl Into<String>, ttl: Duration) -> Self {
        Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: Some(Instant::now() + ttl),
        }
    }

    /// An error that stays until the next action replaces it.
    pub fn sticky_error(text: impl Into<String>) -> Self {
        Notice {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// The single notice slot a view owns. A new notice replaces the old one.
#[derive(Debug, Clone, Default)]
pub struct NoticeSlot {
    notice: Option<Notice>,
}

impl NoticeSlot {
    pub fn set(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear(&mut self) {
        self.notice = None;
    }

    /// The notice as of now.
    pub fn current(&self) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| !n.is_expired())
    }
}

/// Serializes as the current notice, or `null` once it has expired.
impl Serialize for NoticeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.current().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let mut slot = NoticeSlot::default();
        slot.set(Notice::success("Sweets loaded successfully", Duration::from_secs(5)));

        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert_eq!(slot.current().map(|n| n.text.as_str()), Some("Sweets loaded successfully"));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(slot.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sticky_error_never_expires() {
        let mut slot = NoticeSlot::default();
        slot.set(Notice::sticky_error("Error: Passwords do not match"));

        tokio::time::advance(Duration::from_secs(3600)).await;
        let notice = slot.current().unwrap();
        assert!(notice.is_error());

        slot.clear();
        assert!(slot.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_notice_replaces_old() {
        let mut slot = NoticeSlot::default();
        slot.set(Notice::error("first", Duration::from_secs(5)));
        slot.set(Notice::success("second", Duration::from_secs(5)));
        assert_eq!(slot.current().unwrap().kind, NoticeKind::Success);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Notice::error("boom", Duration::from_secs(1))).unwrap();
        assert_eq!(json, serde_json::json!({"text": "boom", "kind": "error"}));
    }
}
