use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Body a message is replaced with when it is deleted
pub const DELETED_MESSAGE_BODY: &str = "This message has been deleted.";

/// A message posted to a group's board.
///
/// Keyed by (group, date) where `date` is epoch milliseconds. Messages are
/// never hard-deleted: deletion swaps the body for a tombstone and keeps the
/// first original.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMessage {
    #[sqlx(rename = "group_name")]
    pub group: String,
    pub date: i64,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl GroupMessage {
    /// Create a new GroupMessage stamped with the given posting time
    pub fn new(group: String, date: i64, body: String) -> Self {
        Self {
            group,
            date,
            body,
            original: None,
        }
    }

    /// Whether this message has been replaced by the deletion tombstone
    pub fn is_deleted(&self) -> bool {
        self.body == DELETED_MESSAGE_BODY && self.original.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_message_is_not_deleted() {
        let msg = GroupMessage::new("hrv-spring".to_string(), 1_672_700_000_000, "hello".to_string());
        assert!(!msg.is_deleted());
    }

    #[test]
    fn test_tombstoned_message_is_deleted() {
        let mut msg = GroupMessage::new("hrv-spring".to_string(), 1_672_700_000_000, "hello".to_string());
        msg.original = Some(msg.body.clone());
        msg.body = DELETED_MESSAGE_BODY.to_string();
        assert!(msg.is_deleted());
    }
}
