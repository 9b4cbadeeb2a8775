use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emoji reaction left on another user's training day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiFeedback {
    pub emoji: String,
    pub from: String,
}

impl EmojiFeedback {
    pub fn new(emoji: String, from: String) -> Self {
        Self { emoji, from }
    }
}

/// One day of a user's training history.
///
/// Keyed by (user id, YYYYMMDD date). `minutes` stays `None` for days with
/// feedback but no logged training; both fields tolerate absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub user_id: Uuid,
    pub date: i32,
    pub minutes: Option<i32>,
    #[serde(default)]
    pub emoji: Vec<EmojiFeedback>,
}

impl UserData {
    /// Create an empty record for a (user, day) pair
    pub fn new(user_id: Uuid, date: i32) -> Self {
        Self {
            user_id,
            date,
            minutes: None,
            emoji: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = UserData::new(Uuid::new_v4(), 20230104);
        assert_eq!(record.minutes, None);
        assert!(record.emoji.is_empty());
    }
}
