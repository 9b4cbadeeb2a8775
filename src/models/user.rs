use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User model representing a member of a training group
///
/// `date_created` is a YYYYMMDD integer; it feeds the shortened first-week
/// target for users who join a group mid-week.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_created: i32,
    pub is_admin: bool,
    pub photo_url: String,
}

impl User {
    /// Create a new User (typically used for creating from API input)
    pub fn new(first_name: String, last_name: String, date_created: i32, photo_url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            date_created,
            is_admin: false,
            photo_url,
        }
    }

    /// Placeholder identity used when the current user cannot be resolved
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            first_name: String::new(),
            last_name: String::new(),
            date_created: 0,
            is_admin: false,
            photo_url: String::new(),
        }
    }

    /// Display name assembled from the name parts
    pub fn name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let user = User::new("Ada".to_string(), "Lovelace".to_string(), 20230103, String::new());
        assert_eq!(user.name(), "Ada Lovelace");
    }

    #[test]
    fn test_anonymous_user_is_not_admin() {
        let user = User::anonymous();
        assert!(!user.is_admin);
        assert_eq!(user.name(), "");
        assert!(user.id.is_nil());
    }
}
