use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repositories::{GroupMemberRepository, UserRepository};
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

const TOKEN_PREFIX: &str = "pacer_auth";

/// Tokens older (or newer) than this many seconds are rejected
const TOKEN_MAX_AGE_SECS: i64 = 300;

/// Check if we're in development mode (skip digest verification)
fn is_dev_mode() -> bool {
    std::env::var("ENVIRONMENT")
        .map(|e| e.to_lowercase() == "development")
        .unwrap_or(false)
}

fn token_digest(user_id: &Uuid, timestamp: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}:{}", TOKEN_PREFIX, user_id, timestamp, secret));
    hex::encode(hasher.finalize())
}

/// Issue an access token for a user.
///
/// Format: `pacer_auth:{user_id}:{timestamp}:{hex digest}`. The digest is a
/// SHA-256 over the same fields plus the configured secret.
pub fn issue_token(user_id: &Uuid, secret: &str, timestamp: i64) -> String {
    format!(
        "{}:{}:{}:{}",
        TOKEN_PREFIX,
        user_id,
        timestamp,
        token_digest(user_id, timestamp, secret)
    )
}

/// Verify an access token and extract the user id it was issued for.
///
/// Checks that:
/// 1. The token is well-formed and carries a valid user id
/// 2. The timestamp is recent (within 5 minutes of `now`)
/// 3. The digest matches (skipped in development mode)
pub fn verify_token(token: &str, secret: &str, now: i64) -> AppResult<Uuid> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 4 || parts[0] != TOKEN_PREFIX {
        return Err(AppError::Validation("Malformed access token".to_string()));
    }

    let user_id = Uuid::parse_str(parts[1])
        .map_err(|e| AppError::Validation(format!("Invalid user id in token: {}", e)))?;

    let timestamp: i64 = parts[2]
        .parse()
        .map_err(|_| AppError::Validation("Invalid token timestamp".to_string()))?;

    if (now - timestamp).abs() > TOKEN_MAX_AGE_SECS {
        return Err(AppError::Unauthorized("Access token expired".to_string()));
    }

    // In development mode, accept any well-formed token
    if is_dev_mode() {
        if parts[3].is_empty() {
            return Err(AppError::Validation("Token digest required".to_string()));
        }
        return Ok(user_id);
    }

    if parts[3] != token_digest(&user_id, timestamp, secret) {
        return Err(AppError::Unauthorized("Token digest mismatch".to_string()));
    }

    Ok(user_id)
}

/// Outcome of resolving the caller's identity.
///
/// Resolution never fails outright: callers that only render data fall back
/// to an anonymous, non-admin identity and can inspect the reason.
#[derive(Debug, Clone)]
pub enum Identity {
    Authenticated(User),
    Anonymous { reason: String },
}

impl Identity {
    /// The resolved user, or the anonymous placeholder
    pub fn user(&self) -> User {
        match self {
            Identity::Authenticated(user) => user.clone(),
            Identity::Anonymous { .. } => User::anonymous(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }

    /// The fallback reason, when resolution fell back
    pub fn reason(&self) -> Option<&str> {
        match self {
            Identity::Authenticated(_) => None,
            Identity::Anonymous { reason } => Some(reason),
        }
    }
}

/// Resolve the caller from an Authorization header value, failing soft.
///
/// Any failure (missing header, bad token, unknown user, database error) is
/// logged and mapped to the anonymous identity so views still render.
pub async fn resolve_identity(
    auth_header: Option<&str>,
    secret: &str,
    user_repo: &UserRepository,
) -> Identity {
    let token = match auth_header {
        Some(value) if !value.is_empty() => value,
        _ => {
            return Identity::Anonymous {
                reason: "No access token supplied".to_string(),
            }
        }
    };

    let now = chrono::Utc::now().timestamp();
    let user_id = match verify_token(token, secret, now) {
        Ok(id) => id,
        Err(err) => {
            warn!("Error verifying access token: {}", err);
            return Identity::Anonymous {
                reason: err.to_string(),
            };
        }
    };

    match user_repo.find_by_id(user_id).await {
        Ok(Some(user)) => Identity::Authenticated(user),
        Ok(None) => Identity::Anonymous {
            reason: format!("Unknown user {}", user_id),
        },
        Err(err) => {
            warn!("Error loading current user {}: {}", user_id, err);
            Identity::Anonymous {
                reason: "Error loading current user".to_string(),
            }
        }
    }
}

/// Check whether a user administers the given group, failing soft.
///
/// Staff users administer every group; otherwise membership role decides.
/// Lookup errors are logged and default to non-admin.
pub async fn is_group_admin(
    user: &User,
    group_name: &str,
    member_repo: &GroupMemberRepository,
) -> bool {
    if user.is_admin {
        return true;
    }

    match member_repo.find_role(group_name, user.id).await {
        Ok(role) => role.map(|r| r == crate::models::MemberRole::Admin).unwrap_or(false),
        Err(err) => {
            warn!("Error checking admin role for {} in {}: {}", user.id, group_name, err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();

        let token = issue_token(&user_id, "secret", now);
        assert_eq!(verify_token(&token, "secret", now).unwrap(), user_id);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let user_id = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();

        let token = issue_token(&user_id, "secret", now - 400);
        assert!(verify_token(&token, "secret", now).is_err());
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        assert!(verify_token("not-a-token", "secret", now).is_err());
        assert!(verify_token("pacer_auth:nope:123:abc", "secret", now).is_err());
    }

    #[test]
    fn test_anonymous_identity_defaults() {
        let identity = Identity::Anonymous {
            reason: "No access token supplied".to_string(),
        };
        assert!(!identity.is_authenticated());
        assert!(!identity.user().is_admin);
        assert_eq!(identity.reason(), Some("No access token supplied"));
    }
}
