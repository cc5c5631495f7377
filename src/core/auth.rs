//! Login and role checks.
//!
//! `NotAuthorized` means the caller could not be authenticated or does not own what it
//! touched; `Forbidden` means it is authenticated but its role is not enough.

use super::user;
use crate::{
    config::settings::AuthSettings,
    errors::{Error, Result},
    models::{AccessToken, LoginCredentials},
    security::{AuthenticatedUser, issue_token},
};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Verifies the credentials and issues an access token for the matching user.
#[instrument(skip(db, credentials, settings), fields(login = %credentials.username))]
pub async fn login(
    db: &DatabaseConnection,
    credentials: &LoginCredentials,
    settings: &AuthSettings,
) -> Result<AccessToken> {
    let account = user::verify_credentials(db, credentials).await?;
    let token = issue_token(&account, settings)?;
    info!(user_id = account.id, "User logged in");
    Ok(token)
}

/// Fails with [`Error::Forbidden`] unless the caller is an admin.
pub fn require_admin(caller: &AuthenticatedUser) -> Result<()> {
    if caller.is_admin() {
        return Ok(());
    }
    Err(Error::Forbidden {
        entity: "User",
        message: "This operation requires the Admin role".to_string(),
    })
}

/// Fails with [`Error::Forbidden`] unless the caller is `user_id` or an admin.
pub fn require_self_or_admin(caller: &AuthenticatedUser, user_id: i64) -> Result<()> {
    if caller.id == user_id || caller.is_admin() {
        return Ok(());
    }
    Err(Error::Forbidden {
        entity: "User",
        message: format!("User {} may not act on user {user_id}", caller.id),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::UserRole;
    use crate::security::decode_token;
    use crate::test_utils::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            issuer: "expense-tracker".to_string(),
            audience: "expense-tracker".to_string(),
            secret_key: "login-test-signing-key".to_string(),
        }
    }

    fn caller(id: i64, role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            username: None,
            email: format!("user{id}@example.com"),
            role,
        }
    }

    #[tokio::test]
    async fn test_login_issues_decodable_token() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_user(&db, "alice").await?;
        let settings = settings();

        let credentials = LoginCredentials {
            username: "alice@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
        };
        let token = login(&db, &credentials, &settings).await?;
        assert_eq!(token.username.as_deref(), Some("alice"));
        assert_eq!(token.role, UserRole::RegularUser);

        let authenticated = decode_token(&token.token, &settings)?;
        assert_eq!(authenticated.id, alice.id);
        assert_eq!(authenticated.email, "alice@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "alice").await?;

        let credentials = LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        };
        let result = login(&db, &credentials, &settings()).await;
        assert!(matches!(result, Err(Error::NotAuthorized { .. })));
        Ok(())
    }

    #[test]
    fn test_role_checks() {
        let admin = caller(1, UserRole::Admin);
        let regular = caller(2, UserRole::RegularUser);

        assert!(require_admin(&admin).is_ok());
        assert!(matches!(
            require_admin(&regular),
            Err(Error::Forbidden { .. })
        ));

        assert!(require_self_or_admin(&regular, 2).is_ok());
        assert!(require_self_or_admin(&admin, 2).is_ok());
        let denied = require_self_or_admin(&regular, 1);
        assert!(matches!(denied, Err(Error::Forbidden { .. })));
        assert_eq!(denied.unwrap_err().status_code(), 403);
    }
}
