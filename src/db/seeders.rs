//! Database seeders for first-run data

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::User;
use crate::api::auth::hash_password;
use crate::config::AuthConfig;

/// Create the configured admin account if the users table is empty.
///
/// Does nothing unless both `admin_email` and `admin_password` are set.
pub async fn ensure_admin_user(pool: &SqlitePool, config: &AuthConfig) -> Result<Option<User>> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };

    if User::count(pool).await? > 0 {
        return Ok(None);
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;
    let user = User::insert(pool, email, &password_hash, &config.admin_name)
        .await
        .context("Failed to create admin user")?;

    info!(email = %user.email, "Created admin user");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::verify_password;
    use crate::db::test_pool;

    fn admin_config() -> AuthConfig {
        AuthConfig {
            jwt_key: "secret".to_string(),
            admin_email: Some("owner@kosan.local".to_string()),
            admin_password: Some("Sup3r-Secret!".to_string()),
            ..AuthConfig::default()
        }
    }

    #[tokio::test]
    async fn test_seeds_once() {
        let pool = test_pool().await;

        let created = ensure_admin_user(&pool, &admin_config()).await.unwrap().unwrap();
        assert_eq!(created.email, "owner@kosan.local");
        assert!(verify_password("Sup3r-Secret!", &created.password_hash));

        let again = ensure_admin_user(&pool, &admin_config()).await.unwrap();
        assert!(again.is_none());
        assert_eq!(User::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_skipped_without_credentials() {
        let pool = test_pool().await;
        let config = AuthConfig::default();

        assert!(ensure_admin_user(&pool, &config).await.unwrap().is_none());
        assert_eq!(User::count(&pool).await.unwrap(), 0);
    }
}
