//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! hh-cli admin create -e admin@example.com -n "Admin Name" -p 'a long password'
//! ```

use harvest_hub_core::{Email, UserRole};
use harvest_hub_storefront::db::UserRepository;
use harvest_hub_storefront::services::{AuthError, AuthService};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Registration was refused.
    #[error("Could not create admin: {0}")]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Repository(#[from] harvest_hub_storefront::db::RepositoryError),
}

/// Create a new admin user.
///
/// # Errors
///
/// Returns `AdminError::Auth` if the email is taken or the input is invalid.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", email);
    let user = AuthService::new(&pool)
        .register(name, email, password, UserRole::Admin)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id.as_i32())
}

/// Create the admin user unless an account with that email already exists.
///
/// An existing account is left untouched, whatever its role.
///
/// # Errors
///
/// Returns an error if the lookup or creation fails.
pub async fn ensure_user(email: &str, name: &str, password: &str) -> Result<(), AdminError> {
    let pool = connect().await?;

    let parsed = Email::parse(email).map_err(AuthError::from)?;
    if let Some(existing) = UserRepository::new(&pool).get_by_email(&parsed).await? {
        tracing::info!(
            "User {} already exists (role: {}). Skipping creation.",
            existing.email,
            existing.role
        );
        return Ok(());
    }

    tracing::info!("Admin user not found. Creating {}...", email);
    let user = AuthService::new(&pool)
        .register(name, email, password, UserRole::Admin)
        .await?;

    tracing::info!("Admin user created! ID: {}, Email: {}", user.id, user.email);
    tracing::info!("Setup complete. You can start the storefront now.");
    Ok(())
}
