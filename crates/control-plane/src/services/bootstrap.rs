// Startup credential provisioning
// Decision: The admin user is created only if the username is free; an existing
// account is never modified from the environment

use snippets_core::{CredentialStore, IssuedApiKey, Result};

use crate::auth::AdminConfig;

/// Create the configured admin user if it does not exist yet.
///
/// Returns true if a user was created.
pub async fn ensure_admin_user(store: &dyn CredentialStore, admin: &AdminConfig) -> Result<bool> {
    if store.find_by_username(&admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Admin user already exists");
        return Ok(false);
    }

    match store.create_user(&admin.username, &admin.password).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "Created admin user");
            Ok(true)
        }
        // Another instance won the race
        Err(e) if e.is_conflict() => Ok(false),
        Err(e) => Err(e),
    }
}

/// Issue a fresh API key for local development.
///
/// The token is logged once; it cannot be recovered afterwards.
pub async fn issue_bootstrap_api_key(
    store: &dyn CredentialStore,
    owner: &str,
) -> Result<IssuedApiKey> {
    let issued = store.create_api_key(owner).await?;
    tracing::warn!(
        key_id = %issued.credential.id,
        owner = %owner,
        api_key = %issued.token,
        "Issued development API key (shown once)"
    );
    Ok(issued)
}
