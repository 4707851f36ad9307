use crate::config::Config;
use crate::google::GoogleAuthenticator;
use crate::{keyring, platform};
use anyhow::Result;
use chrono::Utc;

/// Authenticator for the configured client. The secret comes from config,
/// falling back to the OS keyring.
pub fn authenticator(config: &Config) -> Result<GoogleAuthenticator> {
    let secret = config.google.client_secret.clone().or_else(|| {
        keyring::get_google_secret(&config.google.client_id)
            .map_err(|e| tracing::debug!(error = %e, "no client secret in keyring"))
            .ok()
    });
    let cache = platform::token_cache_path(config.storage.state_dir_override.as_ref())?;
    Ok(GoogleAuthenticator::new(&config.google, secret, cache)?)
}

pub async fn login(config: &Config) -> Result<()> {
    let auth = authenticator(config)?;
    auth.login().await?;
    println!("✓ Authenticated with Google Calendar");
    println!("  Token cache: {}", auth.cache_path().display());
    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let auth = authenticator(config)?;

    let Some(tokens) = auth.load_cached()? else {
        println!("❌ Not authenticated. Run 'attend oauth login' first.");
        return Ok(());
    };

    if !tokens.needs_refresh(Utc::now()) {
        println!("✓ Authenticated with Google Calendar");
    } else {
        match auth.access_token().await {
            Ok(_) => println!("✓ Authenticated with Google Calendar (token refreshed)"),
            Err(e) => {
                println!("❌ Authentication expired or invalid: {}", e);
                println!("  Run 'attend oauth login' to re-authenticate.");
                return Ok(());
            }
        }
    }
    println!("  Token cache: {}", auth.cache_path().display());
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let auth = authenticator(config)?;
    if auth.logout()? {
        println!("✓ Removed cached Google tokens");
    } else {
        println!("No cached Google tokens.");
    }
    Ok(())
}

/// Store the client secret in the keyring; an empty value removes it
pub fn store_secret(config: &Config, secret: &str) -> Result<()> {
    if config.google.client_id.is_empty() {
        anyhow::bail!("Set google.client_id before storing its secret");
    }
    if secret.is_empty() {
        keyring::delete_google_secret(&config.google.client_id)?;
        println!("✓ Client secret removed from the system keyring");
        return Ok(());
    }
    keyring::store_google_secret(&config.google.client_id, secret)?;
    println!("✓ Client secret stored in the system keyring");
    Ok(())
}
