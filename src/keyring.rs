//! OAuth client secret storage in the OS keyring, one entry per client id.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_GOOGLE: &str = "attendance-tracker-google";

fn google_entry(client_id: &str) -> Result<Entry> {
    Entry::new(SERVICE_GOOGLE, client_id).context("Failed to create keyring entry")
}

/// Store the OAuth client secret for a Google client id
pub fn store_google_secret(client_id: &str, secret: &str) -> Result<()> {
    google_entry(client_id)?
        .set_password(secret)
        .context("Failed to store client secret in keyring")
}

pub fn get_google_secret(client_id: &str) -> Result<String> {
    google_entry(client_id)?
        .get_password()
        .context("No client secret in keyring")
}

pub fn delete_google_secret(client_id: &str) -> Result<()> {
    google_entry(client_id)?
        .delete_credential()
        .context("Failed to remove client secret from keyring")
}
