use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "skincache";

/// Keychain entry name for the account API key
const KEY_ENTRY: &str = "api-key";

/// Length of the fingerprint prefix kept alongside persisted data
const FINGERPRINT_LEN: usize = 8;

/// Short non-secret identifier for an API key, used to tie a persisted
/// unlock snapshot to the credential that produced it. GW2 keys start with
/// a UUID, so the first characters identify the key without revealing the
/// secret portion.
pub fn fingerprint(api_key: &str) -> String {
    api_key.chars().take(FINGERPRINT_LEN).collect()
}

/// OS-keychain storage for the account API key.
pub struct ApiKeyStore;

impl ApiKeyStore {
    /// Store the API key in the OS keychain
    pub fn store(api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, KEY_ENTRY)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    /// Retrieve the stored API key from the OS keychain
    pub fn get() -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, KEY_ENTRY)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API key from keychain")
    }

    /// Delete the stored API key
    pub fn delete() -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, KEY_ENTRY)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API key from keychain")?;
        Ok(())
    }

    /// Check whether an API key is stored
    pub fn exists() -> bool {
        Entry::new(SERVICE_NAME, KEY_ENTRY)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
