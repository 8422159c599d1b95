//! API credentials, resolved once at startup and passed down explicitly.

use crate::error::{DocmindError, Result};
use std::fmt;

/// The token used for both the embedding and the chat-completion service.
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: Option<String>,
    /// Name of the variable the key is read from, used in error messages.
    source: String,
}

impl Credentials {
    /// Wrap an already-known key. Blank keys count as missing.
    pub fn new(api_key: Option<String>, source: impl Into<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            source: source.into(),
        }
    }

    /// Read the key from the named environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok(), var)
    }

    /// Whether a non-empty key is available.
    pub fn is_present(&self) -> bool {
        self.api_key.is_some()
    }

    /// The key, or a configuration error telling the operator how to supply it.
    pub fn require(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            DocmindError::Config(format!(
                "{var} is missing. Set it with: export {var}='hf_...'",
                var = self.source
            ))
        })
    }

    /// The key for building clients; empty when absent.
    pub(crate) fn api_key_or_empty(&self) -> String {
        self.api_key.clone().unwrap_or_default()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("source", &self.source)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_missing_key_is_configuration_error() {
        let creds = Credentials::new(None, "HUGGINGFACEHUB_API_TOKEN");
        let err = creds.require().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("HUGGINGFACEHUB_API_TOKEN"));
        assert!(err.to_string().contains("export"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let creds = Credentials::new(Some("   ".to_string()), "TOKEN");
        assert!(!creds.is_present());
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials::new(Some("hf_secret".to_string()), "TOKEN");
        assert_eq!(creds.require().unwrap(), "hf_secret");
        assert!(!format!("{:?}", creds).contains("hf_secret"));
    }
}
