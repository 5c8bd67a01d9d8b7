//! Console configuration types.
//!
//! [`ConsoleConfig`] is the single source of truth for all runtime settings.
//! It is populated in layers by the binary (defaults, then the optional TOML
//! file, then CLI flags and environment variables) and then handed to the
//! application layer as a plain value.

/// Registry front end used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// All runtime configuration for one console instance.
///
/// # Example
///
/// ```rust
/// use registrar_console::domain::ConsoleConfig;
///
/// let cfg = ConsoleConfig::default();
/// assert_eq!(cfg.server_url, "http://localhost:8080");
/// assert!(cfg.password.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Base URL of the registrar front end; the XHR endpoint path is
    /// appended to it.
    pub server_url: String,

    /// Registrar client id.  Sent as `clientId` on every request and as
    /// `<clID>` in the login command.
    pub client_id: String,

    /// Anti-forgery token issued with the web session.  Sent as the
    /// `X-CSRF-Token` header on every request.
    pub xsrf_token: String,

    /// EPP password.  Sessions already authenticated by the front end leave
    /// this unset.
    pub password: Option<String>,

    /// Prefix of client transaction ids (`<prefix>-<n>`).
    pub trid_prefix: String,

    /// Fallback log filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ConsoleConfig {
    /// | Field        | Default                  |
    /// |--------------|--------------------------|
    /// | server_url   | `http://localhost:8080`  |
    /// | client_id    | empty                    |
    /// | xsrf_token   | empty                    |
    /// | password     | none                     |
    /// | trid_prefix  | 8 random hex characters  |
    /// | log_level    | `info`                   |
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            client_id: String::new(),
            xsrf_token: String::new(),
            password: None,
            trid_prefix: random_trid_prefix(),
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// `true` once the web session handed us a client id and token, i.e.
    /// the transport side of authentication is done.
    pub fn has_web_session(&self) -> bool {
        !self.client_id.is_empty() && !self.xsrf_token.is_empty()
    }
}

/// Eight lowercase hex characters taken from a random UUID.
pub fn random_trid_prefix() -> String {
    let mut hex = uuid::Uuid::new_v4().simple().to_string();
    hex.truncate(8);
    hex
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_url_is_localhost() {
        // Arrange / Act
        let cfg = ConsoleConfig::default();
        // Assert
        assert_eq!(cfg.server_url, "http://localhost:8080");
    }

    #[test]
    fn test_default_has_no_password() {
        let cfg = ConsoleConfig::default();
        assert!(cfg.password.is_none());
    }

    #[test]
    fn test_default_log_level_is_info() {
        let cfg = ConsoleConfig::default();
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_random_trid_prefix_is_eight_hex_chars() {
        let prefix = random_trid_prefix();
        assert_eq!(prefix.len(), 8);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_web_session_requires_client_id_and_token() {
        let mut cfg = ConsoleConfig::default();
        assert!(!cfg.has_web_session());

        cfg.client_id = "jartine".to_string();
        assert!(!cfg.has_web_session());

        cfg.xsrf_token = "☢".to_string();
        assert!(cfg.has_web_session());
    }
}
