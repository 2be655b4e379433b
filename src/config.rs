//! Configuration structures for the endpoint client and mail transport.
//!
//! Values are supplied by the application at construction time; nothing
//! in this crate reads environment variables or other ambient state.

/// Configuration for the platform API endpoint client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URI every endpoint path is appended to
    /// (e.g. `"https://api.example.com/v2"`).
    pub base_url: String,

    /// Service-account name sent on authenticated endpoints.
    pub account_name: String,

    /// Service-account password.
    pub account_password: String,

    /// Response timeout in seconds.
    ///
    /// Default: 35 seconds.
    pub timeout_secs: u64,

    /// Connect timeout in seconds.
    ///
    /// Default: 3 seconds.
    pub connect_timeout_secs: u64,
}

impl ApiConfig {
    /// Create a configuration for the given base URL with default
    /// timeouts and an empty service account.
    #[must_use]
    pub const fn new(base_url: String) -> Self {
        Self {
            base_url,
            account_name: String::new(),
            account_password: String::new(),
            timeout_secs: 35,
            connect_timeout_secs: 3,
        }
    }

    /// Set the service account credentials.
    #[must_use]
    pub fn with_service_account(mut self, name: String, password: String) -> Self {
        self.account_name = name;
        self.account_password = password;
        self
    }

    /// Set the response timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080".to_string())
    }
}

/// SMTP mail transport configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server address (e.g. `"smtp.example.com"`).
    pub server: String,

    /// SMTP server port (usually 587 for TLS).
    pub port: u16,

    /// SMTP authentication username.
    pub username: String,

    /// SMTP authentication password.
    pub password: String,

    /// Sender email address.
    pub from_email: String,

    /// Sender display name.
    pub from_name: String,
}

impl SmtpConfig {
    /// Create an SMTP configuration.
    #[must_use]
    pub const fn new(server: String, port: u16, username: String, password: String) -> Self {
        Self {
            server,
            port,
            username,
            password,
            from_email: String::new(),
            from_name: String::new(),
        }
    }

    /// Set the sender address and display name.
    #[must_use]
    pub fn with_sender(mut self, from_email: String, from_name: String) -> Self {
        self.from_email = from_email;
        self.from_name = from_name;
        self
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self::new("localhost".to_string(), 1025, String::new(), String::new())
            .with_sender("noreply@localhost".to_string(), "Athlete Hub".to_string())
    }
}
