use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collector unavailable: {reason}")]
    CollectorUnavailable { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Operation timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// How a failed search should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The collector cannot run until it is reconfigured.
    Configuration,
    /// The request itself was unusable; nothing was fetched.
    Validation,
    /// The remote platform failed or was too slow. The request fails as a
    /// whole and is not retried.
    Fetch,
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Configuration => "configuration",
            ErrorClass::Validation => "validation",
            ErrorClass::Fetch => "fetch",
            ErrorClass::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CoreError::Config(_) | CoreError::CollectorUnavailable { .. } => {
                ErrorClass::Configuration
            }
            CoreError::InvalidInput { .. } => ErrorClass::Validation,
            CoreError::RedditApi(_)
            | CoreError::Network(_)
            | CoreError::Serialization(_)
            | CoreError::Timeout { .. } => ErrorClass::Fetch,
            CoreError::Internal { .. } => ErrorClass::Internal,
        }
    }

    pub fn is_fetch_error(&self) -> bool {
        self.class() == ErrorClass::Fetch
    }

    pub fn is_configuration_error(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("Invalid OAuth token")]
    InvalidToken,

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
