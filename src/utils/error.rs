use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchitectError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing credential: {message}")]
    MissingCredential { message: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Unknown {kind} '{id}'")]
    UnknownId { kind: &'static str, id: String },

    #[error("Drink '{drink}' cannot be brewed with method '{method}'")]
    IncompatibleDrink { drink: String, method: String },

    #[error("Upstream returned {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Transport,
    Input,
    Catalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ArchitectError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingCredential { .. }
            | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::UpstreamError { .. } => ErrorCategory::Upstream,
            Self::ApiError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::CsvError(_) => ErrorCategory::Transport,
            Self::UnknownId { .. }
            | Self::IncompatibleDrink { .. }
            | Self::ValidationError { .. } => ErrorCategory::Input,
            Self::CatalogError { .. } => ErrorCategory::Catalog,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Upstream | ErrorCategory::Transport => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Catalog => ErrorSeverity::Critical,
        }
    }

    /// Short message suitable for end users; never includes credentials.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::UpstreamError { message, .. } => message.clone(),
            Self::ApiError(e) => format!("Failed to contact AI service: {}", e),
            Self::MissingCredential { message } => message.clone(),
            Self::UnknownId { kind, id } => format!("There is no {} called '{}'", kind, id),
            Self::IncompatibleDrink { drink, method } => {
                format!("{} is not available for {}", drink, method)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => {
                "Set OPENAI_API_KEY in the server environment and restart the proxy"
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } | Self::TomlError(_) => {
                "Check the configuration file and environment variables"
            }
            Self::UnknownId { .. } => "Run `coffee-architect catalog` to list valid ids",
            Self::IncompatibleDrink { .. } => "Pick a drink offered for the selected method",
            Self::CatalogError { .. } => "Fix the catalog definition so every table validates",
            Self::UpstreamError { .. } => "Try again later or check the upstream provider status",
            Self::ApiError(_) => "Check the proxy URL and your network connection",
            _ => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchitectError>;
