use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    #[error("Unrecognized {field} grade: '{value}'")]
    UnknownGrade { field: String, value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported snapshot format: {path}")]
    UnsupportedSnapshotFormat { path: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端違反輸入契約 (價格、目標品相)
    Input,
    /// 設定檔或命令列參數
    Configuration,
    /// 讀檔、解析快照
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::InvalidPrice { .. } | PricingError::UnknownGrade { .. } => {
                ErrorCategory::Input
            }
            PricingError::ConfigError { .. }
            | PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PricingError::IoError(_)
            | PricingError::CsvError(_)
            | PricingError::SerializationError(_)
            | PricingError::UnsupportedSnapshotFormat { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => match self {
                PricingError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PricingError::InvalidPrice { .. } => {
                "Prices must be positive with at most two decimal places"
            }
            PricingError::UnknownGrade { .. } => {
                "Use one of P, F, G, G+, VG, VG+, NM, M (full names like 'Very Good Plus' also work)"
            }
            PricingError::IoError(_) => "Check that the file exists and is readable",
            PricingError::CsvError(_) => {
                "Expected header: price,media_grade,sleeve_grade,seller_region,seller_label"
            }
            PricingError::SerializationError(_) => {
                "Snapshot JSON must be an array of listing objects"
            }
            PricingError::UnsupportedSnapshotFormat { .. } => {
                "Use a .csv or .json listing snapshot"
            }
            PricingError::ConfigError { .. }
            | PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration and command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid pricing input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not read listing snapshot: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;
