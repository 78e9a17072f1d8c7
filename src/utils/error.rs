use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobMapError {
    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input file is missing required column: {column}")]
    MissingColumnError { column: String },

    #[error("Unsupported input format: {path}")]
    UnsupportedInputError { path: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Output,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl JobMapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            JobMapError::ApiError(_) => ErrorCategory::Network,
            JobMapError::CsvError(_)
            | JobMapError::SpreadsheetError(_)
            | JobMapError::MissingColumnError { .. }
            | JobMapError::UnsupportedInputError { .. } => ErrorCategory::Input,
            JobMapError::ConfigError { .. }
            | JobMapError::ConfigValidationError { .. }
            | JobMapError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            JobMapError::IoError(_) | JobMapError::SerializationError(_) => ErrorCategory::Output,
            JobMapError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration | ErrorCategory::Processing => {
                ErrorSeverity::High
            }
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            JobMapError::ApiError(_) => "Check network connectivity and the geocoder endpoint",
            JobMapError::CsvError(_) => "Make sure the input is a valid comma-separated file",
            JobMapError::SpreadsheetError(_) => "Make sure the input is a readable .xlsx workbook",
            JobMapError::IoError(_) => {
                "Verify the input path exists and the output path is writable"
            }
            JobMapError::SerializationError(_) => "Report this issue together with the input file",
            JobMapError::ConfigError { .. }
            | JobMapError::ConfigValidationError { .. }
            | JobMapError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and config file"
            }
            JobMapError::MissingColumnError { .. } => {
                "Input needs Date Applied, Company Name, Job Title, Location, Status and Job Posting columns"
            }
            JobMapError::UnsupportedInputError { .. } => "Use a .csv or .xlsx input file",
            JobMapError::ProcessingError { .. } => "Re-run with --verbose to see which row failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the geocoding service: {}", self),
            ErrorCategory::Input => format!("Could not read the job list: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write the map: {}", self),
            ErrorCategory::Processing => format!("Map generation failed: {}", self),
        }
    }
}

/// Why a single geocoding lookup produced no coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("received status code {0}")]
    Status(u16),

    #[error("empty response")]
    EmptyBody,

    #[error("response is not in JSON format (content type: {0})")]
    NotJson(String),

    #[error("no results")]
    NoResults,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, JobMapError>;
