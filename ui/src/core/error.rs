//! Error taxonomy shared by loading, import, export and the panels.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP {status}: {reason}")]
    Fetch { status: u16, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("the file contains no records")]
    EmptyImport,

    #[error("{0} export is not implemented yet")]
    NotImplemented(&'static str),

    #[error("export failed: {0}")]
    Export(String),

    #[error("analytics unavailable: {0}")]
    Analytics(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Failures the user can act on are warnings, everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, AppError::NotImplemented(_) | AppError::EmptyImport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_mentions_status() {
        let error = AppError::Fetch {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(error.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn json_error_converts() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: AppError = json_error.into();
        assert!(matches!(error, AppError::Json(_)));
        assert!(error.to_string().starts_with("JSON error"));
    }

    #[test]
    fn not_implemented_is_a_warning() {
        assert!(AppError::NotImplemented("Excel").is_warning());
        assert!(!AppError::UnsupportedFormat("a.xml".into()).is_warning());
        assert_eq!(
            AppError::NotImplemented("Excel").to_string(),
            "Excel export is not implemented yet"
        );
    }
}
