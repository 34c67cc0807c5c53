use miette::Diagnostic;
use thiserror::Error;

/// Main error type for stipple operations
#[derive(Error, Diagnostic, Debug)]
pub enum StippleError {
    #[error("IO error: {0}")]
    #[diagnostic(code(stipple::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(stipple::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Could not decode image {path}: {message}")]
    #[diagnostic(
        code(stipple::decode),
        help("Check that the file is a PNG, JPEG, GIF, BMP or another format the image decoder supports")
    )]
    Decode {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(stipple::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(stipple::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Export error with {path}: {message}")]
    #[diagnostic(code(stipple::export))]
    Export {
        path: std::path::PathBuf,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, StippleError>;
