use miette::Diagnostic;
use thiserror::Error;

/// Main error type for iconforge operations
#[derive(Error, Diagnostic, Debug)]
pub enum IconError {
    #[error("IO error: {0}")]
    #[diagnostic(code(iconforge::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(iconforge::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(iconforge::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Scan error with {path}: {message}")]
    #[diagnostic(code(iconforge::scan))]
    Scan {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Unsupported language: {key}")]
    #[diagnostic(code(iconforge::language))]
    UnsupportedLanguage {
        key: String,
        #[help]
        help: Option<String>,
    },

    #[error("Font build error: {message}")]
    #[diagnostic(code(iconforge::font))]
    FontBuild {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Write error with {path}: {message}")]
    #[diagnostic(code(iconforge::write))]
    Write {
        path: std::path::PathBuf,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, IconError>;
