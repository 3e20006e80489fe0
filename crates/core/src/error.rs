// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dispatcher fault: {0}")]
    DispatcherFault(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
