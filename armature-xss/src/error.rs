use thiserror::Error;

#[derive(Error, Debug)]
pub enum XssError {
    #[error("Invalid sanitizer configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, XssError>;
