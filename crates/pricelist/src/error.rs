use pricelist_core::TransformError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to fetch {url} after {attempts} attempts: {last_error}")]
    FetchExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Invalid page at {url}: {message}")]
    InvalidPage { url: String, message: String },

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Failed to write {path}: {message}")]
    Export { path: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl Error {
    pub fn export(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Error::Export {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
