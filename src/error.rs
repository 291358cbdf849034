use thiserror::Error;

/// Errors surfaced by the wiki client.
#[derive(Error, Debug)]
pub enum SmwError {
    /// Login token could not be obtained or the wiki rejected the credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Network failure or non-2xx response
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Well-formed response lacking an expected field, or a MediaWiki error envelope
    #[error("API error: {0}")]
    Api(String),

    #[error("RDF parse error: {0}")]
    RdfParse(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type SmwResult<T> = Result<T, SmwError>;
