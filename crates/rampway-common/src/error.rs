use thiserror::Error;

use crate::entities::AnalyteKind;

#[derive(Debug, Error)]
pub enum RampwayError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Could not resolve '{input}' to a {kind} identifier")]
    UnresolvedIdentifier { input: String, kind: AnalyteKind },

    #[error("'{id}' is not a valid {kind} identifier")]
    InvalidIdentifier { id: String, kind: AnalyteKind },

    #[error(
        "Pathway service unavailable after trying {} endpoint(s) [{}]: {last_error}",
        .endpoints.len(),
        .endpoints.join(", ")
    )]
    QueryUnavailable { endpoints: Vec<String>, last_error: String },

    #[error("Malformed pathway response: {0}")]
    MalformedResponse(String),

    #[error("Unknown disease '{name}'. Known diseases: {known}")]
    UnknownDisease { name: String, known: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RampwayError>;
