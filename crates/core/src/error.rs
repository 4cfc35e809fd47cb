use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("failed to read patient context: {0}")]
    ContextRead(std::io::Error),
    #[error(
        "failed to parse patient context file {path}: {source}",
        path = path.display()
    )]
    ContextParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("AI flow failed: {0}")]
    Flow(String),
    #[error("AI flow request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to serialise: {0}")]
    Serialization(serde_json::Error),
    #[error("ICD-10 error: {0}")]
    Icd10(#[from] icd10::Icd10Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
