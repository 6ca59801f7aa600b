use thiserror::Error;

/// Errors that can occur while loading tiles or style sources.
///
/// Rendering itself never fails; everything that can go wrong there is skipped and logged.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unable to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Style rule #{index} has an invalid declaration: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("The tile granularity must be a positive integer.")]
    ZeroGranularity,
}
