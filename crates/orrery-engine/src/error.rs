/// Catalog construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog JSON error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate body id `{0}`")]
    DuplicateId(String),
    #[error("invalid body `{id}`: {reason}")]
    InvalidBody { id: String, reason: &'static str },
}

/// Failures reported by the host environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("no rendering context available")]
    NoRenderingContext,
    #[error("surface error: {0}")]
    Surface(String),
    #[error("failed to register listener: {0}")]
    Listener(String),
    #[error("failed to schedule frame: {0}")]
    Frame(String),
}

/// Viewport lifecycle errors. Fatal to the component; the host shows a fallback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    #[error("viewport initialization failed: {0}")]
    Host(#[from] HostError),
}
