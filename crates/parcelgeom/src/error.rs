use thiserror::Error;

/// Reasons a boundary string cannot be turned into polygonal geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    /// The text is not well-formed WKT.
    #[error("unreadable boundary text: {0}")]
    Parse(String),
    /// Well-formed WKT, but not a POLYGON or MULTIPOLYGON.
    #[error("unsupported geometry type {0}, expected POLYGON or MULTIPOLYGON")]
    UnsupportedType(&'static str),
    /// A polygonal geometry with no coordinates. It has no envelope and cannot be indexed.
    #[error("empty boundary")]
    Empty,
}
