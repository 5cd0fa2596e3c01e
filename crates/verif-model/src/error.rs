use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A grouping key that does not decompose into the expected
    /// `<name>_<year>_<type>` shape.
    #[error("malformed grouping key {key:?}: expected three '_'-separated segments, found {segments}")]
    MalformedKey { key: String, segments: usize },

    /// A grouping key with the right segment count but an empty segment.
    #[error("malformed grouping key {key:?}: segment {index} is empty")]
    EmptyKeySegment { key: String, index: usize },
}

pub type Result<T> = std::result::Result<T, ModelError>;
