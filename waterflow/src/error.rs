/// Why a span could not be resolved for an item.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanError {
    /// The index is past the end of the data source.
    #[error("item {index} is past the end of the data source")]
    OutOfRange { index: usize },

    /// The host knows the item but cannot report its span yet. Placement is retried on a later
    /// pass.
    #[error("span of item {index} is not available yet")]
    Unavailable { index: usize },
}

impl SpanError {
    pub fn index(&self) -> usize {
        match *self {
            Self::OutOfRange { index } | Self::Unavailable { index } => index,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error(transparent)]
    Span(#[from] SpanError),

    /// The line has no ranked predecessor to continue from.
    #[error("no item to resume ranking at line {line}")]
    NoResumeItem { line: usize },
}

pub type LayoutResult<T> = Result<T, LayoutError>;
