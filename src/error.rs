use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanlineError {
    #[error("Truncated input")]
    TruncatedInput = 1,
    #[error("Invalid filter type")]
    InvalidFilterType = 2,
    #[error("Byte source failure")]
    SourceFailure = 3,

    // Logic errors
    #[error("Destination too small")]
    DestinationTooSmall = 100,
    #[error("Invalid argument size")]
    InvalidArgumentSize = 101,
    #[error("Pixel format mismatch")]
    PixelFormatMismatch = 102,
    #[error("Invalid argument encoding options")]
    InvalidArgumentEncodingOptions = 103,
}

impl ScanlineError {
    /// Constructor used by the `FilterType` conversion; the rejected selector is logged.
    pub(crate) fn invalid_filter_type(selector: u8) -> Self {
        log::debug!("rejecting filter selector {}", selector);
        Self::InvalidFilterType
    }
}

impl From<io::Error> for ScanlineError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Self::TruncatedInput,
            _ => Self::SourceFailure,
        }
    }
}
