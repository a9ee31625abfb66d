/// Error raised while parsing addresses or encoding/decoding call data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    InvalidAddress(String),
    UnsupportedType(String),
    UintOverflow,
    Truncated,
    OutOfBounds,
    InvalidUtf8,
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(s) => write!(f, "invalid address: {s}"),
            Self::UnsupportedType(t) => write!(f, "unsupported ABI type: {t}"),
            Self::UintOverflow => write!(f, "uint256 value exceeds supported range"),
            Self::Truncated => write!(f, "call data shorter than declared layout"),
            Self::OutOfBounds => write!(f, "dynamic offset or length out of bounds"),
            Self::InvalidUtf8 => write!(f, "string payload is not valid UTF-8"),
        }
    }
}

impl std::error::Error for CodecError {}
