//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("empty alphabet: nothing to encode")]
    EmptyAlphabet,

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("corrupt stream: {0}")]
    CorruptStream(String),

    #[error("input too large: {size} symbols exceeds limit of {max}")]
    InputTooLarge { size: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
