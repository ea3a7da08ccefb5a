use thiserror::Error;

/// Main error type for the codec core.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error during coding: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tree. Aborting tree decoding.")]
    InvalidTree,
    #[error("Value {value} outside of [{min}, {max}]")]
    ValueOutOfRange { value: i32, min: i32, max: i32 },
}

/// A specialized `Result` type for coding operations.
pub type Result<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            CodecError::InvalidTree.to_string(),
            "Invalid tree. Aborting tree decoding."
        );
        assert_eq!(
            CodecError::ValueOutOfRange {
                value: 7,
                min: 0,
                max: 3
            }
            .to_string(),
            "Value 7 outside of [0, 3]"
        );
    }
}
