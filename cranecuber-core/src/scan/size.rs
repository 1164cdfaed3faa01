//! Cube size detection

use crate::config::{MAX_CUBE_SIZE, MIN_CUBE_SIZE};
use crate::error::ConfigurationError;

/// Cube size from the number of squares seen on all six faces
pub fn detect_size(square_count: usize) -> Result<u8, ConfigurationError> {
    let per_face = square_count / 6;
    if square_count == 0 || square_count % 6 != 0 {
        return Err(ConfigurationError::SquareCount(square_count));
    }

    let side = (1..=per_face)
        .take_while(|s| s * s <= per_face)
        .last()
        .filter(|s| s * s == per_face)
        .ok_or(ConfigurationError::SquareCount(square_count))?;

    let size = u8::try_from(side).map_err(|_| ConfigurationError::SquareCount(square_count))?;
    if !(MIN_CUBE_SIZE..=MAX_CUBE_SIZE).contains(&size) {
        return Err(ConfigurationError::UnsupportedCubeSize(size));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_sizes() {
        assert_eq!(detect_size(24), Ok(2));
        assert_eq!(detect_size(54), Ok(3));
        assert_eq!(detect_size(96), Ok(4));
        assert_eq!(detect_size(150), Ok(5));
        assert_eq!(detect_size(216), Ok(6));
        assert_eq!(detect_size(294), Ok(7));
    }

    #[test]
    fn test_rejects_other_counts() {
        assert_eq!(detect_size(0), Err(ConfigurationError::SquareCount(0)));
        assert_eq!(detect_size(6), Err(ConfigurationError::UnsupportedCubeSize(1)));
        assert_eq!(detect_size(53), Err(ConfigurationError::SquareCount(53)));
        assert_eq!(detect_size(60), Err(ConfigurationError::SquareCount(60)));
        assert_eq!(detect_size(384), Err(ConfigurationError::UnsupportedCubeSize(8)));
    }
}
