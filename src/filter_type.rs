use crate::error::ScanlineError;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Predictor used to delta-encode one scanline, stored as the row's leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[num_enum(error_type(name = ScanlineError, constructor = ScanlineError::invalid_filter_type))]
#[repr(u8)]
pub enum FilterType {
    /// Raw bytes, no prediction.
    None = 0,
    /// Left neighbour.
    Sub = 1,
    /// Byte above.
    Up = 2,
    /// Floor of the mean of left and above.
    Average = 3,
    /// Paeth predictor over left, above and upper-left.
    Paeth = 4,
}

impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterType::None => "None",
            FilterType::Sub => "Sub",
            FilterType::Up => "Up",
            FilterType::Average => "Average",
            FilterType::Paeth => "Paeth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_conversion() {
        for (i, filter) in FilterType::ALL.iter().enumerate() {
            assert_eq!(FilterType::try_from(i as u8), Ok(*filter));
            assert_eq!(u8::from(*filter), i as u8);
        }
    }

    #[test]
    fn test_out_of_range_selector_is_rejected() {
        assert_eq!(FilterType::try_from(5), Err(ScanlineError::InvalidFilterType));
        assert_eq!(FilterType::try_from(255), Err(ScanlineError::InvalidFilterType));
    }
}
