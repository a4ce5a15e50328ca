//! Tree Configuration

/// Historic leaf-count ceiling (2^9) of the first prototype.
pub const LEGACY_MAX_RECORDS: usize = 512;

/// Smallest leaf layer a tree is built with.
///
/// A single record is still padded to two leaves so every proof has at
/// least one sibling.
pub const MIN_LEAF_COUNT: usize = 2;

/// Tree build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Upper bound on the record count, `None` for no bound.
    pub max_records: Option<usize>,
}

impl TreeConfig {
    /// Configuration with the 512-record ceiling of the original prototype.
    pub fn legacy() -> Self {
        Self {
            max_records: Some(LEGACY_MAX_RECORDS),
        }
    }

    /// Configuration with a custom record ceiling.
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            max_records: Some(max_records),
        }
    }
}
