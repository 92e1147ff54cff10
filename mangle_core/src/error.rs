use thiserror::Error;

/// Rejected `MutationOptions`, detected while building a `MutationConfig`.
///
/// Construction is atomic: when one of these is returned no config exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A size or offset option was below zero.
    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    /// A per-operation bound was zero or below; these need at least one unit of room.
    #[error("`{field}` must be at least 1 (got {value})")]
    NotPositive { field: &'static str, value: i64 },

    /// `min_ops` is larger than a non-zero `max_ops`.
    #[error("min_ops ({min_ops}) is greater than max_ops ({max_ops})")]
    OpCountRange { min_ops: i64, max_ops: i64 },

    /// An operation name that does not match any `MutationKind`.
    #[error("Unknown mutation operation {0:?}")]
    UnknownOperation(String),
}

/// An offset could not be drawn: the buffer is too short for the configured
/// `first_offset` plus the tail reserve an operation needs.
///
/// Raised mid-pass; operations that already ran stay applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "Invalid first_offset value (first={first_offset} > last={}) for buffer of {len} bytes with tail reserve {tail_reserve}",
    last_offset(.len, .tail_reserve)
)]
pub struct InvalidRangeError {
    pub first_offset: usize,
    pub len: usize,
    pub tail_reserve: usize,
}

fn last_offset(len: &usize, tail_reserve: &usize) -> i64 {
    *len as i64 - *tail_reserve as i64
}

/// Any error the core can surface to a harness.
#[derive(Error, Debug)]
pub enum MangleError {
    #[error("Mutation config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Mutation pass aborted: {0}")]
    InvalidRange(#[from] InvalidRangeError),
}
