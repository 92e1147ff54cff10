use crate::boundary::BOUNDARY_VALUES;
use crate::engine::pick_offset;
use crate::error::{ConfigError, InvalidRangeError};
use crate::random::RandomSource;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Tail reserve for operations touching a single byte.
pub const SINGLE_BYTE_RESERVE: usize = 1;
/// Tail reserve for `delete`, which keeps one extra byte addressable.
pub const DELETE_RESERVE: usize = 2;

/// The name-level choice of primitive operation, as it appears in configuration.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    Replace,
    #[serde(alias = "bit")]
    BitFlip,
    #[serde(alias = "special_value", alias = "special-value")]
    BoundaryValue,
    Increment,
    #[serde(alias = "insert_bytes", alias = "insert-bytes")]
    Insert,
    #[serde(alias = "delete_bytes", alias = "delete-bytes")]
    Delete,
}

impl MutationKind {
    pub const ALL: [MutationKind; 6] = [
        MutationKind::Replace,
        MutationKind::BitFlip,
        MutationKind::BoundaryValue,
        MutationKind::Increment,
        MutationKind::Insert,
        MutationKind::Delete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Replace => "replace",
            MutationKind::BitFlip => "bit-flip",
            MutationKind::BoundaryValue => "boundary-value",
            MutationKind::Increment => "increment",
            MutationKind::Insert => "insert",
            MutationKind::Delete => "delete",
        }
    }

    /// Whether this operation can change the buffer length.
    pub fn is_resizing(&self) -> bool {
        matches!(self, MutationKind::Insert | MutationKind::Delete)
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MutationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "replace" => Ok(MutationKind::Replace),
            "bit-flip" | "bit" => Ok(MutationKind::BitFlip),
            "boundary-value" | "special-value" | "special_value" => {
                Ok(MutationKind::BoundaryValue)
            }
            "increment" => Ok(MutationKind::Increment),
            "insert" | "insert-bytes" | "insert_bytes" => Ok(MutationKind::Insert),
            "delete" | "delete-bytes" | "delete_bytes" => Ok(MutationKind::Delete),
            other => Err(ConfigError::UnknownOperation(other.to_string())),
        }
    }
}

/// A primitive operation together with the bounds it draws from.
///
/// Built from a [`MutationKind`] and a validated config, so every bound here is
/// already at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Replace,
    BitFlip,
    BoundaryValue,
    Increment { max: usize },
    Insert { max_bytes: usize },
    Delete { max_bytes: usize },
}

impl Operation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Operation::Replace => MutationKind::Replace,
            Operation::BitFlip => MutationKind::BitFlip,
            Operation::BoundaryValue => MutationKind::BoundaryValue,
            Operation::Increment { .. } => MutationKind::Increment,
            Operation::Insert { .. } => MutationKind::Insert,
            Operation::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Applies the operation once, in place, at a freshly drawn offset no lower
    /// than `first_offset`.
    ///
    /// On `Err` the buffer is untouched: the offset is always drawn before any write.
    pub fn apply<R>(
        &self,
        data: &mut Vec<u8>,
        first_offset: usize,
        rng: &mut R,
    ) -> Result<(), InvalidRangeError>
    where
        R: RandomSource + ?Sized,
    {
        match *self {
            Operation::Replace => {
                let offset = pick_offset(data.len(), first_offset, SINGLE_BYTE_RESERVE, rng)?;
                data[offset] = rng.byte();
            }
            Operation::BitFlip => {
                let offset = pick_offset(data.len(), first_offset, SINGLE_BYTE_RESERVE, rng)?;
                let mask = 1u8 << rng.int_in_range(0, 7);
                if rng.coin() {
                    data[offset] |= mask;
                } else {
                    data[offset] &= !mask;
                }
            }
            Operation::BoundaryValue => {
                let index = rng.int_in_range(0, BOUNDARY_VALUES.len() - 1);
                let value = BOUNDARY_VALUES[index];
                let offset = pick_offset(data.len(), first_offset, value.len(), rng)?;
                data[offset..offset + value.len()].copy_from_slice(value);
            }
            Operation::Increment { max } => {
                let offset = pick_offset(data.len(), first_offset, SINGLE_BYTE_RESERVE, rng)?;
                let magnitude = rng.int_in_range(1, max);
                let delta = if rng.coin() {
                    -(magnitude as i64)
                } else {
                    magnitude as i64
                };
                data[offset] = saturating_shift(data[offset], delta);
            }
            Operation::Insert { max_bytes } => {
                let offset = pick_offset(data.len(), first_offset, SINGLE_BYTE_RESERVE, rng)?;
                let count = rng.int_in_range(1, max_bytes);
                let inserted: Vec<u8> = (0..count).map(|_| rng.byte()).collect();
                data.splice(offset..offset, inserted);
            }
            Operation::Delete { max_bytes } => {
                let offset = pick_offset(data.len(), first_offset, DELETE_RESERVE, rng)?;
                let count = rng.int_in_range(1, max_bytes).min(data.len() - offset);
                data.drain(offset..offset + count);
            }
        }
        Ok(())
    }
}

/// Adds `delta` to `value`, clamping to `0..=255` instead of wrapping.
pub fn saturating_shift(value: u8, delta: i64) -> u8 {
    (value as i64).saturating_add(delta).clamp(0, u8::MAX as i64) as u8
}
