use crate::config::{MutationConfig, MutationOptions};
use crate::error::{InvalidRangeError, MangleError};
use crate::operation::Operation;
use crate::random::RandomSource;

/// Draws an offset uniformly from `first_offset..=len - tail_reserve`.
///
/// `tail_reserve` is the number of bytes an operation needs at and after the
/// offset. Fails without drawing when the buffer is too short for that reserve.
pub fn pick_offset<R>(
    len: usize,
    first_offset: usize,
    tail_reserve: usize,
    rng: &mut R,
) -> Result<usize, InvalidRangeError>
where
    R: RandomSource + ?Sized,
{
    let error = InvalidRangeError {
        first_offset,
        len,
        tail_reserve,
    };
    let last = len.checked_sub(tail_reserve).ok_or(error)?;
    if first_offset > last {
        return Err(error);
    }
    Ok(rng.int_in_range(first_offset, last))
}

/// Runs mutation passes over one caller-owned buffer.
///
/// The engine borrows both the config and the buffer for its lifetime and keeps
/// nothing between passes.
pub struct MutationEngine<'a> {
    config: &'a MutationConfig,
    data: &'a mut Vec<u8>,
}

impl<'a> MutationEngine<'a> {
    pub fn new(config: &'a MutationConfig, data: &'a mut Vec<u8>) -> Self {
        Self { config, data }
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Applies one mutation pass and returns the number of operations applied.
    ///
    /// The count is drawn from `min_ops..=max_ops`, then each step picks an
    /// eligible operation uniformly, with replacement, and applies it to the
    /// buffer as left by the previous step.
    ///
    /// An `InvalidRangeError` aborts the pass; steps that already ran are not
    /// rolled back.
    pub fn run<R>(&mut self, rng: &mut R) -> Result<usize, InvalidRangeError>
    where
        R: RandomSource + ?Sized,
    {
        let operations = self.config.eligible_operations();

        if self.config.max_ops() == 0 {
            return Ok(0);
        }

        let count = rng.int_in_range(self.config.min_ops(), self.config.max_ops());
        for _ in 0..count {
            let operation = pick_operation(&operations, rng);
            operation.apply(self.data, self.config.first_offset(), rng)?;
        }
        Ok(count)
    }
}

fn pick_operation<R>(operations: &[Operation], rng: &mut R) -> Operation
where
    R: RandomSource + ?Sized,
{
    operations[rng.int_in_range(0, operations.len() - 1)]
}

/// Mangles `data` in place with a single pass. Shorthand for
/// `MutationEngine::new(config, data).run(rng)`.
pub fn mangle<R>(
    config: &MutationConfig,
    data: &mut Vec<u8>,
    rng: &mut R,
) -> Result<usize, InvalidRangeError>
where
    R: RandomSource + ?Sized,
{
    MutationEngine::new(config, data).run(rng)
}

/// Validates `options` and runs one pass over `data`.
pub fn mangle_with_options<R>(
    options: MutationOptions,
    data: &mut Vec<u8>,
    rng: &mut R,
) -> Result<usize, MangleError>
where
    R: RandomSource + ?Sized,
{
    let config = MutationConfig::new(options)?;
    Ok(mangle(&config, data, rng)?)
}
