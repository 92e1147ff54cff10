use rand::Rng;
use rand_core::RngCore;

/// The source of every random decision a mutation pass makes.
///
/// Any `rand_core::RngCore` is a `RandomSource`, so production code can hand in a
/// seeded `ChaCha8Rng` for reproducible passes or `rand::rng()` for a thread-local
/// generator. Tests can substitute a scripted sequence to pin exact draws.
pub trait RandomSource {
    /// Returns a uniformly random integer in `low..=high`.
    ///
    /// Callers guarantee `low <= high`.
    fn int_in_range(&mut self, low: usize, high: usize) -> usize;

    /// A uniformly random byte value.
    fn byte(&mut self) -> u8 {
        self.int_in_range(0, u8::MAX as usize) as u8
    }

    /// A fair coin.
    fn coin(&mut self) -> bool {
        self.int_in_range(0, 1) == 1
    }

    /// Picks one element uniformly at random, or `None` for an empty slice.
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let index = self.int_in_range(0, items.len() - 1);
        items.get(index)
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    fn int_in_range(&mut self, low: usize, high: usize) -> usize {
        self.random_range(low..=high)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::RandomSource;
    use std::collections::VecDeque;

    /// Replays a fixed list of draws, in order.
    ///
    /// A degenerate range (`low == high`) returns `low` without consuming a draw,
    /// so scripts only list the decisions that actually have a choice.
    #[derive(Debug, Default)]
    pub struct ScriptedSource {
        draws: VecDeque<usize>,
    }

    impl ScriptedSource {
        pub fn new(draws: impl IntoIterator<Item = usize>) -> Self {
            Self {
                draws: draws.into_iter().collect(),
            }
        }

        pub fn remaining(&self) -> usize {
            self.draws.len()
        }
    }

    impl RandomSource for ScriptedSource {
        fn int_in_range(&mut self, low: usize, high: usize) -> usize {
            if low == high {
                return low;
            }
            let value = self
                .draws
                .pop_front()
                .unwrap_or_else(|| panic!("script exhausted drawing from {low}..={high}"));
            assert!(
                (low..=high).contains(&value),
                "scripted draw {value} outside {low}..={high}"
            );
            value
        }
    }
}
