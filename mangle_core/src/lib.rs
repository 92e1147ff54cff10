pub mod boundary;
pub mod config;
pub mod engine;
pub mod error;
pub mod harness;
pub mod operation;
pub mod random;

pub use boundary::BOUNDARY_VALUES;
pub use config::{HarnessConfig, MutationConfig, MutationOptions};
pub use engine::{MutationEngine, mangle, mangle_with_options, pick_offset};
pub use error::{ConfigError, InvalidRangeError, MangleError};
pub use harness::MangleFile;
pub use operation::{MutationKind, Operation};
pub use random::RandomSource;
