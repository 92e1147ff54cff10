use crate::error::ConfigError;
use crate::operation::{MutationKind, Operation};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MIN_OPS: i64 = 1;
pub const DEFAULT_MAX_OPS: i64 = 100;
pub const DEFAULT_MAX_INSERT_BYTES: i64 = 4;
pub const DEFAULT_MAX_DELETE_BYTES: i64 = 4;
pub const DEFAULT_MAX_INCREMENT: i64 = 8;

/// Operations eligible when no explicit list is configured.
pub const DEFAULT_OPERATIONS: [MutationKind; 3] = [
    MutationKind::Replace,
    MutationKind::BitFlip,
    MutationKind::BoundaryValue,
];
/// Added to [`DEFAULT_OPERATIONS`] when resizing is allowed.
pub const RESIZING_OPERATIONS: [MutationKind; 2] = [MutationKind::Insert, MutationKind::Delete];

/// Raw, unvalidated mutation knobs as a caller or a TOML file supplies them.
///
/// Integers are signed so that out-of-range values reach `MutationConfig::new`
/// and are reported there.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct MutationOptions {
    #[serde(default = "default_min_ops")]
    pub min_ops: i64,
    #[serde(default = "default_max_ops")]
    pub max_ops: i64,
    #[serde(default = "default_max_insert_bytes")]
    pub max_insert_bytes: i64,
    #[serde(default = "default_max_delete_bytes")]
    pub max_delete_bytes: i64,
    #[serde(default = "default_max_increment")]
    pub max_increment: i64,
    #[serde(default)]
    pub first_offset: i64,
    #[serde(default)]
    pub allow_resize: bool,
    #[serde(default)]
    pub operations: Option<Vec<MutationKind>>,
}

fn default_min_ops() -> i64 {
    DEFAULT_MIN_OPS
}
fn default_max_ops() -> i64 {
    DEFAULT_MAX_OPS
}
fn default_max_insert_bytes() -> i64 {
    DEFAULT_MAX_INSERT_BYTES
}
fn default_max_delete_bytes() -> i64 {
    DEFAULT_MAX_DELETE_BYTES
}
fn default_max_increment() -> i64 {
    DEFAULT_MAX_INCREMENT
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            min_ops: DEFAULT_MIN_OPS,
            max_ops: DEFAULT_MAX_OPS,
            max_insert_bytes: DEFAULT_MAX_INSERT_BYTES,
            max_delete_bytes: DEFAULT_MAX_DELETE_BYTES,
            max_increment: DEFAULT_MAX_INCREMENT,
            first_offset: 0,
            allow_resize: false,
            operations: None,
        }
    }
}

/// Validated, immutable mutation settings.
///
/// Only obtainable through [`MutationConfig::new`] (or `Default`), so every value
/// read from it has already passed validation. A single config can drive any
/// number of passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationConfig {
    min_ops: usize,
    max_ops: usize,
    max_insert_bytes: usize,
    max_delete_bytes: usize,
    max_increment: usize,
    first_offset: usize,
    allow_resize: bool,
    operations: Option<Vec<MutationKind>>,
}

impl MutationConfig {
    /// Validates `options`.
    ///
    /// A non-positive `max_ops` disables mutation entirely, in which case `min_ops`
    /// is not compared against it. An empty `operations` list means "use the
    /// defaults".
    pub fn new(options: MutationOptions) -> Result<Self, ConfigError> {
        let min_ops = non_negative("min_ops", options.min_ops)?;
        let first_offset = non_negative("first_offset", options.first_offset)?;
        let max_insert_bytes = positive("max_insert_bytes", options.max_insert_bytes)?;
        let max_delete_bytes = positive("max_delete_bytes", options.max_delete_bytes)?;
        let max_increment = positive("max_increment", options.max_increment)?;

        let max_ops = if options.max_ops <= 0 {
            0
        } else {
            if options.min_ops > options.max_ops {
                return Err(ConfigError::OpCountRange {
                    min_ops: options.min_ops,
                    max_ops: options.max_ops,
                });
            }
            options.max_ops as usize
        };

        let operations = options.operations.filter(|kinds| !kinds.is_empty());

        Ok(Self {
            min_ops,
            max_ops,
            max_insert_bytes,
            max_delete_bytes,
            max_increment,
            first_offset,
            allow_resize: options.allow_resize,
            operations,
        })
    }

    pub fn min_ops(&self) -> usize {
        self.min_ops
    }

    /// Zero means a pass applies no operations.
    pub fn max_ops(&self) -> usize {
        self.max_ops
    }

    pub fn max_insert_bytes(&self) -> usize {
        self.max_insert_bytes
    }

    pub fn max_delete_bytes(&self) -> usize {
        self.max_delete_bytes
    }

    pub fn max_increment(&self) -> usize {
        self.max_increment
    }

    pub fn first_offset(&self) -> usize {
        self.first_offset
    }

    pub fn allow_resize(&self) -> bool {
        self.allow_resize
    }

    /// The explicit operation list, if one was configured.
    pub fn operations(&self) -> Option<&[MutationKind]> {
        self.operations.as_deref()
    }

    /// The operation kinds a pass draws from, in order.
    ///
    /// An explicit list is used verbatim, duplicates included, and is not gated by
    /// `allow_resize`.
    pub fn eligible_kinds(&self) -> Vec<MutationKind> {
        match &self.operations {
            Some(kinds) => kinds.clone(),
            None => {
                let mut kinds = DEFAULT_OPERATIONS.to_vec();
                if self.allow_resize {
                    kinds.extend(RESIZING_OPERATIONS);
                }
                kinds
            }
        }
    }

    /// [`eligible_kinds`](Self::eligible_kinds) with each kind bound to this
    /// config's size limits.
    pub fn eligible_operations(&self) -> Vec<Operation> {
        self.eligible_kinds()
            .into_iter()
            .map(|kind| self.operation(kind))
            .collect()
    }

    pub fn operation(&self, kind: MutationKind) -> Operation {
        match kind {
            MutationKind::Replace => Operation::Replace,
            MutationKind::BitFlip => Operation::BitFlip,
            MutationKind::BoundaryValue => Operation::BoundaryValue,
            MutationKind::Increment => Operation::Increment {
                max: self.max_increment,
            },
            MutationKind::Insert => Operation::Insert {
                max_bytes: self.max_insert_bytes,
            },
            MutationKind::Delete => Operation::Delete {
                max_bytes: self.max_delete_bytes,
            },
        }
    }
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            min_ops: DEFAULT_MIN_OPS as usize,
            max_ops: DEFAULT_MAX_OPS as usize,
            max_insert_bytes: DEFAULT_MAX_INSERT_BYTES as usize,
            max_delete_bytes: DEFAULT_MAX_DELETE_BYTES as usize,
            max_increment: DEFAULT_MAX_INCREMENT as usize,
            first_offset: 0,
            allow_resize: false,
            operations: None,
        }
    }
}

impl TryFrom<MutationOptions> for MutationConfig {
    type Error = ConfigError;

    fn try_from(options: MutationOptions) -> Result<Self, Self::Error> {
        MutationConfig::new(options)
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::Negative { field, value })
}

fn positive(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    if value < 1 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(value as usize)
}

/// Settings for the file harness: where the pristine input comes from, where the
/// mangled copies go, and how each copy is mangled.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    pub source: Option<PathBuf>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_files")]
    pub files: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub mutation: MutationOptions,
}

pub fn default_output_dir() -> PathBuf {
    PathBuf::from("./mangled")
}

pub fn default_files() -> usize {
    1
}

impl HarnessConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: HarnessConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            source: None,
            output_dir: default_output_dir(),
            files: default_files(),
            seed: None,
            mutation: MutationOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_options_build_the_default_config() {
        let config = MutationConfig::new(MutationOptions::default()).unwrap();
        assert_eq!(config, MutationConfig::default());
        assert_eq!(config.min_ops(), 1);
        assert_eq!(config.max_ops(), 100);
        assert_eq!(config.max_increment(), 8);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let options = MutationOptions {
            min_ops: 5,
            max_ops: 2,
            ..Default::default()
        };
        assert_eq!(
            MutationConfig::new(options),
            Err(ConfigError::OpCountRange {
                min_ops: 5,
                max_ops: 2
            })
        );
    }

    #[test]
    fn non_positive_max_ops_disables_the_pass() {
        for max_ops in [0, -3] {
            let options = MutationOptions {
                max_ops,
                ..Default::default()
            };
            let config = MutationConfig::new(options).unwrap();
            assert_eq!(config.max_ops(), 0);
        }
    }

    #[test]
    fn negative_and_zero_sizes_are_rejected() {
        let cases = [
            (
                MutationOptions {
                    first_offset: -1,
                    ..Default::default()
                },
                ConfigError::Negative {
                    field: "first_offset",
                    value: -1,
                },
            ),
            (
                MutationOptions {
                    min_ops: -2,
                    ..Default::default()
                },
                ConfigError::Negative {
                    field: "min_ops",
                    value: -2,
                },
            ),
            (
                MutationOptions {
                    max_insert_bytes: 0,
                    ..Default::default()
                },
                ConfigError::NotPositive {
                    field: "max_insert_bytes",
                    value: 0,
                },
            ),
            (
                MutationOptions {
                    max_delete_bytes: -4,
                    ..Default::default()
                },
                ConfigError::NotPositive {
                    field: "max_delete_bytes",
                    value: -4,
                },
            ),
            (
                MutationOptions {
                    max_increment: 0,
                    ..Default::default()
                },
                ConfigError::NotPositive {
                    field: "max_increment",
                    value: 0,
                },
            ),
        ];
        for (options, expected) in cases {
            assert_eq!(MutationConfig::new(options), Err(expected));
        }
    }

    #[test]
    fn default_operation_set_is_gated_by_allow_resize() {
        let fixed = MutationConfig::default();
        assert_eq!(fixed.eligible_kinds(), DEFAULT_OPERATIONS.to_vec());

        let resizing = MutationConfig::new(MutationOptions {
            allow_resize: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            resizing.eligible_kinds(),
            vec![
                MutationKind::Replace,
                MutationKind::BitFlip,
                MutationKind::BoundaryValue,
                MutationKind::Insert,
                MutationKind::Delete,
            ]
        );
    }

    #[test]
    fn explicit_operations_are_used_verbatim() {
        let config = MutationConfig::new(MutationOptions {
            operations: Some(vec![MutationKind::Increment, MutationKind::Delete]),
            max_increment: 3,
            max_delete_bytes: 7,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            config.eligible_operations(),
            vec![
                Operation::Increment { max: 3 },
                Operation::Delete { max_bytes: 7 }
            ]
        );
    }

    #[test]
    fn empty_operation_list_falls_back_to_defaults() {
        let config = MutationConfig::new(MutationOptions {
            operations: Some(Vec::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.operations(), None);
        assert_eq!(config.eligible_kinds(), DEFAULT_OPERATIONS.to_vec());
    }

    #[test]
    fn harness_config_parses_from_toml_with_aliases() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
source = "seed.png"
output-dir = "out"
files = 3
seed = 42

[mutation]
max-ops = 10
first-offset = 8
allow-resize = true
operations = ["replace", "bit", "special_value", "delete-bytes"]
"#
        )
        .unwrap();

        let config = HarnessConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.source, Some(PathBuf::from("seed.png")));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.files, 3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.mutation.min_ops, DEFAULT_MIN_OPS);
        assert_eq!(config.mutation.first_offset, 8);
        assert_eq!(
            config.mutation.operations,
            Some(vec![
                MutationKind::Replace,
                MutationKind::BitFlip,
                MutationKind::BoundaryValue,
                MutationKind::Delete,
            ])
        );
    }

    #[test]
    fn harness_config_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[mutation]\nmax-opz = 3\n").unwrap();
        assert!(HarnessConfig::load_from_file(file.path()).is_err());
    }
}
