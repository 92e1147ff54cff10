use mangle_core::config::HarnessConfig;
use mangle_core::harness::MangleFile;
use mangle_core::operation::MutationKind;

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "mangle.toml";
const LOG_ENV_VAR: &str = "MANGLE_LOG";

#[derive(Parser, Debug)]
#[clap(author, version, about = "Write randomly mangled copies of a file", long_about = None)]
struct Cli {
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// File whose bytes are mangled.
    #[clap(short, long)]
    source: Option<PathBuf>,
    #[clap(short, long)]
    output_dir: Option<PathBuf>,
    /// Number of mangled copies to write.
    #[clap(short = 'n', long)]
    files: Option<usize>,
    /// Seed for reproducible output; omitted means a fresh thread-local generator.
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long, allow_negative_numbers = true)]
    min_ops: Option<i64>,
    #[clap(long, allow_negative_numbers = true)]
    max_ops: Option<i64>,
    #[clap(long, allow_negative_numbers = true)]
    first_offset: Option<i64>,
    /// Also allow byte insertion and deletion.
    #[clap(long)]
    allow_resize: bool,
    /// Comma-separated operations, e.g. `replace,bit-flip,increment`.
    #[clap(long, value_delimiter = ',')]
    operations: Option<Vec<MutationKind>>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(config_file: Option<PathBuf>) -> Result<HarnessConfig, anyhow::Error> {
    match config_file {
        Some(config_path) => {
            tracing::info!("Loading configuration from specified path: {config_path:?}");
            HarnessConfig::load_from_file(&config_path)
        }
        None => {
            let default_config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_config_path.exists() {
                tracing::info!(
                    "No config file specified via CLI, loading default: {default_config_path:?}"
                );
                HarnessConfig::load_from_file(&default_config_path)
            } else {
                tracing::info!(
                    "No config file specified and default '{DEFAULT_CONFIG_FILE}' not found, using built-in defaults."
                );
                Ok(HarnessConfig::default())
            }
        }
    }
}

fn apply_overrides(config: &mut HarnessConfig, cli: Cli) {
    if let Some(source) = cli.source {
        config.source = Some(source);
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(files) = cli.files {
        config.files = files;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let mutation = &mut config.mutation;
    if let Some(min_ops) = cli.min_ops {
        mutation.min_ops = min_ops;
    }
    if let Some(max_ops) = cli.max_ops {
        mutation.max_ops = max_ops;
    }
    if let Some(first_offset) = cli.first_offset {
        mutation.first_offset = first_offset;
    }
    if cli.allow_resize {
        mutation.allow_resize = true;
    }
    if cli.operations.is_some() {
        mutation.operations = cli.operations;
    }
}

fn main() -> Result<(), anyhow::Error> {
    init_tracing();
    let mut cli = Cli::parse();

    let mut config = load_config(cli.config_file.take())?;
    apply_overrides(&mut config, cli);
    tracing::debug!("Effective configuration: {config:#?}");

    let harness = MangleFile::from_config(&config)?;
    tracing::info!(
        source = ?config.source,
        output_dir = ?config.output_dir,
        files = config.files,
        operations = ?harness.config().eligible_kinds(),
        "Starting mangle run"
    );

    let start_time = Instant::now();
    let written = harness.run()?;
    tracing::info!(
        "Wrote {} mangled file(s) in {:.2?}",
        written.len(),
        start_time.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_file_settings() {
        let cli = Cli::parse_from([
            "mangle",
            "--source",
            "seed.bin",
            "-n",
            "4",
            "--max-ops",
            "-1",
            "--allow-resize",
            "--operations",
            "replace,bit,delete_bytes",
        ]);
        let mut config = HarnessConfig::default();
        config.seed = Some(99);

        apply_overrides(&mut config, cli);

        assert_eq!(config.source, Some(PathBuf::from("seed.bin")));
        assert_eq!(config.files, 4);
        assert_eq!(config.seed, Some(99), "unset flags keep file settings");
        assert_eq!(config.mutation.max_ops, -1);
        assert!(config.mutation.allow_resize);
        assert_eq!(
            config.mutation.operations,
            Some(vec![
                MutationKind::Replace,
                MutationKind::BitFlip,
                MutationKind::Delete
            ])
        );
    }

    #[test]
    fn unknown_operation_is_a_parse_error() {
        let result = Cli::try_parse_from(["mangle", "--operations", "replace,shuffle"]);
        assert!(result.is_err());
    }
}
