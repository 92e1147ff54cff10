use crate::config::{HarnessConfig, MutationConfig};
use crate::engine::MutationEngine;
use crate::random::RandomSource;
use anyhow::Context;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Produces mangled copies of one source file.
///
/// Every copy starts from the pristine source bytes and gets exactly one
/// mutation pass. Output names are `<stem>-<index>.<ext>` inside `output_dir`.
#[derive(Debug)]
pub struct MangleFile {
    source: PathBuf,
    output_dir: PathBuf,
    files: usize,
    seed: Option<u64>,
    config: MutationConfig,
}

impl MangleFile {
    pub fn new(source: PathBuf, output_dir: PathBuf, config: MutationConfig) -> Self {
        Self {
            source,
            output_dir,
            files: 1,
            seed: None,
            config,
        }
    }

    /// Builds a harness from file settings, validating the `[mutation]` table.
    pub fn from_config(settings: &HarnessConfig) -> Result<Self, anyhow::Error> {
        let source = settings
            .source
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No source file configured"))?;
        let config = MutationConfig::new(settings.mutation.clone())
            .context("Invalid [mutation] settings")?;
        Ok(Self::new(source, settings.output_dir.clone(), config)
            .with_files(settings.files)
            .with_seed(settings.seed))
    }

    pub fn with_files(mut self, files: usize) -> Self {
        self.files = files;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Writes every mangled copy, drawing from a `ChaCha8Rng` when a seed is set
    /// and from the thread-local generator otherwise.
    pub fn run(&self) -> Result<Vec<PathBuf>, anyhow::Error> {
        match self.seed {
            Some(seed) => self.run_with(&mut ChaCha8Rng::seed_from_u64(seed)),
            None => self.run_with(&mut rand::rng()),
        }
    }

    /// Writes every mangled copy using `rng` and returns the written paths.
    ///
    /// A source too short for the configuration fails the whole run on the first
    /// copy; nothing is retried.
    pub fn run_with<R>(&self, rng: &mut R) -> Result<Vec<PathBuf>, anyhow::Error>
    where
        R: RandomSource + ?Sized,
    {
        let pristine = std::fs::read(&self.source)
            .with_context(|| format!("Failed to read source file {:?}", self.source))?;
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {:?}", self.output_dir)
        })?;
        tracing::debug!(
            source = ?self.source,
            bytes = pristine.len(),
            files = self.files,
            "Loaded source"
        );

        let mut written = Vec::with_capacity(self.files);
        for file_index in 0..self.files {
            let mut data = pristine.clone();
            let count = MutationEngine::new(&self.config, &mut data)
                .run(rng)
                .with_context(|| {
                    format!("Failed to mangle copy {file_index} of {:?}", self.source)
                })?;
            tracing::info!("Mangle operation: {count}");

            let path = self.output_path(file_index);
            std::fs::write(&path, &data)
                .with_context(|| format!("Failed to write mangled file {path:?}"))?;
            tracing::debug!(path = ?path, bytes = data.len(), "Wrote mangled file");
            written.push(path);
        }
        Ok(written)
    }

    fn output_path(&self, file_index: usize) -> PathBuf {
        output_path(&self.output_dir, &self.source, file_index)
    }
}

fn output_path(output_dir: &Path, source: &Path, file_index: usize) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("mangled");
    let name = match source.extension().and_then(OsStr::to_str) {
        Some(ext) => format!("{stem}-{file_index}.{ext}"),
        None => format!("{stem}-{file_index}"),
    };
    output_dir.join(name)
}
