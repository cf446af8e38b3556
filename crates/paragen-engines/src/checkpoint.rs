use crate::Result;
use paragen_core::{Candidate, Individual, Population, SerializationMode};
use paragen_error::{ResultExt, paragen_bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where, how and how often parent checkpoints are written.
#[derive(Clone, Debug)]
pub struct CheckpointConfig {
    pub directory: PathBuf,
    /// Base of the checkpoint file name; the iteration and the best primary
    /// fitness are prepended.
    pub base_name: String,
    pub mode: SerializationMode,
    /// Save every n-th generation; zero saves only at termination.
    pub every: usize,
}

impl CheckpointConfig {
    pub fn new(directory: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        CheckpointConfig {
            directory: directory.into(),
            base_name: base_name.into(),
            mode: SerializationMode::Text,
            every: 0,
        }
    }

    pub fn with_mode(mut self, mode: SerializationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_every(mut self, every: usize) -> Self {
        self.every = every;
        self
    }
}

/// Type-erased checkpoint writer held by the engine base. Built from a
/// [CheckpointConfig] where the individual is serializable, so the engines
/// themselves stay free of serde bounds.
pub(crate) struct CheckpointSink<I: Individual> {
    every: usize,
    save: Box<dyn Fn(&Population<I>, usize) -> Result<PathBuf> + Send>,
}

impl<I: Individual> CheckpointSink<I> {
    pub(crate) fn new(config: CheckpointConfig) -> Self
    where
        I: Serialize,
    {
        CheckpointSink {
            every: config.every,
            save: Box::new(move |population, iteration| {
                save_checkpoint(population, &config, iteration)
            }),
        }
    }

    pub(crate) fn every(&self) -> usize {
        self.every
    }

    pub(crate) fn save(&self, population: &Population<I>, iteration: usize) -> Result<PathBuf> {
        (self.save)(population, iteration)
    }
}

/// Serializes the µ current parents (not the whole population) to a file
/// named `<iteration>_<best primary fitness>_<base>`. All parents must be
/// clean; a dirty parent at checkpoint time is fatal.
pub fn save_checkpoint<I>(
    population: &Population<I>,
    config: &CheckpointConfig,
    iteration: usize,
) -> Result<PathBuf>
where
    I: Individual + Serialize,
{
    let n_parents = population.n_parents().min(population.len());
    if n_parents == 0 {
        paragen_bail!(Population: "cannot checkpoint a population without parents");
    }
    if let Some(position) = population.first_dirty_in(0..n_parents) {
        paragen_bail!(Population: "parent at position {} is dirty at checkpoint time", position);
    }

    let parents: Vec<Candidate<I>> = population.as_slice()[..n_parents].to_vec();
    let best_fitness = parents[0].primary_fitness()?;

    let file_name = format!("{}_{}_{}", iteration, best_fitness, config.base_name);
    let path = config.directory.join(file_name);

    let bytes = config.mode.to_bytes(&parents)?;
    std::fs::write(&path, bytes)
        .with_context(|| format!("writing checkpoint {}", path.display()))?;

    info!(path = %path.display(), n_parents, "checkpoint saved");
    Ok(path)
}

/// Loads parents from a checkpoint file into the population in place; any
/// shortfall beyond the current population length is appended. Returns the
/// number of parents loaded.
pub fn load_checkpoint<I>(
    path: &Path,
    mode: SerializationMode,
    population: &mut Population<I>,
) -> Result<usize>
where
    I: Individual + DeserializeOwned,
{
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading checkpoint {}", path.display()))?;
    let parents: Vec<Candidate<I>> = mode.from_bytes(&bytes)?;

    for (index, parent) in parents.iter().enumerate() {
        match population.get_mut(index) {
            Some(candidate) => candidate.load_from(parent),
            None => population.push(parent.clone()),
        }
    }

    info!(path = %path.display(), loaded = parents.len(), "checkpoint loaded");
    Ok(parents.len())
}
