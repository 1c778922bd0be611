use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::io::record::DrawRecord;
use crate::{RandomStream, SeedVector, Well607Registry, Well607Stream};

/// A batch of streams to draw from, read from JSON.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RunPlan {
    /// Explicit package seed; the family default is used when absent.
    #[serde(default)]
    pub package_seed: Option<Vec<u32>>,
    /// Phrase hashed into a package seed. Ignored when `package_seed` is set.
    #[serde(default)]
    pub package_seed_phrase: Option<String>,
    pub streams: Vec<StreamPlan>,
}

/// One stream of a [`RunPlan`].
#[derive(Clone, Debug, Deserialize)]
pub struct StreamPlan {
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit stream seed. Streams with a seed do not consume a registry slot.
    #[serde(default)]
    pub seed: Option<Vec<u32>>,
    #[serde(default = "default_substreams")]
    pub substreams: u64,
    pub draws: usize,
    #[serde(default)]
    pub antithetic: bool,
    #[serde(default)]
    pub increased_precision: bool,
}

fn default_substreams() -> u64 {
    1
}

impl RunPlan {
    /// Load a run plan JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open run plan {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize a run plan from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader).context("invalid run plan json")?)
    }

    /// Build the registry the plan asks for.
    pub fn registry(&self) -> Result<Well607Registry> {
        if let Some(words) = &self.package_seed {
            let seed = SeedVector::try_from_slice(words).context("invalid package seed")?;
            return Ok(Well607Registry::with_seed(seed)?);
        }
        if let Some(phrase) = &self.package_seed_phrase {
            return Ok(Well607Registry::with_seed(SeedVector::from_phrase(phrase))?);
        }
        Ok(Well607Registry::new())
    }

    /// Run the plan against a fresh registry.
    pub fn execute(&self) -> Result<Vec<DrawRecord>> {
        let mut registry = self.registry()?;
        self.execute_with(&mut registry)
    }

    /// Run the plan, cutting registry-seeded streams from `registry`.
    ///
    /// Substream `n` of each stream is reached with `n` calls to
    /// `reset_next_substream`, and every substream yields one record.
    pub fn execute_with(&self, registry: &mut Well607Registry) -> Result<Vec<DrawRecord>> {
        let mut records = Vec::new();
        for (index, plan) in self.streams.iter().enumerate() {
            ensure!(plan.substreams > 0, "stream {index} requests zero substreams");
            let mut stream = match &plan.seed {
                Some(words) => {
                    let seed = SeedVector::try_from_slice(words)
                        .with_context(|| format!("invalid seed for stream {index}"))?;
                    Well607Stream::from_seed(seed)?
                }
                None => Well607Stream::new(registry),
            };
            stream.set_name(plan.name.clone());
            stream.set_antithetic(plan.antithetic);
            stream.set_increased_precision(plan.increased_precision);

            for substream in 0..plan.substreams {
                if substream > 0 {
                    stream.reset_next_substream();
                }
                records.push(DrawRecord {
                    stream: index,
                    name: plan.name.clone(),
                    substream: stream.substream_index(),
                    stream_seed: stream.stream_seed(),
                    substream_seed: stream.substream_seed(),
                    values: stream.next_array_of_double(plan.draws),
                });
            }
            debug!(stream = index, substreams = plan.substreams, "stream plan executed");
        }
        Ok(records)
    }
}
