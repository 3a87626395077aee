//! Memoization of pipeline runs keyed by input content.
//!
//! The input file is read on every [`PipelineCache::load`] call; only the
//! parse/resolve/aggregate work is skipped when its MD5 digest matches the
//! cached entry for that path. Changed content always recomputes, so the
//! cache can never serve stale output for an edited file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use strike_map_pipeline_models::PipelineOutput;

use crate::config::PipelineConfig;
use crate::load::read_input;
use crate::{LoadError, run_bytes};

struct CacheEntry {
    digest: md5::Digest,
    output: Arc<PipelineOutput>,
}

/// Hit/miss counters for a [`PipelineCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Loads served from the cache.
    pub hits: u64,
    /// Loads that ran the pipeline.
    pub misses: u64,
}

/// Per-path cache of [`PipelineOutput`]s.
pub struct PipelineCache {
    config: PipelineConfig,
    entries: BTreeMap<PathBuf, CacheEntry>,
    stats: CacheStats,
}

impl PipelineCache {
    /// Creates an empty cache that runs the pipeline with `config`.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            entries: BTreeMap::new(),
            stats: CacheStats { hits: 0, misses: 0 },
        }
    }

    /// The config used for every run.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads `path`, reusing the previous output if the content is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file cannot be read or the pipeline
    /// fails. A failed load evicts any entry for `path`.
    pub fn load(&mut self, path: &Path) -> Result<Arc<PipelineOutput>, LoadError> {
        let bytes = match read_input(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.entries.remove(path);
                return Err(e);
            }
        };
        let digest = md5::compute(&bytes);

        if let Some(entry) = self.entries.get(path)
            && entry.digest == digest
        {
            self.stats.hits += 1;
            log::debug!("Cache hit for {} ({digest:x})", path.display());
            return Ok(Arc::clone(&entry.output));
        }

        self.stats.misses += 1;
        log::debug!("Cache miss for {} ({digest:x})", path.display());

        let output = match run_bytes(&bytes, &self.config) {
            Ok(output) => Arc::new(output),
            Err(e) => {
                self.entries.remove(path);
                return Err(e);
            }
        };

        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                digest,
                output: Arc::clone(&output),
            },
        );

        Ok(output)
    }

    /// Drops the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation.
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }
}
