//! Memoized compilation.
//!
//! A [`CompileCache`] keys compiled programs by their exact source units and
//! hardware spec. Compilation is deterministic, so a hit is always identical
//! to a fresh compile. Failed compilations are not stored.

use crate::compile::{compile_files, SourceUnit};
use crate::error::CompileError;
use crate::spec::HardwareSpec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tinker_vm::CompiledProgram;
use tracing::trace;

type CacheKey = (Vec<SourceUnit>, HardwareSpec);

/// Thread-safe cache of compiled programs.
#[derive(Debug, Default)]
pub struct CompileCache {
    entries: Mutex<HashMap<CacheKey, Arc<CompiledProgram>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CompileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached program for `units` on `hardware`, compiling it on
    /// first use.
    ///
    /// # Errors
    /// Returns the compile errors when the program does not compile. The
    /// failure is not cached.
    pub fn get_or_compile(
        &self,
        units: &[SourceUnit],
        hardware: &HardwareSpec,
    ) -> Result<Arc<CompiledProgram>, Vec<CompileError>> {
        let key = (units.to_vec(), hardware.clone());
        if let Some(program) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(units = units.len(), "compile cache hit");
            return Ok(Arc::clone(program));
        }

        // Compile outside the lock; a concurrent miss on the same key just
        // compiles twice and keeps the first entry.
        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(units = units.len(), "compile cache miss");
        let program = Arc::new(compile_files(units, hardware)?);
        let mut entries = self.lock();
        let entry = entries.entry(key).or_insert(program);
        Ok(Arc::clone(entry))
    }

    /// Number of lookups served from the cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of lookups that had to compile.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached programs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every cached program. Counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, Arc<CompiledProgram>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
