//! Privacy obfuscation of exact user locations.
//!
//! The [`ObfuscationEngine`] turns `LocationRecord`s into
//! `ObfuscatedLocation`s whose positions are never more than
//! `max_radius_deg` from the truth. It is the only writer of the obfuscated
//! set; clusters and the viewport feed read the `Arc` it hands out.
//!
//! ## Stability
//!
//! Results are memoized on the identity of the input `Arc<[LocationRecord]>`:
//! asking again for the same dataset returns the same `Arc`, so markers do
//! not move between renders. Offsets are also derived from the engine seed
//! and the record id, so a refreshed dataset places an unchanged user at the
//! same spot. Averaging many snapshots therefore never converges on the exact
//! address.
//!
//! ## Invalid records
//!
//! A record with a missing, non-finite or out-of-range coordinate is dropped
//! from the geographic output and reported as a [`Rejection`]; the rest of
//! the batch is processed normally.
//!
//! ```rust
//! use geoveil::obfuscation::ObfuscationEngine;
//! use geoveil::config::ObfuscationConfig;
//! use geoveil_types::LocationRecord;
//! use std::sync::Arc;
//!
//! let mut engine = ObfuscationEngine::new(ObfuscationConfig::default())?;
//! let records: Arc<[LocationRecord]> = Arc::from(vec![
//!     LocationRecord::new("a", 35.70, 51.39),
//!     LocationRecord::new("b", f64::NAN, 51.39),
//! ]);
//!
//! let first = engine.obfuscate(&records);
//! assert_eq!(first.len(), 1);
//! assert_eq!(first.rejected().len(), 1);
//!
//! let again = engine.obfuscate(&records);
//! assert!(first.ptr_eq(&again));
//! # Ok::<(), geoveil::GeoveilError>(())
//! ```

mod displace;

pub use displace::{cell_size, jitter, offset_degrees, snap_precision, snap_to_cell};

use crate::config::{ObfuscationConfig, ObfuscationMode};
use crate::error::{GeoveilError, Result};
use crate::validation::validate_record;
use displace::record_rng;
use geo::Point;
use geoveil_types::{LocationRecord, ObfuscatedLocation};
use rand::Rng;
use std::sync::Arc;

/// A record left out of the geographic output, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub id: String,
    pub reason: String,
}

/// Output of one obfuscation pass. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Obfuscated {
    locations: Arc<[ObfuscatedLocation]>,
    rejected: Arc<[Rejection]>,
}

impl Obfuscated {
    pub fn empty() -> Self {
        Self {
            locations: Arc::from(Vec::new()),
            rejected: Arc::from(Vec::new()),
        }
    }

    pub fn locations(&self) -> &Arc<[ObfuscatedLocation]> {
        &self.locations
    }

    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True when there is nothing to draw, which includes an empty dataset.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Whether both results share the same underlying allocation.
    pub fn ptr_eq(&self, other: &Obfuscated) -> bool {
        Arc::ptr_eq(&self.locations, &other.locations)
    }
}

struct CacheEntry {
    source: Arc<[LocationRecord]>,
    output: Obfuscated,
}

/// Memoizing transform from exact to privacy-safe locations.
pub struct ObfuscationEngine {
    config: ObfuscationConfig,
    seed: u64,
    snap_precision: Option<usize>,
    cache: Option<CacheEntry>,
    computations: u64,
}

impl ObfuscationEngine {
    pub fn new(config: ObfuscationConfig) -> Result<Self> {
        config.validate().map_err(GeoveilError::InvalidConfig)?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let snap_precision = match config.mode {
            ObfuscationMode::Jitter => None,
            ObfuscationMode::GridSnap => snap_precision(config.max_radius_deg),
        };

        Ok(Self {
            config,
            seed,
            snap_precision,
            cache: None,
            computations: 0,
        })
    }

    pub fn config(&self) -> &ObfuscationConfig {
        &self.config
    }

    pub fn max_radius(&self) -> f64 {
        self.config.max_radius_deg
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of times the transform actually ran (cache misses).
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Obfuscate `records`, reusing the previous result when `records` is the
    /// same allocation as last time.
    pub fn obfuscate(&mut self, records: &Arc<[LocationRecord]>) -> Obfuscated {
        if let Some(entry) = &self.cache
            && Arc::ptr_eq(&entry.source, records)
        {
            log::debug!("Obfuscation cache hit for {} records", records.len());
            return entry.output.clone();
        }

        let output = self.compute(records);
        self.cache = Some(CacheEntry {
            source: Arc::clone(records),
            output: output.clone(),
        });
        output
    }

    /// The most recent result, if any dataset has been processed.
    pub fn cached(&self) -> Option<&Obfuscated> {
        self.cache.as_ref().map(|entry| &entry.output)
    }

    /// Forget the memoized result; the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Displayed position for a single record, validating it first.
    pub fn displace(&self, record: &LocationRecord) -> Result<Point> {
        validate_record(record)?;

        match self.snap_precision {
            Some(precision) => snap_to_cell(record.point(), precision),
            None => {
                let mut rng = record_rng(self.seed, &record.id);
                Ok(jitter(record.point(), self.config.max_radius_deg, &mut rng))
            }
        }
    }

    fn compute(&mut self, records: &[LocationRecord]) -> Obfuscated {
        self.computations += 1;

        let mut locations = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();

        for record in records {
            match self.displace(record) {
                Ok(point) => locations.push(ObfuscatedLocation::new(record, point)),
                Err(e) => {
                    log::warn!("Dropping record '{}' from map output: {}", record.id, e);
                    rejected.push(Rejection {
                        id: record.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::debug!(
            "Obfuscated {} of {} records ({} rejected)",
            locations.len(),
            records.len(),
            rejected.len()
        );

        Obfuscated {
            locations: Arc::from(locations),
            rejected: Arc::from(rejected),
        }
    }
}

impl std::fmt::Debug for ObfuscationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObfuscationEngine")
            .field("config", &self.config)
            .field("cached", &self.cache.as_ref().map(|e| e.output.len()))
            .field("computations", &self.computations)
            .finish_non_exhaustive()
    }
}
