//! core — ensembles, parameters, contexts, and shared numerics.
//!
//! Purpose
//! -------
//! Collect the building blocks every transition kernel relies on: labeled
//! particle ensembles, name-keyed parameter tables and their typed per-model
//! forms, per-call step contexts, the observed history, hazard/draw helpers,
//! the Hawkes memory kernel, and validation routines.
//!
//! Key behaviors
//! -------------
//! - Validate inputs once at the boundary ([`ParticleEnsemble`],
//!   [`ParamTable`], typed parameter sets, [`StepContext`],
//!   [`ObservedSeries`]) so kernels can assume finite, non-negative data.
//! - Provide RNG-explicit draw helpers ([`draw_binomial_column`],
//!   [`draw_poisson_column`], [`geometric_walk`]) that consume the caller's
//!   generator in particle order.
//!
//! Invariants & assumptions
//! ------------------------
//! - Row `k` of an ensemble and entry `k` of every typed parameter column
//!   refer to the same particle.
//! - This module performs no I/O and no logging.
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its validation branches and
//!   numerical edge cases; end-to-end behavior is tested at the model layer
//!   and in `tests/`.

pub mod context;
pub mod ensemble;
pub mod hazards;
pub mod memory;
pub mod observations;
pub mod params;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::context::{HistoryWindow, StepContext};
pub use self::ensemble::{
    COMPARTMENT_NAMES, CompartmentColumns, HAWKES_NAMES, HawkesColumns, ParticleEnsemble,
    ensure_positive_population, population,
};
pub use self::hazards::{
    MAX_POISSON_MEAN, clamp_non_negative, draw_binomial, draw_binomial_column, draw_poisson,
    draw_poisson_column, geometric_walk, hazard_probability,
};
pub use self::memory::{HawkesMemory, convolve_history, convolve_history_column, decay_weights};
pub use self::observations::ObservedSeries;
pub use self::params::{HawkesParams, ParamTable, SirParams, SirsParams};
