//! epidemic — particle-filter transition kernels for epidemic models.
//!
//! Purpose
//! -------
//! Provide the per-step state-transition kernels of a particle-based
//! stochastic epidemic simulator: each call advances a whole ensemble of
//! particles by one discrete step. This is the main entry point for Rust
//! callers and the surface the Python bindings depend on.
//!
//! Key behaviors
//! -------------
//! - Collect ensembles, parameter tables, step contexts, the observed
//!   history, hazard / draw helpers, and the Hawkes memory kernel in
//!   [`core`].
//! - Implement the SIR, SIRS, and discrete-time Hawkes kernels in [`models`]
//!   behind the [`TransitionKernel`] trait, with [`EpidemicKernel`] for
//!   configuration-driven dispatch.
//! - Centralize failures in [`errors`] ([`KernelError`], [`KernelResult`]).
//! - Re-export the everyday types directly from this module and via
//!   [`prelude`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Ensembles are row-per-particle `f64` tables with one label per column;
//!   compartment and count columns are finite and non-negative on input and
//!   output.
//! - Parameters are either one shared row or one row per particle.
//! - Kernels are pure given their RNG handle: inputs are never mutated and
//!   all randomness comes from the caller's generator.
//!
//! Conventions
//! -----------
//! - Rates are per unit time; transition probabilities over a step of length
//!   `dt` are `1 − exp(−rate·dt)`.
//! - Only the model layer logs (through the `log` facade); [`core`] performs
//!   no I/O and no logging.
//!
//! Downstream usage
//! ----------------
//! - Typical driver loop:
//!   1. Build a [`ParticleEnsemble`] (`compartmental` or `hawkes`) and a
//!      [`ParamTable`] from values plus a parallel name list.
//!   2. Pick a kernel: `"sirs".parse::<EpidemicKernel>()?`.
//!   3. Per step, build a [`StepContext`] (attach the [`ObservedSeries`],
//!      step index and population for Hawkes) and call `advance` with a
//!      seeded RNG.
//!   4. Weight and resample the returned ensemble externally.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover validation, draws, and the memory kernel;
//!   unit tests in [`models`] cover each kernel's update rules and edge
//!   cases; integration tests cover dispatch and multi-step runs.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    COMPARTMENT_NAMES, HAWKES_NAMES, HawkesMemory, HawkesParams, HistoryWindow, ObservedSeries,
    ParamTable, ParticleEnsemble, SirParams, SirsParams, StepContext, population,
};

pub use self::errors::{ErrorKind, KernelError, KernelResult};

pub use self::models::{
    EpidemicKernel, HawkesKernel, ModelKind, NATURAL_MORTALITY, SirKernel, SirsKernel,
    TransitionKernel,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_epidemics::epidemic::prelude::*;
//
// to import the kernel surface in a single line.

pub mod prelude {
    pub use super::{
        EpidemicKernel, HawkesKernel, HawkesParams, KernelError, KernelResult, ModelKind,
        ObservedSeries, ParamTable, ParticleEnsemble, SirKernel, SirParams, SirsKernel,
        SirsParams, StepContext, TransitionKernel,
    };
}
