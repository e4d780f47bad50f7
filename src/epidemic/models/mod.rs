//! models — the SIR, SIRS, and Hawkes transition kernels.
//!
//! Purpose
//! -------
//! Implement [`TransitionKernel`] for each supported epidemic model and
//! provide [`EpidemicKernel`], the enum a driver holds when the model is
//! chosen from configuration.
//!
//! Key behaviors
//! -------------
//! - [`SirKernel`]: closed population, binomial S→I / I→R transitions,
//!   geometric random walk on the transmission rate `B`.
//! - [`SirsKernel`]: SIR plus fixed-rate demography and an R→S flow.
//! - [`HawkesKernel`]: Poisson infections driven by a geometric memory
//!   kernel over the observed history, modulated by `Rt` and depleted by
//!   cumulative infections.
//!
//! Invariants & assumptions
//! ------------------------
//! - Kernels return a fresh ensemble carrying the input's column labels and
//!   clamp count columns to `≥ 0`.
//! - Each kernel consumes the RNG in a fixed, documented order so a seeded
//!   generator reproduces a step exactly.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each kernel; cross-kernel dispatch and
//!   multi-step runs are exercised in `tests/integration_particle_step.rs`.

pub mod hawkes;
pub mod kernel;
pub mod sir;
pub mod sirs;

pub use self::hawkes::HawkesKernel;
pub use self::kernel::{EpidemicKernel, ModelKind, TransitionKernel};
pub use self::sir::SirKernel;
pub use self::sirs::{NATURAL_MORTALITY, SirsKernel};
