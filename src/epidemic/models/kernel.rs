//! The transition-kernel contract and configuration-driven dispatch.
//!
//! Purpose
//! -------
//! Define the one interface every epidemic model implements,
//! [`TransitionKernel`], plus the tagged enum [`EpidemicKernel`] that a
//! particle-filter driver selects from configuration ([`ModelKind`]) and
//! calls without knowing which model it holds.
//!
//! Key behaviors
//! -------------
//! - `advance` maps `(ensemble, typed params, step context, rng)` to a new
//!   ensemble; it never mutates its inputs and draws randomness only from the
//!   RNG handle it is given.
//! - `advance_with_table` accepts the name-keyed [`ParamTable`] form and
//!   resolves it into the model's typed parameters first.
//! - [`EpidemicKernel::advance`] dispatches on the variant and logs one
//!   `debug` record per step.
//!
//! Invariants & assumptions
//! ------------------------
//! - Kernels are stateless; two calls with equal inputs and equally seeded
//!   RNGs return equal ensembles.
//! - Independent ensembles may be advanced concurrently as long as each call
//!   owns its RNG.
use crate::epidemic::{
    core::{ParamTable, ParticleEnsemble, StepContext},
    errors::{KernelError, KernelResult},
    models::{hawkes::HawkesKernel, sir::SirKernel, sirs::SirsKernel},
};
use log::debug;
use rand::Rng;
use std::{fmt, str::FromStr};

/// A stochastic one-step transition model over a particle ensemble.
pub trait TransitionKernel {
    /// Typed, validated per-particle parameters of this model.
    type Params;

    /// Model tag.
    fn kind(&self) -> ModelKind;

    /// Resolve a name-keyed parameter table into typed parameters for
    /// `n_particles` particles, applying the model's defaults.
    fn params_from_table(
        &self, table: &ParamTable, n_particles: usize,
    ) -> KernelResult<Self::Params>;

    /// Advance every particle by one step.
    fn advance<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, params: &Self::Params, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble>;

    /// Resolve `table` and advance every particle by one step.
    fn advance_with_table<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, table: &ParamTable, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble> {
        let params = self.params_from_table(table, ensemble.n_particles())?;
        self.advance(ensemble, &params, ctx, rng)
    }
}

/// Model selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Closed-population SIR with a stochastic transmission rate.
    Sir,
    /// Open-population SIRS with demography and waning immunity.
    Sirs,
    /// Discrete-time Hawkes process.
    Hawkes,
}

impl ModelKind {
    /// Short label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Sir => "SIR",
            ModelKind::Sirs => "SIRS",
            ModelKind::Hawkes => "Hawkes",
        }
    }

    /// Default state column names for this model.
    pub fn state_names(&self) -> &'static [&'static str] {
        use crate::epidemic::core::{COMPARTMENT_NAMES, HAWKES_NAMES};
        match self {
            ModelKind::Sir | ModelKind::Sirs => &COMPARTMENT_NAMES,
            ModelKind::Hawkes => &HAWKES_NAMES,
        }
    }

    /// Whether the model needs an observation history in its step context.
    pub fn needs_history(&self) -> bool {
        matches!(self, ModelKind::Hawkes)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelKind {
    type Err = KernelError;

    /// Parse "sir", "sirs", "hawkes", or "dthp" (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sir" => Ok(ModelKind::Sir),
            "sirs" => Ok(ModelKind::Sirs),
            "hawkes" | "dthp" => Ok(ModelKind::Hawkes),
            _ => Err(KernelError::UnknownModel { name: s.to_string() }),
        }
    }
}

/// One of the three kernels, selected at run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EpidemicKernel {
    Sir(SirKernel),
    Sirs(SirsKernel),
    Hawkes(HawkesKernel),
}

impl EpidemicKernel {
    /// Kernel for a configured model kind.
    pub fn from_kind(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Sir => EpidemicKernel::Sir(SirKernel),
            ModelKind::Sirs => EpidemicKernel::Sirs(SirsKernel),
            ModelKind::Hawkes => EpidemicKernel::Hawkes(HawkesKernel),
        }
    }

    /// Model tag of the held kernel.
    pub fn kind(&self) -> ModelKind {
        match self {
            EpidemicKernel::Sir(k) => k.kind(),
            EpidemicKernel::Sirs(k) => k.kind(),
            EpidemicKernel::Hawkes(k) => k.kind(),
        }
    }

    /// Advance `ensemble` one step with the held kernel.
    ///
    /// # Errors
    /// Any [`KernelError`] raised while resolving `table` or stepping.
    pub fn advance<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, table: &ParamTable, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble> {
        debug!(
            "advancing {} ensemble: particles={}, dt={}, t={:?}",
            self.kind(),
            ensemble.n_particles(),
            ctx.dt(),
            ctx.history().map(|h| h.t)
        );
        match self {
            EpidemicKernel::Sir(k) => k.advance_with_table(ensemble, table, ctx, rng),
            EpidemicKernel::Sirs(k) => k.advance_with_table(ensemble, table, ctx, rng),
            EpidemicKernel::Hawkes(k) => k.advance_with_table(ensemble, table, ctx, rng),
        }
    }
}

impl From<ModelKind> for EpidemicKernel {
    fn from(kind: ModelKind) -> Self {
        EpidemicKernel::from_kind(kind)
    }
}

impl FromStr for EpidemicKernel {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ModelKind>().map(EpidemicKernel::from_kind)
    }
}
