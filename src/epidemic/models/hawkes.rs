//! Discrete-time Hawkes process (DTHP) kernel.
//!
//! Purpose
//! -------
//! Advance an ensemble of `lambda_I, C_I, Rt` particles by one observation
//! interval. New infections are Poisson with a mean driven by the shared
//! observed history through a geometric memory kernel, modulated by each
//! particle's reproduction number and depleted as cumulative infections
//! approach the population size.
//!
//! Step
//! ----
//! For each particle, at step index `t` with population `N`:
//! 1. `Rt' = Rt·exp(ν·Z)`, `Z ~ N(0, 1)`.
//! 2. `λ = Σ_{k<t} obs[k]·ω·(1 − ω)^(t − k − 1)` (the incoming `lambda_I`
//!    value is discarded).
//! 3. `lambda_I' ~ Poisson(max(1 − C_I/N, 0)·Rt'·λ)`.
//! 4. `C_I' = C_I + lambda_I'`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The step context must carry a history window (`t`, observations, `N`).
//! - `dt` is ignored; one call is one observation interval.
//! - `C_I` is non-decreasing. It is not clamped to `N`; once `C_I ≥ N` the
//!   depletion factor is 0 and no further infections are drawn. Crossing `N`
//!   is logged at `warn` level.
//! - RNG consumption order: all `Z`, then all Poisson draws.
//!
//! Performance
//! -----------
//! - The convolution is O(t) per call and is evaluated once when all
//!   particles share `ω`. Drivers that step long series can track the same
//!   quantity in O(1) with [`crate::epidemic::core::HawkesMemory`].
use crate::epidemic::{
    core::{
        HawkesParams, ParamTable, ParticleEnsemble, StepContext, convolve_history_column,
        draw_poisson_column, ensemble::stack_columns, geometric_walk, params::ensure_covers,
    },
    errors::{KernelError, KernelResult},
    models::kernel::{ModelKind, TransitionKernel},
};
use log::{trace, warn};
use ndarray::Zip;
use rand::Rng;

/// Stateless Hawkes transition kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HawkesKernel;

impl TransitionKernel for HawkesKernel {
    type Params = HawkesParams;

    fn kind(&self) -> ModelKind {
        ModelKind::Hawkes
    }

    fn params_from_table(
        &self, table: &ParamTable, n_particles: usize,
    ) -> KernelResult<HawkesParams> {
        HawkesParams::from_table(table, n_particles)
    }

    fn advance<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, params: &HawkesParams, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble> {
        let window = ctx.history().ok_or(KernelError::MissingHistory)?;
        ensure_covers(params.len(), ensemble.n_particles())?;
        let cols = ensemble.hawkes_state()?;
        let n = window.population;

        let rt_next = geometric_walk(cols.rt, params.nu_beta.view(), 1.0, rng);

        let visible = window.visible()?;
        trace!("hawkes convolution over {} observed steps (t={})", visible.len(), window.t);
        let intensity = convolve_history_column(visible, params.omega_i.view());

        let means = Zip::from(cols.cumulative)
            .and(&rt_next)
            .and(&intensity)
            .map_collect(|&c, &rt, &lambda| (1.0 - c / n).max(0.0) * rt * lambda);
        let infections = draw_poisson_column(means.view(), rng)?;
        let cumulative_next = &cols.cumulative + &infections;

        if let Some(particle) = cumulative_next.iter().position(|&c| c > n) {
            warn!(
                "cumulative infections exceed population at t={}: particle {} has C_I={} > N={}",
                window.t, particle, cumulative_next[particle], n
            );
        }

        let next = stack_columns(&[infections, cumulative_next, rt_next]);
        Ok(ensemble.with_values(next))
    }
}
