//! SIRS kernel — open population with demography and waning immunity.
//!
//! Purpose
//! -------
//! Extend the SIR step with a fixed natural birth/death rate `μ` and an
//! immunity-loss flow `R → S` at rate `α`.
//!
//! Step
//! ----
//! With `N = S + I + R` and the SIR draws `Y_SI`, `Y_IR`:
//! - `P_RS = 1 − exp(−α·dt)`, `Y_RS ~ Bin(R, P_RS)`.
//! - `S' = S − Y_SI + μ·(N − S)·dt + Y_RS`
//! - `I' = I + Y_SI − Y_IR − μ·I·dt`
//! - `R' = R + Y_IR − μ·R·dt − Y_RS`
//! - `NI' = Y_SI`, `B' = B·exp(ν·Z·dt)`, then clamp to `≥ 0`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Births balance deaths, so `S + I + R` is conserved up to rounding
//!   (the demographic terms cancel: `μ·(N − S − I − R)·dt = 0`).
//! - The demographic terms are deterministic and continuous while the
//!   transitions are binomial; compartments may therefore become fractional.
//!   Fractional sizes are truncated when used as binomial trial counts.
//! - RNG consumption order: all `Y_SI`, all `Y_IR`, all `Y_RS`, all `Z`.
use crate::epidemic::{
    core::{
        ParamTable, ParticleEnsemble, SirsParams, StepContext, clamp_non_negative,
        draw_binomial_column, ensemble::stack_columns, ensure_positive_population, geometric_walk,
        hazard_probability, params::ensure_covers, population,
    },
    errors::KernelResult,
    models::{
        kernel::{ModelKind, TransitionKernel},
        sir::infection_and_recovery,
    },
};
use ndarray::Zip;
use rand::Rng;

/// Natural birth/death rate: an 80-year lifespan in weekly steps.
pub const NATURAL_MORTALITY: f64 = 1.0 / (80.0 * 52.0);

/// Stateless SIRS transition kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SirsKernel;

impl TransitionKernel for SirsKernel {
    type Params = SirsParams;

    fn kind(&self) -> ModelKind {
        ModelKind::Sirs
    }

    fn params_from_table(
        &self, table: &ParamTable, n_particles: usize,
    ) -> KernelResult<SirsParams> {
        SirsParams::from_table(table, n_particles)
    }

    fn advance<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, params: &SirsParams, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble> {
        ensure_covers(params.len(), ensemble.n_particles())?;
        let cols = ensemble.compartments()?;
        let n = population(&cols);
        ensure_positive_population(&n)?;
        let dt = ctx.dt();
        let mu_dt = NATURAL_MORTALITY * dt;

        let draws = infection_and_recovery(&cols, &n, &params.gamma, dt, rng)?;
        let p_rs = params.alpha.mapv(|a| hazard_probability(a, dt));
        let y_rs = draw_binomial_column(cols.r, p_rs.view(), rng)?;

        let s_next = Zip::from(cols.s).and(&n).and(&draws.y_si).and(&y_rs).map_collect(
            |&s, &n, &y_si, &y_rs| s - y_si + mu_dt * (n - s) + y_rs,
        );
        let i_next = Zip::from(cols.i)
            .and(&draws.y_si)
            .and(&draws.y_ir)
            .map_collect(|&i, &y_si, &y_ir| i + y_si - y_ir - mu_dt * i);
        let r_next = Zip::from(cols.r)
            .and(&draws.y_ir)
            .and(&y_rs)
            .map_collect(|&r, &y_ir, &y_rs| r + y_ir - mu_dt * r - y_rs);
        let b_next = geometric_walk(cols.b, params.nu_beta.view(), dt, rng);

        let mut next = stack_columns(&[s_next, i_next, r_next, draws.y_si, b_next]);
        clamp_non_negative(&mut next);
        Ok(ensemble.with_values(next))
    }
}
