//! SIR kernel — closed population with a stochastic transmission rate.
//!
//! Purpose
//! -------
//! Advance an ensemble of `S, I, R, NI, B` particles by one step of a
//! discrete-time stochastic SIR model whose transmission rate `B` follows a
//! geometric random walk.
//!
//! Step
//! ----
//! For each particle, with `N = S + I + R`:
//! 1. `P_SI = 1 − exp(−B·I/N·dt)`, `P_IR = 1 − exp(−γ·dt)`.
//! 2. `Y_SI ~ Bin(S, P_SI)`, `Y_IR ~ Bin(I, P_IR)`.
//! 3. `S' = S − Y_SI`, `I' = I + Y_SI − Y_IR`, `R' = R + Y_IR`, `NI' = Y_SI`.
//! 4. `B' = B·exp(ν·Z·dt)`, `Z ~ N(0, 1)`.
//! 5. Clamp every column to `≥ 0`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `S + I + R` is conserved exactly (binomial draws never exceed their
//!   trial counts); `NI` only records the step's new infections.
//! - RNG consumption order: all `Y_SI`, then all `Y_IR`, then all `Z`.
use crate::epidemic::{
    core::{
        CompartmentColumns, ParamTable, ParticleEnsemble, SirParams, StepContext,
        clamp_non_negative, draw_binomial_column, ensemble::stack_columns,
        ensure_positive_population, geometric_walk, hazard_probability, params::ensure_covers,
        population,
    },
    errors::KernelResult,
    models::kernel::{ModelKind, TransitionKernel},
};
use ndarray::{Array1, Zip};
use rand::Rng;

/// Stateless SIR transition kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SirKernel;

impl TransitionKernel for SirKernel {
    type Params = SirParams;

    fn kind(&self) -> ModelKind {
        ModelKind::Sir
    }

    fn params_from_table(&self, table: &ParamTable, n_particles: usize) -> KernelResult<SirParams> {
        SirParams::from_table(table, n_particles)
    }

    fn advance<R: Rng + ?Sized>(
        &self, ensemble: &ParticleEnsemble, params: &SirParams, ctx: &StepContext<'_>,
        rng: &mut R,
    ) -> KernelResult<ParticleEnsemble> {
        ensure_covers(params.len(), ensemble.n_particles())?;
        let cols = ensemble.compartments()?;
        let n = population(&cols);
        ensure_positive_population(&n)?;
        let dt = ctx.dt();

        let draws = infection_and_recovery(&cols, &n, &params.gamma, dt, rng)?;

        let s_next = &cols.s - &draws.y_si;
        let i_next = &cols.i + &draws.y_si - &draws.y_ir;
        let r_next = &cols.r + &draws.y_ir;
        let b_next = geometric_walk(cols.b, params.nu_beta.view(), dt, rng);

        let mut next = stack_columns(&[s_next, i_next, r_next, draws.y_si, b_next]);
        clamp_non_negative(&mut next);
        Ok(ensemble.with_values(next))
    }
}

/// Binomial S→I and I→R transition counts for one step.
pub(crate) struct InfectionDraws {
    pub y_si: Array1<f64>,
    pub y_ir: Array1<f64>,
}

/// Draw `Y_SI` then `Y_IR` for every particle.
///
/// Shared by the SIR and SIRS kernels; `n` must be strictly positive.
pub(crate) fn infection_and_recovery<R: Rng + ?Sized>(
    cols: &CompartmentColumns<'_>, n: &Array1<f64>, gamma: &Array1<f64>, dt: f64, rng: &mut R,
) -> KernelResult<InfectionDraws> {
    let p_si = Zip::from(cols.b)
        .and(cols.i)
        .and(n)
        .map_collect(|&b, &i, &n| hazard_probability(b * i / n, dt));
    let p_ir = gamma.mapv(|g| hazard_probability(g, dt));

    let y_si = draw_binomial_column(cols.s, p_si.view(), rng)?;
    let y_ir = draw_binomial_column(cols.i, p_ir.view(), rng)?;
    Ok(InfectionDraws { y_si, y_ir })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epidemic::errors::KernelError;
    use ndarray::{Array2, array};
    use rand::{SeedableRng, rngs::StdRng};
    use statrs::distribution::Binomial as BinomialLaw;
    use statrs::statistics::Distribution as _;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Output shape, labels, and non-negativity on a realistic scenario.
    // - Exact conservation of S + I + R and the `NI` bookkeeping.
    // - Infection and recovery counts against exact binomial means.
    // - Exactness of `B` at zero volatility.
    // - Seed reproducibility and input immutability.
    // - Error paths for zero population and mismatched parameter lengths.
    //
    // They intentionally DO NOT cover:
    // - Dispatch through `EpidemicKernel` (see integration tests).
    // -------------------------------------------------------------------------

    fn single_particle() -> ParticleEnsemble {
        ParticleEnsemble::compartmental(array![[990.0, 10.0, 0.0, 0.0, 0.3]]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Run the textbook single-particle scenario.
    //
    // Given
    // -----
    // - S=990, I=10, R=0, NI=0, B=0.3, γ=0.1, ν=0, dt=1.
    //
    // Expect
    // ------
    // - Shape (1, 5), labels S..B, all entries ≥ 0, B unchanged,
    //   NI = 990 − S', and Y_SI ≤ 990.
    fn sir_scenario_keeps_shape_and_non_negativity() {
        // Arrange
        let ensemble = single_particle();
        let params = SirParams::broadcast(0.1, 0.0, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        // Act
        let next = SirKernel.advance(&ensemble, &params, &StepContext::unit(), &mut rng).unwrap();

        // Assert
        let v = next.values();
        assert_eq!(v.dim(), (1, 5));
        assert_eq!(next.names(), ensemble.names());
        assert!(v.iter().all(|&x| x >= 0.0));
        assert_eq!(v[[0, 4]], 0.3);
        assert_eq!(v[[0, 3]], 990.0 - v[[0, 0]]);
        assert!(v[[0, 3]] <= 990.0);
    }

    #[test]
    // Purpose
    // -------
    // Check both transition probabilities statistically.
    //
    // Given
    // -----
    // - The single-particle scenario (B·I/N = 0.003, γ = 0.1, ν = 0, dt = 1)
    //   stepped 4000 times from the same input.
    //
    // Expect
    // ------
    // - Mean Y_SI = NI' within 0.15 of E[Bin(990, 1 − e^(−0.003))] ≈ 2.955.
    // - Mean Y_IR = R' within 0.08 of E[Bin(10, 1 − e^(−0.1))] ≈ 0.952.
    //   (Both about 5 standard errors.)
    fn sir_transition_counts_match_binomial_means() {
        // Arrange
        let ensemble = single_particle();
        let params = SirParams::broadcast(0.1, 0.0, 1).unwrap();
        let ctx = StepContext::unit();
        let mut rng = StdRng::seed_from_u64(404);
        let expected_si = BinomialLaw::new(1.0 - (-0.003f64).exp(), 990).unwrap().mean().unwrap();
        let expected_ir = BinomialLaw::new(1.0 - (-0.1f64).exp(), 10).unwrap().mean().unwrap();
        let draws = 4000;

        // Act
        let (mut total_si, mut total_ir) = (0.0, 0.0);
        for _ in 0..draws {
            let next = SirKernel.advance(&ensemble, &params, &ctx, &mut rng).unwrap();
            total_si += next.values()[[0, 3]];
            total_ir += next.values()[[0, 2]];
        }
        let mean_si = total_si / draws as f64;
        let mean_ir = total_ir / draws as f64;

        // Assert
        assert!((mean_si - expected_si).abs() < 0.15, "Y_SI mean {mean_si} vs {expected_si}");
        assert!((mean_ir - expected_ir).abs() < 0.08, "Y_IR mean {mean_ir} vs {expected_ir}");
    }

    #[test]
    // Purpose
    // -------
    // Verify conservation of S + I + R with recovery disabled and with
    // recovery enabled, across many particles and steps.
    //
    // Given
    // -----
    // - 50 particles with N = 1000, γ ∈ {0, 0.2}, ν = 0, 20 steps.
    //
    // Expect
    // ------
    // - S + I + R == 1000 exactly after every step.
    fn sir_conserves_population_exactly() {
        for gamma in [0.0, 0.2] {
            // Arrange
            let mut values = Array2::<f64>::zeros((50, 5));
            for mut row in values.rows_mut() {
                row.assign(&array![950.0, 50.0, 0.0, 0.0, 0.8]);
            }
            let mut ensemble = ParticleEnsemble::compartmental(values).unwrap();
            let params = SirParams::broadcast(gamma, 0.0, 50).unwrap();
            let mut rng = StdRng::seed_from_u64(11);

            // Act / Assert
            for _ in 0..20 {
                ensemble =
                    SirKernel.advance(&ensemble, &params, &StepContext::unit(), &mut rng).unwrap();
                for row in ensemble.values().rows() {
                    assert_eq!(row[0] + row[1] + row[2], 1000.0);
                }
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Confirm reproducibility and that the input ensemble is untouched.
    //
    // Given
    // -----
    // - The single-particle scenario with ν = 0.1, two RNGs seeded with 5.
    //
    // Expect
    // ------
    // - Equal outputs; the input equals a copy taken before the calls.
    fn sir_is_reproducible_and_pure() {
        // Arrange
        let ensemble = single_particle();
        let before = ensemble.clone();
        let table = ParamTable::from_pairs(&[("gamma", 0.1)]).unwrap();
        let ctx = StepContext::unit();

        // Act
        let a = SirKernel
            .advance_with_table(&ensemble, &table, &ctx, &mut StdRng::seed_from_u64(5))
            .unwrap();
        let b = SirKernel
            .advance_with_table(&ensemble, &table, &ctx, &mut StdRng::seed_from_u64(5))
            .unwrap();

        // Assert
        assert_eq!(a, b);
        assert_eq!(ensemble, before);
    }

    #[test]
    // Purpose
    // -------
    // Ensure domain and shape errors are surfaced.
    //
    // Given
    // -----
    // - A particle with S = I = R = 0.
    // - Parameters covering 2 particles for a 1-particle ensemble.
    // - A table without `gamma`.
    //
    // Expect
    // ------
    // - `ZeroPopulation`, `ParamRowMismatch`, `MissingParameter`.
    fn sir_reports_invalid_inputs() {
        // Arrange
        let empty = ParticleEnsemble::compartmental(array![[0.0, 0.0, 0.0, 0.0, 0.3]]).unwrap();
        let ctx = StepContext::unit();
        let mut rng = StdRng::seed_from_u64(0);

        // Act
        let zero = SirKernel
            .advance(&empty, &SirParams::broadcast(0.1, 0.1, 1).unwrap(), &ctx, &mut rng)
            .unwrap_err();
        let rows = SirKernel
            .advance(&single_particle(), &SirParams::broadcast(0.1, 0.1, 2).unwrap(), &ctx, &mut rng)
            .unwrap_err();
        let missing = SirKernel
            .advance_with_table(
                &single_particle(),
                &ParamTable::from_pairs(&[("nu_beta", 0.1)]).unwrap(),
                &ctx,
                &mut rng,
            )
            .unwrap_err();

        // Assert
        assert_eq!(zero, KernelError::ZeroPopulation { particle: 0 });
        assert_eq!(rows, KernelError::ParamRowMismatch { expected: 1, actual: 2 });
        assert_eq!(missing, KernelError::MissingParameter { name: "gamma", model: "SIR" });
    }
}
