//! Maxwell's equal area construction.
//!
//! For a subcritical isotherm the equation of state traces a van der Waals
//! loop: the mechanically unstable region between the spinodal points has to
//! be replaced by a constant pressure. The physically realized pressure is
//! the one for which the two areas enclosed by the isotherm and the constant
//! pressure cancel; its intersections with the stable head and tail branches
//! are the coexisting liquid and vapor molar volumes.
use crate::eos::ReducedEos;
use crate::errors::{ReosError, ReosResult};
use crate::isotherm::{intersection, Segments, SpinodalPoints};
use crate::solver;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_EVAL_EQUILIBRIUM: usize = 500;
const XTOL_PRESSURE: f64 = 1e-10;
const TOL_QUAD: f64 = 1e-11;
const TOL_AREA: f64 = 1e-9;
const TOL_AREA_VERIFY: f64 = 1e-8;
const MAX_ITER_POLISH: usize = 10;

/// Level of detail of the iteration output.
#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub enum Verbosity {
    /// Do not print output.
    None,
    /// Print information about the success or failure of the calculation.
    Result,
    /// Print a detailed output for every calculation stage.
    Iter,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::None
    }
}

/// Options for the equal area solver.
///
/// If the values are [None], solver specific default values are used.
#[derive(Copy, Clone, Default)]
pub struct SolverOptions {
    /// Maximum number of objective evaluations.
    pub max_eval: Option<usize>,
    /// Tolerance of the equilibrium pressure.
    pub tol: Option<f64>,
    /// Iteration output indicated by the [Verbosity] enum.
    pub verbosity: Verbosity,
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_eval(mut self, max_eval: usize) -> Self {
        self.max_eval = Some(max_eval);
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn unwrap_or(self, max_eval: usize, tol: f64) -> (usize, f64, Verbosity) {
        (
            self.max_eval.unwrap_or(max_eval),
            self.tol.unwrap_or(tol),
            self.verbosity,
        )
    }
}

/// Tunables for the extremum search and the solution range.
#[derive(Debug, Copy, Clone)]
pub struct SearchParameters {
    /// Upper limit for the reduced molar volume in the initial search of the
    /// primary extrema.
    pub search_max: f64,
    /// Lower limit for the reduced vapor density; its reciprocal bounds the
    /// range of solutions.
    pub rhor_min: f64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            search_max: 40.0,
            rhor_min: 1e-12,
        }
    }
}

/// A liquid-vapor coexistence point obtained from the equal area construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumPoint {
    /// Reduced temperature.
    pub temperature: f64,
    /// Reduced equilibrium pressure.
    pub pressure: f64,
    /// Reduced molar volume of the vapor phase.
    pub vrmol_vapor: f64,
    /// Reduced molar volume of the liquid phase.
    pub vrmol_liquid: f64,
    /// Reduced density of the vapor phase.
    pub rhor_vapor: f64,
    /// Reduced density of the liquid phase.
    pub rhor_liquid: f64,
}

impl fmt::Display for EquilibriumPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tr = {:.6}: PrEq = {:.8e}, rhor_vapor = {:.8e}, rhor_liquid = {:.8e}",
            self.temperature, self.pressure, self.rhor_vapor, self.rhor_liquid
        )
    }
}

/// The intersections of a candidate constant pressure with the three isotherm
/// branches and the two signed areas they demarcate.
fn maxwell_areas<E: ReducedEos>(
    eos: &E,
    tr: f64,
    segments: &Segments,
    pressure: f64,
) -> ReosResult<((f64, f64, f64), (f64, f64))> {
    let h0 = intersection(eos, tr, segments.head, pressure)?;
    let b0 = intersection(eos, tr, segments.body, pressure)?;
    let t0 = intersection(eos, tr, segments.tail, pressure)?;

    let isotherm = |vrmol| eos.pr(vrmol, tr);
    let a1 = solver::integrate(&isotherm, h0, b0, TOL_QUAD) - (b0 - h0) * pressure;
    let a2 = solver::integrate(&isotherm, b0, t0, TOL_QUAD) - (t0 - b0) * pressure;

    Ok(((h0, b0, t0), (a1, a2)))
}

impl EquilibriumPoint {
    /// Equal area construction for a single reduced temperature.
    ///
    /// The equilibrium pressure is searched between the pressure floor of the
    /// segmented isotherm and the pressure at the vapor-side spinodal point by
    /// minimizing `|A1 + A2|`, and then verified (and sharpened) with Newton
    /// steps on the signed area imbalance, whose derivative with respect to
    /// the candidate pressure is `-(t0 - h0)`.
    pub fn pure<E: ReducedEos>(
        eos: &E,
        tr: f64,
        search: SearchParameters,
        options: SolverOptions,
    ) -> ReosResult<Self> {
        if tr >= 1.0 {
            return Err(ReosError::InvalidTemperature(tr));
        }
        let (max_eval, tol, verbosity) = options.unwrap_or(MAX_EVAL_EQUILIBRIUM, XTOL_PRESSURE);

        let spinodal = SpinodalPoints::locate(eos, tr, search.search_max)?;
        let segments = Segments::new(eos, tr, &spinodal, search.rhor_min)?;
        if segments.pr_floor >= spinodal.max_pr {
            // empty search bracket, no pressure can balance the areas
            return Err(ReosError::EquilibriumNotFound { temperature: tr });
        }
        log_iter!(
            verbosity,
            " Tr = {:.6}: spinodal points at Vr = {:.8} (Pr = {:.8e}) and Vr = {:.8} (Pr = {:.8e})",
            tr,
            spinodal.min_vrmol,
            spinodal.min_pr,
            spinodal.max_vrmol,
            spinodal.max_pr
        );
        log_iter!(
            verbosity,
            " Tr = {:.6}: searching the equilibrium pressure in ({:.8e}, {:.8e})",
            tr,
            segments.pr_floor,
            spinodal.max_pr
        );

        let area_diff = |pressure: f64| {
            maxwell_areas(eos, tr, &segments, pressure)
                .map_or(f64::INFINITY, |(_, (a1, a2))| (a1 + a2).abs())
        };
        let (mut pr_eq, _) = solver::min_bounded(
            area_diff,
            (segments.pr_floor, spinodal.max_pr),
            tol,
            max_eval,
        )
        .ok_or(ReosError::EquilibriumNotFound { temperature: tr })?;

        // Newton steps on the signed imbalance sharpen the minimizer down to
        // the quadrature noise; the verification below is strict.
        let mut imbalance = f64::INFINITY;
        for i in 0..MAX_ITER_POLISH {
            let ((h0, _, t0), (a1, a2)) = maxwell_areas(eos, tr, &segments, pr_eq)?;
            imbalance = a1 + a2;
            log_iter!(
                verbosity,
                " {:4} | PrEq = {:.12e} | A1 + A2 = {:14.8e}",
                i,
                pr_eq,
                imbalance
            );
            if imbalance.abs() <= TOL_AREA {
                break;
            }
            pr_eq = (pr_eq + imbalance / (t0 - h0)).clamp(segments.pr_floor, spinodal.max_pr);
        }
        if !(imbalance.abs() < TOL_AREA_VERIFY) {
            return Err(ReosError::EquilibriumNotFound { temperature: tr });
        }

        let vrmol_liquid = intersection(eos, tr, segments.head, pr_eq)?;
        let vrmol_vapor = intersection(eos, tr, segments.tail, pr_eq)?;
        log_result!(
            verbosity,
            "EquilibriumPoint::pure: Tr = {:.6} converged with PrEq = {:.8e} (|A1 + A2| = {:.2e})",
            tr,
            pr_eq,
            imbalance.abs()
        );

        Ok(Self {
            temperature: tr,
            pressure: pr_eq,
            vrmol_vapor,
            vrmol_liquid,
            rhor_vapor: vrmol_vapor.recip(),
            rhor_liquid: vrmol_liquid.recip(),
        })
    }

    /// Residual `A1 + A2` of the equal area rule at the stored equilibrium
    /// pressure.
    ///
    /// The intersection of the constant pressure with the isotherm body
    /// cancels out of the sum, so the residual only involves the coexisting
    /// molar volumes.
    pub fn area_imbalance<E: ReducedEos>(&self, eos: &E) -> f64 {
        let isotherm = |vrmol| eos.pr(vrmol, self.temperature);
        solver::integrate(&isotherm, self.vrmol_liquid, self.vrmol_vapor, TOL_QUAD)
            - (self.vrmol_vapor - self.vrmol_liquid) * self.pressure
    }
}

/// Coexisting liquid and vapor densities for the given reduced temperatures.
///
/// The temperatures are processed independently and the results are returned
/// in input order. The computation is fail-fast: the first temperature that
/// fails aborts the whole batch with the specific error.
pub fn liquid_vapor_equilibria<E: ReducedEos>(
    eos: &E,
    trs: &[f64],
    search: SearchParameters,
    options: SolverOptions,
) -> ReosResult<Vec<EquilibriumPoint>> {
    trs.iter()
        .map(|&tr| EquilibriumPoint::pure(eos, tr, search, options))
        .collect()
}

/// Parallel version of [liquid_vapor_equilibria].
///
/// Temperatures are evaluated on the given thread pool; the output order
/// still matches the input order regardless of completion order.
#[cfg(feature = "rayon")]
pub fn par_liquid_vapor_equilibria<E: ReducedEos + Sync>(
    eos: &E,
    trs: &[f64],
    search: SearchParameters,
    options: SolverOptions,
    thread_pool: &rayon::ThreadPool,
) -> ReosResult<Vec<EquilibriumPoint>> {
    use rayon::prelude::*;
    thread_pool.install(|| {
        trs.par_iter()
            .map(|&tr| EquilibriumPoint::pure(eos, tr, search, options))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::VanDerWaals;
    use approx::assert_relative_eq;

    #[test]
    fn van_der_waals_coexistence() -> ReosResult<()> {
        let point = EquilibriumPoint::pure(
            &VanDerWaals,
            0.85,
            SearchParameters::default(),
            SolverOptions::default(),
        )?;
        // the liquid volume lies below the critical volume, the vapor volume
        // above, and the equilibrium pressure between the spinodal pressures
        assert!(point.vrmol_liquid > 1.0 / 3.0 && point.vrmol_liquid < 1.0);
        assert!(point.vrmol_vapor > 1.0);
        assert!(point.pressure > 0.0 && point.pressure < 1.0);
        assert_relative_eq!(point.rhor_liquid, 1.0 / point.vrmol_liquid, max_relative = 1e-14);
        assert_relative_eq!(point.rhor_vapor, 1.0 / point.vrmol_vapor, max_relative = 1e-14);
        Ok(())
    }

    #[test]
    fn equal_areas_at_equilibrium() -> ReosResult<()> {
        for tr in [0.6, 0.8, 0.95] {
            let point = EquilibriumPoint::pure(
                &VanDerWaals,
                tr,
                SearchParameters::default(),
                SolverOptions::default(),
            )?;
            assert!(point.area_imbalance(&VanDerWaals).abs() < 1e-8);
        }
        Ok(())
    }

    #[test]
    fn supercritical_temperature_is_rejected() {
        let err = EquilibriumPoint::pure(
            &VanDerWaals,
            1.01,
            SearchParameters::default(),
            SolverOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, ReosError::InvalidTemperature(1.01));
    }

    #[test]
    fn batch_preserves_input_order() -> ReosResult<()> {
        let trs = [0.9, 0.7, 0.8];
        let points = liquid_vapor_equilibria(
            &VanDerWaals,
            &trs,
            SearchParameters::default(),
            SolverOptions::default(),
        )?;
        assert_eq!(points.len(), 3);
        for (point, tr) in points.iter().zip(trs) {
            assert_eq!(point.temperature, tr);
        }
        Ok(())
    }

    #[test]
    fn batch_aborts_on_first_failure() {
        let err = liquid_vapor_equilibria(
            &VanDerWaals,
            &[0.8, 1.2, 0.7],
            SearchParameters::default(),
            SolverOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, ReosError::InvalidTemperature(1.2));
    }
}
