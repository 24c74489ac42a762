//! Location of the spinodal extrema and segmentation of subcritical isotherms.
use crate::eos::ReducedEos;
use crate::errors::{ReosError, ReosResult};
use crate::solver;
use itertools::Itertools;
use ndarray::Array1;

/// Resolution of the initial grid search for the primary extrema. Also used
/// as the offset that keeps evaluations away from the singularity of the
/// equation of state at `vrmol_min`.
pub(crate) const SEARCH_RES: f64 = 1e-3;

const XTOL_EXTREMUM: f64 = 1e-10;
const MAX_EVAL_EXTREMUM: usize = 500;
const XTOL_ROOT: f64 = 2e-12;
const MAX_ITER_ROOT: usize = 200;

/// The primary extrema of a subcritical isotherm.
///
/// The local minimum and maximum are the spinodal points bounding the
/// mechanically unstable region; a fluid only splits into coexisting phases
/// at temperatures where both exist.
#[derive(Debug, Clone, Copy)]
pub struct SpinodalPoints {
    /// Location of the primary minimum.
    pub min_vrmol: f64,
    /// Reduced pressure at the primary minimum.
    pub min_pr: f64,
    /// Location of the primary maximum.
    pub max_vrmol: f64,
    /// Reduced pressure at the primary maximum.
    pub max_pr: f64,
}

impl SpinodalPoints {
    /// Locate the primary minimum and maximum of the isotherm at `tr`.
    ///
    /// The search is executed in two steps: the extrema are first delimited
    /// to grid intervals by a uniform scan of `(vrmol_min, search_max]` and
    /// then pinpointed by bounded minimization of `pr` resp. `-pr` within the
    /// grid-adjacent brackets.
    pub fn locate<E: ReducedEos>(eos: &E, tr: f64, search_max: f64) -> ReosResult<Self> {
        let vrmols = Array1::range(eos.vrmol_min() + SEARCH_RES, search_max, SEARCH_RES);
        let prs = vrmols.mapv(|vrmol| eos.pr(vrmol, tr));

        // strict interior local extrema of the sampled isotherm
        let mut min_idx = None;
        let mut max_idx = None;
        for (i, (p0, p1, p2)) in prs.iter().tuple_windows().enumerate() {
            if min_idx.is_none() && p1 < p0 && p1 < p2 {
                min_idx = Some(i + 1);
            }
            if max_idx.is_none() && p1 > p0 && p1 > p2 {
                max_idx = Some(i + 1);
            }
            if min_idx.is_some() && max_idx.is_some() {
                break;
            }
        }
        let (Some(min_idx), Some(max_idx)) = (min_idx, max_idx) else {
            return Err(ReosError::ExtremaNotFound { temperature: tr });
        };
        // the minimum has to precede the maximum for the isotherm to have the
        // van der Waals loop shape the construction relies on
        if min_idx >= max_idx {
            return Err(ReosError::ExtremaNotFound { temperature: tr });
        }

        let (min_vrmol, min_pr) = solver::min_bounded(
            |vrmol| eos.pr(vrmol, tr),
            (vrmols[min_idx - 1], vrmols[min_idx + 1]),
            XTOL_EXTREMUM,
            MAX_EVAL_EXTREMUM,
        )
        .ok_or(ReosError::RefinementFailed { temperature: tr })?;
        let (max_vrmol, neg_max_pr) = solver::min_bounded(
            |vrmol| -eos.pr(vrmol, tr),
            (vrmols[max_idx - 1], vrmols[max_idx + 1]),
            XTOL_EXTREMUM,
            MAX_EVAL_EXTREMUM,
        )
        .ok_or(ReosError::RefinementFailed { temperature: tr })?;

        Ok(Self {
            min_vrmol,
            min_pr,
            max_vrmol,
            max_pr: -neg_max_pr,
        })
    }
}

/// Reduced molar volume at which the isotherm at `tr` crosses the constant
/// pressure `pressure`, searched within `bracket`.
///
/// The isotherm has to change sides of the constant pressure over the
/// bracket, which holds by construction for the monotonic head and tail
/// branches delimited by the spinodal points. The body segment between the
/// two spinodal points is assumed to be monotonic as well; a custom equation
/// of state violating that assumption is not detected here, the search simply
/// returns one of the crossings.
pub fn intersection<E: ReducedEos>(
    eos: &E,
    tr: f64,
    bracket: (f64, f64),
    pressure: f64,
) -> ReosResult<f64> {
    solver::brent_root(
        |vrmol| eos.pr(vrmol, tr) - pressure,
        bracket.0,
        bracket.1,
        XTOL_ROOT,
        MAX_ITER_ROOT,
    )
    .ok_or(ReosError::IntersectionNotFound {
        temperature: tr,
        pressure,
    })
}

/// Decomposition of an isotherm into the three branches delimited by the
/// spinodal points, together with the lower limit of the equilibrium
/// pressure search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segments {
    pub head: (f64, f64),
    pub body: (f64, f64),
    pub tail: (f64, f64),
    pub pr_floor: f64,
}

impl Segments {
    /// Split the volume range `(vrmol_min, 1/rhor_min]` at the spinodal
    /// points into head, body and tail.
    ///
    /// The equilibrium pressure is later searched above the floor
    /// `max(min_pr, 0, pr(vrmol_max))`; when the pressure at the end of the
    /// tail lies below that floor, the tail is clipped where the isotherm
    /// drops to the floor so that every candidate pressure keeps a sign
    /// change over the tail bracket.
    pub fn new<E: ReducedEos>(
        eos: &E,
        tr: f64,
        spinodal: &SpinodalPoints,
        rhor_min: f64,
    ) -> ReosResult<Self> {
        let vrmol_max = 1.0 / rhor_min;
        let head = (eos.vrmol_min() + SEARCH_RES, spinodal.min_vrmol);
        let body = (spinodal.min_vrmol, spinodal.max_vrmol);
        let mut tail = (spinodal.max_vrmol, vrmol_max);

        let pr_end = eos.pr(vrmol_max, tr);
        let pr_floor = spinodal.min_pr.max(0.0).max(pr_end);
        if pr_end < pr_floor {
            tail.1 = intersection(eos, tr, tail, pr_floor)?;
        }

        Ok(Self {
            head,
            body,
            tail,
            pr_floor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{IdealGas, VanDerWaals};
    use approx::assert_relative_eq;

    #[test]
    fn van_der_waals_spinodal() {
        let sp = SpinodalPoints::locate(&VanDerWaals, 0.9, 40.0).unwrap();
        // liquid-side spinodal between the covolume and the critical volume,
        // vapor-side spinodal beyond it
        assert!(sp.min_vrmol > 1.0 / 3.0 && sp.min_vrmol < 1.0);
        assert!(sp.max_vrmol > 1.0);
        assert!(sp.min_pr < sp.max_pr);

        // both are stationary points of the isotherm
        let h = 1e-6;
        for vrmol in [sp.min_vrmol, sp.max_vrmol] {
            let slope = (VanDerWaals.pr(vrmol + h, 0.9) - VanDerWaals.pr(vrmol - h, 0.9)) / (2.0 * h);
            assert_relative_eq!(slope, 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn ideal_gas_has_no_spinodal() {
        let err = SpinodalPoints::locate(&IdealGas, 0.5, 40.0).unwrap_err();
        assert_eq!(err, ReosError::ExtremaNotFound { temperature: 0.5 });
    }

    #[test]
    fn intersection_recovers_known_point() {
        // target pressure evaluated at a known interior point of a monotonic
        // piece of the isotherm
        let target = VanDerWaals.pr(0.6, 0.9);
        let vrmol = intersection(&VanDerWaals, 0.9, (0.45, 0.68), target).unwrap();
        assert_relative_eq!(vrmol, 0.6, epsilon = 1e-8);
    }

    #[test]
    fn intersection_requires_sign_change() {
        // constant pressure far above the isotherm over the bracket
        let err = intersection(&VanDerWaals, 0.9, (2.0, 3.0), 50.0).unwrap_err();
        assert!(matches!(err, ReosError::IntersectionNotFound { .. }));
    }

    #[test]
    fn segments_share_spinodal_bounds() {
        let sp = SpinodalPoints::locate(&VanDerWaals, 0.8, 40.0).unwrap();
        let segments = Segments::new(&VanDerWaals, 0.8, &sp, 1e-12).unwrap();
        assert_eq!(segments.head.1, sp.min_vrmol);
        assert_eq!(segments.body, (sp.min_vrmol, sp.max_vrmol));
        assert_eq!(segments.tail.0, sp.max_vrmol);
        assert!(segments.pr_floor >= 0.0);
        assert!(segments.pr_floor >= sp.min_pr);
    }
}
