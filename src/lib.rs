#![warn(clippy::all)]
#![allow(clippy::many_single_char_names)]

//! Computation of coexisting liquid and vapor densities of a fluid from a
//! dimensionless ("reduced") equation of state, using Maxwell's equal area
//! rule (aka Maxwell construction).
//!
//! For a reduced temperature below the critical value, the unstable region of
//! the isotherm is delimited by its spinodal extrema, the constant pressure
//! splitting that region into two equal and opposite-signed areas against the
//! isotherm is located, and the molar volumes (and densities) at which that
//! pressure intersects the stable branches are reported.
//!
//! ```
//! use reos::{liquid_vapor_equilibria, SearchParameters, SolverOptions, VanDerWaals};
//!
//! let points = liquid_vapor_equilibria(
//!     &VanDerWaals,
//!     &[0.85, 0.9],
//!     SearchParameters::default(),
//!     SolverOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(points.len(), 2);
//! assert!(points[0].pressure < points[1].pressure);
//! assert!(points[0].rhor_vapor < points[0].rhor_liquid);
//! ```

/// Print messages with level `Verbosity::Iter` or higher.
#[macro_export]
macro_rules! log_iter {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= Verbosity::Iter {
            println!($($arg)*);
        }
    }
}

/// Print messages with level `Verbosity::Result` or higher.
#[macro_export]
macro_rules! log_result {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= Verbosity::Result {
            println!($($arg)*);
        }
    }
}

mod eos;
mod errors;
mod isotherm;
mod maxwell;
mod solver;

pub use eos::{
    CarnahanStarling, IdealGas, PengRobinson, PengRobinsonRecord, RedlichKwong, ReducedEos,
    ReducedEosModel, Soave, SoaveRecord, VanDerWaals,
};
pub use errors::{ReosError, ReosResult};
pub use isotherm::{intersection, SpinodalPoints};
#[cfg(feature = "rayon")]
pub use maxwell::par_liquid_vapor_equilibria;
pub use maxwell::{
    liquid_vapor_equilibria, EquilibriumPoint, SearchParameters, SolverOptions, Verbosity,
};
