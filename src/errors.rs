use thiserror::Error;

/// Error type for improperly defined inputs and convergence problems.
///
/// Every variant is fatal for the temperature it occurred at; the batch
/// orchestrator aborts on the first failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReosError {
    #[error("Reduced temperature parameter must be < 1, got {0}.")]
    InvalidTemperature(f64),
    #[error(
        "Initial search of a primary minimum or maximum failed at Tr = {temperature}. \
         A possible remedy: extend the search interval by increasing `search_max`."
    )]
    ExtremaNotFound { temperature: f64 },
    #[error("Refined search of a primary minimum or maximum did not converge at Tr = {temperature}.")]
    RefinementFailed { temperature: f64 },
    #[error("No intersection of the isotherm at Tr = {temperature} with Pr = {pressure} was found.")]
    IntersectionNotFound { temperature: f64, pressure: f64 },
    #[error(
        "No reduced equilibrium pressure found at Tr = {temperature}: the solution of the \
         equal area optimization problem did not converge."
    )]
    EquilibriumNotFound { temperature: f64 },
}

/// Convenience type for `Result<T, ReosError>`.
pub type ReosResult<T> = Result<T, ReosError>;
