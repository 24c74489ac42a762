//! Reduced (corresponding-states) equations of state.
//!
//! Reduced equations of state are general in the sense that they do not
//! involve material parameters characterizing a particular, real fluid:
//! pressure, temperature and molar volume are all normalized by their values
//! at the critical point. Every model is an immutable value object; the two
//! acentric-factor dependent models ([Soave] and [PengRobinson]) precompute
//! their coefficients at construction.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reduced equation of state.
///
/// The reduced pressure is only defined for `vrmol > vrmol_min` and `tr > 0`;
/// callers have to keep a small offset from `vrmol_min` to avoid the
/// singularity of the repulsive term.
pub trait ReducedEos {
    /// Compressibility factor at the critical point.
    fn zc(&self) -> f64;

    /// Lower limit for the reduced molar volume.
    fn vrmol_min(&self) -> f64;

    /// Reduced pressure as a function of reduced molar volume and reduced
    /// temperature. Note, `vrmol` is the reciprocal of the reduced density.
    fn pr(&self, vrmol: f64, tr: f64) -> f64;
}

/// Reduced ideal gas equation of state.
///
/// Its isotherms are strictly monotonic, so it exhibits no phase transition
/// and the Maxwell construction fails with
/// [ExtremaNotFound](crate::ReosError::ExtremaNotFound).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IdealGas;

impl ReducedEos for IdealGas {
    fn zc(&self) -> f64 {
        1.0
    }

    fn vrmol_min(&self) -> f64 {
        0.0
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        tr / vrmol
    }
}

/// Reduced Van der Waals equation of state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VanDerWaals;

impl ReducedEos for VanDerWaals {
    fn zc(&self) -> f64 {
        3.0 / 8.0
    }

    fn vrmol_min(&self) -> f64 {
        1.0 / 3.0
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        let rep = 8.0 * tr / (3.0 * vrmol - 1.0);
        let att = 3.0 / (vrmol * vrmol);
        rep - att
    }
}

/// Reduced Redlich-Kwong equation of state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RedlichKwong {
    #[serde(skip, default = "covolume")]
    cff: f64,
}

/// Reduced covolume 2^(1/3) - 1 shared by the Redlich-Kwong and Soave models.
fn covolume() -> f64 {
    2.0_f64.cbrt() - 1.0
}

impl RedlichKwong {
    pub fn new() -> Self {
        Self { cff: covolume() }
    }
}

impl Default for RedlichKwong {
    fn default() -> Self {
        Self::new()
    }
}

impl ReducedEos for RedlichKwong {
    fn zc(&self) -> f64 {
        1.0 / 3.0
    }

    fn vrmol_min(&self) -> f64 {
        self.cff
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        let rep = 3.0 * tr / (vrmol - self.cff);
        let att = 1.0 / (self.cff * tr.sqrt() * vrmol * (vrmol + self.cff));
        rep - att
    }
}

/// Acentric factor record for the [Soave] equation of state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct SoaveRecord {
    /// Acentric factor (default value for water)
    #[serde(default = "default_acentric_factor")]
    pub acentric_factor: f64,
}

/// Acentric factor of water, the default substance.
fn default_acentric_factor() -> f64 {
    0.344
}

impl fmt::Display for SoaveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SoaveRecord(acentric factor={})", self.acentric_factor)
    }
}

/// Reduced Soave equation of state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "SoaveRecord", into = "SoaveRecord")]
pub struct Soave {
    acentric_factor: f64,
    cff: f64,
    alpha_cff: f64,
}

impl Soave {
    /// Create a reduced Soave equation of state for the given acentric factor.
    pub fn new(acentric_factor: f64) -> Self {
        Self {
            acentric_factor,
            cff: covolume(),
            alpha_cff: 0.48508 + (1.55171 - 0.15613 * acentric_factor) * acentric_factor,
        }
    }

    /// Acentric factor
    pub fn acentric_factor(&self) -> f64 {
        self.acentric_factor
    }
}

impl Default for Soave {
    fn default() -> Self {
        Self::new(default_acentric_factor())
    }
}

impl From<SoaveRecord> for Soave {
    fn from(record: SoaveRecord) -> Self {
        Self::new(record.acentric_factor)
    }
}

impl From<Soave> for SoaveRecord {
    fn from(eos: Soave) -> Self {
        Self {
            acentric_factor: eos.acentric_factor,
        }
    }
}

impl ReducedEos for Soave {
    fn zc(&self) -> f64 {
        1.0 / 3.0
    }

    fn vrmol_min(&self) -> f64 {
        self.cff
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        let rep = 3.0 * tr / (vrmol - self.cff);
        let alpha1 = 1.0 + self.alpha_cff * (1.0 - tr.sqrt());
        let alpha = alpha1 * alpha1;
        let att = alpha / (self.cff * vrmol * (vrmol + self.cff));
        rep - att
    }
}

/// Acentric factor record for the [PengRobinson] equation of state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct PengRobinsonRecord {
    /// Acentric factor (default value for water)
    #[serde(default = "default_acentric_factor")]
    pub acentric_factor: f64,
}

impl fmt::Display for PengRobinsonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PengRobinsonRecord(acentric factor={})",
            self.acentric_factor
        )
    }
}

/// Reduced Peng-Robinson equation of state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "PengRobinsonRecord", into = "PengRobinsonRecord")]
pub struct PengRobinson {
    acentric_factor: f64,
    alpha_cff: f64,
}

impl PengRobinson {
    const CFF: f64 = 0.2534;

    /// Create a reduced Peng-Robinson equation of state for the given
    /// acentric factor.
    pub fn new(acentric_factor: f64) -> Self {
        Self {
            acentric_factor,
            alpha_cff: 0.37464 + (1.54226 - 0.26992 * acentric_factor) * acentric_factor,
        }
    }

    /// Acentric factor
    pub fn acentric_factor(&self) -> f64 {
        self.acentric_factor
    }
}

impl Default for PengRobinson {
    fn default() -> Self {
        Self::new(default_acentric_factor())
    }
}

impl From<PengRobinsonRecord> for PengRobinson {
    fn from(record: PengRobinsonRecord) -> Self {
        Self::new(record.acentric_factor)
    }
}

impl From<PengRobinson> for PengRobinsonRecord {
    fn from(eos: PengRobinson) -> Self {
        Self {
            acentric_factor: eos.acentric_factor,
        }
    }
}

impl ReducedEos for PengRobinson {
    fn zc(&self) -> f64 {
        0.307
    }

    fn vrmol_min(&self) -> f64 {
        Self::CFF
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        let c = Self::CFF;
        let rep = 3.2573 * tr / (vrmol - c);
        let alpha1 = 1.0 + self.alpha_cff * (1.0 - tr.sqrt());
        let alpha = 4.8514 * alpha1 * alpha1;
        let att = alpha / (vrmol * vrmol + 2.0 * c * vrmol - c * c);
        rep - att
    }
}

/// Reduced Carnahan-Starling equation of state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CarnahanStarling;

impl CarnahanStarling {
    const CFF1: f64 = 2.785855166;
    const CFF2: f64 = 0.1304438842;
    const CFF3: f64 = 3.852462257;
}

impl ReducedEos for CarnahanStarling {
    fn zc(&self) -> f64 {
        0.3589562
    }

    fn vrmol_min(&self) -> f64 {
        Self::CFF2
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        let y = Self::CFF2 / vrmol;
        let y2 = y * y;
        let aux = 1.0 - y;
        let rep = Self::CFF1 * tr / vrmol * (1.0 + y + y2 - y * y2) / (aux * aux * aux);
        let att = Self::CFF3 / (vrmol * vrmol);
        rep - att
    }
}

/// Tagged union over all reduced equation of state models.
///
/// Convenient when models are selected at runtime; the [ReducedEos] trait
/// itself is object safe, so `Box<dyn ReducedEos>` works as well.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ReducedEosModel {
    IdealGas(IdealGas),
    VanDerWaals(VanDerWaals),
    RedlichKwong(RedlichKwong),
    Soave(Soave),
    PengRobinson(PengRobinson),
    CarnahanStarling(CarnahanStarling),
}

macro_rules! for_each_model {
    ($self:ident, $eos:ident, $expr:expr) => {
        match $self {
            Self::IdealGas($eos) => $expr,
            Self::VanDerWaals($eos) => $expr,
            Self::RedlichKwong($eos) => $expr,
            Self::Soave($eos) => $expr,
            Self::PengRobinson($eos) => $expr,
            Self::CarnahanStarling($eos) => $expr,
        }
    };
}

impl ReducedEos for ReducedEosModel {
    fn zc(&self) -> f64 {
        for_each_model!(self, eos, eos.zc())
    }

    fn vrmol_min(&self) -> f64 {
        for_each_model!(self, eos, eos.vrmol_min())
    }

    fn pr(&self, vrmol: f64, tr: f64) -> f64 {
        for_each_model!(self, eos, eos.pr(vrmol, tr))
    }
}

impl fmt::Display for ReducedEosModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdealGas(_) => write!(f, "Ideal gas"),
            Self::VanDerWaals(_) => write!(f, "Van der Waals"),
            Self::RedlichKwong(_) => write!(f, "Redlich-Kwong"),
            Self::Soave(_) => write!(f, "Soave"),
            Self::PengRobinson(_) => write!(f, "Peng-Robinson"),
            Self::CarnahanStarling(_) => write!(f, "Carnahan-Starling"),
        }
    }
}
