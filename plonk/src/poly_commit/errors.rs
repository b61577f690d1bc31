use ark_std::{error, fmt};
use ember_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PolyComSchemeError>;

/// Polynomial commitment scheme errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PolyComSchemeError {
    /// It is not possible to compute the proof as F(x) != y.
    PCSProveEvalError,
    /// The polynomial has more coefficients than the SRS has points.
    InsufficientSRSLength {
        /// Number of SRS points the polynomial needs.
        needed: usize,
        /// Number of SRS points available.
        available: usize,
    },
    /// The degree of the polynomial is higher than the maximum degree allowed.
    DegreeError,
    /// Error in the underlying group arithmetic.
    Algebra(AlgebraError),
}

impl fmt::Display for PolyComSchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolyComSchemeError::PCSProveEvalError => {
                f.write_str("It is not possible to compute the proof as F(x) != y.")
            }
            PolyComSchemeError::InsufficientSRSLength { needed, available } => write!(
                f,
                "Polynomial needs {} SRS points but only {} are available.",
                needed, available
            ),
            PolyComSchemeError::DegreeError => f.write_str(
                "The degree of the polynomial is higher than the maximum degree allowed.",
            ),
            PolyComSchemeError::Algebra(e) => write!(f, "Algebra: {}", e),
        }
    }
}

impl error::Error for PolyComSchemeError {}

impl From<AlgebraError> for PolyComSchemeError {
    fn from(e: AlgebraError) -> PolyComSchemeError {
        PolyComSchemeError::Algebra(e)
    }
}
