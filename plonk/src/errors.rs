use crate::poly_commit::errors::PolyComSchemeError;
use ark_std::{error, fmt, string::String};
use ember_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum PlonkError {
    /// Algebra error.
    Algebra(AlgebraError),
    /// Polynomial commitment error.
    PolyCom(PolyComSchemeError),
    /// The circuit size is not a power of two.
    CircuitSizeNotPowerOfTwo(usize),
    /// A selector polynomial was not supplied.
    MissingSelector(String),
    /// The permutation mapping is not a bijection over the wire slots.
    InvalidPermutation,
    /// No evaluation domain of the requested size exists over the field.
    GroupNotFound(usize),
    /// The absorbed element does not match the manifest.
    ManifestMismatch {
        round: usize,
        expected: Option<String>,
        found: String,
    },
    /// The challenge was requested before its round was fully absorbed.
    ChallengeUnavailable(usize),
    /// The proof bytes cannot be segmented by the manifest.
    MalformedProof,
    /// The witness does not satisfy the circuit.
    ProofErrorInvalidWitness,
    /// Division by zero.
    DivisionByZero,
    /// Function params error.
    FuncParamsError,
    /// Error occurred when setup.
    SetupError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            PolyCom(e) => write!(f, "Polynomial commitment: {}", e),
            CircuitSizeNotPowerOfTwo(n) => write!(f, "Circuit size {} is not a power of two", n),
            MissingSelector(name) => write!(f, "Missing selector polynomial {}", name),
            InvalidPermutation => f.write_str("Permutation mapping is not a bijection"),
            GroupNotFound(n) => write!(f, "No evaluation domain of size {}", n),
            ManifestMismatch {
                round,
                expected,
                found,
            } => match expected {
                Some(name) => write!(
                    f,
                    "Manifest mismatch in round {}: expected {}, found {}",
                    round, name, found
                ),
                None => write!(
                    f,
                    "Manifest mismatch in round {}: unexpected element {}",
                    round, found
                ),
            },
            ChallengeUnavailable(round) => {
                write!(f, "Challenge of round {} is not available yet", round)
            }
            MalformedProof => f.write_str("Malformed proof"),
            ProofErrorInvalidWitness => f.write_str("Proof error invalid witness."),
            DivisionByZero => f.write_str("Division by zero."),
            FuncParamsError => f.write_str("Function params error"),
            SetupError => f.write_str("Setup error."),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

impl From<PolyComSchemeError> for PlonkError {
    fn from(e: PolyComSchemeError) -> PlonkError {
        PlonkError::PolyCom(e)
    }
}
