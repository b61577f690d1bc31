use crate::poly_commit::{errors::Result, field_polynomial::FpPolynomial};
use ark_std::fmt::Debug;
use ember_algebra::prelude::*;
use serde::{Deserialize, Serialize};

/// The trait for help serialize to bytes,
/// implement by polynomial commitment.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Elements that combine linearly in the same way as the polynomials they
/// stand for. Both polynomials and their commitments implement it, so the
/// same linear combination can be computed on either side of the protocol.
pub trait HomomorphicPolyComElem: Clone {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply assign underlying polynomial by scalar `exp`.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + ToBytes
        + Debug
        + PartialEq
        + Eq
        + Clone
        + Serialize
        + for<'de> Deserialize<'de>;

    /// Return the max degree of a committable polynomial.
    fn max_degree(&self) -> usize;

    /// Commit to the polynomial. Fails if it has more coefficients than
    /// the available public parameters.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// The commitment length in bytes.
    fn commitment_len() -> usize;

    /// Parse a commitment, checking that it is a valid group element.
    fn commitment_from_bytes(bytes: &[u8]) -> Result<Self::Commitment>;

    /// Evaluate the polynomial.
    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        poly.eval(point)
    }

    /// Compute the evaluation proof that `poly(point) = poly.eval(point)`.
    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        point: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment>;

    /// Verify an evaluation proof that polynomial inside commitment
    /// evaluates to `eval` on input `point`.
    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()>;

    /// Verify several evaluation proofs at different points at once,
    /// combining them with powers of `challenge`.
    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()>;

    /// Shrink this to only for verifier use.
    fn shrink_to_verifier_only(&self) -> Self;
}
