use crate::poly_commit::{
    errors::{PolyComSchemeError, Result},
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes},
};
use ember_algebra::{
    bn254::BN254PairingEngine,
    prelude::*,
    traits::{Domain, Pairing},
};

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> ToBytes for KZGCommitment<G> {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_uncompressed_bytes()
    }
}

impl<G: Group> HomomorphicPolyComElem for KZGCommitment<G> {
    type Scalar = G::ScalarType;

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &G::ScalarType) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &G::ScalarType) {
        self.0 = self.0.mul(exp)
    }
}

impl<F: Scalar> HomomorphicPolyComElem for FpPolynomial<F> {
    type Scalar = F;

    fn add(&self, other: &Self) -> Self {
        FpPolynomial::add(self, other)
    }

    fn add_assign(&mut self, other: &Self) {
        FpPolynomial::add_assign(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        FpPolynomial::sub(self, other)
    }

    fn sub_assign(&mut self, other: &Self) {
        FpPolynomial::sub_assign(self, other)
    }

    fn mul(&self, exp: &F) -> Self {
        self.mul_scalar(exp)
    }

    fn mul_assign(&mut self, exp: &F) {
        self.mul_scalar_assign(exp)
    }
}

/// KZG commitment scheme about `PairingEngine`.
#[derive(Clone, Debug)]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// public parameter about G1: `[x^i]_1` for `i` in `0..len`, never empty.
    public_parameter_group_1: Vec<P::G1>,
    /// public parameter about G2: `[1]_2` and `[x]_2`.
    public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance of a KZG polynomial commitment scheme.
    /// `max_degree` - max degree of the polynomial,
    /// `prng` - pseudo-random generator.
    ///
    /// The trapdoor is sampled and dropped; this is only meant for tests
    /// and benchmarks, production parameters come from [`Self::from_points`].
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let s = P::ScalarField::random(prng);

        let mut public_parameter_group_1: Vec<P::G1> = Vec::with_capacity(max_degree + 1);
        let mut elem_g1 = P::G1::get_base();
        for _ in 0..=max_degree {
            public_parameter_group_1.push(elem_g1);
            elem_g1 = elem_g1.mul(&s);
        }

        let elem_g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![elem_g2, elem_g2.mul(&s)];

        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2,
        }
    }

    /// Build the scheme from externally loaded SRS points.
    /// At least one G1 point and the two G2 points `[1]_2, [x]_2` are required.
    pub fn from_points(g1_points: Vec<P::G1>, g2_points: Vec<P::G2>) -> Result<Self> {
        if g1_points.is_empty() {
            return Err(PolyComSchemeError::InsufficientSRSLength {
                needed: 1,
                available: 0,
            });
        }
        if g2_points.len() != 2 {
            return Err(PolyComSchemeError::DegreeError);
        }
        Ok(KZGCommitmentScheme {
            public_parameter_group_1: g1_points,
            public_parameter_group_2: g2_points,
        })
    }
}

/// KZG commitment scheme over the BN254 curve
pub type KZGCommitmentSchemeBN254 = KZGCommitmentScheme<BN254PairingEngine>;

impl<P: Pairing> PolyComScheme for KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len().saturating_sub(1)
    }

    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment> {
        let coefs = polynomial.get_coefs_ref();
        if coefs.len() > self.public_parameter_group_1.len() {
            return Err(PolyComSchemeError::InsufficientSRSLength {
                needed: coefs.len(),
                available: self.public_parameter_group_1.len(),
            });
        }

        let coefs_ref: Vec<&Self::Field> = coefs.iter().collect();
        let points_ref: Vec<&P::G1> = self.public_parameter_group_1[0..coefs.len()]
            .iter()
            .collect();

        let commitment_value = P::G1::multi_exp(&coefs_ref[..], &points_ref[..])?;
        Ok(KZGCommitment(commitment_value))
    }

    fn commitment_len() -> usize {
        P::G1::UNCOMPRESSED_LEN
    }

    fn commitment_from_bytes(bytes: &[u8]) -> Result<Self::Commitment> {
        Ok(KZGCommitment(P::G1::from_uncompressed_bytes(bytes)?))
    }

    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        point: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment> {
        if poly.degree() > max_degree {
            return Err(PolyComSchemeError::DegreeError);
        }

        // (f(X) - f(x)) / (X - x)
        let eval = poly.eval(point);
        let nominator = poly.sub(&FpPolynomial::from_coefs(vec![eval]));
        let vanishing_poly = FpPolynomial::from_coefs(vec![point.neg(), Self::Field::one()]);
        let (q_poly, r_poly) = nominator.div_rem(&vanishing_poly)?;

        if !r_poly.is_zero() {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }

        self.commit(&q_poly)
    }

    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()> {
        // e(C - y[1]_1 + x * pi, [1]_2) = e(pi, [s]_2)
        let g1_0 = self.public_parameter_group_1[0];
        let g2_0 = self.public_parameter_group_2[0];
        let g2_1 = self.public_parameter_group_2[1];

        let left = cm.0.sub(&g1_0.mul(eval)).add(&proof.0.mul(point));
        let pairing_eval = P::product_of_pairings(&[left, proof.0.neg()], &[g2_0, g2_1]);

        if pairing_eval == P::gt_identity() {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSProveEvalError)
        }
    }

    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()> {
        if proofs.is_empty()
            || proofs.len() != point_vec.len()
            || proofs.len() != eval_vec.len()
            || proofs.len() != cm_vec.len()
        {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }

        let g1_0 = self.public_parameter_group_1[0];
        let g2_0 = self.public_parameter_group_2[0];
        let g2_1 = self.public_parameter_group_2[1];

        let left_second = g2_1;
        let right_second = g2_0;

        let mut left_first = proofs[0].0;
        let mut right_first = proofs[0].0.mul(&point_vec[0]);
        let mut right_first_val = eval_vec[0];
        let mut right_first_comm = cm_vec[0].0;

        let mut cur_challenge = *challenge;
        for i in 1..proofs.len() {
            let new_comm = proofs[i].0.mul(&cur_challenge);

            left_first.add_assign(&new_comm);
            right_first.add_assign(&new_comm.mul(&point_vec[i]));
            right_first_val.add_assign(&eval_vec[i].mul(&cur_challenge));
            right_first_comm.add_assign(&cm_vec[i].0.mul(&cur_challenge));

            cur_challenge.mul_assign(challenge);
        }
        right_first.sub_assign(&g1_0.mul(&right_first_val));
        right_first.add_assign(&right_first_comm);

        let pairing_eval = P::product_of_pairings(
            &[left_first, right_first.neg()],
            &[left_second, right_second],
        );

        if pairing_eval == P::gt_identity() {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSProveEvalError)
        }
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: vec![self.public_parameter_group_1[0]],
            public_parameter_group_2: vec![
                self.public_parameter_group_2[0],
                self.public_parameter_group_2[1],
            ],
        }
    }
}
