use crate::errors::{PlonkError, Result};
use crate::plonk::helpers::batch_inversion;
use crate::poly_commit::field_polynomial::FpPolynomial;
use ark_poly::Radix2EvaluationDomain;
use ember_algebra::prelude::*;

/// The evaluation domains of one circuit: the size-`n` domain `H` the
/// circuit rows live on, and the coset `g * H_m` of the larger domain used
/// to evaluate the quotient identity without aliasing.
///
/// Built once together with the proving key and only read afterwards.
#[derive(Debug, Clone)]
pub struct FieldDomains<F: Domain> {
    size: usize,
    quotient_factor: usize,
    domain: Radix2EvaluationDomain<F::Field>,
    domain_m: Radix2EvaluationDomain<F::Field>,
    root: F,
    group: Vec<F>,
    k: Vec<F>,
    coset_shift_inv: F,
    coset_quotient: Vec<F>,
    l1_coset_evals: Vec<F>,
    z_h_inv_coset_evals: Vec<F>,
}

impl<F: Domain> FieldDomains<F> {
    /// Build the domains for `size` rows, where the largest product any
    /// identity evaluates has `max_degree` factors of degree below `size`.
    pub fn new(size: usize, max_degree: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(PlonkError::CircuitSizeNotPowerOfTwo(size));
        }
        let quotient_factor = min_greater_equal_power_of_two(max_degree.max(1));
        let m = size * quotient_factor;

        let domain =
            FpPolynomial::<F>::evaluation_domain(size).ok_or(PlonkError::GroupNotFound(size))?;
        let domain_m =
            FpPolynomial::<F>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;

        let root = FpPolynomial::<F>::primitive_nth_root_of_unity(size)
            .ok_or(PlonkError::GroupNotFound(size))?;
        let root_m = FpPolynomial::<F>::primitive_nth_root_of_unity(m)
            .ok_or(PlonkError::GroupNotFound(m))?;

        let mut group = Vec::with_capacity(size);
        let mut cur = F::one();
        for _ in 0..size {
            group.push(cur);
            cur.mul_assign(&root);
        }

        let g = F::multiplicative_generator();
        let k = vec![F::one(), g, g.square()];
        let coset_shift_inv = g.inv()?;

        let mut coset_quotient = Vec::with_capacity(m);
        let mut cur = g;
        for _ in 0..m {
            coset_quotient.push(cur);
            cur.mul_assign(&root_m);
        }

        // (g w_m^i)^n - 1 only takes `quotient_factor` distinct values.
        let g_n = g.pow(&[size as u64]);
        let root_m_n = root_m.pow(&[size as u64]);
        let mut z_h_distinct = Vec::with_capacity(quotient_factor);
        let mut cur = g_n;
        for _ in 0..quotient_factor {
            z_h_distinct.push(cur.sub(&F::one()));
            cur.mul_assign(&root_m_n);
        }
        batch_inversion(&mut z_h_distinct)?;
        let z_h_inv_coset_evals = (0..m)
            .map(|i| z_h_distinct[i % quotient_factor])
            .collect();

        let mut l1_evals = vec![F::zero(); size];
        l1_evals[0] = F::one();
        let l1 = FpPolynomial::ifft_with_domain(&domain, &l1_evals);
        let l1_coset_evals = l1.coset_fft_with_domain(&domain_m, &g);

        Ok(FieldDomains {
            size,
            quotient_factor,
            domain,
            domain_m,
            root,
            group,
            k,
            coset_shift_inv,
            coset_quotient,
            l1_coset_evals,
            z_h_inv_coset_evals,
        })
    }

    /// The number of rows `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The size `m` of the quotient domain.
    pub fn quotient_size(&self) -> usize {
        self.size * self.quotient_factor
    }

    /// The ratio `m / n`.
    pub fn quotient_factor(&self) -> usize {
        self.quotient_factor
    }

    /// The generator `omega` of `H`.
    pub fn root(&self) -> &F {
        &self.root
    }

    /// The elements `omega^i` of `H`.
    pub fn group(&self) -> &[F] {
        &self.group
    }

    /// The coset representatives `k_j` tagging the wires in the permutation.
    pub fn k(&self) -> &[F] {
        &self.k
    }

    /// The shift `g` of the quotient coset.
    pub fn coset_shift(&self) -> &F {
        &self.k[1]
    }

    /// The points `g * omega_m^i` of the quotient coset.
    pub fn coset_quotient(&self) -> &[F] {
        &self.coset_quotient
    }

    /// The first Lagrange polynomial of `H` on the quotient coset.
    pub fn l1_coset_evals(&self) -> &[F] {
        &self.l1_coset_evals
    }

    /// `1 / Z_H` on the quotient coset.
    pub fn z_h_inv_coset_evals(&self) -> &[F] {
        &self.z_h_inv_coset_evals
    }

    /// Interpolate values given over `H`.
    pub fn interpolate(&self, values: &[F]) -> FpPolynomial<F> {
        FpPolynomial::ifft_with_domain(&self.domain, values)
    }

    /// Evaluate a polynomial over `H`.
    pub fn evaluate(&self, poly: &FpPolynomial<F>) -> Vec<F> {
        poly.fft_with_domain(&self.domain)
    }

    /// Evaluate a polynomial of degree below `m` over the quotient coset.
    pub fn coset_evaluate(&self, poly: &FpPolynomial<F>) -> Vec<F> {
        poly.coset_fft_with_domain(&self.domain_m, self.coset_shift())
    }

    /// Interpolate values given over the quotient coset.
    pub fn coset_interpolate(&self, evals: &[F]) -> FpPolynomial<F> {
        FpPolynomial::coset_ifft_with_domain(&self.domain_m, evals, &self.coset_shift_inv)
    }

    /// `Z_H(x) = x^n - 1`.
    pub fn vanishing_eval(&self, x: &F) -> F {
        x.pow(&[self.size as u64]).sub(&F::one())
    }

    /// Evaluate the first `count` Lagrange polynomials of `H` at `x`.
    /// Fails with `DivisionByZero` when `x` lies in `H`.
    pub fn lagrange_evals(&self, x: &F, count: usize) -> Result<Vec<F>> {
        lagrange_evals(self.size, &self.root, x, count)
    }

    /// Evaluate the first Lagrange polynomial of `H` at `x`.
    pub fn first_lagrange_eval(&self, x: &F) -> Result<F> {
        Ok(self.lagrange_evals(x, 1)?[0])
    }
}

/// Evaluate the first `count` Lagrange polynomials of the size-`size`
/// domain generated by `root` at `x`, using
/// `L_i(x) = omega^i (x^n - 1) / (n (x - omega^i))`.
pub(crate) fn lagrange_evals<F: Scalar>(
    size: usize,
    root: &F,
    x: &F,
    count: usize,
) -> Result<Vec<F>> {
    if count > size {
        return Err(PlonkError::FuncParamsError);
    }
    let mut points = Vec::with_capacity(count);
    let mut cur = F::one();
    for _ in 0..count {
        points.push(cur);
        cur.mul_assign(root);
    }
    let n = F::from(size as u64);
    let mut denominators: Vec<F> = points.iter().map(|w| x.sub(w).mul(&n)).collect();
    batch_inversion(&mut denominators)?;
    let z_h = x.pow(&[size as u64]).sub(&F::one());
    Ok(denominators
        .iter()
        .zip(points.iter())
        .map(|(d, w)| w.mul(&z_h).mul(d))
        .collect())
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::domain::FieldDomains;
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use ember_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    #[test]
    fn test_domain_sizes() {
        let domains = FieldDomains::<F>::new(8, 4).unwrap();
        assert_eq!(domains.size(), 8);
        assert_eq!(domains.quotient_size(), 32);
        assert_eq!(domains.group().len(), 8);
        assert_eq!(domains.root().pow(&[8]), F::one());
        assert_ne!(domains.root().pow(&[4]), F::one());

        let domains = FieldDomains::<F>::new(8, 3).unwrap();
        assert_eq!(domains.quotient_factor(), 4);

        assert_eq!(
            FieldDomains::<F>::new(12, 4).unwrap_err(),
            PlonkError::CircuitSizeNotPowerOfTwo(12)
        );
        assert!(matches!(
            FieldDomains::<F>::new(1 << 27, 4),
            Err(PlonkError::GroupNotFound(_))
        ));
    }

    #[test]
    fn test_coset_precomputations() {
        let domains = FieldDomains::<F>::new(4, 4).unwrap();
        let n = domains.size();
        for (i, x) in domains.coset_quotient().iter().enumerate() {
            let z_h = x.pow(&[n as u64]).sub(&F::one());
            assert_eq!(z_h.mul(&domains.z_h_inv_coset_evals()[i]), F::one());
            assert_eq!(
                domains.l1_coset_evals()[i],
                domains.first_lagrange_eval(x).unwrap()
            );
        }
    }

    #[test]
    fn test_lagrange_evals() {
        let mut prng = test_rng();
        let domains = FieldDomains::<F>::new(8, 4).unwrap();
        let x = F::random(&mut prng);
        let evals = domains.lagrange_evals(&x, 8).unwrap();

        // L_i interpolates the unit vector e_i
        for (i, eval) in evals.iter().enumerate() {
            let mut unit = vec![F::zero(); 8];
            unit[i] = F::one();
            assert_eq!(*eval, domains.interpolate(&unit).eval(&x));
        }

        assert_eq!(
            domains.lagrange_evals(&domains.group()[3], 4),
            Err(PlonkError::DivisionByZero)
        );
        assert!(domains.lagrange_evals(&x, 9).is_err());
    }

    #[test]
    fn test_coset_round_trip() {
        let mut prng = test_rng();
        let domains = FieldDomains::<F>::new(16, 4).unwrap();
        let poly = FpPolynomial::<F>::random(&mut prng, 40);
        let evals = domains.coset_evaluate(&poly);
        assert_eq!(evals.len(), 64);
        assert_eq!(evals[5], poly.eval(&domains.coset_quotient()[5]));
        assert_eq!(domains.coset_interpolate(&evals), poly);
    }
}
