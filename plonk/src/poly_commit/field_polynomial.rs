use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ember_algebra::prelude::*;

/// Field polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial, low-order first.
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use ember_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use ember_algebra::bn254::BN254Scalar;
    /// use ember_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BN254Scalar>::zero();
    /// let zero = BN254Scalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BN254Scalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use ember_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use ember_algebra::bn254::BN254Scalar;
    /// use ember_algebra::{Zero, One};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one + one;
    /// let five = two + two + one;
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&zero), one);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero());
            p.mul_scalar_assign(root);
            r.sub_assign(&p);
        }
        r
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        Self::from_coefs((0..=degree).map(|_| F::random(prng)).collect())
    }

    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(F::zero());
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate a polynomial on a point, by Horner's rule.
    pub fn eval(&self, point: &F) -> F {
        let mut result = F::zero();
        for coef in self.coefs.iter().rev() {
            result.mul_assign(point);
            result.add_assign(coef);
        }
        result
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    /// # Example:
    /// ```
    /// use ember_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use ember_algebra::bn254::BN254Scalar;
    /// use ember_algebra::{Zero, One};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one + one;
    /// let three = two + one;
    /// let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two]);
    /// let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
    /// poly1.sub_assign(&poly2);
    /// let expected = FpPolynomial::from_coefs(vec![zero, one, one, -one]);
    /// assert_eq!(poly1, expected);
    /// ```
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            self.coefs
                .extend(other.coefs[n..].iter().map(|other_coef| other_coef.neg()));
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    pub fn mul_var_assign(&mut self, scalar: &F) {
        let mut r = F::one();
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(&r);
            r.mul_assign(scalar);
        }
        self.trim_coefs();
    }

    /// Multiply polynomial variable by a scalar into a new polynomial.
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_var_assign(scalar);
        new
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    /// Fails when the divisor is the zero polynomial.
    /// # Example:
    /// ```
    /// use ember_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use ember_algebra::bn254::BN254Scalar;
    /// use ember_algebra::{Zero, One};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let poly = FpPolynomial::from_coefs(vec![one, one, one]);
    /// let divisor = FpPolynomial::from_coefs(vec![one, one]);
    /// let (q, r) = poly.div_rem(&divisor).unwrap();
    /// assert_eq!(q, FpPolynomial::from_coefs(vec![zero, one]));
    /// assert_eq!(r, FpPolynomial::from_coefs(vec![one]));
    /// ```
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), AlgebraError> {
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        let lead_inv = divisor.coefs[l - 1].inv()?;
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = lead_inv.mul(&rem[i + l - 1]);
            for (j, d) in divisor.coefs.iter().enumerate() {
                rem[i + j].sub_assign(&qi.mul(d));
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        Ok((Self::from_coefs(quo), Self::from_coefs(rem)))
    }

    /// Split the coefficients into `num_chunks` polynomials of `chunk_len`
    /// coefficients each, so that `self = \sum_i X^{i * chunk_len} chunk_i`.
    /// Returns `None` if the polynomial does not fit.
    pub fn split(&self, chunk_len: usize, num_chunks: usize) -> Option<Vec<Self>> {
        if self.coefs.len() > chunk_len * num_chunks && !self.is_zero() {
            return None;
        }
        let mut padded = self.coefs.clone();
        padded.resize(chunk_len * num_chunks, F::zero());
        Some(
            padded
                .chunks(chunk_len)
                .map(|chunk| Self::from_coefs(chunk.to_vec()))
                .collect(),
        )
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the radix-2 evaluation domain with exactly `num_points` points,
    /// or `None` if `num_points` is not a power of two supported by the field.
    pub fn evaluation_domain(num_points: usize) -> Option<Radix2EvaluationDomain<F::Field>> {
        if !num_points.is_power_of_two() {
            return None;
        }
        Radix2EvaluationDomain::<F::Field>::new(num_points)
    }

    /// Return the primitive `num_points`-th root of unity, if it exists.
    pub fn primitive_nth_root_of_unity(num_points: usize) -> Option<F> {
        Self::evaluation_domain(num_points).map(|domain| F::from_field(domain.group_gen()))
    }

    /// Compute the FFT of the polynomial over the domain.
    /// The polynomial must have at most `domain.size()` coefficients.
    pub fn fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>) -> Vec<F> {
        let coefs: Vec<F::Field> = self.coefs.iter().map(|c| c.get_field()).collect();
        domain.fft(&coefs).into_iter().map(F::from_field).collect()
    }

    /// Compute the FFT of the polynomial on the coset `k * H`.
    pub fn coset_fft_with_domain(
        &self,
        domain: &Radix2EvaluationDomain<F::Field>,
        k: &F,
    ) -> Vec<F> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Compute the polynomial given its evaluations over the domain.
    /// # Example:
    /// ```
    /// use ember_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use ember_algebra::bn254::BN254Scalar;
    /// let values: Vec<BN254Scalar> = (1u32..=4).map(BN254Scalar::from).collect();
    /// let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(4).unwrap();
    /// let poly = FpPolynomial::ifft_with_domain(&domain, &values);
    /// assert_eq!(poly.fft_with_domain(&domain), values);
    /// ```
    pub fn ifft_with_domain(domain: &Radix2EvaluationDomain<F::Field>, values: &[F]) -> Self {
        let values: Vec<F::Field> = values.iter().map(|v| v.get_field()).collect();
        Self::from_coefs(
            domain
                .ifft(&values)
                .into_iter()
                .map(F::from_field)
                .collect(),
        )
    }

    /// Compute the polynomial given its evaluations at a coset `k * H`,
    /// where `k_inv` is the inverse of `k`.
    pub fn coset_ifft_with_domain(
        domain: &Radix2EvaluationDomain<F::Field>,
        values: &[F],
        k_inv: &F,
    ) -> Self {
        Self::ifft_with_domain(domain, values).mul_var(k_inv)
    }
}

#[cfg(test)]
mod test {
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use ember_algebra::{bn254::BN254Scalar, prelude::*};
    use rand_chacha::ChaChaRng;

    #[test]
    fn from_zeroes() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let zeroes: Vec<BN254Scalar> = (0..10).map(|_| BN254Scalar::random(&mut prng)).collect();
        let poly = FpPolynomial::from_zeroes(&zeroes[..]);
        assert_eq!(poly.degree(), 10);
        for root in zeroes.iter() {
            assert_eq!(BN254Scalar::zero(), poly.eval(root));
        }
    }

    #[test]
    fn test_div_rem() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let a = FpPolynomial::<BN254Scalar>::random(&mut prng, 12);
        let b = FpPolynomial::<BN254Scalar>::random(&mut prng, 4);
        let (q, r) = a.div_rem(&b).unwrap();
        assert!(r.degree() < b.degree());
        // a = q * b + r, checked at a random point
        let x = BN254Scalar::random(&mut prng);
        assert_eq!(a.eval(&x), q.eval(&x) * b.eval(&x) + r.eval(&x));

        assert!(a.div_rem(&FpPolynomial::zero()).is_err());

        let (q, r) = b.div_rem(&a).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, b);
    }

    #[test]
    fn test_split() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let poly = FpPolynomial::<BN254Scalar>::random(&mut prng, 11);
        let chunks = poly.split(4, 3).unwrap();
        assert_eq!(chunks.len(), 3);
        let x = BN254Scalar::random(&mut prng);
        let x4 = x.pow(&[4]);
        let mut combined = BN254Scalar::zero();
        for chunk in chunks.iter().rev() {
            assert!(chunk.degree() < 4);
            combined = combined * x4 + chunk.eval(&x);
        }
        assert_eq!(combined, poly.eval(&x));
        assert!(poly.split(4, 2).is_none());
    }

    fn check_fft<F: Domain>(poly: &FpPolynomial<F>, root: &F, fft: &[F]) {
        let mut omega = F::one();
        for fft_elem in fft {
            assert_eq!(*fft_elem, poly.eval(&omega));
            omega.mul_assign(root);
        }
    }

    #[test]
    fn test_fft() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let one = BN254Scalar::one();
        let two = one.add(&one);
        let three = two.add(&one);
        let four = two.add(&two);

        for size in [1usize, 2, 4, 16, 32] {
            let polynomial = FpPolynomial::<BN254Scalar>::random(&mut prng, size - 1);
            let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(size).unwrap();
            let root = FpPolynomial::<BN254Scalar>::primitive_nth_root_of_unity(size).unwrap();
            let fft = polynomial.fft_with_domain(&domain);
            assert_eq!(fft.len(), size);
            check_fft(&polynomial, &root, &fft);
            assert_eq!(FpPolynomial::ifft_with_domain(&domain, &fft), polynomial);
        }

        // smaller polynomials are zero padded
        let polynomial = FpPolynomial::from_coefs(vec![one, two, three, four]);
        let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(8).unwrap();
        let root = FpPolynomial::<BN254Scalar>::primitive_nth_root_of_unity(8).unwrap();
        check_fft(&polynomial, &root, &polynomial.fft_with_domain(&domain));

        assert!(FpPolynomial::<BN254Scalar>::evaluation_domain(3).is_none());
        assert!(FpPolynomial::<BN254Scalar>::evaluation_domain(1 << 29).is_none());
    }

    #[test]
    fn test_coset_fft() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let polynomial = FpPolynomial::<BN254Scalar>::random(&mut prng, 15);
        let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(16).unwrap();
        let root = FpPolynomial::<BN254Scalar>::primitive_nth_root_of_unity(16).unwrap();
        let k = BN254Scalar::multiplicative_generator();

        let evals = polynomial.coset_fft_with_domain(&domain, &k);
        let mut point = k;
        for eval in evals.iter() {
            assert_eq!(*eval, polynomial.eval(&point));
            point.mul_assign(&root);
        }
        let back = FpPolynomial::coset_ifft_with_domain(&domain, &evals, &k.inv().unwrap());
        assert_eq!(back, polynomial);
    }
}
