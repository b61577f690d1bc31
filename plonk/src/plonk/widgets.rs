use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::{lagrange_evals, FieldDomains},
    helpers::PlonkChallenges,
    NUM_WIRES,
};
use crate::poly_commit::pcs::HomomorphicPolyComElem;
use ember_algebra::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The relation contributors, in registration order. The order fixes
/// which powers of `alpha` each widget receives, on both sides.
pub(crate) const WIDGETS: [Widget; 2] = [Widget::Permutation, Widget::Arithmetic];

/// A relation the quotient polynomial enforces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Widget {
    /// Copy constraints: the grand product recurrence and `Z(1) = 1`.
    Permutation,
    /// The gate `q_m w_1 w_2 + q_1 w_1 + q_2 w_2 + q_3 w_3 + q_c + PI = 0`.
    Arithmetic,
}

/// Fail unless every challenge some widget reads has been drawn.
pub(crate) fn check_required_challenges<F: Scalar>(
    challenges: &PlonkChallenges<F>,
) -> Result<()> {
    for widget in WIDGETS.iter() {
        for name in widget.required_challenges() {
            challenges.get_named(name)?;
        }
    }
    Ok(())
}

/// The coset evaluations the prover feeds to the widgets.
pub(crate) struct QuotientInputs<'a, F: Domain> {
    pub(crate) domains: &'a FieldDomains<F>,
    pub(crate) w: [&'a [F]; NUM_WIRES],
    pub(crate) z: &'a [F],
    /// `q_1, q_2, q_3, q_m, q_c`.
    pub(crate) q: [&'a [F]; 5],
    pub(crate) sigma: [&'a [F]; NUM_WIRES],
    pub(crate) pi: &'a [F],
    pub(crate) beta: F,
    pub(crate) gamma: F,
}

/// The claimed evaluations of a proof at `z` and `z * omega`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProofEvaluations<F> {
    pub(crate) w: [F; NUM_WIRES],
    pub(crate) w_3_omega: F,
    pub(crate) z_omega: F,
    pub(crate) sigma: [F; NUM_WIRES - 1],
    pub(crate) r: F,
}

impl<F: Copy> ProofEvaluations<F> {
    /// The evaluations in transcript order.
    pub(crate) fn to_vec(&self) -> Vec<F> {
        vec![
            self.w[0],
            self.w[1],
            self.w[2],
            self.w_3_omega,
            self.z_omega,
            self.sigma[0],
            self.sigma[1],
            self.r,
        ]
    }
}

/// The scalars of the evaluation point that both sides compute.
pub(crate) struct EvalContext<'a, F> {
    pub(crate) evals: &'a ProofEvaluations<F>,
    pub(crate) k: &'a [F],
    pub(crate) beta: F,
    pub(crate) gamma: F,
    pub(crate) z: F,
    pub(crate) l1_z: F,
    pub(crate) pi_z: F,
}

/// The elements the linearization combines: polynomials on the prover
/// side, commitments on the verifier side.
pub(crate) struct LinearizationTerms<'a, E> {
    /// `q_1, q_2, q_3, q_m, q_c`.
    pub(crate) q: [&'a E; 5],
    pub(crate) sigma_3: &'a E,
    pub(crate) z: &'a E,
}

impl Widget {
    /// The number of degree-`<n` factors in the largest product of the widget.
    pub(crate) fn max_degree(&self) -> usize {
        match self {
            Widget::Permutation => NUM_WIRES + 1,
            Widget::Arithmetic => 3,
        }
    }

    /// The number of independent identities, one power of `alpha` each.
    pub(crate) fn num_alpha_powers(&self) -> usize {
        match self {
            Widget::Permutation => 2,
            Widget::Arithmetic => 1,
        }
    }

    /// The challenges the widget reads besides `alpha`.
    pub(crate) fn required_challenges(&self) -> &'static [&'static str] {
        match self {
            Widget::Permutation => &["beta", "gamma"],
            Widget::Arithmetic => &[],
        }
    }

    /// Add the widget's identities, weighted by `alphas`, to the quotient
    /// numerator given over the quotient coset.
    pub(crate) fn quotient_contribution<F: Domain>(
        &self,
        inputs: &QuotientInputs<F>,
        alphas: &[F],
        out: &mut [F],
    ) -> Result<()> {
        if alphas.len() != self.num_alpha_powers() {
            return Err(PlonkError::FuncParamsError);
        }
        let m = inputs.domains.quotient_size();
        let factor = inputs.domains.quotient_factor();
        let points = inputs.domains.coset_quotient();
        let l1 = inputs.domains.l1_coset_evals();
        let k = inputs.domains.k();
        let w = &inputs.w;
        let (beta, gamma) = (&inputs.beta, &inputs.gamma);

        let term = |i: usize| -> F {
            match self {
                Widget::Permutation => {
                    let z = &inputs.z[i];
                    // Z(omega X) sits `factor` points further on the coset
                    let z_next = &inputs.z[(i + factor) % m];
                    let beta_x = beta.mul(&points[i]);
                    let mut num = *z;
                    let mut den = *z_next;
                    for j in 0..NUM_WIRES {
                        num.mul_assign(&w[j][i].add(&k[j].mul(&beta_x)).add(gamma));
                        den.mul_assign(&w[j][i].add(&beta.mul(&inputs.sigma[j][i])).add(gamma));
                    }
                    let recurrence = num.sub(&den).mul(&alphas[0]);
                    let boundary = l1[i].mul(&z.sub(&F::one())).mul(&alphas[1]);
                    recurrence.add(&boundary)
                }
                Widget::Arithmetic => {
                    let q = &inputs.q;
                    let (a, b, c) = (&w[0][i], &w[1][i], &w[2][i]);
                    let gate = q[3][i]
                        .mul(a)
                        .mul(b)
                        .add(&q[0][i].mul(a))
                        .add(&q[1][i].mul(b))
                        .add(&q[2][i].mul(c))
                        .add(&q[4][i])
                        .add(&inputs.pi[i]);
                    gate.mul(&alphas[0])
                }
            }
        };

        #[cfg(feature = "parallel")]
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, o)| o.add_assign(&term(i)));
        #[cfg(not(feature = "parallel"))]
        out.iter_mut()
            .enumerate()
            .for_each(|(i, o)| o.add_assign(&term(i)));
        Ok(())
    }

    /// The part of the linearization `r(X)` that the widget contributes.
    pub(crate) fn linearization_contribution<F, E>(
        &self,
        terms: &LinearizationTerms<E>,
        ctx: &EvalContext<F>,
        alphas: &[F],
    ) -> Result<E>
    where
        F: Scalar,
        E: HomomorphicPolyComElem<Scalar = F>,
    {
        if alphas.len() != self.num_alpha_powers() {
            return Err(PlonkError::FuncParamsError);
        }
        let e = ctx.evals;
        let (beta, gamma) = (&ctx.beta, &ctx.gamma);
        match self {
            Widget::Permutation => {
                // (a0 prod_j (w_j + beta k_j z + gamma) + a1 L1(z)) Z(X)
                let beta_z = beta.mul(&ctx.z);
                let mut z_scalar = alphas[0];
                for j in 0..NUM_WIRES {
                    z_scalar.mul_assign(&e.w[j].add(&ctx.k[j].mul(&beta_z)).add(gamma));
                }
                z_scalar.add_assign(&alphas[1].mul(&ctx.l1_z));

                // - a0 (a + beta s1 + gamma)(b + beta s2 + gamma) beta z_omega sigma_3(X)
                let mut sigma_scalar = alphas[0].mul(beta).mul(&e.z_omega);
                for j in 0..NUM_WIRES - 1 {
                    sigma_scalar.mul_assign(&e.w[j].add(&beta.mul(&e.sigma[j])).add(gamma));
                }

                let mut result = terms.z.mul(&z_scalar);
                result.sub_assign(&terms.sigma_3.mul(&sigma_scalar));
                Ok(result)
            }
            Widget::Arithmetic => {
                let (a, b, c) = (&e.w[0], &e.w[1], &e.w[2]);
                let alpha = &alphas[0];
                let mut result = terms.q[3].mul(&a.mul(b).mul(alpha));
                result.add_assign(&terms.q[0].mul(&a.mul(alpha)));
                result.add_assign(&terms.q[1].mul(&b.mul(alpha)));
                result.add_assign(&terms.q[2].mul(&c.mul(alpha)));
                result.add_assign(&terms.q[4].mul(alpha));
                Ok(result)
            }
        }
    }

    /// The constant part of the widget's identities at `z`, the part
    /// that `r(X)` does not carry.
    pub(crate) fn evaluation_constant<F: Scalar>(
        &self,
        ctx: &EvalContext<F>,
        alphas: &[F],
    ) -> Result<F> {
        if alphas.len() != self.num_alpha_powers() {
            return Err(PlonkError::FuncParamsError);
        }
        let e = ctx.evals;
        let (beta, gamma) = (&ctx.beta, &ctx.gamma);
        match self {
            Widget::Permutation => {
                let mut product = alphas[0].mul(&e.z_omega);
                for j in 0..NUM_WIRES - 1 {
                    product.mul_assign(&e.w[j].add(&beta.mul(&e.sigma[j])).add(gamma));
                }
                product.mul_assign(&e.w[NUM_WIRES - 1].add(gamma));
                Ok(product.add(&alphas[1].mul(&ctx.l1_z)).neg())
            }
            Widget::Arithmetic => Ok(alphas[0].mul(&ctx.pi_z)),
        }
    }
}

/// Sum the linearization contributions of all widgets.
pub(crate) fn linearize<F, E>(
    terms: &LinearizationTerms<E>,
    ctx: &EvalContext<F>,
    alpha_powers: &[Vec<F>],
) -> Result<E>
where
    F: Scalar,
    E: HomomorphicPolyComElem<Scalar = F>,
{
    let mut result: Option<E> = None;
    for (widget, alphas) in WIDGETS.iter().zip(alpha_powers.iter()) {
        let contribution = widget.linearization_contribution(terms, ctx, alphas)?;
        result = Some(match result {
            Some(mut acc) => {
                acc.add_assign(&contribution);
                acc
            }
            None => contribution,
        });
    }
    result.ok_or(PlonkError::FuncParamsError)
}

/// The size multiplier of the quotient domain for the registered widgets.
pub(crate) fn max_widget_degree() -> usize {
    WIDGETS.iter().map(|w| w.max_degree()).max().unwrap_or(1)
}

/// Split `[1, alpha, alpha^2, ...]` into the powers of each widget.
pub(crate) fn alpha_powers_per_widget<F: Scalar>(alpha: &F) -> Vec<Vec<F>> {
    let mut cur = F::one();
    WIDGETS
        .iter()
        .map(|w| {
            (0..w.num_alpha_powers())
                .map(|_| {
                    let p = cur;
                    cur.mul_assign(alpha);
                    p
                })
                .collect()
        })
        .collect()
}

/// The Lagrange values over `H` of `PI(X) = - sum_i pi_i L_i(X)`.
pub(crate) fn public_input_values<F: Scalar>(public_inputs: &[F], size: usize) -> Vec<F> {
    let mut values = vec![F::zero(); size];
    for (v, pi) in values.iter_mut().zip(public_inputs.iter()) {
        *v = pi.neg();
    }
    values
}

/// Evaluate `PI(X)` at `z`, for the size-`size` domain generated by `root`.
pub(crate) fn eval_public_input_poly<F: Scalar>(
    size: usize,
    root: &F,
    public_inputs: &[F],
    z: &F,
) -> Result<F> {
    if public_inputs.is_empty() {
        return Ok(F::zero());
    }
    let lagrange = lagrange_evals(size, root, z, public_inputs.len())?;
    Ok(public_inputs
        .iter()
        .zip(lagrange.iter())
        .fold(F::zero(), |acc, (pi, l)| acc.sub(&pi.mul(l))))
}

/// The quotient evaluation `t(z) = (r(z) + sum of the widget constants) / Z_H(z)`.
/// Both parties derive it this way, so it is never sent.
pub(crate) fn derive_quotient_eval<F: Scalar>(
    ctx: &EvalContext<F>,
    alpha_powers: &[Vec<F>],
    z_h_eval: &F,
) -> Result<F> {
    let mut numerator = ctx.evals.r;
    for (widget, alphas) in WIDGETS.iter().zip(alpha_powers.iter()) {
        numerator.add_assign(&widget.evaluation_constant(ctx, alphas)?);
    }
    let z_h_inv = z_h_eval.inv().map_err(|_| PlonkError::DivisionByZero)?;
    Ok(numerator.mul(&z_h_inv))
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        domain::FieldDomains,
        helpers::PlonkChallenges,
        widgets::{
            alpha_powers_per_widget, check_required_challenges, eval_public_input_poly,
            max_widget_degree,
            public_input_values, EvalContext, LinearizationTerms, ProofEvaluations, Widget,
            WIDGETS,
        },
    };
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use ember_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    #[test]
    fn test_widget_registry() {
        assert_eq!(max_widget_degree(), 4);
        assert_eq!(WIDGETS[0], Widget::Permutation);
        assert_eq!(Widget::Permutation.required_challenges(), &["beta", "gamma"]);
        assert!(Widget::Arithmetic.required_challenges().is_empty());

        let mut challenges = PlonkChallenges::<F>::new();
        assert_eq!(
            check_required_challenges(&challenges).unwrap_err(),
            PlonkError::ChallengeUnavailable(0)
        );
        challenges.insert_beta_gamma(F::one(), F::one()).unwrap();
        assert!(check_required_challenges(&challenges).is_ok());

        let alpha = F::from(3u32);
        let powers = alpha_powers_per_widget(&alpha);
        assert_eq!(powers, vec![vec![F::one(), alpha], vec![F::from(9u32)]]);
    }

    #[test]
    fn test_public_input_poly() {
        let mut prng = test_rng();
        let domains = FieldDomains::<F>::new(8, 4).unwrap();
        let pi = vec![F::random(&mut prng), F::random(&mut prng)];
        let values = public_input_values(&pi, 8);
        assert_eq!(values[1], pi[1].neg());
        assert_eq!(values[2], F::zero());

        let poly = domains.interpolate(&values);
        let z = F::random(&mut prng);
        assert_eq!(
            eval_public_input_poly(8, domains.root(), &pi, &z).unwrap(),
            poly.eval(&z)
        );
        assert_eq!(
            eval_public_input_poly(8, domains.root(), &[], &z).unwrap(),
            F::zero()
        );
    }

    #[test]
    fn test_arithmetic_linearization_matches_evaluation() {
        let mut prng = test_rng();
        let q: Vec<FpPolynomial<F>> = (0..5).map(|_| FpPolynomial::random(&mut prng, 7)).collect();
        let sigma_3 = FpPolynomial::random(&mut prng, 7);
        let z_poly = FpPolynomial::random(&mut prng, 7);
        let terms = LinearizationTerms {
            q: [&q[0], &q[1], &q[2], &q[3], &q[4]],
            sigma_3: &sigma_3,
            z: &z_poly,
        };
        let evals = ProofEvaluations {
            w: [F::from(2u32), F::from(3u32), F::from(5u32)],
            w_3_omega: F::zero(),
            z_omega: F::from(7u32),
            sigma: [F::from(11u32), F::from(13u32)],
            r: F::zero(),
        };
        let x = F::random(&mut prng);
        let ctx = EvalContext {
            evals: &evals,
            k: &[F::one(), F::from(5u32), F::from(25u32)],
            beta: F::from(17u32),
            gamma: F::from(19u32),
            z: x,
            l1_z: F::from(23u32),
            pi_z: F::from(29u32),
        };
        let alpha = [F::from(31u32)];
        let r = Widget::Arithmetic
            .linearization_contribution(&terms, &ctx, &alpha)
            .unwrap();
        let (a, b, c) = (evals.w[0], evals.w[1], evals.w[2]);
        let expected = (q[3].eval(&x) * a * b
            + q[0].eval(&x) * a
            + q[1].eval(&x) * b
            + q[2].eval(&x) * c
            + q[4].eval(&x))
            * alpha[0];
        assert_eq!(r.eval(&x), expected);
        assert_eq!(
            Widget::Arithmetic.evaluation_constant(&ctx, &alpha).unwrap(),
            alpha[0] * F::from(29u32)
        );
        assert!(Widget::Permutation
            .linearization_contribution(&terms, &ctx, &alpha)
            .is_err());
    }
}
