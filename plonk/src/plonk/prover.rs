use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::FieldDomains,
    helpers::{powers, PlonkChallenges},
    indexer::{PlonkPK, PlonkProof, Selector},
    permutation::compute_grand_product,
    transcript::{
        Manifest, Transcript, CM_T, CM_W, CM_Z, EVALS, EVAL_T, PI_Z, PI_Z_OMEGA, PUBLIC_INPUTS,
        ROUND_EVALUATION, ROUND_GRAND_PRODUCT, ROUND_OPENING, ROUND_QUOTIENT, ROUND_WIRES,
    },
    widgets::{
        alpha_powers_per_widget, check_required_challenges, derive_quotient_eval,
        eval_public_input_poly, linearize, public_input_values, EvalContext, LinearizationTerms,
        ProofEvaluations, QuotientInputs, WIDGETS,
    },
    NUM_WIRES,
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{PolyComScheme, ToBytes},
};
use ark_std::{end_timer, start_timer};
use ember_algebra::prelude::*;

/// Prove that `witness` satisfies the circuit of `pk`.
///
/// `witness` holds the values of the three wires over the `n` rows; its
/// first `l` values on `w_1` are the public inputs. The prover is
/// deterministic and fails with `ProofErrorInvalidWitness` rather than
/// emitting a proof for a witness that does not satisfy the circuit.
///
/// # Example
/// ```
/// use ember_plonk::plonk::{
///     indexer::indexer, prover::prover, sample_circuits::mul_add_circuit, verifier::verifier,
/// };
/// use ember_plonk::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};
/// use ember_algebra::{bn254::BN254Scalar, prelude::*};
///
/// let mut prng = test_rng();
/// let pcs = KZGCommitmentSchemeBN254::new(10, &mut prng);
/// let sample = mul_add_circuit::<BN254Scalar, _>(4, 0, &mut prng).unwrap();
/// let pk = indexer(&sample.description, &pcs).unwrap();
/// let proof = prover(&pcs, &pk, &sample.witness).unwrap();
///
/// let verifier_pcs = pcs.shrink_to_verifier_only();
/// assert!(verifier(&verifier_pcs, pk.get_verifier_key_ref(), &proof).unwrap());
/// ```
pub fn prover<PCS: PolyComScheme>(
    pcs: &PCS,
    pk: &PlonkPK<PCS>,
    witness: &[Vec<PCS::Field>],
) -> Result<PlonkProof> {
    prover_with_checks(pcs, pk, witness, true)
}

/// The prover rounds. With `check_witness` off, an unsatisfying witness
/// still yields a proof, its quotient cut down to the committed chunks.
pub(crate) fn prover_with_checks<PCS: PolyComScheme>(
    pcs: &PCS,
    pk: &PlonkPK<PCS>,
    witness: &[Vec<PCS::Field>],
    check_witness: bool,
) -> Result<PlonkProof> {
    let n = pk.size();
    let num_public_inputs = pk.num_public_inputs;
    if witness.len() != NUM_WIRES || witness.iter().any(|w| w.len() != n) {
        return Err(PlonkError::FuncParamsError);
    }

    let prover_timer = start_timer!(|| format!("Plonk::Prover for a circuit of size {}", n));

    let domains = &pk.domains;
    let manifest = Manifest::standard::<PCS>(num_public_inputs);
    let mut transcript = Transcript::new(&manifest, n)?;
    let mut challenges = PlonkChallenges::new();

    transcript.absorb_circuit_size(n)?;

    // 1. commit the witness polynomials
    let w_timer = start_timer!(|| "Round 1: witness polynomials");
    let public_inputs = &witness[0][..num_public_inputs];
    let pi_bytes: Vec<u8> = public_inputs.iter().flat_map(|x| x.to_bytes()).collect();
    transcript.absorb(ROUND_WIRES, PUBLIC_INPUTS, &pi_bytes)?;

    let mut w_polys = Vec::with_capacity(NUM_WIRES);
    for (values, name) in witness.iter().zip(CM_W.iter()) {
        let w_poly = domains.interpolate(values);
        let cm_w = pcs.commit(&w_poly)?;
        transcript.absorb(ROUND_WIRES, name, &cm_w.to_bytes())?;
        w_polys.push(w_poly);
    }
    match transcript.challenges::<PCS::Field>(ROUND_WIRES)?.as_slice() {
        [beta, gamma] => challenges.insert_beta_gamma(*beta, *gamma)?,
        _ => return Err(PlonkError::ChallengeUnavailable(ROUND_WIRES)),
    }
    end_timer!(w_timer);

    // 2. build and commit the grand product
    let z_timer = start_timer!(|| "Round 2: grand product");
    let (beta, gamma) = {
        let (beta, gamma) = challenges.get_beta_gamma()?;
        (*beta, *gamma)
    };
    let wires: Vec<&[PCS::Field]> = witness.iter().map(|w| w.as_slice()).collect();
    let sigmas: Vec<&[PCS::Field]> = Selector::SIGMAS
        .iter()
        .map(|s| pk.selector(*s).lagrange.as_slice())
        .collect();
    let (z_evals, closing) =
        compute_grand_product(domains.group(), domains.k(), &wires, &sigmas, &beta, &gamma)?;
    if check_witness && closing != PCS::Field::one() {
        return Err(PlonkError::ProofErrorInvalidWitness);
    }
    let z_poly = domains.interpolate(&z_evals);
    let cm_z = pcs.commit(&z_poly)?;
    transcript.absorb(ROUND_GRAND_PRODUCT, CM_Z, &cm_z.to_bytes())?;
    challenges.insert_alpha(transcript.challenge(ROUND_GRAND_PRODUCT)?)?;
    end_timer!(z_timer);

    // 3. build, split and commit the quotient
    let t_timer = start_timer!(|| "Round 3: quotient polynomial");
    check_required_challenges(&challenges)?;
    let alpha_powers = alpha_powers_per_widget(challenges.get_alpha()?);
    let t_poly = quotient_polynomial::<PCS>(
        domains,
        pk,
        &w_polys,
        &z_poly,
        public_inputs,
        &challenges,
        &alpha_powers,
    )?;
    let max_len = CM_T.len() * n;
    let t_poly = if t_poly.get_coefs_ref().len() <= max_len {
        t_poly
    } else if check_witness {
        return Err(PlonkError::ProofErrorInvalidWitness);
    } else {
        FpPolynomial::from_coefs(t_poly.get_coefs_ref()[..max_len].to_vec())
    };
    let t_chunks = t_poly
        .split(n, CM_T.len())
        .ok_or(PlonkError::ProofErrorInvalidWitness)?;
    for (chunk, name) in t_chunks.iter().zip(CM_T.iter()) {
        let cm_t = pcs.commit(chunk)?;
        transcript.absorb(ROUND_QUOTIENT, name, &cm_t.to_bytes())?;
    }
    challenges.insert_z(transcript.challenge(ROUND_QUOTIENT)?)?;
    end_timer!(t_timer);

    // 4. evaluate at z and z * omega
    let eval_timer = start_timer!(|| "Round 4: evaluations");
    let z = *challenges.get_z()?;
    let z_omega = z.mul(domains.root());
    let sigma_1 = &pk.selector(Selector::Sigma1).coefs;
    let sigma_2 = &pk.selector(Selector::Sigma2).coefs;
    let mut evals = ProofEvaluations {
        w: [w_polys[0].eval(&z), w_polys[1].eval(&z), w_polys[2].eval(&z)],
        w_3_omega: w_polys[2].eval(&z_omega),
        z_omega: z_poly.eval(&z_omega),
        sigma: [sigma_1.eval(&z), sigma_2.eval(&z)],
        r: PCS::Field::zero(),
    };
    let l1_z = domains.first_lagrange_eval(&z)?;
    let pi_z = eval_public_input_poly(n, domains.root(), public_inputs, &z)?;

    let r_poly = {
        let ctx = EvalContext {
            evals: &evals,
            k: domains.k(),
            beta,
            gamma,
            z,
            l1_z,
            pi_z,
        };
        let terms = LinearizationTerms {
            q: Selector::GATE.map(|s| &pk.selector(s).coefs),
            sigma_3: &pk.selector(Selector::Sigma3).coefs,
            z: &z_poly,
        };
        linearize(&terms, &ctx, &alpha_powers)?
    };
    evals.r = r_poly.eval(&z);

    for (value, name) in evals.to_vec().iter().zip(EVALS.iter()) {
        transcript.absorb(ROUND_EVALUATION, name, &value.to_bytes())?;
    }
    let ctx = EvalContext {
        evals: &evals,
        k: domains.k(),
        beta,
        gamma,
        z,
        l1_z,
        pi_z,
    };
    let t_eval = derive_quotient_eval(&ctx, &alpha_powers, &domains.vanishing_eval(&z))?;
    transcript.absorb(ROUND_EVALUATION, EVAL_T, &t_eval.to_bytes())?;
    challenges.insert_nu(&transcript.challenges::<PCS::Field>(ROUND_EVALUATION)?)?;
    end_timer!(eval_timer);

    // 5. open the batched polynomials
    let open_timer = start_timer!(|| "Round 5: opening proofs");
    let nu = challenges.get_nu()?;
    let z_n_powers = powers(&z.pow(&[n as u64]), t_chunks.len());
    let mut poly_z = FpPolynomial::zero();
    for (chunk, factor) in t_chunks.iter().zip(z_n_powers.iter()) {
        poly_z.add_assign(&chunk.mul_scalar(factor));
    }
    for (poly, nu_i) in [
        (&w_polys[0], &nu[0]),
        (&w_polys[1], &nu[1]),
        (&w_polys[2], &nu[2]),
        (sigma_1, &nu[5]),
        (sigma_2, &nu[6]),
        (&r_poly, &nu[7]),
    ] {
        poly_z.add_assign(&poly.mul_scalar(nu_i));
    }
    let mut poly_z_omega = z_poly.mul_scalar(&nu[4]);
    poly_z_omega.add_assign(&w_polys[2].mul_scalar(&nu[3]));

    let proof_z = pcs.prove(&poly_z, &z, n - 1)?;
    transcript.absorb(ROUND_OPENING, PI_Z, &proof_z.to_bytes())?;
    let proof_z_omega = pcs.prove(&poly_z_omega, &z_omega, n - 1)?;
    transcript.absorb(ROUND_OPENING, PI_Z_OMEGA, &proof_z_omega.to_bytes())?;
    end_timer!(open_timer);

    end_timer!(prover_timer);
    Ok(PlonkProof::from_bytes(transcript.proof_bytes()?))
}

/// Combine the widget identities over the quotient coset, divide by the
/// vanishing polynomial and interpolate.
fn quotient_polynomial<PCS: PolyComScheme>(
    domains: &FieldDomains<PCS::Field>,
    pk: &PlonkPK<PCS>,
    w_polys: &[FpPolynomial<PCS::Field>],
    z_poly: &FpPolynomial<PCS::Field>,
    public_inputs: &[PCS::Field],
    challenges: &PlonkChallenges<PCS::Field>,
    alpha_powers: &[Vec<PCS::Field>],
) -> Result<FpPolynomial<PCS::Field>> {
    let (beta, gamma) = challenges.get_beta_gamma()?;

    let w_coset: Vec<Vec<PCS::Field>> =
        w_polys.iter().map(|p| domains.coset_evaluate(p)).collect();
    let z_coset = domains.coset_evaluate(z_poly);
    let pi_poly = domains.interpolate(&public_input_values(public_inputs, domains.size()));
    let pi_coset = domains.coset_evaluate(&pi_poly);

    let inputs = QuotientInputs {
        domains,
        w: [
            w_coset[0].as_slice(),
            w_coset[1].as_slice(),
            w_coset[2].as_slice(),
        ],
        z: &z_coset,
        q: Selector::GATE.map(|s| pk.selector(s).coset_evals.as_slice()),
        sigma: Selector::SIGMAS.map(|s| pk.selector(s).coset_evals.as_slice()),
        pi: &pi_coset,
        beta: *beta,
        gamma: *gamma,
    };

    let mut numerator = vec![PCS::Field::zero(); domains.quotient_size()];
    for (widget, alphas) in WIDGETS.iter().zip(alpha_powers.iter()) {
        widget.quotient_contribution(&inputs, alphas, &mut numerator)?;
    }
    for (value, z_h_inv) in numerator.iter_mut().zip(domains.z_h_inv_coset_evals()) {
        value.mul_assign(z_h_inv);
    }
    Ok(domains.coset_interpolate(&numerator))
}
