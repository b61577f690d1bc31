use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::lagrange_evals,
    helpers::{powers, PlonkChallenges},
    indexer::{parse_scalars, PlonkProof, PlonkVK, Selector},
    transcript::{
        Manifest, ProofElement, Transcript, CM_T, CM_W, CM_Z, EVALS, EVAL_T, PI_Z, PI_Z_OMEGA,
        PUBLIC_INPUTS, ROUND_EVALUATION, ROUND_GRAND_PRODUCT, ROUND_OPENING, ROUND_QUOTIENT,
        ROUND_WIRES,
    },
    widgets::{
        alpha_powers_per_widget, check_required_challenges, derive_quotient_eval,
        eval_public_input_poly, linearize, EvalContext, LinearizationTerms, ProofEvaluations,
    },
    NUM_WIRES,
};
use crate::poly_commit::pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes};
use ark_std::{end_timer, start_timer};
use ember_algebra::prelude::*;

/// Verify a proof against the verification key.
///
/// `pcs` only needs the opening parameters, see
/// [`PolyComScheme::shrink_to_verifier_only`]. Returns `Ok(false)` for any
/// proof that does not verify, including undecodable elements, and fails
/// only when the proof length does not match the manifest or the key is
/// incomplete.
pub fn verifier<PCS: PolyComScheme>(
    pcs: &PCS,
    vk: &PlonkVK<PCS>,
    proof: &PlonkProof,
) -> Result<bool> {
    let verifier_timer = start_timer!(|| "Plonk::Verifier");

    if !vk.size.is_power_of_two() {
        return Err(PlonkError::CircuitSizeNotPowerOfTwo(vk.size));
    }
    let manifest = Manifest::standard::<PCS>(vk.num_public_inputs);
    let elements = manifest.split_proof(proof.as_bytes())?;
    let mut selectors = Vec::with_capacity(Selector::ALL.len());
    for selector in Selector::ALL.iter() {
        selectors.push(vk.commitment(*selector)?);
    }
    if vk.k.len() != NUM_WIRES {
        return Err(PlonkError::FuncParamsError);
    }

    let accepted = verify_elements(pcs, vk, &manifest, &elements, &selectors).is_ok();
    end_timer!(verifier_timer);
    Ok(accepted)
}

/// The prover-supplied elements of a proof, decoded.
struct ParsedProof<C, F> {
    public_inputs: Vec<F>,
    cm_w: Vec<C>,
    cm_z: C,
    cm_t: Vec<C>,
    evals: ProofEvaluations<F>,
    proof_z: C,
    proof_z_omega: C,
}

fn find<'a>(elements: &[ProofElement<'a>], name: &str) -> Result<&'a [u8]> {
    elements
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.bytes)
        .ok_or(PlonkError::MalformedProof)
}

fn parse_proof<PCS: PolyComScheme>(
    elements: &[ProofElement],
) -> Result<ParsedProof<PCS::Commitment, PCS::Field>> {
    let commitment = |name: &str| -> Result<PCS::Commitment> {
        Ok(PCS::commitment_from_bytes(find(elements, name)?)?)
    };
    let scalar = |name: &str| -> Result<PCS::Field> {
        Ok(PCS::Field::from_bytes(find(elements, name)?)?)
    };

    let mut cm_w = Vec::with_capacity(NUM_WIRES);
    for name in CM_W.iter() {
        cm_w.push(commitment(name)?);
    }
    let mut cm_t = Vec::with_capacity(CM_T.len());
    for name in CM_T.iter() {
        cm_t.push(commitment(name)?);
    }
    let evals = ProofEvaluations {
        w: [scalar(EVALS[0])?, scalar(EVALS[1])?, scalar(EVALS[2])?],
        w_3_omega: scalar(EVALS[3])?,
        z_omega: scalar(EVALS[4])?,
        sigma: [scalar(EVALS[5])?, scalar(EVALS[6])?],
        r: scalar(EVALS[7])?,
    };

    Ok(ParsedProof {
        public_inputs: parse_scalars(find(elements, PUBLIC_INPUTS)?)?,
        cm_w,
        cm_z: commitment(CM_Z)?,
        cm_t,
        evals,
        proof_z: commitment(PI_Z)?,
        proof_z_omega: commitment(PI_Z_OMEGA)?,
    })
}

/// Replay the transcript on the proof elements and run the opening check.
fn verify_elements<PCS: PolyComScheme>(
    pcs: &PCS,
    vk: &PlonkVK<PCS>,
    manifest: &Manifest,
    elements: &[ProofElement],
    selectors: &[&PCS::Commitment],
) -> Result<()> {
    let n = vk.size;
    let proof = parse_proof::<PCS>(elements)?;

    let replay_timer = start_timer!(|| "Replay the transcript");
    let mut transcript = Transcript::new(manifest, n)?;
    let mut challenges = PlonkChallenges::new();
    transcript.absorb_circuit_size(n)?;

    transcript.absorb(ROUND_WIRES, PUBLIC_INPUTS, find(elements, PUBLIC_INPUTS)?)?;
    for (cm, name) in proof.cm_w.iter().zip(CM_W.iter()) {
        transcript.absorb(ROUND_WIRES, name, &cm.to_bytes())?;
    }
    match transcript.challenges::<PCS::Field>(ROUND_WIRES)?.as_slice() {
        [beta, gamma] => challenges.insert_beta_gamma(*beta, *gamma)?,
        _ => return Err(PlonkError::ChallengeUnavailable(ROUND_WIRES)),
    }

    transcript.absorb(ROUND_GRAND_PRODUCT, CM_Z, &proof.cm_z.to_bytes())?;
    challenges.insert_alpha(transcript.challenge(ROUND_GRAND_PRODUCT)?)?;

    for (cm, name) in proof.cm_t.iter().zip(CM_T.iter()) {
        transcript.absorb(ROUND_QUOTIENT, name, &cm.to_bytes())?;
    }
    challenges.insert_z(transcript.challenge(ROUND_QUOTIENT)?)?;

    for (value, name) in proof.evals.to_vec().iter().zip(EVALS.iter()) {
        transcript.absorb(ROUND_EVALUATION, name, &value.to_bytes())?;
    }
    check_required_challenges(&challenges)?;
    let (beta, gamma) = {
        let (beta, gamma) = challenges.get_beta_gamma()?;
        (*beta, *gamma)
    };
    let alpha_powers = alpha_powers_per_widget(challenges.get_alpha()?);
    let z = *challenges.get_z()?;
    let ctx = EvalContext {
        evals: &proof.evals,
        k: &vk.k,
        beta,
        gamma,
        z,
        l1_z: lagrange_evals(n, &vk.root, &z, 1)?[0],
        pi_z: eval_public_input_poly(n, &vk.root, &proof.public_inputs, &z)?,
    };
    let z_h_eval = z.pow(&[n as u64]).sub(&PCS::Field::one());
    let t_eval = derive_quotient_eval(&ctx, &alpha_powers, &z_h_eval)?;
    transcript.absorb(ROUND_EVALUATION, EVAL_T, &t_eval.to_bytes())?;
    challenges.insert_nu(&transcript.challenges::<PCS::Field>(ROUND_EVALUATION)?)?;

    transcript.absorb(ROUND_OPENING, PI_Z, &proof.proof_z.to_bytes())?;
    transcript.absorb(ROUND_OPENING, PI_Z_OMEGA, &proof.proof_z_omega.to_bytes())?;
    challenges.insert_u(transcript.challenge(ROUND_OPENING)?)?;
    let nu = challenges.get_nu()?;
    let u = challenges.get_u()?;
    end_timer!(replay_timer);

    let check_timer = start_timer!(|| "Linearization and opening check");
    let terms = LinearizationTerms {
        q: [
            selectors[Selector::Q1.index()],
            selectors[Selector::Q2.index()],
            selectors[Selector::Q3.index()],
            selectors[Selector::QM.index()],
            selectors[Selector::QC.index()],
        ],
        sigma_3: selectors[Selector::Sigma3.index()],
        z: &proof.cm_z,
    };
    let cm_r = linearize(&terms, &ctx, &alpha_powers)?;

    // T_1 + z^n T_2 + z^{2n} T_3, opened at z to t(z)
    let z_n_powers = powers(&z.pow(&[n as u64]), proof.cm_t.len());
    let mut cm_open_z = proof.cm_t[0].clone();
    for (cm, factor) in proof.cm_t.iter().zip(z_n_powers.iter()).skip(1) {
        cm_open_z.add_assign(&cm.mul(factor));
    }
    let mut eval_open_z = t_eval;
    let evals = &proof.evals;
    for (cm, value, nu_i) in [
        (&proof.cm_w[0], &evals.w[0], &nu[0]),
        (&proof.cm_w[1], &evals.w[1], &nu[1]),
        (&proof.cm_w[2], &evals.w[2], &nu[2]),
        (selectors[Selector::Sigma1.index()], &evals.sigma[0], &nu[5]),
        (selectors[Selector::Sigma2.index()], &evals.sigma[1], &nu[6]),
        (&cm_r, &evals.r, &nu[7]),
    ] {
        cm_open_z.add_assign(&cm.mul(nu_i));
        eval_open_z.add_assign(&value.mul(nu_i));
    }

    let mut cm_open_z_omega = proof.cm_z.mul(&nu[4]);
    cm_open_z_omega.add_assign(&proof.cm_w[2].mul(&nu[3]));
    let eval_open_z_omega = evals.z_omega.mul(&nu[4]).add(&evals.w_3_omega.mul(&nu[3]));

    let z_omega = z.mul(&vk.root);
    pcs.batch_verify_diff_points(
        &[cm_open_z, cm_open_z_omega],
        &[z, z_omega],
        &[eval_open_z, eval_open_z_omega],
        &[proof.proof_z, proof.proof_z_omega],
        u,
    )?;
    end_timer!(check_timer);
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        indexer::{indexer, CircuitDescription, PlonkProof, PlonkVK, Selector},
        permutation::PermutationMapping,
        prover::{prover, prover_with_checks},
        sample_circuits::mul_add_circuit,
        transcript::Manifest,
        verifier::verifier,
    };
    use crate::poly_commit::{kzg_poly_com::KZGCommitmentSchemeBN254, pcs::PolyComScheme};
    use ember_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;
    type PCS = KZGCommitmentSchemeBN254;

    fn prove_and_verify(size: usize, num_public_inputs: usize) {
        let mut prng = test_rng();
        let pcs = PCS::new(size + 2, &mut prng);
        let sample = mul_add_circuit::<F, _>(size, num_public_inputs, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let proof = prover(&pcs, &pk, &sample.witness).unwrap();

        let verifier_pcs = pcs.shrink_to_verifier_only();
        let vk = PlonkVK::<PCS>::from_bytes(&pk.get_verifier_key().to_bytes().unwrap()).unwrap();
        assert!(verifier(&verifier_pcs, &vk, &proof).unwrap());
    }

    #[test]
    fn test_plonk_small() {
        prove_and_verify(4, 0);
        prove_and_verify(4, 1);
    }

    #[test]
    fn test_plonk_large() {
        prove_and_verify(1024, 0);
        prove_and_verify(1024, 5);
    }

    #[test]
    fn test_add_chain() {
        let mut prng = test_rng();
        let n = 8;
        let pcs = PCS::new(n + 2, &mut prng);

        // row 0 exposes a_1, row r >= 1 computes a_{r+1} = a_r + b_r
        let mut variables = vec![0usize; 3 * n];
        let mut witness = vec![vec![F::zero(); n]; 3];
        let pi = F::random(&mut prng);
        variables[0] = 1;
        variables[n] = 2 * n + 1;
        variables[2 * n] = 2 * n + 2;
        witness[0][0] = pi;
        let mut acc = pi;
        for row in 1..n {
            let b = F::random(&mut prng);
            variables[row] = row;
            variables[n + row] = n + row;
            variables[2 * n + row] = row + 1;
            witness[0][row] = acc;
            witness[1][row] = b;
            acc = acc + b;
            witness[2][row] = acc;
        }

        let permutation = PermutationMapping::from_variables(n, &variables).unwrap();
        assert!(permutation.is_bijective());
        assert_ne!(permutation, PermutationMapping::identity(n));

        let mut q_2 = vec![F::one(); n];
        q_2[0] = F::zero();
        let q_3: Vec<F> = q_2.iter().map(|q| -*q).collect();
        let mut description = CircuitDescription::new(n, 1, permutation);
        description.set_selector("q_1", vec![F::one(); n]).unwrap();
        description.set_selector("q_2", q_2).unwrap();
        description.set_selector("q_3", q_3).unwrap();
        description.set_selector("q_m", vec![F::zero(); n]).unwrap();
        description.set_selector("q_c", vec![F::zero(); n]).unwrap();

        let pk = indexer(&description, &pcs).unwrap();
        let vk = pk.get_verifier_key_ref();
        let proof = prover(&pcs, &pk, &witness).unwrap();
        assert!(verifier(&pcs, vk, &proof).unwrap());
        assert_eq!(
            proof
                .public_inputs::<F>(&Manifest::standard::<PCS>(1))
                .unwrap(),
            vec![pi]
        );

        // row 3 still adds up, but its input no longer matches row 2's output
        let mut broken = witness.clone();
        broken[0][3].add_assign(&F::one());
        broken[2][3].add_assign(&F::one());
        assert_eq!(
            prover(&pcs, &pk, &broken).unwrap_err(),
            PlonkError::ProofErrorInvalidWitness
        );
        let forged = prover_with_checks(&pcs, &pk, &broken, false).unwrap();
        assert!(!verifier(&pcs, vk, &forged).unwrap());
    }

    #[test]
    fn test_tampered_proofs() {
        let mut prng = test_rng();
        let pcs = PCS::new(10, &mut prng);
        let sample = mul_add_circuit::<F, _>(8, 2, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let vk = pk.get_verifier_key_ref();
        let proof = prover(&pcs, &pk, &sample.witness).unwrap();
        assert!(verifier(&pcs, vk, &proof).unwrap());

        // flip one byte inside each element of each round
        let manifest = Manifest::standard::<PCS>(2);
        let mut offset = 0;
        for round in manifest.rounds() {
            for entry in round.elements.iter().filter(|e| !e.derived_by_verifier) {
                for position in [0, entry.num_bytes / 2, entry.num_bytes - 1] {
                    let mut bytes = proof.as_bytes().to_vec();
                    bytes[offset + position] ^= 0x01;
                    let tampered = PlonkProof::from_bytes(bytes);
                    assert!(
                        !verifier(&pcs, vk, &tampered).unwrap(),
                        "tampering {} at byte {}",
                        entry.name,
                        position
                    );
                }
                offset += entry.num_bytes;
            }
        }
        assert_eq!(offset, proof.as_bytes().len());
    }

    #[test]
    fn test_wrong_public_inputs() {
        let mut prng = test_rng();
        let pcs = PCS::new(10, &mut prng);
        let sample = mul_add_circuit::<F, _>(8, 1, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let proof = prover(&pcs, &pk, &sample.witness).unwrap();

        // swap in another public input, re-encoded canonically
        let mut bytes = proof.as_bytes().to_vec();
        bytes[..32].copy_from_slice(&F::from(7u32).to_bytes());
        let forged = PlonkProof::from_bytes(bytes);
        assert!(!verifier(&pcs, pk.get_verifier_key_ref(), &forged).unwrap());
    }

    #[test]
    fn test_mutated_witness_rejected() {
        let mut prng = test_rng();
        let pcs = PCS::new(6, &mut prng);
        let sample = mul_add_circuit::<F, _>(4, 0, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let vk = pk.get_verifier_key_ref();

        for wire in 0..3 {
            for row in 0..4 {
                let mut witness = sample.witness.clone();
                witness[wire][row].add_assign(&F::one());
                assert_eq!(
                    prover(&pcs, &pk, &witness).unwrap_err(),
                    PlonkError::ProofErrorInvalidWitness
                );
                let forged = prover_with_checks(&pcs, &pk, &witness, false).unwrap();
                assert!(
                    !verifier(&pcs, vk, &forged).unwrap(),
                    "wire {} row {}",
                    wire,
                    row
                );
            }
        }
    }

    #[test]
    fn test_malformed_proof() {
        let mut prng = test_rng();
        let pcs = PCS::new(6, &mut prng);
        let sample = mul_add_circuit::<F, _>(4, 0, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let vk = pk.get_verifier_key_ref();
        let proof = prover(&pcs, &pk, &sample.witness).unwrap();

        let mut longer = proof.as_bytes().to_vec();
        longer.push(0);
        assert_eq!(
            verifier(&pcs, vk, &PlonkProof::from_bytes(longer)),
            Err(PlonkError::MalformedProof)
        );
        let shorter = proof.as_bytes()[..proof.as_bytes().len() - 1].to_vec();
        assert_eq!(
            verifier(&pcs, vk, &PlonkProof::from_bytes(shorter)),
            Err(PlonkError::MalformedProof)
        );

        let mut incomplete = vk.clone();
        incomplete.commitments.remove(Selector::Sigma2.commitment_name());
        assert_eq!(
            verifier(&pcs, &incomplete, &proof),
            Err(PlonkError::MissingSelector("SIGMA_2".into()))
        );

        // a cached key with a degenerate size is refused before any replay
        for size in [0, 6] {
            let mut degenerate = vk.clone();
            degenerate.size = size;
            let cached = PlonkVK::<PCS>::from_bytes(&degenerate.to_bytes().unwrap()).unwrap();
            assert_eq!(
                verifier(&pcs, &cached, &proof),
                Err(PlonkError::CircuitSizeNotPowerOfTwo(size))
            );
        }
    }

    #[test]
    fn test_proof_for_other_circuit() {
        let mut prng = test_rng();
        let pcs = PCS::new(10, &mut prng);
        let sample = mul_add_circuit::<F, _>(8, 0, &mut prng).unwrap();
        let pk = indexer(&sample.description, &pcs).unwrap();
        let proof = prover(&pcs, &pk, &sample.witness).unwrap();

        let mut description = sample.description.clone();
        description.set_selector("q_c", vec![F::zero(); 8]).unwrap();
        let other_pk = indexer(&description, &pcs).unwrap();
        assert!(!verifier(&pcs, other_pk.get_verifier_key_ref(), &proof).unwrap());
    }
}
