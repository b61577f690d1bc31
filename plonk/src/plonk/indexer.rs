use crate::errors::{PlonkError, Result};
use crate::plonk::{
    domain::FieldDomains,
    permutation::PermutationMapping,
    transcript::{Manifest, PUBLIC_INPUTS},
    widgets::max_widget_degree,
    NUM_WIRES,
};
use crate::poly_commit::{
    errors::PolyComSchemeError,
    field_polynomial::FpPolynomial,
    pcs::PolyComScheme,
};
use ark_std::{collections::BTreeMap, end_timer, start_timer};
use ember_algebra::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

/// The preprocessed polynomials of a circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// The selector of `w_1`.
    Q1,
    /// The selector of `w_2`.
    Q2,
    /// The selector of `w_3`.
    Q3,
    /// The selector of `w_1 * w_2`.
    QM,
    /// The constant selector.
    QC,
    /// The permutation of `w_1`.
    Sigma1,
    /// The permutation of `w_2`.
    Sigma2,
    /// The permutation of `w_3`.
    Sigma3,
}

impl Selector {
    /// All selectors, in key order.
    pub const ALL: [Selector; 8] = [
        Selector::Q1,
        Selector::Q2,
        Selector::Q3,
        Selector::QM,
        Selector::QC,
        Selector::Sigma1,
        Selector::Sigma2,
        Selector::Sigma3,
    ];

    /// The gate selectors a circuit description supplies.
    pub const GATE: [Selector; 5] = [
        Selector::Q1,
        Selector::Q2,
        Selector::Q3,
        Selector::QM,
        Selector::QC,
    ];

    /// The selectors derived from the permutation mapping.
    pub const SIGMAS: [Selector; NUM_WIRES] =
        [Selector::Sigma1, Selector::Sigma2, Selector::Sigma3];

    /// The position of the selector in [`Selector::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The polynomial name.
    pub fn name(&self) -> &'static str {
        match self {
            Selector::Q1 => "q_1",
            Selector::Q2 => "q_2",
            Selector::Q3 => "q_3",
            Selector::QM => "q_m",
            Selector::QC => "q_c",
            Selector::Sigma1 => "sigma_1",
            Selector::Sigma2 => "sigma_2",
            Selector::Sigma3 => "sigma_3",
        }
    }

    /// The name of the commitment in the verification key.
    pub fn commitment_name(&self) -> &'static str {
        match self {
            Selector::Q1 => "Q_1",
            Selector::Q2 => "Q_2",
            Selector::Q3 => "Q_3",
            Selector::QM => "Q_M",
            Selector::QC => "Q_C",
            Selector::Sigma1 => "SIGMA_1",
            Selector::Sigma2 => "SIGMA_2",
            Selector::Sigma3 => "SIGMA_3",
        }
    }

    /// Look a selector up by polynomial name.
    pub fn from_name(name: &str) -> Option<Selector> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

/// The input of the indexer: the gate selectors as Lagrange values over
/// the `size` rows, and the copy constraints.
///
/// The first `num_public_inputs` rows of `w_1` are the public inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDescription<F> {
    /// The number of rows `n`.
    pub size: usize,
    /// The number of public inputs `l`.
    pub num_public_inputs: usize,
    /// The Lagrange values of the gate selectors.
    pub selectors: BTreeMap<Selector, Vec<F>>,
    /// The copy constraints.
    pub permutation: PermutationMapping,
}

impl<F: Scalar> CircuitDescription<F> {
    /// A circuit without gate selectors yet.
    pub fn new(size: usize, num_public_inputs: usize, permutation: PermutationMapping) -> Self {
        CircuitDescription {
            size,
            num_public_inputs,
            selectors: BTreeMap::new(),
            permutation,
        }
    }

    /// Set the Lagrange values of a gate selector, given by name.
    pub fn set_selector(&mut self, name: &str, values: Vec<F>) -> Result<()> {
        let selector =
            Selector::from_name(name).ok_or_else(|| PlonkError::MissingSelector(name.into()))?;
        if Selector::SIGMAS.contains(&selector) || values.len() != self.size {
            return Err(PlonkError::FuncParamsError);
        }
        self.selectors.insert(selector, values);
        Ok(())
    }

    fn selector_values(&self, selector: Selector) -> Result<&[F]> {
        self.selectors
            .get(&selector)
            .map(|v| v.as_slice())
            .ok_or_else(|| PlonkError::MissingSelector(selector.name().into()))
    }
}

/// One polynomial in its three representations, which always agree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyForms<F> {
    /// The coefficients, used for commitments and evaluations at a point.
    pub coefs: FpPolynomial<F>,
    /// The values over `H`, used by the grand product.
    pub lagrange: Vec<F>,
    /// The values over the quotient coset, used by the quotient.
    pub coset_evals: Vec<F>,
}

impl<F: Domain> PolyForms<F> {
    /// Derive the other two forms from the values over `H`.
    pub fn from_lagrange(domains: &FieldDomains<F>, lagrange: Vec<F>) -> Self {
        let coefs = domains.interpolate(&lagrange);
        let coset_evals = domains.coset_evaluate(&coefs);
        PolyForms {
            coefs,
            lagrange,
            coset_evals,
        }
    }
}

/// The key a verifier needs: the circuit shape and the selector commitments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey<C, F> {
    /// The number of rows `n`.
    pub size: usize,
    /// The number of public inputs `l`.
    pub num_public_inputs: usize,
    /// The generator `omega` of `H`.
    pub root: F,
    /// The coset representatives `k_j` of the permutation.
    pub k: Vec<F>,
    /// The selector commitments, keyed by commitment name.
    pub commitments: BTreeMap<String, C>,
}

/// The verification key over a particular polynomial commitment scheme.
pub type PlonkVK<PCS> =
    VerificationKey<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F> VerificationKey<C, F> {
    /// The commitment of `selector`.
    pub fn commitment(&self, selector: Selector) -> Result<&C> {
        self.commitments
            .get(selector.commitment_name())
            .ok_or_else(|| PlonkError::MissingSelector(selector.commitment_name().into()))
    }
}

impl<C: Serialize + DeserializeOwned, F: Serialize + DeserializeOwned> VerificationKey<C, F> {
    /// Serialize the key for caching.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|_| PlonkError::SetupError)
    }

    /// Load a key cached with [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|_| PlonkError::SetupError)
    }
}

/// The key a prover needs: the domains, every selector in three forms,
/// and the verification key.
#[derive(Clone, Debug)]
pub struct ProvingKey<C, F: Domain> {
    /// The evaluation domains of the circuit.
    pub domains: FieldDomains<F>,
    /// The number of public inputs `l`.
    pub num_public_inputs: usize,
    selector_forms: Vec<PolyForms<F>>,
    verifier_key: VerificationKey<C, F>,
}

/// The proving key over a particular polynomial commitment scheme.
pub type PlonkPK<PCS> =
    ProvingKey<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F: Domain> ProvingKey<C, F> {
    /// The three forms of `selector`.
    pub fn selector(&self, selector: Selector) -> &PolyForms<F> {
        &self.selector_forms[selector.index()]
    }

    /// The number of rows `n`.
    pub fn size(&self) -> usize {
        self.domains.size()
    }

    /// Return a reference of the verification key.
    pub fn get_verifier_key_ref(&self) -> &VerificationKey<C, F> {
        &self.verifier_key
    }

    /// Return the verification key.
    pub fn get_verifier_key(self) -> VerificationKey<C, F> {
        self.verifier_key
    }
}

/// A PLONK proof: the prover-supplied elements of the transcript,
/// concatenated in manifest order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlonkProof(Vec<u8>);

impl PlonkProof {
    /// Wrap proof bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        PlonkProof(bytes)
    }

    /// The proof bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Extract the public inputs the proof was made for.
    pub fn public_inputs<F: Scalar>(&self, manifest: &Manifest) -> Result<Vec<F>> {
        let elements = manifest.split_proof(&self.0)?;
        let pi_bytes = elements
            .iter()
            .find(|e| e.name == PUBLIC_INPUTS)
            .map_or(&[][..], |e| e.bytes);
        parse_scalars(pi_bytes)
    }
}

pub(crate) fn parse_scalars<F: Scalar>(bytes: &[u8]) -> Result<Vec<F>> {
    bytes
        .chunks(F::bytes_len())
        .map(|chunk| F::from_bytes(chunk).map_err(PlonkError::from))
        .collect()
}

/// Build the proving and verification keys of a circuit.
///
/// Fails when the size is not a power of two, a gate selector is missing,
/// the permutation is not a bijection, or `pcs` has fewer than `n` points.
pub fn indexer<PCS: PolyComScheme>(
    circuit: &CircuitDescription<PCS::Field>,
    pcs: &PCS,
) -> Result<PlonkPK<PCS>> {
    let indexer_time = start_timer!(|| format!("Indexer for a circuit of size {}", circuit.size));

    let n = circuit.size;
    if !n.is_power_of_two() {
        return Err(PlonkError::CircuitSizeNotPowerOfTwo(n));
    }
    if circuit.num_public_inputs >= n {
        return Err(PlonkError::FuncParamsError);
    }
    if pcs.max_degree() + 1 < n {
        return Err(PolyComSchemeError::InsufficientSRSLength {
            needed: n,
            available: pcs.max_degree() + 1,
        }
        .into());
    }
    if circuit.permutation.size() != n || !circuit.permutation.is_bijective() {
        return Err(PlonkError::InvalidPermutation);
    }

    let domains_time = start_timer!(|| "Build the evaluation domains");
    let domains = FieldDomains::new(n, max_widget_degree())?;
    end_timer!(domains_time);

    let forms_time = start_timer!(|| "Compute the selector forms");
    let mut lagrange_values = Vec::with_capacity(Selector::ALL.len());
    for selector in Selector::GATE.iter() {
        lagrange_values.push(circuit.selector_values(*selector)?.to_vec());
    }
    lagrange_values.extend(circuit.permutation.sigma_values(&domains));
    let selector_forms: Vec<PolyForms<PCS::Field>> = lagrange_values
        .into_iter()
        .map(|values| PolyForms::from_lagrange(&domains, values))
        .collect();
    end_timer!(forms_time);

    let commit_time = start_timer!(|| "Commit to the selectors");
    let mut commitments = BTreeMap::new();
    for (selector, forms) in Selector::ALL.iter().zip(selector_forms.iter()) {
        commitments.insert(
            selector.commitment_name().to_string(),
            pcs.commit(&forms.coefs)?,
        );
    }
    end_timer!(commit_time);

    let verifier_key = VerificationKey {
        size: n,
        num_public_inputs: circuit.num_public_inputs,
        root: *domains.root(),
        k: domains.k().to_vec(),
        commitments,
    };

    end_timer!(indexer_time);
    Ok(ProvingKey {
        domains,
        num_public_inputs: circuit.num_public_inputs,
        selector_forms,
        verifier_key,
    })
}
