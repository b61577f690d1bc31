use crate::errors::{PlonkError, Result};
use crate::poly_commit::pcs::PolyComScheme;
use ember_algebra::prelude::*;
use rand_chacha::ChaChaRng;

pub(crate) const ROUND_INIT: usize = 0;
pub(crate) const ROUND_WIRES: usize = 1;
pub(crate) const ROUND_GRAND_PRODUCT: usize = 2;
pub(crate) const ROUND_QUOTIENT: usize = 3;
pub(crate) const ROUND_EVALUATION: usize = 4;
pub(crate) const ROUND_OPENING: usize = 5;

pub(crate) const CIRCUIT_SIZE: &str = "circuit_size";
pub(crate) const PUBLIC_INPUT_SIZE: &str = "public_input_size";
pub(crate) const PUBLIC_INPUTS: &str = "public_inputs";
pub(crate) const CM_W: [&str; 3] = ["W_1", "W_2", "W_3"];
pub(crate) const CM_Z: &str = "Z";
pub(crate) const CM_T: [&str; 3] = ["T_1", "T_2", "T_3"];
/// The evaluations in the order the `nu` challenges batch them.
pub(crate) const EVALS: [&str; 8] = [
    "w_1",
    "w_2",
    "w_3",
    "w_3_omega",
    "z_omega",
    "sigma_1",
    "sigma_2",
    "r",
];
pub(crate) const EVAL_T: &str = "t";
pub(crate) const PI_Z: &str = "PI_Z";
pub(crate) const PI_Z_OMEGA: &str = "PI_Z_OMEGA";

/// One element of a round: a fixed-width byte string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// The element name.
    pub name: String,
    /// The byte width.
    pub num_bytes: usize,
    /// Whether the verifier derives the element itself, in which case
    /// it is absorbed by both parties but never sent in the proof.
    pub derived_by_verifier: bool,
}

impl ManifestEntry {
    /// An element sent by the prover.
    pub fn new(name: &str, num_bytes: usize) -> Self {
        ManifestEntry {
            name: name.into(),
            num_bytes,
            derived_by_verifier: false,
        }
    }

    /// An element both parties compute on their own.
    pub fn derived(name: &str, num_bytes: usize) -> Self {
        ManifestEntry {
            name: name.into(),
            num_bytes,
            derived_by_verifier: true,
        }
    }
}

/// A round: the elements absorbed in order, then the challenges it releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundManifest {
    /// The elements of the round.
    pub elements: Vec<ManifestEntry>,
    /// The name of the challenge of the round.
    pub challenge_name: String,
    /// How many scalars the challenge yields.
    pub num_challenges: usize,
}

/// The ordered rounds of a protocol run. Prover and verifier must use
/// the same manifest, as it is the only framing of the proof bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    rounds: Vec<RoundManifest>,
}

/// A prover-supplied element located inside the proof bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofElement<'a> {
    /// The round of the element.
    pub round: usize,
    /// The element name.
    pub name: &'a str,
    /// The element bytes.
    pub bytes: &'a [u8],
}

impl Manifest {
    /// Build a manifest from its rounds.
    pub fn new(rounds: Vec<RoundManifest>) -> Self {
        Manifest { rounds }
    }

    /// The PLONK manifest for `num_public_inputs` public inputs, with the
    /// element widths of the commitment scheme.
    ///
    /// # Example
    /// ```
    /// use ember_plonk::plonk::transcript::Manifest;
    /// use ember_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
    /// let manifest = Manifest::standard::<KZGCommitmentSchemeBN254>(2);
    /// assert_eq!(manifest.num_rounds(), 6);
    /// assert_eq!(manifest.proof_len(), 896);
    /// ```
    pub fn standard<PCS: PolyComScheme>(num_public_inputs: usize) -> Self {
        Self::standard_with_lengths(
            num_public_inputs,
            PCS::Field::bytes_len(),
            PCS::commitment_len(),
        )
    }

    /// The PLONK manifest with explicit field element and commitment widths.
    pub fn standard_with_lengths(
        num_public_inputs: usize,
        field_len: usize,
        commitment_len: usize,
    ) -> Self {
        let round = |elements: Vec<ManifestEntry>, challenge_name: &str, num_challenges| {
            RoundManifest {
                elements,
                challenge_name: challenge_name.into(),
                num_challenges,
            }
        };

        let mut wires = vec![ManifestEntry::new(
            PUBLIC_INPUTS,
            field_len * num_public_inputs,
        )];
        wires.extend(CM_W.iter().map(|n| ManifestEntry::new(n, commitment_len)));

        let mut evals: Vec<ManifestEntry> = EVALS
            .iter()
            .map(|n| ManifestEntry::new(n, field_len))
            .collect();
        evals.push(ManifestEntry::derived(EVAL_T, field_len));

        Manifest::new(vec![
            round(
                vec![
                    ManifestEntry::derived(CIRCUIT_SIZE, 4),
                    ManifestEntry::derived(PUBLIC_INPUT_SIZE, 4),
                ],
                "init",
                1,
            ),
            round(wires, "beta", 2),
            round(vec![ManifestEntry::new(CM_Z, commitment_len)], "alpha", 1),
            round(
                CM_T.iter()
                    .map(|n| ManifestEntry::new(n, commitment_len))
                    .collect(),
                "z",
                1,
            ),
            round(evals, "nu", EVALS.len()),
            round(
                vec![
                    ManifestEntry::new(PI_Z, commitment_len),
                    ManifestEntry::new(PI_Z_OMEGA, commitment_len),
                ],
                "separator",
                1,
            ),
        ])
    }

    /// The rounds.
    pub fn rounds(&self) -> &[RoundManifest] {
        &self.rounds
    }

    /// The number of rounds.
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Find an element by name.
    pub fn entry(&self, name: &str) -> Option<(usize, &ManifestEntry)> {
        self.rounds.iter().enumerate().find_map(|(i, r)| {
            r.elements
                .iter()
                .find(|e| e.name == name)
                .map(|e| (i, e))
        })
    }

    /// The byte length of a proof: all prover-supplied elements.
    pub fn proof_len(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|r| r.elements.iter())
            .filter(|e| !e.derived_by_verifier)
            .map(|e| e.num_bytes)
            .sum()
    }

    /// Segment proof bytes into its elements, in manifest order.
    /// Fails with `MalformedProof` if the length does not match.
    pub fn split_proof<'a>(&'a self, bytes: &'a [u8]) -> Result<Vec<ProofElement<'a>>> {
        if bytes.len() != self.proof_len() {
            return Err(PlonkError::MalformedProof);
        }
        let mut offset = 0;
        let mut elements = vec![];
        for (round, r) in self.rounds.iter().enumerate() {
            for e in r.elements.iter().filter(|e| !e.derived_by_verifier) {
                elements.push(ProofElement {
                    round,
                    name: &e.name,
                    bytes: &bytes[offset..offset + e.num_bytes],
                });
                offset += e.num_bytes;
            }
        }
        Ok(elements)
    }
}

#[derive(Debug, Clone)]
struct AbsorbedElement {
    round: usize,
    name: String,
    bytes: Vec<u8>,
}

/// The Fiat-Shamir transcript of one protocol run.
///
/// Elements are absorbed in the exact order of the manifest. A round's
/// challenges are a pure function of the bytes absorbed up to and
/// including that round, so they can be requested any number of times.
#[derive(Debug, Clone)]
pub struct Transcript<'a> {
    manifest: &'a Manifest,
    group_order: usize,
    absorbed: Vec<AbsorbedElement>,
    round: usize,
    element: usize,
}

impl<'a> Transcript<'a> {
    /// Start a transcript. Challenges are never `group_order`-th roots of unity,
    /// so `group_order` must be a power of two.
    pub fn new(manifest: &'a Manifest, group_order: usize) -> Result<Self> {
        if !group_order.is_power_of_two() {
            return Err(PlonkError::CircuitSizeNotPowerOfTwo(group_order));
        }
        let mut transcript = Transcript {
            manifest,
            group_order,
            absorbed: vec![],
            round: 0,
            element: 0,
        };
        transcript.skip_completed_rounds();
        Ok(transcript)
    }

    fn skip_completed_rounds(&mut self) {
        while self.round < self.manifest.rounds.len()
            && self.element == self.manifest.rounds[self.round].elements.len()
        {
            self.round += 1;
            self.element = 0;
        }
    }

    /// Absorb the next element of the manifest.
    pub fn absorb(&mut self, round: usize, name: &str, bytes: &[u8]) -> Result<()> {
        let mismatch = |expected: Option<&ManifestEntry>| PlonkError::ManifestMismatch {
            round,
            expected: expected.map(|e| e.name.clone()),
            found: name.into(),
        };
        if round != self.round || round >= self.manifest.rounds.len() {
            return Err(mismatch(None));
        }
        let expected = &self.manifest.rounds[round].elements[self.element];
        if expected.name != name || expected.num_bytes != bytes.len() {
            return Err(mismatch(Some(expected)));
        }

        self.absorbed.push(AbsorbedElement {
            round,
            name: name.into(),
            bytes: bytes.to_vec(),
        });
        self.element += 1;
        self.skip_completed_rounds();
        Ok(())
    }

    /// Absorb the public parameters of round 0: the circuit size and the
    /// byte width of the public inputs, as 4-byte big-endian integers.
    pub fn absorb_circuit_size(&mut self, size: usize) -> Result<()> {
        let pi_len = self
            .manifest
            .entry(PUBLIC_INPUTS)
            .map_or(0, |(_, e)| e.num_bytes);
        self.absorb(ROUND_INIT, CIRCUIT_SIZE, &(size as u32).to_be_bytes())?;
        self.absorb(ROUND_INIT, PUBLIC_INPUT_SIZE, &(pi_len as u32).to_be_bytes())
    }

    /// Return the bytes of an absorbed element.
    pub fn element(&self, name: &str) -> Option<&[u8]> {
        self.absorbed
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.bytes.as_slice())
    }

    /// Whether every element of `round` has been absorbed.
    pub fn is_round_complete(&self, round: usize) -> bool {
        round < self.round
    }

    /// Derive the challenges of `round`.
    pub fn challenges<F: Scalar>(&self, round: usize) -> Result<Vec<F>> {
        if !self.is_round_complete(round) {
            return Err(PlonkError::ChallengeUnavailable(round));
        }

        let mut hasher = merlin::Transcript::new(b"Ember PLONK");
        for elem in self.absorbed.iter().take_while(|e| e.round <= round) {
            hasher.append_message(b"element", elem.name.as_bytes());
            hasher.append_message(b"value", &elem.bytes);
        }

        let round_manifest = &self.manifest.rounds[round];
        let mut challenges = Vec::with_capacity(round_manifest.num_challenges);
        for i in 0..round_manifest.num_challenges {
            hasher.append_message(b"challenge", round_manifest.challenge_name.as_bytes());
            hasher.append_u64(b"index", i as u64);
            let mut buff = [0u8; 32];
            hasher.challenge_bytes(b"challenge bytes", &mut buff);
            let mut prng = ChaChaRng::from_seed(buff);
            loop {
                let elem = F::random(&mut prng);
                // elem should not be root-of-unity
                if elem.pow(&[self.group_order as u64]) != F::one() {
                    challenges.push(elem);
                    break;
                }
            }
        }
        Ok(challenges)
    }

    /// Derive the first challenge of `round`.
    pub fn challenge<F: Scalar>(&self, round: usize) -> Result<F> {
        self.challenges(round)?
            .into_iter()
            .next()
            .ok_or(PlonkError::ChallengeUnavailable(round))
    }

    /// The proof bytes: every prover-supplied element, once all rounds are absorbed.
    pub fn proof_bytes(&self) -> Result<Vec<u8>> {
        if self.round != self.manifest.rounds.len() {
            return Err(PlonkError::ChallengeUnavailable(self.round));
        }
        let mut bytes = Vec::with_capacity(self.manifest.proof_len());
        for (elem, entry) in self.absorbed.iter().zip(
            self.manifest
                .rounds
                .iter()
                .flat_map(|r| r.elements.iter()),
        ) {
            if !entry.derived_by_verifier {
                bytes.extend_from_slice(&elem.bytes);
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::transcript::{
        Manifest, ManifestEntry, RoundManifest, Transcript, ROUND_INIT, ROUND_WIRES,
    };
    use ember_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    fn small_manifest() -> Manifest {
        Manifest::new(vec![
            RoundManifest {
                elements: vec![ManifestEntry::derived("size", 4)],
                challenge_name: "init".into(),
                num_challenges: 1,
            },
            RoundManifest {
                elements: vec![ManifestEntry::new("a", 2), ManifestEntry::new("b", 3)],
                challenge_name: "beta".into(),
                num_challenges: 2,
            },
        ])
    }

    fn fill(transcript: &mut Transcript, a: &[u8]) {
        transcript.absorb(ROUND_INIT, "size", &[0, 0, 0, 4]).unwrap();
        transcript.absorb(ROUND_WIRES, "a", a).unwrap();
        transcript.absorb(ROUND_WIRES, "b", &[5, 6, 7]).unwrap();
    }

    #[test]
    fn test_manifest_mismatch() {
        let manifest = small_manifest();
        let mut transcript = Transcript::new(&manifest, 4).unwrap();

        // absorbing out of order
        assert!(matches!(
            transcript.absorb(ROUND_WIRES, "a", &[1, 2]),
            Err(PlonkError::ManifestMismatch { .. })
        ));
        // wrong name
        assert!(matches!(
            transcript.absorb(ROUND_INIT, "circuit", &[0, 0, 0, 4]),
            Err(PlonkError::ManifestMismatch { .. })
        ));
        // wrong size
        assert!(matches!(
            transcript.absorb(ROUND_INIT, "size", &[4]),
            Err(PlonkError::ManifestMismatch { .. })
        ));

        fill(&mut transcript, &[1, 2]);
        // nothing left to absorb
        assert!(matches!(
            transcript.absorb(2, "c", &[]),
            Err(PlonkError::ManifestMismatch { expected: None, .. })
        ));
    }

    #[test]
    fn test_challenge_unavailable() {
        let manifest = small_manifest();
        let mut transcript = Transcript::new(&manifest, 4).unwrap();
        assert_eq!(
            transcript.challenge::<F>(ROUND_INIT),
            Err(PlonkError::ChallengeUnavailable(ROUND_INIT))
        );
        transcript.absorb(ROUND_INIT, "size", &[0, 0, 0, 4]).unwrap();
        assert!(transcript.challenge::<F>(ROUND_INIT).is_ok());

        transcript.absorb(ROUND_WIRES, "a", &[1, 2]).unwrap();
        assert_eq!(
            transcript.challenges::<F>(ROUND_WIRES),
            Err(PlonkError::ChallengeUnavailable(ROUND_WIRES))
        );
        assert!(transcript.proof_bytes().is_err());
        transcript.absorb(ROUND_WIRES, "b", &[5, 6, 7]).unwrap();
        assert_eq!(transcript.challenges::<F>(ROUND_WIRES).unwrap().len(), 2);
        assert!(transcript.challenges::<F>(7).is_err());
    }

    #[test]
    fn test_group_order_must_be_power_of_two() {
        let manifest = small_manifest();
        for order in [0, 3, 12] {
            assert!(matches!(
                Transcript::new(&manifest, order),
                Err(PlonkError::CircuitSizeNotPowerOfTwo(o)) if o == order
            ));
        }
        assert!(Transcript::new(&manifest, 1).is_ok());
    }

    #[test]
    fn test_challenge_determinism() {
        let manifest = small_manifest();
        let mut transcript1 = Transcript::new(&manifest, 4).unwrap();
        let mut transcript2 = Transcript::new(&manifest, 4).unwrap();
        transcript1.absorb(ROUND_INIT, "size", &[0, 0, 0, 4]).unwrap();
        let init_early: F = transcript1.challenge(ROUND_INIT).unwrap();

        fill(&mut transcript2, &[1, 2]);
        transcript1.absorb(ROUND_WIRES, "a", &[1, 2]).unwrap();
        transcript1.absorb(ROUND_WIRES, "b", &[5, 6, 7]).unwrap();

        // later absorptions do not change earlier challenges
        assert_eq!(init_early, transcript1.challenge(ROUND_INIT).unwrap());
        let c1 = transcript1.challenges::<F>(ROUND_WIRES).unwrap();
        assert_eq!(c1, transcript1.challenges::<F>(ROUND_WIRES).unwrap());
        assert_eq!(c1, transcript2.challenges::<F>(ROUND_WIRES).unwrap());
        assert_ne!(c1[0], c1[1]);

        let mut transcript3 = Transcript::new(&manifest, 4).unwrap();
        fill(&mut transcript3, &[1, 3]);
        assert_ne!(c1, transcript3.challenges::<F>(ROUND_WIRES).unwrap());
        assert_eq!(
            transcript3.challenge::<F>(ROUND_INIT).unwrap(),
            init_early
        );
    }

    #[test]
    fn test_proof_bytes() {
        let manifest = small_manifest();
        let mut transcript = Transcript::new(&manifest, 4).unwrap();
        fill(&mut transcript, &[1, 2]);
        let bytes = transcript.proof_bytes().unwrap();
        assert_eq!(bytes, vec![1, 2, 5, 6, 7]);
        assert_eq!(manifest.proof_len(), 5);

        let elements = manifest.split_proof(&bytes).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].name, "b");
        assert_eq!(elements[1].bytes, &[5, 6, 7]);
        assert_eq!(elements[1].round, ROUND_WIRES);

        assert_eq!(
            manifest.split_proof(&bytes[1..]),
            Err(PlonkError::MalformedProof)
        );
        assert_eq!(transcript.element("a"), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_standard_manifest() {
        let manifest = Manifest::standard_with_lengths(0, 32, 64);
        assert_eq!(manifest.num_rounds(), 6);
        assert_eq!(manifest.proof_len(), 832);
        assert_eq!(manifest.rounds()[4].num_challenges, 8);
        let (round, entry) = manifest.entry("t").unwrap();
        assert_eq!(round, 4);
        assert!(entry.derived_by_verifier);

        let manifest = Manifest::standard_with_lengths(3, 32, 64);
        assert_eq!(manifest.proof_len(), 832 + 96);
        assert_eq!(manifest.entry("public_inputs").unwrap().1.num_bytes, 96);

        let json = serde_json::to_string(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn test_absorb_circuit_size() {
        let manifest = Manifest::standard_with_lengths(2, 32, 64);
        let mut transcript = Transcript::new(&manifest, 8).unwrap();
        transcript.absorb_circuit_size(8).unwrap();
        assert!(transcript.is_round_complete(ROUND_INIT));
        assert_eq!(transcript.element("circuit_size"), Some(&[0u8, 0, 0, 8][..]));
        assert_eq!(
            transcript.element("public_input_size"),
            Some(&[0u8, 0, 0, 64][..])
        );
    }
}
