use crate::errors::{PlonkError, Result};
use crate::plonk::{
    indexer::{CircuitDescription, Selector},
    permutation::PermutationMapping,
    NUM_WIRES,
};
use ember_algebra::prelude::*;

/// A circuit together with a witness that satisfies it.
#[derive(Clone, Debug)]
pub struct SampleCircuit<F> {
    /// The circuit.
    pub description: CircuitDescription<F>,
    /// The wire values, one vector of `n` values per wire.
    pub witness: Vec<Vec<F>>,
    /// The public inputs, the first rows of `w_1`.
    pub public_inputs: Vec<F>,
}

/// A circuit of alternating gates, wired with
/// [`PermutationMapping::copy_first_half_to_second`]:
/// - even rows are mul gates `w_3 = w_1 * w_2 + w_1 + w_2 + 1`,
/// - odd rows are add gates `w_3 = w_1 + w_2`,
/// - the first `num_public_inputs` rows instead check `w_1 = pi`.
///
/// The last row of each half is unconstrained by the wiring and holds zeroes.
///
/// # Example
/// ```
/// use ember_plonk::plonk::sample_circuits::mul_add_circuit;
/// use ember_algebra::{bn254::BN254Scalar, prelude::*};
/// let mut prng = test_rng();
/// let sample = mul_add_circuit::<BN254Scalar, _>(8, 2, &mut prng).unwrap();
/// assert_eq!(sample.witness[0][4], sample.witness[0][0]);
/// assert_eq!(sample.public_inputs[..], sample.witness[0][..2]);
/// ```
pub fn mul_add_circuit<F: Scalar, R: CryptoRng + RngCore>(
    size: usize,
    num_public_inputs: usize,
    prng: &mut R,
) -> Result<SampleCircuit<F>> {
    if !size.is_power_of_two() {
        return Err(PlonkError::CircuitSizeNotPowerOfTwo(size));
    }
    let half = size / 2;
    if size < 4 || num_public_inputs + 1 > half {
        return Err(PlonkError::FuncParamsError);
    }

    let mut witness = vec![vec![F::zero(); size]; NUM_WIRES];
    for row in half..size - 1 {
        let a = F::random(prng);
        let b = F::random(prng);
        let c = if row % 2 == 0 {
            a.mul(&b).add(&a).add(&b).add(&F::one())
        } else {
            a.add(&b)
        };
        for (wire, value) in witness.iter_mut().zip([a, b, c]) {
            wire[row] = value;
            wire[row - half] = value;
        }
    }

    let mut selectors: Vec<Vec<F>> = vec![vec![F::zero(); size]; Selector::GATE.len()];
    let [q_1, q_2, q_3, q_m, q_c] = Selector::GATE.map(|s| s.index());
    for row in 0..size {
        if row < num_public_inputs {
            selectors[q_1][row] = F::one();
            continue;
        }
        selectors[q_1][row] = F::one();
        selectors[q_2][row] = F::one();
        selectors[q_3][row] = F::one().neg();
        if row % 2 == 0 {
            selectors[q_m][row] = F::one();
            selectors[q_c][row] = F::one();
        }
    }

    let mut description = CircuitDescription::new(
        size,
        num_public_inputs,
        PermutationMapping::copy_first_half_to_second(size),
    );
    for (selector, values) in Selector::GATE.iter().zip(selectors) {
        description.set_selector(selector.name(), values)?;
    }

    let public_inputs = witness[0][..num_public_inputs].to_vec();
    Ok(SampleCircuit {
        description,
        witness,
        public_inputs,
    })
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::plonk::{
        indexer::Selector, permutation::WireSlot, sample_circuits::mul_add_circuit,
    };
    use ember_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    #[test]
    fn test_gates_hold() {
        let mut prng = test_rng();
        for (size, num_public_inputs) in [(4, 0), (4, 1), (16, 3)] {
            let sample = mul_add_circuit::<F, _>(size, num_public_inputs, &mut prng).unwrap();
            let s = &sample.description.selectors;
            let w = &sample.witness;
            for row in 0..size {
                let (a, b, c) = (w[0][row], w[1][row], w[2][row]);
                let pi = if row < num_public_inputs {
                    sample.public_inputs[row]
                } else {
                    F::zero()
                };
                let gate = s[&Selector::QM][row] * a * b
                    + s[&Selector::Q1][row] * a
                    + s[&Selector::Q2][row] * b
                    + s[&Selector::Q3][row] * c
                    + s[&Selector::QC][row];
                assert_eq!(gate.sub(&pi), F::zero(), "row {}", row);
            }

            let mapping = &sample.description.permutation;
            for wire in 0..3 {
                for row in 0..size {
                    let target = mapping.target(&WireSlot::new(wire, row));
                    assert_eq!(w[wire][row], w[target.wire][target.row]);
                }
            }
        }
    }

    #[test]
    fn test_bad_shapes() {
        let mut prng = test_rng();
        assert_eq!(
            mul_add_circuit::<F, _>(12, 0, &mut prng).unwrap_err(),
            PlonkError::CircuitSizeNotPowerOfTwo(12)
        );
        assert!(mul_add_circuit::<F, _>(2, 0, &mut prng).is_err());
        assert!(mul_add_circuit::<F, _>(8, 4, &mut prng).is_err());
    }
}
