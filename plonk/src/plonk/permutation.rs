use crate::errors::{PlonkError, Result};
use crate::plonk::{domain::FieldDomains, helpers::batch_inversion, NUM_WIRES};
use ember_algebra::prelude::*;

/// A wire slot: one cell of the `NUM_WIRES x n` witness table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WireSlot {
    /// The wire (column), in `0..NUM_WIRES`.
    pub wire: usize,
    /// The row, in `0..n`.
    pub row: usize,
}

impl WireSlot {
    /// Create a wire slot.
    pub fn new(wire: usize, row: usize) -> Self {
        WireSlot { wire, row }
    }
}

/// The copy constraints of a circuit: every slot points to the next slot
/// of its cycle, and all slots in a cycle must carry the same value.
/// Slots pointing to themselves are unconstrained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationMapping {
    size: usize,
    targets: Vec<WireSlot>,
}

impl PermutationMapping {
    /// The mapping without copy constraints.
    pub fn identity(size: usize) -> Self {
        let targets = (0..NUM_WIRES)
            .flat_map(|wire| (0..size).map(move |row| WireSlot { wire, row }))
            .collect();
        PermutationMapping { size, targets }
    }

    /// Build the mapping from the target of each slot, listed wire by wire.
    /// The result is not checked to be a bijection; see [`Self::is_bijective`].
    pub fn from_targets(size: usize, targets: Vec<WireSlot>) -> Result<Self> {
        if targets.len() != NUM_WIRES * size
            || targets
                .iter()
                .any(|t| t.wire >= NUM_WIRES || t.row >= size)
        {
            return Err(PlonkError::InvalidPermutation);
        }
        Ok(PermutationMapping { size, targets })
    }

    /// Link every row of the first half with the same row of the second
    /// half, on each wire. The last row of each half is left unconstrained.
    pub fn copy_first_half_to_second(size: usize) -> Self {
        let mut mapping = Self::identity(size);
        let shift = size / 2;
        if shift == 0 {
            return mapping;
        }
        for wire in 0..NUM_WIRES {
            for row in 0..shift - 1 {
                let first = WireSlot::new(wire, row);
                let second = WireSlot::new(wire, row + shift);
                let (i, j) = (mapping.index(&first), mapping.index(&second));
                mapping.targets[i] = second;
                mapping.targets[j] = first;
            }
        }
        mapping
    }

    /// Group the slots holding the same variable into cycles.
    /// `variables` lists the variable index of each slot, wire by wire.
    pub fn from_variables(size: usize, variables: &[usize]) -> Result<Self> {
        if variables.len() != NUM_WIRES * size {
            return Err(PlonkError::InvalidPermutation);
        }
        let mut mapping = Self::identity(size);
        // last slot seen for each variable, and the first slot of its cycle
        let mut last_seen: ark_std::collections::BTreeMap<usize, (usize, usize)> =
            ark_std::collections::BTreeMap::new();
        for (index, var) in variables.iter().enumerate() {
            match last_seen.get_mut(var) {
                Some((first, last)) => {
                    let (current, head) = (mapping.slot(index), mapping.slot(*first));
                    mapping.targets[*last] = current;
                    mapping.targets[index] = head;
                    *last = index;
                }
                None => {
                    last_seen.insert(*var, (index, index));
                }
            }
        }
        Ok(mapping)
    }

    fn index(&self, slot: &WireSlot) -> usize {
        slot.wire * self.size + slot.row
    }

    fn slot(&self, index: usize) -> WireSlot {
        WireSlot::new(index / self.size, index % self.size)
    }

    /// The number of rows.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The slot `slot` is copy-linked to.
    pub fn target(&self, slot: &WireSlot) -> WireSlot {
        self.targets[self.index(slot)]
    }

    /// Whether every slot is the target of exactly one slot.
    pub fn is_bijective(&self) -> bool {
        let mut hit = vec![false; self.targets.len()];
        for t in self.targets.iter() {
            if t.wire >= NUM_WIRES || t.row >= self.size {
                return false;
            }
            let i = self.index(t);
            if hit[i] {
                return false;
            }
            hit[i] = true;
        }
        true
    }

    /// Encode the targets of each wire as field elements `k_j * omega^i`.
    /// These are the Lagrange values of the sigma polynomials.
    pub fn sigma_values<F: Domain>(&self, domains: &FieldDomains<F>) -> Vec<Vec<F>> {
        self.targets
            .chunks(self.size)
            .map(|wire_targets| {
                wire_targets
                    .iter()
                    .map(|t| slot_tag(domains.k(), domains.group(), t))
                    .collect()
            })
            .collect()
    }
}

/// The field element naming a wire slot: `k_wire * omega^row`.
pub fn slot_tag<F: Scalar>(k: &[F], group: &[F], slot: &WireSlot) -> F {
    k[slot.wire].mul(&group[slot.row])
}

/// Compute the Lagrange values of the grand product `Z` over `H`:
/// `Z[0] = 1` and `Z[i + 1] = Z[i] * num_i / den_i`, where
/// `num_i = prod_j (w_j[i] + beta * k_j * omega^i + gamma)` and
/// `den_i = prod_j (w_j[i] + beta * sigma_j[i] + gamma)`.
///
/// Also returns the closing value `Z[n - 1] * num_{n-1} / den_{n-1}`,
/// which is one exactly when the wiring is respected.
pub fn compute_grand_product<F: Scalar>(
    group: &[F],
    k: &[F],
    wires: &[&[F]],
    sigmas: &[&[F]],
    beta: &F,
    gamma: &F,
) -> Result<(Vec<F>, F)> {
    let n = group.len();
    if wires.len() != sigmas.len()
        || wires.len() > k.len()
        || wires.iter().chain(sigmas.iter()).any(|w| w.len() != n)
    {
        return Err(PlonkError::FuncParamsError);
    }

    let mut numerators = vec![F::one(); n];
    let mut denominators = vec![F::one(); n];
    for (i, point) in group.iter().enumerate() {
        let beta_point = beta.mul(point);
        for ((w, sigma), k_j) in wires.iter().zip(sigmas.iter()).zip(k.iter()) {
            numerators[i].mul_assign(&w[i].add(&k_j.mul(&beta_point)).add(gamma));
            denominators[i].mul_assign(&w[i].add(&beta.mul(&sigma[i])).add(gamma));
        }
    }
    batch_inversion(&mut denominators)?;

    let mut z_evals = Vec::with_capacity(n);
    let mut acc = F::one();
    for (num, den_inv) in numerators.iter().zip(denominators.iter()) {
        z_evals.push(acc);
        acc = acc.mul(num).mul(den_inv);
    }
    Ok((z_evals, acc))
}
