use crate::errors::{PlonkError, Result};
use ember_algebra::prelude::*;

/// The number of `nu` batching challenges, one per evaluation
/// that enters the opening proof besides the quotient.
pub(crate) const NUM_NU: usize = 8;

/// The challenges of a PLONK run, inserted in the order the transcript
/// releases them: `beta, gamma, alpha, z, nu_0..nu_7, u`.
#[derive(Default)]
pub(crate) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    pub(crate) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(5 + NUM_NU),
        }
    }

    fn push_at(&mut self, position: usize, values: &[F]) -> Result<()> {
        if self.challenges.len() == position {
            self.challenges.extend_from_slice(values);
            Ok(())
        } else {
            Err(PlonkError::FuncParamsError)
        }
    }

    fn get(&self, index: usize) -> Result<&F> {
        self.challenges
            .get(index)
            .ok_or(PlonkError::ChallengeUnavailable(index))
    }

    pub(crate) fn insert_beta_gamma(&mut self, beta: F, gamma: F) -> Result<()> {
        self.push_at(0, &[beta, gamma])
    }

    pub(crate) fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        self.push_at(2, &[alpha])
    }

    pub(crate) fn insert_z(&mut self, z: F) -> Result<()> {
        self.push_at(3, &[z])
    }

    pub(crate) fn insert_nu(&mut self, nu: &[F]) -> Result<()> {
        if nu.len() != NUM_NU {
            return Err(PlonkError::FuncParamsError);
        }
        self.push_at(4, nu)
    }

    pub(crate) fn insert_u(&mut self, u: F) -> Result<()> {
        self.push_at(4 + NUM_NU, &[u])
    }

    /// Look up a single challenge by its transcript name.
    pub(crate) fn get_named(&self, name: &str) -> Result<&F> {
        match name {
            "beta" => self.get(0),
            "gamma" => self.get(1),
            "alpha" => self.get(2),
            "z" => self.get(3),
            "u" => self.get(4 + NUM_NU),
            _ => Err(PlonkError::FuncParamsError),
        }
    }

    pub(crate) fn get_beta_gamma(&self) -> Result<(&F, &F)> {
        Ok((self.get(0)?, self.get(1)?))
    }

    pub(crate) fn get_alpha(&self) -> Result<&F> {
        self.get(2)
    }

    pub(crate) fn get_z(&self) -> Result<&F> {
        self.get(3)
    }

    pub(crate) fn get_nu(&self) -> Result<&[F]> {
        if self.challenges.len() < 4 + NUM_NU {
            return Err(PlonkError::ChallengeUnavailable(4));
        }
        Ok(&self.challenges[4..4 + NUM_NU])
    }

    pub(crate) fn get_u(&self) -> Result<&F> {
        self.get(4 + NUM_NU)
    }
}

/// Invert every element in place with a single field inversion.
/// Fails with `DivisionByZero` if any element is zero.
pub(crate) fn batch_inversion<F: Scalar>(values: &mut [F]) -> Result<()> {
    let mut prefix = Vec::with_capacity(values.len());
    let mut acc = F::one();
    for v in values.iter() {
        if v.is_zero() {
            return Err(PlonkError::DivisionByZero);
        }
        prefix.push(acc);
        acc.mul_assign(v);
    }
    let mut inv = acc.inv().map_err(|_| PlonkError::DivisionByZero)?;
    for (v, p) in values.iter_mut().zip(prefix.into_iter()).rev() {
        let next = inv.mul(&*v);
        *v = inv.mul(&p);
        inv = next;
    }
    Ok(())
}

/// Return `[1, x, x^2, ..., x^{len-1}]`.
pub(crate) fn powers<F: Scalar>(x: &F, len: usize) -> Vec<F> {
    let mut result = Vec::with_capacity(len);
    let mut cur = F::one();
    for _ in 0..len {
        result.push(cur);
        cur.mul_assign(x);
    }
    result
}
