use crate::bn254::BN254Scalar;
use crate::prelude::*;
use ark_bn254::Bn254;
use ark_ec::{pairing::PairingOutput, Group as ArkGroup};

/// The wrapped struct for the target group of the BN254 pairing,
/// written additively.
#[derive(Copy, Default, Clone, PartialEq, Eq, Debug)]
pub struct BN254Gt(pub(crate) PairingOutput<Bn254>);

impl BN254Gt {
    /// Return the identity element.
    #[inline]
    pub fn get_identity() -> Self {
        Self(PairingOutput::zero())
    }

    /// Return the pairing of the two group generators.
    #[inline]
    pub fn get_base() -> Self {
        Self(PairingOutput::generator())
    }
}

impl<'a> Add<&'a BN254Gt> for BN254Gt {
    type Output = BN254Gt;

    #[inline]
    fn add(self, rhs: &'a BN254Gt) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Mul<&'a BN254Scalar> for BN254Gt {
    type Output = BN254Gt;

    #[inline]
    fn mul(self, rhs: &'a BN254Scalar) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Neg for BN254Gt {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}
