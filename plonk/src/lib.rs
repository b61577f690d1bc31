//! The PLONK proving and verification core of Ember: the Fiat-Shamir
//! transcript, key construction, the permutation argument, quotient
//! construction and the round protocols of the prover and the verifier,
//! over a KZG polynomial commitment scheme.

#![allow(clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

/// Module for error handling.
pub mod errors;

/// Module for the PLONK proof system.
pub mod plonk;

/// Module for polynomial commitments.
pub mod poly_commit;
