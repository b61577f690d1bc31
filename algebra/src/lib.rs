//! Field, group and pairing abstractions used by the Ember proof system,
//! together with their BN254 instantiation and the multi-scalar
//! multiplication kernel.

#![forbid(unsafe_code)]
#![allow(clippy::upper_case_acronyms)]

/// Module for the BN254 curve
pub mod bn254;

/// Module for error handling
pub mod errors;

/// Module for the Pippenger multi-scalar multiplication
pub mod multi_exp;

/// Module for the prelude
pub mod prelude;

/// Module for test rngs
pub mod rand_helper;

/// Module for serialization of scalars and group elements
pub mod serialization;

/// Module for traits
pub mod traits;

/// Module for utils
pub mod utils;

#[doc(hidden)]
pub use ark_std::{
    borrow, cmp, collections, fmt, hash, iter, marker, ops, rand, result, str, One, UniformRand,
    Zero,
};
