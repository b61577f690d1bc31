//! The PLONK proof system: key generation, prover and verifier over a
//! homomorphic polynomial commitment scheme.

/// The number of wires of a gate.
pub const NUM_WIRES: usize = 3;

/// Module for the evaluation domains.
pub mod domain;

/// Module for help functions.
pub(crate) mod helpers;

/// Module for indexer.
pub mod indexer;

/// Module for the permutation argument.
pub mod permutation;

/// Module for prover.
pub mod prover;

/// Module for sample circuits.
pub mod sample_circuits;

/// Module for transcript.
pub mod transcript;

/// Module for verifier.
pub mod verifier;

/// Module for the relation widgets.
pub(crate) mod widgets;
