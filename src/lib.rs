//! Bond inference from raw 3D atom coordinates.
//!
//! Atoms are bucketed into a [`bonds::UniformGrid`]; every atom then looks only at the
//! 27 surrounding cells for bond partners, which keeps the search close to linear in the
//! number of atoms.

pub mod bonds;

pub use bonds::{infer_bonds, BondBuilder, BondResults, ElementTable, Settings};
