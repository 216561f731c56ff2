use std::io;

use thiserror::Error;

use super::vector3::{Coord, Vec3};

#[derive(Debug, Error)]
pub enum GridError {
	#[error("cell size must be positive and finite, got {0}")]
	InvalidCellSize(Coord),
	#[error("invalid bounds on {axis} axis: min {min} must be below max {max}")]
	InvertedBounds { axis: char, min: Coord, max: Coord },
	#[error("point {0} lies outside the grid")]
	OutOfBounds(Vec3),
	#[error("grid of {dims:?} cells exceeds the limit of {limit} cells")]
	TooManyCells { dims: [usize; 3], limit: usize },
}

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to read settings: {0}")]
	Io(#[from] io::Error),
	#[error("invalid settings json: {0}")]
	Json(#[from] serde_json::Error),
	#[error("invalid setting `{name}`: {value}")]
	Invalid { name: &'static str, value: Coord },
}

#[derive(Debug, Error)]
pub enum BondError {
	#[error("{positions} positions but {atomic_numbers} atomic numbers")]
	LengthMismatch { positions: usize, atomic_numbers: usize },
	#[error("atom {index}: no element table entry for atomic number {atomic_number}")]
	UnknownElement { index: usize, atomic_number: u8 },
	#[error("no element table entry for symbol `{0}`")]
	UnknownSymbol(String),
	#[error("atom {0} has a non-finite coordinate")]
	NonFiniteCoordinate(usize),
	#[error(transparent)]
	Settings(#[from] SettingsError),
	#[error(transparent)]
	Grid(#[from] GridError),
	#[error("failed to load element table: {0}")]
	ElementTable(#[source] io::Error),
}
