use std::fs;
use std::path::Path;

use super::error::SettingsError;
use super::vector3::Coord;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Edge length of a grid cell (Å). Must exceed the largest bond cutoff for the
	/// 3x3x3 neighborhood to see every partner.
	pub cell_size: Coord,
	/// Padding added to the atom bounding box on every side before building the grid.
	pub box_margin: Coord,
	/// Scale applied to the sum of covalent radii to get the bond cutoff.
	pub bond_tolerance: Coord,
	/// Per-axis pre-filter applied before the Euclidean distance.
	pub axial_cutoff: Coord,
	pub enable_parallel: bool,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			cell_size: 3.0,
			box_margin: 3.0,
			bond_tolerance: 1.2,
			axial_cutoff: 3.0,
			enable_parallel: true,
		}
	}
}

impl Settings {
	pub fn from_json_str(data: &str) -> Result<Self, SettingsError> {
		let settings: Settings = serde_json::from_str(data)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let data = fs::read_to_string(path)?;
		Self::from_json_str(&data)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		let lengths = [
			("cell_size", self.cell_size),
			("box_margin", self.box_margin),
			("bond_tolerance", self.bond_tolerance),
			("axial_cutoff", self.axial_cutoff),
		];
		for (name, value) in lengths {
			if !(value.is_finite() && value > 0.0) {
				return Err(SettingsError::Invalid { name, value });
			}
		}
		Ok(())
	}
}
