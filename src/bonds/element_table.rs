use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::vector3::Coord;

/// One row of the periodic table as used by bond inference.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ElementRecord {
	pub atomic_number: u8,
	pub symbol: String,
	pub name: String,
	/// Used for the bond cutoff.
	pub covalent_radius: Coord,
	/// Van der Waals radius; not used by bond inference.
	pub vdw_radius: Coord,
	pub max_bond_valence: u32,
	pub mass: Coord,
}

/// Read-only element lookup indexed by atomic number.
#[derive(Clone, Debug, Default)]
pub struct ElementTable {
	/// Slot `z` holds the record for atomic number `z`; slot 0 is always empty.
	records: Vec<Option<ElementRecord>>,
}

impl ElementTable {
	/// The table compiled into the crate, atomic numbers 1 through 104.
	pub fn embedded() -> Self {
		let data: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/elements.json"));
		Self::from_json_str(data).unwrap_or_default()
	}

	pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
		let mut f = File::open(path)?;
		let mut buf = String::new();
		f.read_to_string(&mut buf)?;
		Self::from_json_str(&buf)
	}

	pub fn from_json_str(data: &str) -> io::Result<Self> {
		let recs: Vec<ElementRecord> = serde_json::from_str(data)
			.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid element json: {e}")))?;
		Ok(Self::from_records(recs))
	}

	/// Records with atomic number 0 or a non-positive covalent radius are dropped; for a
	/// repeated atomic number the last record wins.
	pub fn from_records(records: impl IntoIterator<Item = ElementRecord>) -> Self {
		let mut table = Self::default();
		for r in records.into_iter().filter(|r| r.atomic_number > 0 && r.covalent_radius > 0.0) {
			let z = r.atomic_number as usize;
			if table.records.len() <= z { table.records.resize(z + 1, None); }
			table.records[z] = Some(r);
		}
		table
	}

	pub fn get(&self, atomic_number: u8) -> Option<&ElementRecord> {
		self.records.get(atomic_number as usize).and_then(Option::as_ref)
	}

	pub fn contains(&self, atomic_number: u8) -> bool { self.get(atomic_number).is_some() }

	pub fn by_symbol(&self, symbol: &str) -> Option<&ElementRecord> {
		let symbol = symbol.trim();
		self.iter().find(|r| r.symbol.eq_ignore_ascii_case(symbol))
	}

	pub fn covalent_radius(&self, atomic_number: u8) -> Option<Coord> {
		self.get(atomic_number).map(|r| r.covalent_radius)
	}

	pub fn vdw_radius(&self, atomic_number: u8) -> Option<Coord> {
		self.get(atomic_number).map(|r| r.vdw_radius)
	}

	pub fn max_bond_valence(&self, atomic_number: u8) -> Option<u32> {
		self.get(atomic_number).map(|r| r.max_bond_valence)
	}

	pub fn iter(&self) -> impl Iterator<Item = &ElementRecord> + '_ { self.records.iter().flatten() }

	pub fn len(&self) -> usize { self.iter().count() }

	pub fn is_empty(&self) -> bool { self.records.iter().all(Option::is_none) }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(z: u8, symbol: &str, cov: Coord, valence: u32) -> ElementRecord {
		ElementRecord {
			atomic_number: z,
			symbol: symbol.to_string(),
			name: symbol.to_string(),
			covalent_radius: cov,
			vdw_radius: 1.5,
			max_bond_valence: valence,
			mass: 1.0,
		}
	}

	#[test]
	fn embedded_table_is_complete() {
		let t = ElementTable::embedded();
		assert_eq!(t.len(), 104);
		assert_eq!(t.covalent_radius(6), Some(0.77));
		assert_eq!(t.max_bond_valence(1), Some(1));
		assert_eq!(t.max_bond_valence(6), Some(4));
		assert_eq!(t.get(104).map(|r| r.symbol.as_str()), Some("Rf"));
		assert!(t.get(0).is_none());
		assert!(t.get(105).is_none());
	}

	#[test]
	fn symbol_lookup_ignores_case() {
		let t = ElementTable::embedded();
		assert_eq!(t.by_symbol("cl").map(|r| r.atomic_number), Some(17));
		assert_eq!(t.by_symbol(" FE ").map(|r| r.atomic_number), Some(26));
		assert!(t.by_symbol("Qq").is_none());
	}

	#[test]
	fn from_records_filters_and_overrides() {
		let t = ElementTable::from_records(vec![
			record(0, "X", 1.0, 1),
			record(6, "C", 0.0, 4),
			record(8, "O", 0.73, 2),
			record(8, "O", 0.66, 2),
		]);
		assert_eq!(t.len(), 1);
		assert!(!t.contains(6));
		assert_eq!(t.covalent_radius(8), Some(0.66));
	}

	#[test]
	fn malformed_json_is_invalid_data() {
		let err = ElementTable::from_json_str("[{").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidData);
	}
}
