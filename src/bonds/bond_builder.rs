//! Greedy bond inference over a uniform grid.
//!
//! Each atom gathers the neighbors found in the surrounding grid cells whose distance is
//! below `bond_tolerance * (r_cov(a) + r_cov(b))`, then commits bonds closest first while
//! both atoms have valence left. Two rules keep the result plausible:
//!
//! * a candidate is dropped when it sits closer to the previously popped candidate than
//!   to the central atom (no near-zero bond angles);
//! * a bond to a lower-indexed atom is never committed a second time, so every bond is
//!   reported once as `(low, high)`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::path::Path;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::bounding_box::BoundingBox;
use super::element_table::ElementTable;
use super::error::{BondError, GridError};
use super::settings::Settings;
use super::types::{AtomRecord, Bond, BondCandidate, BondResults};
use super::uniform_grid::UniformGrid;
use super::vector3::{Coord, Vec3};

type CandidateQueue = BinaryHeap<Reverse<BondCandidate>>;

/// Infers single bonds for `positions`, where `atomic_numbers[i]` is the element of atom `i`.
///
/// Every atomic number must have an entry in `table`; unknown numbers, mismatched input
/// lengths and non-finite coordinates are reported before any work starts.
pub fn infer_bonds(
	positions: &[Vec3],
	atomic_numbers: &[u8],
	table: &ElementTable,
	settings: &Settings,
) -> Result<BondResults, BondError> {
	settings.validate()?;
	if positions.len() != atomic_numbers.len() {
		return Err(BondError::LengthMismatch { positions: positions.len(), atomic_numbers: atomic_numbers.len() });
	}
	let mut radii = Vec::with_capacity(positions.len());
	let mut max_valence = Vec::with_capacity(positions.len());
	for (index, (&atomic_number, pos)) in atomic_numbers.iter().zip(positions).enumerate() {
		let element = table.get(atomic_number).ok_or(BondError::UnknownElement { index, atomic_number })?;
		if !pos.is_finite() {
			return Err(BondError::NonFiniteCoordinate(index));
		}
		radii.push(element.covalent_radius);
		max_valence.push(element.max_bond_valence);
	}

	let Some(bounds) = BoundingBox::from_points(positions) else {
		return Ok(BondResults::default());
	};
	let mut grid = UniformGrid::new(settings.cell_size, bounds.expanded(settings.box_margin))?;
	for (k, &pos) in positions.iter().enumerate() {
		if !grid.insert(AtomRecord::new(k, pos), pos) {
			warn!("atom {k} at {pos} falls outside the bond grid");
		}
	}

	let engine = Engine { positions, radii: &radii, max_valence: &max_valence, grid: &grid, settings };
	let results = engine.run()?;
	info!("inferred {} bonds for {} atoms", results.n_bonds(), results.n_atoms);
	Ok(results)
}

/// Read-only state shared by the per-atom passes.
struct Engine<'a> {
	positions: &'a [Vec3],
	radii: &'a [Coord],
	max_valence: &'a [u32],
	grid: &'a UniformGrid<AtomRecord>,
	settings: &'a Settings,
}

impl<'a> Engine<'a> {
	fn run(&self) -> Result<BondResults, GridError> {
		let n = self.positions.len();
		let mut results = BondResults {
			n_atoms: n,
			bonds: Vec::with_capacity(2 * n),
			valence_counts: vec![0; n],
		};
		if self.settings.enable_parallel {
			// queues are independent of commit state, so only the commits need ordering
			let queues = (0..n)
				.into_par_iter()
				.map(|k| self.collect_candidates(k))
				.collect::<Result<Vec<_>, GridError>>()?;
			debug!("collected candidate queues for {n} atoms in parallel");
			for (k, queue) in queues.into_iter().enumerate() {
				self.commit_bonds(k, queue, &mut results);
			}
		} else {
			for k in 0..n {
				let queue = self.collect_candidates(k)?;
				self.commit_bonds(k, queue, &mut results);
			}
		}
		Ok(results)
	}

	/// Neighbors of atom `k` within bonding distance, closest on top.
	fn collect_candidates(&self, k: usize) -> Result<CandidateQueue, GridError> {
		let pk = self.positions[k];
		let axial = self.settings.axial_cutoff;
		let mut queue = CandidateQueue::new();
		for rec in self.grid.neighbors(pk, self.settings.cell_size)? {
			let m = rec.atom_index;
			if m == k {
				continue;
			}
			let d = pk - rec.position;
			if d.x.abs() > axial || d.y.abs() > axial || d.z.abs() > axial {
				continue;
			}
			let distance = (d.x * d.x + d.y * d.y + d.z * d.z).sqrt();
			let cutoff = self.settings.bond_tolerance * (self.radii[k] + self.radii[m]);
			if distance < cutoff {
				queue.push(Reverse(BondCandidate { distance, atom: m }));
			}
		}
		Ok(queue)
	}

	/// Drains `queue` for atom `k`, committing bonds while valence allows.
	fn commit_bonds(&self, k: usize, mut queue: CandidateQueue, results: &mut BondResults) {
		let valence = &mut results.valence_counts;
		while let Some(Reverse(p)) = queue.pop() {
			// minimum bond angle: drop the runner-up if it is closer to `p` than to `k`
			let crowded = queue.peek().is_some_and(|Reverse(p2)| {
				self.positions[p2.atom].distance_squared(self.positions[p.atom]) < p2.distance * p2.distance
			});
			if crowded {
				if let Some(Reverse(p2)) = queue.pop() {
					trace!("atom {k}: candidate {} pruned by {}", p2.atom, p.atom);
				}
			}

			if valence[k] >= self.max_valence[k] {
				break;
			}
			if valence[p.atom] >= self.max_valence[p.atom] {
				continue;
			}
			// already considered from the other end
			if p.atom < k {
				continue;
			}

			trace!("bond {k}-{} at {:.3}", p.atom, p.distance);
			results.bonds.push(Bond::single(k, p.atom));
			valence[k] += 1;
			valence[p.atom] += 1;
		}
	}
}

/// Accumulates atoms and runs bond inference over them.
pub struct BondBuilder {
	settings: Settings,
	table: ElementTable,
	positions: Vec<Vec3>,
	atomic_numbers: Vec<u8>,
}

impl Default for BondBuilder {
	fn default() -> Self { Self::new() }
}

impl BondBuilder {
	/// Builder using the embedded element table and default settings.
	pub fn new() -> Self { Self::with_table(ElementTable::embedded()) }

	pub fn with_table(table: ElementTable) -> Self {
		Self { settings: Settings::default(), table, positions: Vec::new(), atomic_numbers: Vec::new() }
	}

	/// Builder using an element table loaded from a JSON file.
	pub fn with_table_path(path: impl AsRef<Path>) -> Result<Self, BondError> {
		let table = ElementTable::from_path(path).map_err(BondError::ElementTable)?;
		Ok(Self::with_table(table))
	}

	pub fn settings(&self) -> &Settings { &self.settings }
	pub fn settings_mut(&mut self) -> &mut Settings { &mut self.settings }
	pub fn table(&self) -> &ElementTable { &self.table }

	/// Appends an atom and returns its index. The atomic number must be in the table.
	pub fn add_atom(&mut self, atomic_number: u8, position: Vec3) -> Result<usize, BondError> {
		let index = self.positions.len();
		if !self.table.contains(atomic_number) {
			return Err(BondError::UnknownElement { index, atomic_number });
		}
		if !position.is_finite() {
			return Err(BondError::NonFiniteCoordinate(index));
		}
		self.positions.push(position);
		self.atomic_numbers.push(atomic_number);
		Ok(index)
	}

	pub fn add_atom_by_symbol(&mut self, symbol: &str, position: Vec3) -> Result<usize, BondError> {
		let atomic_number = self
			.table
			.by_symbol(symbol)
			.map(|r| r.atomic_number)
			.ok_or_else(|| BondError::UnknownSymbol(symbol.to_string()))?;
		self.add_atom(atomic_number, position)
	}

	pub fn n_atoms(&self) -> usize { self.positions.len() }

	pub fn clear(&mut self) {
		self.positions.clear();
		self.atomic_numbers.clear();
	}

	pub fn build(&self) -> Result<BondResults, BondError> {
		infer_bonds(&self.positions, &self.atomic_numbers, &self.table, &self.settings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::bonds::element_table::ElementRecord;

	fn table() -> ElementTable { ElementTable::embedded() }

	fn run(positions: &[Vec3], z: &[u8]) -> BondResults {
		infer_bonds(positions, z, &table(), &Settings::default()).unwrap()
	}

	#[test]
	fn carbon_pair_within_cutoff_bonds() {
		let r = run(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.5, 0.0, 0.0)], &[6, 6]);
		assert_eq!(r.bonds, vec![Bond::single(0, 1)]);
		assert_eq!(r.valence_counts, vec![1, 1]);
	}

	#[test]
	fn carbon_pair_just_past_cutoff_does_not_bond() {
		// cutoff is 1.2 * (0.77 + 0.77) = 1.848
		let r = run(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.85, 0.0)], &[6, 6]);
		assert!(r.bonds.is_empty());
	}

	#[test]
	fn axial_prefilter_rejects_before_distance() {
		let mut settings = Settings::default();
		settings.axial_cutoff = 1.0;
		let r = infer_bonds(&[Vec3::zero(), Vec3::new(1.4, 0.0, 0.0)], &[6, 6], &table(), &settings).unwrap();
		assert!(r.bonds.is_empty());
	}

	#[test]
	fn noble_gas_never_bonds() {
		let r = run(&[Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)], &[2, 1]);
		assert!(r.bonds.is_empty());
	}

	#[test]
	fn custom_table_drives_cutoff_and_valence() {
		let t = ElementTable::from_records(vec![ElementRecord {
			atomic_number: 1,
			symbol: "X".into(),
			name: "Test".into(),
			covalent_radius: 2.0,
			vdw_radius: 2.0,
			max_bond_valence: 2,
			mass: 1.0,
		}]);
		// linear chain 0-1-2-3 spaced 2.5 apart, cutoff 4.8
		let pos: Vec<Vec3> = (0..4).map(|i| Vec3::new(2.5 * i as f64, 0.0, 0.0)).collect();
		let r = infer_bonds(&pos, &[1, 1, 1, 1], &t, &Settings::default()).unwrap();
		assert!(r.valence_counts.iter().all(|&v| v <= 2));
		assert!(r.bonds.contains(&Bond::single(0, 1)));
	}

	#[test]
	fn validation_errors() {
		let t = table();
		let s = Settings::default();
		assert!(matches!(
			infer_bonds(&[Vec3::zero()], &[], &t, &s),
			Err(BondError::LengthMismatch { positions: 1, atomic_numbers: 0 })
		));
		assert!(matches!(
			infer_bonds(&[Vec3::zero(), Vec3::zero()], &[6, 200], &t, &s),
			Err(BondError::UnknownElement { index: 1, atomic_number: 200 })
		));
		assert!(matches!(
			infer_bonds(&[Vec3::new(f64::NAN, 0.0, 0.0)], &[6], &t, &s),
			Err(BondError::NonFiniteCoordinate(0))
		));
		let bad = Settings { cell_size: 0.0, ..Settings::default() };
		assert!(matches!(infer_bonds(&[], &[], &t, &bad), Err(BondError::Settings(_))));
	}

	#[test]
	fn builder_validates_atoms() {
		let mut b = BondBuilder::new();
		assert_eq!(b.add_atom(6, Vec3::zero()).unwrap(), 0);
		assert_eq!(b.add_atom_by_symbol("O", Vec3::new(1.2, 0.0, 0.0)).unwrap(), 1);
		assert!(matches!(b.add_atom(0, Vec3::zero()), Err(BondError::UnknownElement { index: 2, .. })));
		assert!(matches!(b.add_atom_by_symbol("Zz", Vec3::zero()), Err(BondError::UnknownSymbol(_))));
		assert_eq!(b.n_atoms(), 2);
		let r = b.build().unwrap();
		assert_eq!(r.bonds, vec![Bond::single(0, 1)]);
		b.clear();
		assert_eq!(b.build().unwrap().n_bonds(), 0);
	}

	#[test]
	fn sequential_and_parallel_agree() {
		let mut pos = Vec::new();
		let mut z = Vec::new();
		for i in 0..6 {
			for j in 0..6 {
				for k in 0..3 {
					pos.push(Vec3::new(1.4 * i as f64, 1.45 * j as f64, 1.5 * k as f64));
					z.push(if (i + j + k) % 3 == 0 { 1 } else { 6 });
				}
			}
		}
		let mut s = Settings::default();
		let par = infer_bonds(&pos, &z, &table(), &s).unwrap();
		s.enable_parallel = false;
		let seq = infer_bonds(&pos, &z, &table(), &s).unwrap();
		assert_eq!(par.bonds, seq.bonds);
		assert_eq!(par.valence_counts, seq.valence_counts);
		assert!(!seq.bonds.is_empty());
	}
}
