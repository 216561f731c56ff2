use std::cmp::Ordering;

use super::vector3::{Coord, Vec3};

/// Bond multiplicity emitted by distance-based inference. Multiple bonds are left to
/// downstream chemistry code.
pub const SINGLE_BOND: u8 = 1;

/// An atom as stored in the grid: its index in the caller's atom array and its position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AtomRecord {
	pub atom_index: usize,
	pub position: Vec3,
}

impl AtomRecord {
	pub fn new(atom_index: usize, position: Vec3) -> Self { Self { atom_index, position } }
}

/// A committed bond. `from < to` always holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Bond {
	pub from: usize,
	pub to: usize,
	pub order: u8,
}

impl Bond {
	/// Single bond between `a` and `b`, stored in canonical orientation.
	pub fn single(a: usize, b: usize) -> Self {
		let (from, to) = if a < b { (a, b) } else { (b, a) };
		Self { from, to, order: SINGLE_BOND }
	}
	pub fn involves(&self, atom: usize) -> bool { self.from == atom || self.to == atom }
	/// The other endpoint, if `atom` is one of the two.
	pub fn partner(&self, atom: usize) -> Option<usize> {
		if self.from == atom { Some(self.to) }
		else if self.to == atom { Some(self.from) }
		else { None }
	}
}

/// A neighbor within bonding distance of the atom being processed.
///
/// Ordered by ascending distance; equal distances fall back to the atom index so the
/// queue drains in the same order on every run.
#[derive(Copy, Clone, Debug)]
pub struct BondCandidate {
	pub distance: Coord,
	pub atom: usize,
}

impl PartialEq for BondCandidate {
	fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for BondCandidate {}

impl PartialOrd for BondCandidate {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for BondCandidate {
	fn cmp(&self, other: &Self) -> Ordering {
		self.distance.total_cmp(&other.distance).then(self.atom.cmp(&other.atom))
	}
}

#[derive(Clone, Debug, Default, serde::Serialize)]
pub struct BondResults {
	pub n_atoms: usize,
	/// Bonds in commit order: atom index ascending, then distance ascending.
	pub bonds: Vec<Bond>,
	/// Number of committed bonds touching each atom.
	pub valence_counts: Vec<u32>,
}

impl BondResults {
	pub fn n_bonds(&self) -> usize { self.bonds.len() }
	pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = &Bond> + '_ {
		self.bonds.iter().filter(move |b| b.involves(atom))
	}
	pub fn neighbors_of(&self, atom: usize) -> Vec<usize> {
		self.bonds.iter().filter_map(|b| b.partner(atom)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::BinaryHeap;
	use std::cmp::Reverse;

	#[test]
	fn single_bond_is_canonical() {
		let b = Bond::single(7, 2);
		assert_eq!((b.from, b.to, b.order), (2, 7, 1));
		assert_eq!(b.partner(2), Some(7));
		assert_eq!(b.partner(3), None);
	}

	#[test]
	fn candidates_pop_closest_first_with_index_tiebreak() {
		let mut heap = BinaryHeap::new();
		heap.push(Reverse(BondCandidate { distance: 1.4, atom: 5 }));
		heap.push(Reverse(BondCandidate { distance: 1.1, atom: 9 }));
		heap.push(Reverse(BondCandidate { distance: 1.4, atom: 2 }));
		let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|Reverse(c)| c.atom)).collect();
		assert_eq!(order, vec![9, 2, 5]);
	}

	#[test]
	fn results_neighbors() {
		let r = BondResults {
			n_atoms: 3,
			bonds: vec![Bond::single(0, 1), Bond::single(1, 2)],
			valence_counts: vec![1, 2, 1],
		};
		assert_eq!(r.neighbors_of(1), vec![0, 2]);
		assert_eq!(r.bonds_of(0).count(), 1);
		assert_eq!(r.n_bonds(), 2);
	}
}
