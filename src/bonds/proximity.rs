use std::iter::FusedIterator;

use super::uniform_grid::UniformGrid;

/// Forward-only walk over the objects of a block of grid cells.
///
/// Cells are visited with `i` varying fastest, then `j`, then `k`; empty cells are
/// skipped. Once exhausted the cursor rests at `(end_i, end_j, end_k)` with position 0,
/// so two iterators compare equal exactly when they point at the same object slot.
pub struct ProximityIter<'a, T> {
	grid: &'a UniformGrid<T>,
	start: [usize; 3],
	end: [usize; 3],
	cell: [usize; 3],
	pos: usize,
}

impl<'a, T> ProximityIter<'a, T> {
	/// `end` is exclusive on every axis. An empty range on any axis yields nothing.
	pub(crate) fn new(grid: &'a UniformGrid<T>, start: [usize; 3], end: [usize; 3]) -> Self {
		let mut it = Self { grid, start, end, cell: start, pos: 0 };
		if start.iter().zip(&end).any(|(s, e)| s >= e) {
			it.park();
		}
		it
	}

	/// First cell and one-past-last cell of the walk.
	pub fn cell_range(&self) -> ([usize; 3], [usize; 3]) { (self.start, self.end) }

	pub fn is_exhausted(&self) -> bool { self.cell[2] >= self.end[2] }

	fn park(&mut self) {
		self.cell = self.end;
		self.pos = 0;
	}

	/// Moves to the first slot of the next cell in the block.
	fn advance_cell(&mut self) {
		self.pos = 0;
		self.cell[0] += 1;
		if self.cell[0] == self.end[0] {
			self.cell[0] = self.start[0];
			self.cell[1] += 1;
			if self.cell[1] == self.end[1] {
				self.cell[1] = self.start[1];
				self.cell[2] += 1;
			}
		}
		if self.cell[2] == self.end[2] {
			self.park();
		}
	}
}

impl<'a, T> Iterator for ProximityIter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		while !self.is_exhausted() {
			let grid = self.grid;
			let [i, j, k] = self.cell;
			let objects = grid.cell_objects(i, j, k);
			if let Some(obj) = objects.get(self.pos) {
				self.pos += 1;
				return Some(obj);
			}
			self.advance_cell();
		}
		None
	}
}

impl<'a, T> FusedIterator for ProximityIter<'a, T> {}

impl<'a, T> PartialEq for ProximityIter<'a, T> {
	fn eq(&self, other: &Self) -> bool { self.cell == other.cell && self.pos == other.pos }
}
