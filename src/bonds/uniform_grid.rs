//! Fixed-resolution bucket grid over an axis-aligned box.
//!
//! Objects are stored together with the cell their position falls into. A query returns
//! everything in the 3x3x3 block of cells around the query point, clipped at the box
//! faces, so with a cell edge longer than the search distance no partner is missed.

use log::debug;

use super::bounding_box::BoundingBox;
use super::error::GridError;
use super::proximity::ProximityIter;
use super::vector3::{Coord, Vec3};

/// Upper bound on the number of cells a grid may allocate.
pub const MAX_CELLS: usize = 1 << 24;

/// One grid bucket. Insertion order carries no meaning.
#[derive(Clone, Debug)]
pub struct GridCell<T> {
	objects: Vec<T>,
}

impl<T> Default for GridCell<T> {
	fn default() -> Self { Self { objects: Vec::new() } }
}

impl<T> GridCell<T> {
	pub fn len(&self) -> usize { self.objects.len() }
	pub fn is_empty(&self) -> bool { self.objects.is_empty() }
	pub fn iter(&self) -> std::slice::Iter<'_, T> { self.objects.iter() }
	pub fn as_slice(&self) -> &[T] { &self.objects }
	fn push(&mut self, obj: T) { self.objects.push(obj); }
}

/// Uniform 3D grid with `nx * ny * nz` cells allocated up front.
///
/// Cells live in one buffer indexed by `i + nx * (j + ny * k)`. The grid never grows:
/// points outside its box are refused rather than stored.
#[derive(Clone, Debug)]
pub struct UniformGrid<T> {
	cell_size: Coord,
	bounds: BoundingBox,
	extent: Vec3,
	dims: [usize; 3],
	cells: Vec<GridCell<T>>,
	len: usize,
}

impl<T> UniformGrid<T> {
	/// Builds an empty grid over `bounds`.
	///
	/// The number of cells along each axis is `round(extent / cell_size)`, at least one.
	/// Fails when `cell_size` is not positive, when `min >= max` on any axis, or when the
	/// box would need more than [`MAX_CELLS`] cells.
	pub fn new(cell_size: Coord, bounds: BoundingBox) -> Result<Self, GridError> {
		if !(cell_size.is_finite() && cell_size > 0.0) {
			return Err(GridError::InvalidCellSize(cell_size));
		}
		let axes = [
			('x', bounds.min.x, bounds.max.x),
			('y', bounds.min.y, bounds.max.y),
			('z', bounds.min.z, bounds.max.z),
		];
		let mut dims = [1usize; 3];
		for (d, (axis, min, max)) in dims.iter_mut().zip(axes) {
			if !(min.is_finite() && max.is_finite() && min < max) {
				return Err(GridError::InvertedBounds { axis, min, max });
			}
			*d = (((max - min) / cell_size).round() as usize).max(1);
		}
		let num_cells = dims[0]
			.checked_mul(dims[1])
			.and_then(|n| n.checked_mul(dims[2]))
			.filter(|&n| n <= MAX_CELLS)
			.ok_or(GridError::TooManyCells { dims, limit: MAX_CELLS })?;
		let mut cells = Vec::with_capacity(num_cells);
		cells.resize_with(num_cells, GridCell::default);
		debug!("uniform grid {}x{}x{} ({} cells, edge {cell_size})", dims[0], dims[1], dims[2], num_cells);
		Ok(Self { cell_size, bounds, extent: bounds.extent(), dims, cells, len: 0 })
	}

	pub fn from_extents(
		cell_size: Coord,
		min_x: Coord, min_y: Coord, min_z: Coord,
		max_x: Coord, max_y: Coord, max_z: Coord,
	) -> Result<Self, GridError> {
		Self::new(cell_size, BoundingBox::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z)))
	}

	/// Stores `obj` in the cell containing `point`. Returns false, leaving the grid
	/// untouched, when the point lies outside the box.
	pub fn insert(&mut self, obj: T, point: Vec3) -> bool {
		let Some((i, j, k)) = self.cell_coords(point) else { return false };
		let idx = self.index(i, j, k);
		self.cells[idx].push(obj);
		self.len += 1;
		true
	}

	/// Iterates over every object in the home cell of `point` and its face, edge and
	/// corner neighbors.
	///
	/// `_radius` is not used to narrow the search: the neighborhood is always the full
	/// 3x3x3 block (fewer cells at the box faces), which covers any distance up to the
	/// cell edge. Querying outside the box is an error.
	pub fn neighbors(&self, point: Vec3, _radius: Coord) -> Result<ProximityIter<'_, T>, GridError> {
		let (i, j, k) = self.cell_coords(point).ok_or(GridError::OutOfBounds(point))?;
		let [nx, ny, nz] = self.dims;
		let start = [i.saturating_sub(1), j.saturating_sub(1), k.saturating_sub(1)];
		// one past the last cell on each axis
		let end = [(i + 2).min(nx), (j + 2).min(ny), (k + 2).min(nz)];
		Ok(ProximityIter::new(self, start, end))
	}

	/// Cell coordinates of `point`, `None` outside the box. Points on the upper face
	/// belong to the last cell.
	pub fn cell_coords(&self, point: Vec3) -> Option<(usize, usize, usize)> {
		if !self.bounds.contains(point) {
			return None;
		}
		let axis = |c: Coord, min: Coord, extent: Coord, n: usize| -> usize {
			let idx = (n as Coord * (c - min) / extent).floor() as usize;
			idx.min(n - 1)
		};
		Some((
			axis(point.x, self.bounds.min.x, self.extent.x, self.dims[0]),
			axis(point.y, self.bounds.min.y, self.extent.y, self.dims[1]),
			axis(point.z, self.bounds.min.z, self.extent.z, self.dims[2]),
		))
	}

	pub fn cell_at(&self, i: usize, j: usize, k: usize) -> Option<&GridCell<T>> {
		let [nx, ny, nz] = self.dims;
		if i >= nx || j >= ny || k >= nz {
			return None;
		}
		self.cells.get(self.index(i, j, k))
	}

	/// Objects of cell `(i, j, k)`; the coordinates must be in range.
	pub(crate) fn cell_objects(&self, i: usize, j: usize, k: usize) -> &[T] {
		self.cells[self.index(i, j, k)].as_slice()
	}

	/// Number of stored objects.
	pub fn len(&self) -> usize { self.len }
	pub fn is_empty(&self) -> bool { self.len == 0 }
	/// Cells along x, y and z.
	pub fn dims(&self) -> (usize, usize, usize) { (self.dims[0], self.dims[1], self.dims[2]) }
	pub fn num_cells(&self) -> usize { self.cells.len() }
	pub fn cell_size(&self) -> Coord { self.cell_size }
	pub fn bounds(&self) -> BoundingBox { self.bounds }

	fn index(&self, i: usize, j: usize, k: usize) -> usize {
		i + self.dims[0] * (j + self.dims[1] * k)
	}
}
