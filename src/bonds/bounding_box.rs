use super::vector3::{Coord, Vec3};

/// Axis-aligned box given by two opposite corners, `min <= max` on every axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundingBox {
	pub min: Vec3,
	pub max: Vec3,
}

impl BoundingBox {
	pub fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }

	/// Smallest box containing every point, `None` for an empty input.
	pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
		let mut points = points.into_iter();
		let first = *points.next()?;
		let mut bb = Self::new(first, first);
		for p in points { bb.enclose_point(*p); }
		Some(bb)
	}

	pub fn contains(&self, p: Vec3) -> bool {
		self.min.x <= p.x && p.x <= self.max.x
			&& self.min.y <= p.y && p.y <= self.max.y
			&& self.min.z <= p.z && p.z <= self.max.z
	}

	pub fn enclose_point(&mut self, p: Vec3) {
		self.min = self.min.min(p);
		self.max = self.max.max(p);
	}

	/// Copy grown by `margin` on every side.
	pub fn expanded(&self, margin: Coord) -> Self {
		Self::new(self.min - Vec3::splat(margin), self.max + Vec3::splat(margin))
	}

	pub fn extent(&self) -> Vec3 { self.max - self.min }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encloses_all_points() {
		let pts = [Vec3::new(1.0, -2.0, 0.5), Vec3::new(-1.0, 4.0, 0.0), Vec3::new(0.0, 0.0, 3.0)];
		let bb = BoundingBox::from_points(&pts).unwrap();
		assert_eq!(bb.min, Vec3::new(-1.0, -2.0, 0.0));
		assert_eq!(bb.max, Vec3::new(1.0, 4.0, 3.0));
		assert!(pts.iter().all(|p| bb.contains(*p)));
	}

	#[test]
	fn empty_input_has_no_box() {
		assert!(BoundingBox::from_points(&[] as &[Vec3]).is_none());
	}

	#[test]
	fn expansion_pads_every_side() {
		let bb = BoundingBox::new(Vec3::zero(), Vec3::zero()).expanded(3.0);
		assert_eq!(bb.extent(), Vec3::splat(6.0));
		assert!(bb.contains(Vec3::new(2.9, -2.9, 0.0)));
		assert!(!bb.contains(Vec3::new(3.1, 0.0, 0.0)));
	}
}
