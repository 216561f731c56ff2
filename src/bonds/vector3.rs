use std::fmt;
use std::ops::{Add, Sub};

pub type Coord = f64;

#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
	pub x: Coord,
	pub y: Coord,
	pub z: Coord,
}

impl Vec3 {
	pub const fn new(x: Coord, y: Coord, z: Coord) -> Self { Self { x, y, z } }
	pub const fn zero() -> Self { Self::new(0.0, 0.0, 0.0) }
	pub fn splat(v: Coord) -> Self { Self::new(v, v, v) }

	pub fn distance_squared(self, other: Vec3) -> Coord {
		let d = self - other;
		d.x * d.x + d.y * d.y + d.z * d.z
	}
	pub fn distance(self, other: Vec3) -> Coord { self.distance_squared(other).sqrt() }

	pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }

	/// Component-wise minimum.
	pub fn min(self, other: Vec3) -> Self {
		Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
	}
	/// Component-wise maximum.
	pub fn max(self, other: Vec3) -> Self {
		Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
	}
}

impl Add for Vec3 {
	type Output = Vec3;
	fn add(self, rhs: Vec3) -> Vec3 { Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}

impl Sub for Vec3 {
	type Output = Vec3;
	fn sub(self, rhs: Vec3) -> Vec3 { Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}

impl fmt::Display for Vec3 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({}, {}, {})", self.x, self.y, self.z) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn distance_matches_pythagoras() {
		let a = Vec3::new(1.0, 2.0, 3.0);
		let b = Vec3::new(4.0, 6.0, 3.0);
		assert_eq!(a.distance_squared(b), 25.0);
		assert_eq!(a.distance(b), 5.0);
	}

	#[test]
	fn componentwise_min_max() {
		let a = Vec3::new(1.0, -2.0, 3.0);
		let b = Vec3::new(-1.0, 2.0, 3.5);
		assert_eq!(a.min(b), Vec3::new(-1.0, -2.0, 3.0));
		assert_eq!(a.max(b), Vec3::new(1.0, 2.0, 3.5));
	}

	#[test]
	fn nan_is_not_finite() {
		assert!(Vec3::new(0.0, 1.0, 2.0).is_finite());
		assert!(!Vec3::new(0.0, f64::NAN, 2.0).is_finite());
		assert!(!Vec3::new(f64::INFINITY, 0.0, 0.0).is_finite());
	}
}
