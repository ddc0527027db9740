//! Randomness seams for the particle field.
//!
//! The flow direction comes from a smooth 3D noise field and spawn parameters
//! come from a uniform source. Both sit behind small traits so a test can pin
//! them to fixed values.

use noise::{NoiseFn, OpenSimplex};

/// A smooth scalar field sampled in (x, y, time).
pub trait NoiseField {
	/// Sample the field. Implementations return values in `[-1, 1]`.
	fn sample3(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Simplex noise seeded once at construction.
pub struct SimplexField {
	inner: OpenSimplex,
}

impl SimplexField {
	/// Build the field for `seed`; the same seed always yields the same field.
	pub fn new(seed: u32) -> Self {
		Self {
			inner: OpenSimplex::new(seed),
		}
	}

	/// Seed the field from `rng`, so one generator drives all randomness.
	pub fn from_rng(rng: &mut fastrand::Rng) -> Self {
		Self::new(rng.u32(..))
	}
}

impl NoiseField for SimplexField {
	fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
		self.inner.get([x, y, z]).clamp(-1.0, 1.0)
	}
}

/// Uniform random draws used when a particle is (re)spawned.
pub trait RandomSource {
	/// Next value in `[0, 1)`.
	fn next_unit(&mut self) -> f64;

	/// Uniform value in `[0, n)`.
	fn scaled(&mut self, n: f64) -> f64 {
		self.next_unit() * n
	}

	/// Uniform value in `(-n, n]`.
	fn spread(&mut self, n: f64) -> f64 {
		n - self.scaled(2.0 * n)
	}
}

impl RandomSource for fastrand::Rng {
	fn next_unit(&mut self) -> f64 {
		self.f64()
	}
}
