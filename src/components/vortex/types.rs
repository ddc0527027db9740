//! Configuration accepted by the vortex background.

use serde::{Deserialize, Deserializer};

/// Largest pool a config may request.
pub const MAX_PARTICLES: usize = 10_000;

/// Spawn and paint parameters for the particle field.
///
/// Field names follow the camelCase keys used in the page's JSON config
/// (`particleCount`, `rangeY`, `baseHue`, ...). Every key is optional.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VortexConfig {
	/// Number of particles in the pool. Negative or NaN input becomes 0,
	/// fractional input is floored, and anything above [`MAX_PARTICLES`] is capped.
	#[serde(deserialize_with = "particle_count")]
	pub particle_count: usize,
	/// Vertical spawn jitter around the viewport's vertical center.
	pub range_y: f64,
	/// Hue assigned at spawn, before jitter.
	pub base_hue: f64,
	/// Speed multiplier before jitter.
	pub base_speed: f64,
	/// Speed jitter.
	pub range_speed: f64,
	/// Stroke width before jitter.
	pub base_radius: f64,
	/// Stroke width jitter.
	pub range_radius: f64,
	/// CSS color painted over the whole surface every frame.
	pub background_color: String,
	/// Minimum lifetime in frames.
	pub base_ttl: f64,
	/// Lifetime jitter in frames.
	pub range_ttl: f64,
}

impl Default for VortexConfig {
	fn default() -> Self {
		Self {
			particle_count: 700,
			range_y: 100.0,
			base_hue: 220.0,
			base_speed: 0.0,
			range_speed: 1.5,
			base_radius: 1.0,
			range_radius: 2.0,
			background_color: "#000000".to_string(),
			base_ttl: 50.0,
			range_ttl: 150.0,
		}
	}
}

impl VortexConfig {
	/// Replace values that would poison the simulation with NaN or negative spans.
	///
	/// Non-finite numbers fall back to the defaults, jitter ranges are clamped to
	/// be non-negative and the base lifetime to at least one frame.
	pub fn sanitized(self) -> Self {
		let defaults = Self::default();
		let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };

		Self {
			particle_count: self.particle_count.min(MAX_PARTICLES),
			range_y: finite_or(self.range_y, defaults.range_y).max(0.0),
			base_hue: finite_or(self.base_hue, defaults.base_hue),
			base_speed: finite_or(self.base_speed, defaults.base_speed),
			range_speed: finite_or(self.range_speed, defaults.range_speed).max(0.0),
			base_radius: finite_or(self.base_radius, defaults.base_radius),
			range_radius: finite_or(self.range_radius, defaults.range_radius).max(0.0),
			background_color: if self.background_color.trim().is_empty() {
				defaults.background_color
			} else {
				self.background_color
			},
			base_ttl: finite_or(self.base_ttl, defaults.base_ttl).max(1.0),
			range_ttl: finite_or(self.range_ttl, defaults.range_ttl).max(0.0),
		}
	}
}

/// Accepts any JSON number and clamps it into a usable pool size.
fn particle_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = f64::deserialize(deserializer)?;
	Ok(clamp_count(raw))
}

pub(crate) fn clamp_count(raw: f64) -> usize {
	if raw.is_nan() || raw <= 0.0 {
		0
	} else if raw >= MAX_PARTICLES as f64 {
		MAX_PARTICLES
	} else {
		raw.floor() as usize
	}
}
