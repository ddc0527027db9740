//! Per-particle stroke styling.
//!
//! Each particle is drawn as a short round-capped segment from its current
//! position to its next one. Opacity follows a triangular envelope over the
//! particle's lifetime so trails fade in, peak halfway, and fade out.

use super::surface::{Hsla, LineCap, Stroke};

/// Hue of every stroke. The per-particle hue is kept in the pool but not painted.
pub const STROKE_HUE: f64 = 220.0;
const STROKE_SATURATION: f64 = 90.0;
const STROKE_LIGHTNESS: f64 = 40.0;

/// Triangular fade envelope: 0 at `life = 0`, 1 at `life = ttl / 2`, back to 0 at `ttl`.
///
/// Returns 0 for a non-positive or non-finite `ttl`.
pub fn fade_in_out(life: f64, ttl: f64) -> f64 {
	if !(ttl.is_finite() && ttl > 0.0) || !life.is_finite() {
		return 0.0;
	}
	let half = 0.5 * ttl;
	let alpha = (((life + half) % ttl) - half).abs() / half;
	alpha.clamp(0.0, 1.0)
}

/// Stroke for a particle moving from `from` to `to`.
pub fn particle_stroke(from: (f64, f64), to: (f64, f64), life: f64, ttl: f64, radius: f64) -> Stroke {
	Stroke {
		from,
		to,
		width: radius,
		cap: LineCap::Round,
		color: Hsla {
			hue: STROKE_HUE,
			saturation: STROKE_SATURATION,
			lightness: STROKE_LIGHTNESS,
			alpha: fade_in_out(life, ttl),
		},
	}
}
