//! Noise-driven particle field.
//!
//! Particles live in one flat `Vec<f64>`, nine numbers per particle, so a
//! frame walks a single contiguous buffer. Each frame samples a simplex field
//! at the particle's position and time, turns the sample into a heading,
//! eases the velocity toward it and strokes the step. A particle that leaves
//! the viewport or outlives its ttl is respawned in the same frame.

use std::f64::consts::TAU;

use log::{debug, trace};

use super::sources::{NoiseField, RandomSource};
use super::render::particle_stroke;
use super::surface::DrawSurface;
use super::types::VortexConfig;

/// Numbers stored per particle in the pool.
pub const PARTICLE_PROP_COUNT: usize = 9;

const NOISE_SCALE_XY: f64 = 0.00125;
const NOISE_SCALE_T: f64 = 0.0005;
/// Noise samples in `[-1, 1]` are spread over three full turns.
const NOISE_TURNS: f64 = 3.0;
const VELOCITY_BLEND: f64 = 0.5;
const HUE_RANGE: f64 = 100.0;

/// One particle, unpacked from the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Frames since (re)birth.
	pub life: f64,
	/// Frames the particle may live.
	pub ttl: f64,
	pub speed: f64,
	/// Stroke width.
	pub radius: f64,
	pub hue: f64,
}

impl Particle {
	fn read(slot: &[f64]) -> Self {
		Self {
			x: slot[0],
			y: slot[1],
			vx: slot[2],
			vy: slot[3],
			life: slot[4],
			ttl: slot[5],
			speed: slot[6],
			radius: slot[7],
			hue: slot[8],
		}
	}

	fn write(&self, slot: &mut [f64]) {
		slot.copy_from_slice(&[
			self.x,
			self.y,
			self.vx,
			self.vy,
			self.life,
			self.ttl,
			self.speed,
			self.radius,
			self.hue,
		]);
	}
}

/// Surface dimensions and their center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub center_x: f64,
	pub center_y: f64,
}

impl Viewport {
	/// Non-finite or negative dimensions are stored as 0.
	pub fn new(width: f64, height: f64) -> Self {
		let clean = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
		let (width, height) = (clean(width), clean(height));
		Self {
			width,
			height,
			center_x: width / 2.0,
			center_y: height / 2.0,
		}
	}

	/// Whether `(x, y)` lies in `[0, width) x [0, height)`.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		(0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
	}
}

/// Result of one [`ParticleField::advance_and_render`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
	pub tick: u64,
	pub strokes: usize,
	pub respawned: usize,
}

/// Lifecycle of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	Running,
	Stopped,
}

/// The particle pool together with the viewport, clock and randomness it runs on.
pub struct ParticleField<N, R> {
	config: VortexConfig,
	pool: Vec<f64>,
	viewport: Viewport,
	tick: u64,
	state: RunState,
	noise: N,
	rng: R,
}

impl<N: NoiseField, R: RandomSource> ParticleField<N, R> {
	/// Allocate the pool for a `width` x `height` viewport and spawn every particle.
	pub fn new(config: VortexConfig, width: f64, height: f64, noise: N, rng: R) -> Self {
		let config = config.sanitized();
		let count = config.particle_count;
		let slots = count.checked_mul(PARTICLE_PROP_COUNT).unwrap_or(0);
		let mut field = Self {
			pool: vec![0.0; slots],
			viewport: Viewport::new(width, height),
			tick: 0,
			state: RunState::Running,
			config,
			noise,
			rng,
		};
		for i in 0..field.len() {
			field.spawn(i);
		}
		debug!(
			"vortex-site: particle field started with {} particles on {}x{}",
			field.len(), field.viewport.width, field.viewport.height
		);
		field
	}

	/// Measure `surface`, build the field and render the first frame.
	pub fn start<S: DrawSurface + ?Sized>(
		config: VortexConfig,
		surface: &mut S,
		noise: N,
		rng: R,
	) -> (Self, FrameReport) {
		let (width, height) = surface.size();
		let mut field = Self::new(config, width, height, noise, rng);
		let report = field.render_frame(surface);
		(field, report)
	}

	/// (Re)initialize particle `index` with fresh random parameters.
	fn spawn(&mut self, index: usize) {
		let span = self.viewport.width.max(1.0);
		let c = &self.config;
		let rng = &mut self.rng;

		let particle = Particle {
			x: rng.scaled(span),
			y: self.viewport.center_y + rng.spread(c.range_y),
			vx: 0.0,
			vy: 0.0,
			life: 0.0,
			ttl: c.base_ttl + rng.scaled(c.range_ttl),
			speed: c.base_speed + rng.scaled(c.range_speed),
			radius: c.base_radius + rng.scaled(c.range_radius),
			hue: c.base_hue + rng.scaled(HUE_RANGE),
		};
		particle.write(self.slot_mut(index));
	}

	fn slot_mut(&mut self, index: usize) -> &mut [f64] {
		let start = index * PARTICLE_PROP_COUNT;
		&mut self.pool[start..start + PARTICLE_PROP_COUNT]
	}

	/// Advance every particle one step and paint the frame.
	///
	/// Returns `None` without touching the surface once the field is stopped.
	pub fn advance_and_render<S: DrawSurface + ?Sized>(
		&mut self,
		surface: &mut S,
	) -> Option<FrameReport> {
		match self.state {
			RunState::Running => Some(self.render_frame(surface)),
			RunState::Stopped => None,
		}
	}

	fn render_frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameReport {
		self.tick += 1;
		let Viewport { width, height, .. } = self.viewport;
		surface.fill_rect(&self.config.background_color, 0.0, 0.0, width, height);

		let mut report = FrameReport {
			tick: self.tick,
			strokes: 0,
			respawned: 0,
		};
		let t = self.tick as f64 * NOISE_SCALE_T;

		for i in 0..self.len() {
			let start = i * PARTICLE_PROP_COUNT;
			let mut p = Particle::read(&self.pool[start..start + PARTICLE_PROP_COUNT]);

			let n = self.noise.sample3(p.x * NOISE_SCALE_XY, p.y * NOISE_SCALE_XY, t);
			let angle = n * NOISE_TURNS * TAU;
			p.vx = p.vx * VELOCITY_BLEND + angle.cos() * (1.0 - VELOCITY_BLEND);
			p.vy = p.vy * VELOCITY_BLEND + angle.sin() * (1.0 - VELOCITY_BLEND);

			let (x2, y2) = (p.x + p.vx * p.speed, p.y + p.vy * p.speed);
			surface.stroke_line(&particle_stroke((p.x, p.y), (x2, y2), p.life, p.ttl, p.radius));
			report.strokes += 1;

			p.life += 1.0;

			if !self.viewport.contains(x2, y2) || p.life > p.ttl {
				self.spawn(i);
				report.respawned += 1;
			} else {
				p.x = x2;
				p.y = y2;
				p.write(self.slot_mut(i));
			}
		}

		trace!(
			"vortex-site: frame {} drew {} strokes, respawned {}",
			report.tick, report.strokes, report.respawned
		);
		report
	}

	/// Track a new surface size. Particles keep their positions.
	pub fn resize(&mut self, width: f64, height: f64) {
		if self.state == RunState::Stopped {
			return;
		}
		self.viewport = Viewport::new(width, height);
		debug!(
			"vortex-site: viewport resized to {}x{}",
			self.viewport.width, self.viewport.height
		);
	}

	/// Replace the background fill without respawning anything.
	pub fn set_background(&mut self, color: impl Into<String>) {
		self.config.background_color = color.into();
	}

	/// Stop the field. Further frames and resizes are ignored.
	pub fn stop(&mut self) {
		if self.state == RunState::Running {
			debug!("vortex-site: particle field stopped after {} frames", self.tick);
		}
		self.state = RunState::Stopped;
	}

	pub fn is_running(&self) -> bool {
		self.state == RunState::Running
	}

	/// Number of particles in the pool.
	pub fn len(&self) -> usize {
		self.pool.len() / PARTICLE_PROP_COUNT
	}

	pub fn is_empty(&self) -> bool {
		self.pool.is_empty()
	}

	/// Unpacked copy of particle `index`.
	pub fn particle(&self, index: usize) -> Option<Particle> {
		let start = index.checked_mul(PARTICLE_PROP_COUNT)?;
		let end = start.checked_add(PARTICLE_PROP_COUNT)?;
		self.pool
			.get(start..end)
			.map(Particle::read)
	}

	/// All particles in pool order.
	pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
		self.pool.chunks_exact(PARTICLE_PROP_COUNT).map(Particle::read)
	}

	/// Frames rendered so far.
	pub fn tick(&self) -> u64 {
		self.tick
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn config(&self) -> &VortexConfig {
		&self.config
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::vortex::sources::SimplexField;
	use crate::components::vortex::surface::{DrawCommand, RecordingSurface};
	use crate::components::vortex::types::MAX_PARTICLES;

	struct ConstantNoise(f64);

	impl NoiseField for ConstantNoise {
		fn sample3(&self, _x: f64, _y: f64, _z: f64) -> f64 {
			self.0
		}
	}

	struct ZeroRandom;

	impl RandomSource for ZeroRandom {
		fn next_unit(&mut self) -> f64 {
			0.0
		}
	}

	/// Cycles through a fixed list of draws.
	struct Sequence {
		values: Vec<f64>,
		at: usize,
	}

	impl RandomSource for Sequence {
		fn next_unit(&mut self) -> f64 {
			let v = self.values[self.at % self.values.len()];
			self.at += 1;
			v
		}
	}

	fn config(count: usize) -> VortexConfig {
		VortexConfig {
			particle_count: count,
			..VortexConfig::default()
		}
	}

	#[test]
	fn pool_is_flat_and_sized() {
		let field = ParticleField::new(config(12), 800.0, 600.0, ConstantNoise(0.0), ZeroRandom);
		assert_eq!(field.pool.len(), 12 * PARTICLE_PROP_COUNT);
		assert_eq!(field.len(), 12);
		assert_eq!(field.particles().count(), 12);
		assert!(field.particle(12).is_none());
	}

	#[test]
	fn oversized_config_is_capped_before_allocating() {
		let config = crate::config::SiteConfig::from_json(r#"{"vortex": {"particleCount": 1e30}}"#)
			.unwrap()
			.vortex;
		let field = ParticleField::new(config, 800.0, 600.0, ConstantNoise(0.0), ZeroRandom);
		assert_eq!(field.len(), MAX_PARTICLES);

		let direct = VortexConfig {
			particle_count: usize::MAX,
			..VortexConfig::default()
		};
		let field = ParticleField::new(direct, 800.0, 600.0, ConstantNoise(0.0), ZeroRandom);
		assert_eq!(field.pool.len(), MAX_PARTICLES * PARTICLE_PROP_COUNT);
	}

	#[test]
	fn spawn_with_zero_draws() {
		let field = ParticleField::new(config(1), 800.0, 600.0, ConstantNoise(0.0), ZeroRandom);
		let p = field.particle(0).unwrap();
		assert_eq!(
			p,
			Particle {
				x: 0.0,
				y: 400.0,
				vx: 0.0,
				vy: 0.0,
				life: 0.0,
				ttl: 50.0,
				speed: 0.0,
				radius: 1.0,
				hue: 220.0,
			}
		);
	}

	#[test]
	fn spawn_with_upper_draws_stays_in_ranges() {
		let rng = Sequence {
			values: vec![0.999],
			at: 0,
		};
		let field = ParticleField::new(config(4), 800.0, 600.0, ConstantNoise(0.0), rng);
		for p in field.particles() {
			assert!(p.x < 800.0);
			assert!(p.y > 200.0 && p.y <= 400.0);
			assert!(p.ttl >= 50.0 && p.ttl < 200.0);
			assert!(p.speed < 1.5);
			assert!(p.radius >= 1.0 && p.radius < 3.0);
		}
	}

	#[test]
	fn one_step_blends_velocity_toward_heading() {
		let rng = Sequence {
			values: vec![0.5],
			at: 0,
		};
		// x = 400, y = 300, speed = 0.75
		let mut field = ParticleField::new(config(1), 800.0, 600.0, ConstantNoise(0.0), rng);
		let mut surface = RecordingSurface::new(800.0, 600.0);
		field.advance_and_render(&mut surface).unwrap();

		let p = field.particle(0).unwrap();
		assert_eq!(p.vx, 0.5);
		assert!(p.vy.abs() < 1e-12);
		assert_eq!(p.x, 400.0 + 0.5 * 0.75);
		assert_eq!(p.life, 1.0);

		match &surface.commands[1] {
			DrawCommand::Stroke(s) => {
				assert_eq!(s.from, (400.0, 300.0));
				assert_eq!(s.to.0, 400.0 + 0.5 * 0.75);
				assert_eq!(s.color.alpha, 0.0);
			}
			other => panic!("expected stroke, got {other:?}"),
		}
	}

	#[test]
	fn background_fill_precedes_strokes_every_frame() {
		for count in [0, 1, 5] {
			let mut field = ParticleField::new(
				config(count),
				320.0,
				240.0,
				SimplexField::new(1),
				fastrand::Rng::with_seed(9),
			);
			let mut surface = RecordingSurface::new(320.0, 240.0);
			for _ in 0..3 {
				surface.commands.clear();
				let report = field.advance_and_render(&mut surface).unwrap();
				assert_eq!(report.strokes, count);

				let fills: Vec<usize> = surface
					.commands
					.iter()
					.enumerate()
					.filter(|(_, c)| matches!(c, DrawCommand::Fill { .. }))
					.map(|(i, _)| i)
					.collect();
				assert_eq!(fills, vec![0]);
				assert_eq!(
					surface.commands[0],
					DrawCommand::Fill {
						color: "#000000".to_string(),
						x: 0.0,
						y: 0.0,
						width: 320.0,
						height: 240.0,
					}
				);
			}
		}
	}

	#[test]
	fn single_particle_respawns_once_after_its_ttl() {
		let config = VortexConfig {
			particle_count: 1,
			base_ttl: 10.0,
			..VortexConfig::default()
		};
		let mut field = ParticleField::new(config, 800.0, 600.0, ConstantNoise(0.25), ZeroRandom);
		let mut surface = RecordingSurface::new(800.0, 600.0);

		let mut respawns = Vec::new();
		for _ in 0..11 {
			let report = field.advance_and_render(&mut surface).unwrap();
			respawns.push(report.respawned);
		}

		assert_eq!(respawns.iter().sum::<usize>(), 1);
		assert_eq!(respawns[10], 1);
		assert_eq!(field.particle(0).unwrap().life, 0.0);
		assert_eq!(field.tick(), 11);
	}

	#[test]
	fn escaping_particle_is_respawned_in_frame() {
		let config = VortexConfig {
			particle_count: 1,
			base_speed: 50.0,
			range_speed: 0.0,
			..VortexConfig::default()
		};
		// Heading 0 points right; spawn near the right edge.
		let rng = Sequence {
			values: vec![0.99],
			at: 0,
		};
		let mut field = ParticleField::new(config, 100.0, 600.0, ConstantNoise(0.0), rng);
		let before = field.particle(0).unwrap();
		assert!(before.x + 0.5 * 50.0 >= 100.0);

		let mut surface = RecordingSurface::new(100.0, 600.0);
		let report = field.advance_and_render(&mut surface).unwrap();
		assert_eq!(report.respawned, 1);

		let after = field.particle(0).unwrap();
		assert!(field.viewport().contains(after.x, after.y));
		assert_eq!(after.life, 0.0);
	}

	#[test]
	fn spawn_in_a_short_viewport_is_retried_every_frame() {
		// y = center_y + rangeY = 150 lies below a 100 px tall viewport.
		let mut field = ParticleField::new(config(1), 800.0, 100.0, ConstantNoise(0.0), ZeroRandom);
		let p = field.particle(0).unwrap();
		assert_eq!(p.y, 150.0);
		assert!(!field.viewport().contains(p.x, p.y));

		let mut surface = RecordingSurface::new(800.0, 100.0);
		for _ in 0..3 {
			let report = field.advance_and_render(&mut surface).unwrap();
			assert_eq!(report.respawned, 1);
			assert_eq!(field.particle(0).unwrap().life, 0.0);
		}
	}

	#[test]
	fn runs_are_identical_under_fixed_randomness() {
		let run = || {
			let mut field = ParticleField::new(
				config(40),
				640.0,
				480.0,
				SimplexField::new(3),
				fastrand::Rng::with_seed(1234),
			);
			let mut surface = RecordingSurface::new(640.0, 480.0);
			for _ in 0..60 {
				field.advance_and_render(&mut surface);
			}
			surface.commands
		};
		let (a, b) = (run(), run());
		assert_eq!(a.len(), 60 * 41);
		assert_eq!(a, b);
	}

	#[test]
	fn zero_sized_viewport_stays_finite() {
		let mut field = ParticleField::new(
			config(50),
			800.0,
			600.0,
			SimplexField::new(5),
			fastrand::Rng::with_seed(5),
		);
		field.resize(0.0, 0.0);
		let mut surface = RecordingSurface::new(0.0, 0.0);
		let report = field.advance_and_render(&mut surface).unwrap();
		assert_eq!(report.respawned, 50);

		for p in field.particles() {
			assert!(p.x.is_finite() && p.y.is_finite());
			assert!(p.vx.is_finite() && p.vy.is_finite());
		}
		field.advance_and_render(&mut surface).unwrap();
	}

	#[test]
	fn resize_keeps_positions_and_recenters() {
		let mut field = ParticleField::new(
			config(10),
			800.0,
			600.0,
			ConstantNoise(0.0),
			fastrand::Rng::with_seed(2),
		);
		let before: Vec<Particle> = field.particles().collect();
		field.resize(1024.0, 768.0);
		let after: Vec<Particle> = field.particles().collect();
		assert_eq!(before, after);
		assert_eq!(field.viewport().center_x, 512.0);
		assert_eq!(field.viewport().center_y, 384.0);
	}

	#[test]
	fn start_renders_first_frame() {
		let mut surface = RecordingSurface::new(300.0, 200.0);
		let (field, report) =
			ParticleField::start(config(3), &mut surface, ConstantNoise(0.0), ZeroRandom);
		assert_eq!(report.tick, 1);
		assert_eq!(field.viewport().width, 300.0);
		assert_eq!(surface.stroke_count(), 3);
	}

	#[test]
	fn stop_is_idempotent_and_blocks_frames() {
		let mut field = ParticleField::new(config(3), 300.0, 200.0, ConstantNoise(0.0), ZeroRandom);
		let mut surface = RecordingSurface::new(300.0, 200.0);
		field.stop();
		field.stop();
		assert!(!field.is_running());
		assert!(field.advance_and_render(&mut surface).is_none());
		assert!(surface.commands.is_empty());

		field.resize(10.0, 10.0);
		assert_eq!(field.viewport().width, 300.0);
	}

	#[test]
	fn set_background_keeps_pool() {
		let mut field = ParticleField::new(
			config(8),
			300.0,
			200.0,
			ConstantNoise(0.0),
			fastrand::Rng::with_seed(8),
		);
		let before: Vec<Particle> = field.particles().collect();
		field.set_background("white");
		assert_eq!(field.config().background_color, "white");
		assert_eq!(before, field.particles().collect::<Vec<_>>());
	}

	#[test]
	fn empty_field_only_paints_background() {
		let config = VortexConfig {
			particle_count: 0,
			..VortexConfig::default()
		};
		let mut field = ParticleField::new(config, 300.0, 200.0, ConstantNoise(0.0), ZeroRandom);
		assert!(field.is_empty());
		let mut surface = RecordingSurface::new(300.0, 200.0);
		let report = field.advance_and_render(&mut surface).unwrap();
		assert_eq!(report.strokes, 0);
		assert_eq!(surface.commands.len(), 1);
	}

	proptest! {
		#[test]
		fn life_and_bounds_hold_after_every_frame(
			seed in any::<u64>(),
			noise_seed in any::<u32>(),
			width in 1.0f64..1200.0,
			height in 1.0f64..900.0,
			frames in 1usize..40,
		) {
			let config = VortexConfig {
				particle_count: 25,
				base_speed: 2.0,
				range_speed: 6.0,
				..VortexConfig::default()
			};
			let mut field = ParticleField::new(
				config,
				width,
				height,
				SimplexField::new(noise_seed),
				fastrand::Rng::with_seed(seed),
			);
			let mut surface = RecordingSurface::new(width, height);
			for _ in 0..frames {
				surface.commands.clear();
				field.advance_and_render(&mut surface);
				for p in field.particles() {
					prop_assert!(p.life >= 0.0 && p.life <= p.ttl);
					prop_assert!(p.x.is_finite() && p.y.is_finite());
					// Fresh spawns sit at center_y +/- rangeY, which can lie outside a
					// viewport shorter than 2 * rangeY; only committed steps are bounded.
					if p.life > 0.0 {
						prop_assert!(field.viewport().contains(p.x, p.y));
					}
				}
			}
		}
	}
}
