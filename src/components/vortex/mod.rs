//! Animated particle vortex background.
//!
//! A fixed pool of particles drifts through a time-varying simplex noise
//! field, each drawn every frame as a short round-capped stroke whose opacity
//! fades in and out over the particle's lifetime. The simulation
//! ([`ParticleField`]) knows nothing about the browser: it paints onto any
//! [`DrawSurface`] and draws its randomness from a [`NoiseField`] and a
//! [`RandomSource`], which keeps it testable headless.
//!
//! # Example
//!
//! ```ignore
//! use vortex_site::components::vortex::{Vortex, VortexConfig};
//!
//! let config = VortexConfig { particle_count: 500, base_radius: 4.0, ..Default::default() };
//! view! { <Vortex config=config background_color="black">"Hello"</Vortex> }
//! ```

mod component;
mod particles;
mod render;
pub mod sources;
pub mod surface;
mod types;

pub use component::Vortex;
pub use particles::{FrameReport, PARTICLE_PROP_COUNT, Particle, ParticleField, RunState, Viewport};
pub use render::{STROKE_HUE, fade_in_out};
pub use sources::{NoiseField, RandomSource, SimplexField};
pub use surface::{CanvasSurface, DrawCommand, DrawSurface, RecordingSurface};
pub use types::{MAX_PARTICLES, VortexConfig};
