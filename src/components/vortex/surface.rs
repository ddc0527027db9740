//! Drawing surfaces the particle field paints onto.
//!
//! [`CanvasSurface`] forwards to a browser 2D context. [`RecordingSurface`]
//! keeps the issued commands in memory for headless runs.

use std::fmt;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::SiteError;

/// An HSLA color with percentages for saturation and lightness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
	pub hue: f64,
	pub saturation: f64,
	pub lightness: f64,
	pub alpha: f64,
}

impl fmt::Display for Hsla {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"hsla({}, {}%, {}%, {})",
			self.hue, self.saturation, self.lightness, self.alpha
		)
	}
}

/// Line cap style for strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
	Butt,
	Round,
	Square,
}

impl LineCap {
	/// Canvas `lineCap` keyword.
	pub fn as_css(self) -> &'static str {
		match self {
			LineCap::Butt => "butt",
			LineCap::Round => "round",
			LineCap::Square => "square",
		}
	}
}

/// One line segment with its stroke style.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub width: f64,
	pub cap: LineCap,
	pub color: Hsla,
}

/// Minimal 2D drawing capability needed by the particle field.
pub trait DrawSurface {
	/// Pixel dimensions `(width, height)`.
	fn size(&self) -> (f64, f64);

	/// Fill an axis-aligned rectangle with a CSS color.
	fn fill_rect(&mut self, color: &str, x: f64, y: f64, width: f64, height: f64);

	/// Stroke a single line segment.
	fn stroke_line(&mut self, stroke: &Stroke);
}

/// Browser canvas backed by a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Acquire the 2D context of `canvas`.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SiteError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|_| SiteError::ContextUnavailable)?
			.ok_or(SiteError::ContextUnavailable)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SiteError::ContextUnavailable)?;
		Ok(Self { canvas, ctx })
	}

	/// Set the backing store size in device pixels.
	pub fn set_size(&self, width: f64, height: f64) {
		self.canvas.set_width(width.max(0.0) as u32);
		self.canvas.set_height(height.max(0.0) as u32);
	}
}

impl DrawSurface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.canvas.width() as f64, self.canvas.height() as f64)
	}

	fn fill_rect(&mut self, color: &str, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.set_fill_style_str(color);
		self.ctx.fill_rect(x, y, width, height);
	}

	fn stroke_line(&mut self, stroke: &Stroke) {
		let ctx = &self.ctx;
		ctx.save();
		ctx.set_line_cap(stroke.cap.as_css());
		ctx.set_line_width(stroke.width);
		ctx.set_stroke_style_str(&stroke.color.to_string());
		ctx.begin_path();
		ctx.move_to(stroke.from.0, stroke.from.1);
		ctx.line_to(stroke.to.0, stroke.to.1);
		ctx.stroke();
		ctx.restore();
	}
}

/// A command issued to a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Fill {
		color: String,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	},
	Stroke(Stroke),
}

/// Headless surface that records every command in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
	pub width: f64,
	pub height: f64,
	pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			commands: Vec::new(),
		}
	}

	/// Number of strokes recorded so far.
	pub fn stroke_count(&self) -> usize {
		self.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::Stroke(_)))
			.count()
	}
}

impl DrawSurface for RecordingSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn fill_rect(&mut self, color: &str, x: f64, y: f64, width: f64, height: f64) {
		self.commands.push(DrawCommand::Fill {
			color: color.to_string(),
			x,
			y,
			width,
			height,
		});
	}

	fn stroke_line(&mut self, stroke: &Stroke) {
		self.commands.push(DrawCommand::Stroke(stroke.clone()));
	}
}
