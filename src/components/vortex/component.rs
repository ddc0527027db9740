//! Leptos component wrapping the particle field canvas.
//!
//! The component mounts a full-viewport canvas, builds a [`ParticleField`]
//! once the canvas is attached, and drives it from a `requestAnimationFrame`
//! loop. A window `resize` listener keeps the canvas and field sized to the
//! viewport. On cleanup the loop is flagged stopped before anything else, so
//! a frame or resize callback already queued by the browser becomes a no-op.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;

use super::particles::ParticleField;
use super::sources::SimplexField;
use super::surface::CanvasSurface;
use super::types::VortexConfig;
use crate::dom;

type Field = ParticleField<SimplexField, fastrand::Rng>;

/// True the first time a condition is reported, false until it is cleared.
#[derive(Default)]
struct WarnOnce(Cell<bool>);

impl WarnOnce {
	fn first(&self) -> bool {
		!self.0.replace(true)
	}

	fn clear(&self) {
		self.0.set(false);
	}
}

/// Shared state between the mount effect, the frame closure and the resize closure.
struct FrameLoop {
	canvas_ref: NodeRef<Canvas>,
	config: VortexConfig,
	field: RefCell<Option<Field>>,
	surface: RefCell<Option<CanvasSurface>>,
	stopped: Cell<bool>,
	context_failed: WarnOnce,
	frame_id: Cell<Option<i32>>,
	animate: RefCell<Option<Closure<dyn FnMut()>>>,
	on_resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoop {
	fn new(canvas_ref: NodeRef<Canvas>, config: VortexConfig) -> Self {
		Self {
			canvas_ref,
			config,
			field: RefCell::new(None),
			surface: RefCell::new(None),
			stopped: Cell::new(false),
			context_failed: WarnOnce::default(),
			frame_id: Cell::new(None),
			animate: RefCell::new(None),
			on_resize: RefCell::new(None),
		}
	}

	/// Install the frame and resize closures and run the first frame.
	fn attach(this: &Rc<Self>) {
		if this.animate.borrow().is_some() || this.stopped.get() {
			return;
		}
		let Ok(window) = dom::window() else {
			warn!("vortex-site: no window, vortex background disabled");
			return;
		};

		let frame_loop = this.clone();
		*this.animate.borrow_mut() = Some(Closure::new(move || {
			if frame_loop.stopped.get() {
				return;
			}
			frame_loop.frame_id.set(None);
			frame_loop.frame();
			frame_loop.schedule();
		}));

		let resize_loop = this.clone();
		*this.on_resize.borrow_mut() = Some(Closure::new(move || {
			if resize_loop.stopped.get() {
				return;
			}
			resize_loop.fit_to_window();
		}));
		if let Some(ref cb) = *this.on_resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		this.frame();
		this.schedule();
	}

	/// Render one frame, creating the surface and field on first use.
	fn frame(&self) {
		if !self.ensure_surface() {
			debug!("vortex-site: canvas not ready, skipping frame");
			return;
		}
		let mut surface = self.surface.borrow_mut();
		let Some(surface) = surface.as_mut() else {
			return;
		};

		let mut field = self.field.borrow_mut();
		match field.as_mut() {
			Some(field) => {
				field.advance_and_render(surface);
			}
			None => {
				let mut rng = fastrand::Rng::new();
				let noise = SimplexField::from_rng(&mut rng);
				let (started, _) = ParticleField::start(self.config.clone(), surface, noise, rng);
				info!(
					"vortex-site: vortex running with {} particles",
					started.len()
				);
				*field = Some(started);
			}
		}
	}

	/// Acquire the canvas context if it is not held yet.
	fn ensure_surface(&self) -> bool {
		if self.surface.borrow().is_some() {
			return true;
		}
		let Some(canvas) = self.canvas_ref.get_untracked() else {
			return false;
		};
		match CanvasSurface::new(canvas) {
			Ok(surface) => {
				self.context_failed.clear();
				*self.surface.borrow_mut() = Some(surface);
				self.fit_to_window();
				true
			}
			Err(err) => {
				if self.context_failed.first() {
					warn!("vortex-site: {err}, retrying every frame");
				} else {
					debug!("vortex-site: {err}");
				}
				false
			}
		}
	}

	fn fit_to_window(&self) {
		let Ok(window) = dom::window() else {
			return;
		};
		let (width, height) = dom::window_size(&window);
		if let Some(ref surface) = *self.surface.borrow() {
			surface.set_size(width, height);
		}
		if let Some(ref mut field) = *self.field.borrow_mut() {
			field.resize(width, height);
		}
	}

	fn schedule(&self) {
		if self.stopped.get() {
			return;
		}
		let Ok(window) = dom::window() else {
			return;
		};
		if let Some(ref cb) = *self.animate.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.frame_id.set(Some(id)),
				Err(_) => warn!("vortex-site: requestAnimationFrame failed, animation halted"),
			}
		}
	}

	fn set_background(&self, color: String) {
		if let Some(ref mut field) = *self.field.borrow_mut() {
			field.set_background(color);
		}
	}

	/// Cancel the pending frame, detach the resize listener and drop the pool.
	fn stop(&self) {
		if self.stopped.replace(true) {
			return;
		}
		if let Ok(window) = dom::window() {
			if let Some(id) = self.frame_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *self.on_resize.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if let Some(mut field) = self.field.borrow_mut().take() {
			field.stop();
		}
		self.surface.borrow_mut().take();
		// Both closures hold an Rc back to this loop.
		self.animate.borrow_mut().take();
		self.on_resize.borrow_mut().take();
	}
}

/// Full-viewport animated particle background with content layered on top.
///
/// `config` controls the pool size and spawn ranges. When `background_color`
/// is given it overrides `config.background_color` and is applied live, without
/// respawning particles.
#[component]
pub fn Vortex(
	#[prop(optional)] config: Option<VortexConfig>,
	#[prop(optional, into)] background_color: Option<Signal<String>>,
	#[prop(optional, into)] class: String,
	#[prop(optional)] children: Option<Children>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();

	let mut config = config.unwrap_or_default();
	if let Some(color) = background_color {
		config.background_color = color.get_untracked();
	}
	let frame_loop = Rc::new(FrameLoop::new(canvas_ref, config));

	let mount_loop = frame_loop.clone();
	Effect::new(move |_| {
		if canvas_ref.get().is_some() {
			FrameLoop::attach(&mount_loop);
		}
	});

	if let Some(color) = background_color {
		let color_loop = frame_loop.clone();
		Effect::new(move |_| {
			color_loop.set_background(color.get());
		});
	}

	let teardown = SendWrapper::new(frame_loop);
	on_cleanup(move || {
		teardown.stop();
		debug!("vortex-site: vortex background torn down");
	});

	view! {
		<div class=format!("vortex {class}")>
			<div class="vortex-layer">
				<canvas node_ref=canvas_ref class="vortex-canvas" style="display: block;" />
			</div>
			<div class="vortex-content">{children.map(|children| children())}</div>
		</div>
	}
}
