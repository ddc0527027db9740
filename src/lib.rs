//! vortex-site: portfolio landing page over an animated particle vortex.
//!
//! This crate renders a client-side Leptos page whose background is a
//! noise-driven particle field drawn on a canvas, with a morphing intro
//! headline and a light/dark theme toggle layered on top.

use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};

pub mod components;
pub mod config;
pub mod dom;
pub mod error;

pub use components::gooey_text::GooeyText;
pub use components::theme::{ThemeMode, ThemeToggle};
pub use components::vortex::{Vortex, VortexConfig};
pub use config::SiteConfig;

use components::theme::provide_theme;
use config::load_site_config;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("vortex-site: logging initialized");
}

/// Page config from the DOM, or the built-in defaults.
fn site_config() -> SiteConfig {
	match load_site_config() {
		Ok(Some(config)) => {
			info!(
				"vortex-site: loaded config with {} particles",
				config.vortex.particle_count
			);
			config
		}
		Ok(None) => SiteConfig::default(),
		Err(e) => {
			warn!("vortex-site: {e}, using defaults");
			SiteConfig::default()
		}
	}
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();
	let theme = provide_theme();
	let config = site_config();

	view! {
		<Html attr:lang="pt-BR" />
		<Title text="Portfólio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="page">
			<ThemeToggle class="page-theme-toggle" />
			<Vortex
				config=config.vortex
				background_color=Signal::derive(move || {
					theme.mode.get().background_color().to_string()
				})
				class="page-hero"
			>
				<Home intro=config.intro />
			</Vortex>
		</main>
	}
}

/// Intro headline for a while, then the welcome block.
#[component]
fn Home(intro: config::IntroConfig) -> impl IntoView {
	let show_intro = RwSignal::new(!intro.texts.is_empty());

	if show_intro.get_untracked() {
		match set_timeout_with_handle(
			move || show_intro.set(false),
			Duration::from_millis(intro.duration_ms),
		) {
			Ok(handle) => on_cleanup(move || handle.clear()),
			Err(_) => show_intro.set(false),
		}
	}

	let texts = intro.texts;
	let interval_ms = intro.interval_ms;

	move || {
		if show_intro.get() {
			view! {
				<div class="home-intro">
					<GooeyText texts=texts.clone() interval_ms=interval_ms text_class="home-intro-text" />
				</div>
			}
			.into_any()
		} else {
			view! {
				<section class="home-welcome">
					<div class="home-welcome-copy">
						<h1 class="home-title">"Bem-vindo!"</h1>
						<p class="home-lead">"Vamos construir juntos?"</p>
					</div>
					<a class="home-explore" href="#">"Explorar ›"</a>
					<nav class="home-social">
						<a class="home-social-link" href="https://www.linkedin.com" aria-label="LinkedIn">"in"</a>
						<a class="home-social-link" href="https://github.com" aria-label="GitHub">"gh"</a>
					</nav>
				</section>
			}
			.into_any()
		}
	}
}
