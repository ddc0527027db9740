//! Light/dark theme preference.
//!
//! The chosen mode lives in `localStorage["theme"]` and is reflected as a
//! `light`/`dark` class on the document element. Without a stored choice the
//! system `prefers-color-scheme` decides.

use leptos::prelude::*;
use log::{debug, warn};

use crate::dom;
use crate::error::SiteError;

const STORAGE_KEY: &str = "theme";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Site color mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	Light,
	#[default]
	Dark,
}

impl ThemeMode {
	pub fn parse(value: &str) -> Option<Self> {
		match value.trim() {
			"light" => Some(ThemeMode::Light),
			"dark" => Some(ThemeMode::Dark),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ThemeMode::Light => "light",
			ThemeMode::Dark => "dark",
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			ThemeMode::Light => ThemeMode::Dark,
			ThemeMode::Dark => ThemeMode::Light,
		}
	}

	/// Fill color for the vortex background under this mode.
	pub fn background_color(self) -> &'static str {
		match self {
			ThemeMode::Light => "white",
			ThemeMode::Dark => "black",
		}
	}

	/// Stored choice first, then the system preference, then dark.
	pub fn resolve(stored: Option<&str>, system_dark: Option<bool>) -> Self {
		stored
			.and_then(Self::parse)
			.or(system_dark.map(|dark| if dark { ThemeMode::Dark } else { ThemeMode::Light }))
			.unwrap_or_default()
	}
}

fn storage() -> Result<web_sys::Storage, SiteError> {
	dom::window()?
		.local_storage()
		.ok()
		.flatten()
		.ok_or(SiteError::StorageUnavailable)
}

fn system_prefers_dark() -> Option<bool> {
	let query = dom::window().ok()?.match_media(DARK_QUERY).ok()??;
	Some(query.matches())
}

/// Read the preferred mode from the browser.
pub fn load_theme() -> ThemeMode {
	let stored = storage()
		.ok()
		.and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
	ThemeMode::resolve(stored.as_deref(), system_prefers_dark())
}

/// Persist `mode` and apply it to the document element.
pub fn store_theme(mode: ThemeMode) -> Result<(), SiteError> {
	apply_theme(mode)?;
	storage()?
		.set_item(STORAGE_KEY, mode.as_str())
		.map_err(|_| SiteError::StorageUnavailable)
}

fn apply_theme(mode: ThemeMode) -> Result<(), SiteError> {
	let root = dom::document()?
		.document_element()
		.ok_or(SiteError::NoDocument)?;
	let classes = root.class_list();
	let _ = classes.remove_1(mode.toggled().as_str());
	let _ = classes.add_1(mode.as_str());
	Ok(())
}

/// Theme state shared through context.
#[derive(Clone, Copy)]
pub struct ThemeContext {
	pub mode: RwSignal<ThemeMode>,
}

/// Load the stored theme, apply it, and provide a [`ThemeContext`].
pub fn provide_theme() -> ThemeContext {
	let mode = load_theme();
	if let Err(err) = apply_theme(mode) {
		warn!("vortex-site: could not apply theme: {err}");
	}
	let context = ThemeContext {
		mode: RwSignal::new(mode),
	};
	provide_context(context);
	context
}

/// Button that flips between light and dark.
#[component]
pub fn ThemeToggle(#[prop(optional, into)] class: String) -> impl IntoView {
	let theme = use_context::<ThemeContext>().unwrap_or_else(provide_theme);

	let on_click = move |_| {
		let next = theme.mode.get_untracked().toggled();
		theme.mode.set(next);
		match store_theme(next) {
			Ok(()) => debug!("vortex-site: theme set to {}", next.as_str()),
			Err(err) => warn!("vortex-site: theme not persisted: {err}"),
		}
	};

	view! {
		<button
			class=format!("theme-toggle {class}")
			aria-label="Toggle theme"
			on:click=on_click
		>
			{move || if theme.mode.get() == ThemeMode::Dark { "☀" } else { "☾" }}
		</button>
	}
}
