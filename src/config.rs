//! Site configuration embedded in the page.
//!
//! Expected format: JSON in `<script id="site-config" type="application/json">`,
//! e.g. `{ "vortex": { "particleCount": 500 }, "intro": { "intervalMs": 4000 } }`.
//! Every key is optional.

use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::vortex::VortexConfig;
use crate::dom;
use crate::error::SiteError;

const CONFIG_ELEMENT_ID: &str = "site-config";

/// Intro headline shown before the welcome block.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntroConfig {
	pub texts: Vec<String>,
	/// Time each phrase stays on screen.
	pub interval_ms: u64,
	/// Time until the intro gives way to the welcome block.
	pub duration_ms: u64,
}

impl Default for IntroConfig {
	fn default() -> Self {
		Self {
			texts: [
				"Olá visitante",
				"Me chamo Yves",
				"Sou Desenvolvedor Full Stack",
				"E este é meu Portfólio",
				"Fique a vontade!",
			]
			.into_iter()
			.map(String::from)
			.collect(),
			interval_ms: 4000,
			duration_ms: 20000,
		}
	}
}

/// Everything the page can be configured with.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
	pub vortex: VortexConfig,
	pub intro: IntroConfig,
}

impl Default for SiteConfig {
	fn default() -> Self {
		Self {
			vortex: VortexConfig {
				particle_count: 500,
				base_radius: 4.0,
				..VortexConfig::default()
			},
			intro: IntroConfig::default(),
		}
	}
}

impl SiteConfig {
	/// Parse and sanitize a JSON document.
	pub fn from_json(json: &str) -> Result<Self, SiteError> {
		let mut config: SiteConfig = serde_json::from_str(json)?;
		config.vortex = config.vortex.sanitized();
		Ok(config)
	}
}

/// Load the config element if the page has one.
pub fn load_site_config() -> Result<Option<SiteConfig>, SiteError> {
	let Some(element) = dom::document()?.get_element_by_id(CONFIG_ELEMENT_ID) else {
		return Ok(None);
	};
	let Ok(script) = element.dyn_into::<HtmlScriptElement>() else {
		return Ok(None);
	};
	let json = script.text().unwrap_or_default();
	if json.trim().is_empty() {
		return Ok(None);
	}
	SiteConfig::from_json(&json).map(Some)
}
