//! Headline that morphs between phrases.
//!
//! Each phrase blurs in through an SVG alpha-threshold filter, which makes the
//! glyph edges merge like liquid while they sharpen. The blur itself is the
//! `gooey-in` CSS animation on `.gooey-word`, shipped with the component in a
//! `<style>` element; re-creating the span on every change restarts it.

use std::time::Duration;

use leptos::prelude::*;
use log::warn;

/// Alpha row `0 0 0 255 -140` snaps the blurred alpha to a hard edge.
const THRESHOLD_FILTER: &str = r#"<defs><filter id="threshold"><feColorMatrix in="SourceGraphic" type="matrix" values="1 0 0 0 0 0 1 0 0 0 0 0 1 0 0 0 0 0 255 -140"/></filter></defs>"#;

/// Blur-in transition for each phrase.
const GOOEY_STYLE: &str = "\
.gooey-text { position: relative; }
.gooey-defs { position: absolute; width: 0; height: 0; }
.gooey-stage { display: flex; align-items: center; justify-content: center; }
.gooey-word { position: absolute; display: inline-block; text-align: center; user-select: none; animation: gooey-in 1s ease-out both; }
@keyframes gooey-in { from { opacity: 0; filter: blur(8px); } to { opacity: 1; filter: blur(0px); } }
";

/// Position in a looping list of phrases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextCycle {
	len: usize,
	index: usize,
}

impl TextCycle {
	pub fn new(len: usize) -> Self {
		Self { len, index: 0 }
	}

	/// Index of the phrase on screen, `None` when there are no phrases.
	pub fn current(&self) -> Option<usize> {
		(self.len > 0).then_some(self.index)
	}

	/// Move to the next phrase, wrapping to the first.
	pub fn advance(&mut self) -> Option<usize> {
		if self.len == 0 {
			return None;
		}
		self.index = (self.index + 1) % self.len;
		Some(self.index)
	}
}

/// Cycles through `texts`, switching every `interval_ms`.
#[component]
pub fn GooeyText(
	#[prop(into)] texts: Vec<String>,
	#[prop(default = 2000)] interval_ms: u64,
	#[prop(optional, into)] class: String,
	#[prop(optional, into)] text_class: String,
) -> impl IntoView {
	let cycle = RwSignal::new(TextCycle::new(texts.len()));

	if texts.len() > 1 {
		match set_interval_with_handle(
			move || {
				cycle.update(|c| {
					c.advance();
				})
			},
			Duration::from_millis(interval_ms.max(1)),
		) {
			Ok(handle) => on_cleanup(move || handle.clear()),
			Err(_) => warn!("vortex-site: could not start text cycle"),
		}
	}

	let word = move || {
		let text = cycle
			.with(TextCycle::current)
			.and_then(|i| texts.get(i).cloned())?;
		let text_class = text_class.clone();
		Some(view! { <span class=format!("gooey-word {text_class}")>{text}</span> })
	};

	view! {
		<div class=format!("gooey-text {class}")>
			<style>{GOOEY_STYLE}</style>
			<svg class="gooey-defs" aria-hidden="true" focusable="false" inner_html=THRESHOLD_FILTER></svg>
			<div class="gooey-stage" style="filter: url(#threshold);">{word}</div>
		</div>
	}
}
