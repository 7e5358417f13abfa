//! Landing heading: the title types itself out under a rotating tagline.

use gloo::timers::callback::Interval;
use leptos::prelude::*;

use crate::components::chat::Typewriter;
use crate::content::{HeroContent, SiteContent};

const TYPE_MS: u32 = 80;
const ROTATE_MS: u32 = 3_000;

#[derive(Clone, Debug, PartialEq, Eq)]
struct HeroState {
	title: Typewriter,
	taglines: Vec<String>,
	current: usize,
}

impl HeroState {
	fn new(content: HeroContent) -> Self {
		Self {
			title: Typewriter::new(content.title),
			taglines: content.taglines,
			current: 0,
		}
	}

	/// Returns false once the whole title is visible.
	fn type_step(&mut self) -> bool {
		self.title.step()
	}

	fn rotate(&mut self) {
		if !self.taglines.is_empty() {
			self.current = (self.current + 1) % self.taglines.len();
		}
	}

	fn tagline(&self) -> &str {
		self.taglines.get(self.current).map_or("", String::as_str)
	}
}

#[component]
pub fn Hero() -> impl IntoView {
	let content = use_context::<SiteContent>().unwrap_or_default().hero;
	let state = RwSignal::new(HeroState::new(content));
	let typing = StoredValue::new_local(None::<Interval>);
	let rotation = StoredValue::new_local(None::<Interval>);

	typing.set_value(Some(Interval::new(TYPE_MS, move || {
		let more = state.try_update(HeroState::type_step).unwrap_or(false);
		if !more {
			let _ = typing.try_set_value(None);
		}
	})));
	rotation.set_value(Some(Interval::new(ROTATE_MS, move || {
		let _ = state.try_update(HeroState::rotate);
	})));

	on_cleanup(move || {
		let _ = typing.try_set_value(None);
		let _ = rotation.try_set_value(None);
	});

	view! {
		<header class="hero">
			<h1 class="hero-title">
				{move || state.with(|s| s.title.visible().to_string())}
				<span
					class="hero-cursor"
					style:visibility=move || {
						if state.with(|s| s.title.is_complete()) { "hidden" } else { "visible" }
					}
				>
					"|"
				</span>
			</h1>
			<p class="hero-tagline">{move || state.with(|s| s.tagline().to_string())}</p>
		</header>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> HeroState {
		HeroState::new(HeroContent {
			title: "Hi!".to_string(),
			taglines: vec!["one".to_string(), "two".to_string()],
		})
	}

	#[test]
	fn title_types_one_char_at_a_time() {
		let mut s = state();
		assert_eq!(s.title.visible(), "");
		let mut steps = 0;
		while s.type_step() {
			steps += 1;
		}
		assert_eq!(steps, 3);
		assert_eq!(s.title.visible(), "Hi!");
	}

	#[test]
	fn taglines_wrap_around() {
		let mut s = state();
		assert_eq!(s.tagline(), "one");
		s.rotate();
		assert_eq!(s.tagline(), "two");
		s.rotate();
		assert_eq!(s.tagline(), "one");
	}

	#[test]
	fn no_taglines_is_blank() {
		let mut s = HeroState::new(HeroContent::default());
		s.rotate();
		assert_eq!(s.tagline(), "");
		assert!(!s.type_step());
	}
}
