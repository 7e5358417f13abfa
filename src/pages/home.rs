use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::chat::{AskPanel, AssistantWidget};
use crate::components::field::{FieldCanvas, FieldKind};
use crate::components::hero::Hero;
use crate::components::thoughts::ThoughtPanel;
use crate::content::{SiteContent, parse_interests};

/// Landing page: particle backdrop, hero, a neural field with the Q&A panel,
/// and the floating assistant and thought stream.
#[component]
pub fn Home() -> impl IntoView {
	let content = use_context::<SiteContent>().unwrap_or_default();
	let interests = use_query_map()
		.with_untracked(|q| q.get("interests").map(|raw| parse_interests(&raw)))
		.unwrap_or_default();

	view! {
		<FieldCanvas kind=FieldKind::Particles fullscreen=true class="particle-backdrop" />

		<main class="home">
			<Hero />

			<section class="neural-section">
				<div class="neural-stage">
					<FieldCanvas kind=FieldKind::Neural labels=content.neural_labels />
				</div>
				<AskPanel />
			</section>
		</main>

		<AssistantWidget interests=interests />
		<ThoughtPanel />
	}
}
