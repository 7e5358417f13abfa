use leptos::ev::MouseEvent;
use leptos::prelude::*;

use super::session::{ThoughtSession, ThoughtTiming};
use super::stream::ThoughtStream;
use crate::content::{SiteContent, ThoughtKind};
use crate::schedule::{BrowserScheduler, random_seed};

fn kind_class(kind: ThoughtKind) -> &'static str {
	match kind {
		ThoughtKind::Premise => "thought-node premise",
		ThoughtKind::Reasoning => "thought-node reasoning",
		ThoughtKind::Question => "thought-node question",
		ThoughtKind::Insight => "thought-node insight",
		ThoughtKind::Conclusion => "thought-node conclusion",
	}
}

/// Corner panel that now and then walks through a chain of reasoning.
#[component]
pub fn ThoughtPanel() -> impl IntoView {
	let chains = use_context::<SiteContent>().unwrap_or_default().thoughts;
	let stream = RwSignal::new(ThoughtStream::new(chains.clone()));
	let session = ThoughtSession::new(
		BrowserScheduler,
		ThoughtStream::new(chains),
		ThoughtTiming::default(),
		random_seed(),
		move |s| {
			let _ = stream.try_set(s.clone());
		},
	);
	session.run();
	let session = StoredValue::new_local(session);
	on_cleanup(move || {
		if let Some(s) = session.try_get_value() {
			s.teardown();
		}
	});

	let toggle = move |_: MouseEvent| session.get_value().toggle_expanded();
	let heading = move || {
		stream.with(|s| match s.topic() {
			Some(topic) => format!("Thinking: {topic}"),
			None => "Thought Stream".to_string(),
		})
	};
	let expanded = move || stream.with(ThoughtStream::is_expanded);

	view! {
		<div class="thought-stream">
			<Show
				when=expanded
				fallback=move || view! { <button class="thought-launcher" on:click=toggle>{heading}</button> }
			>
				<div class="thought-panel">
					<header class="thought-header">
						<h3>{heading}</h3>
						<Show when=move || !stream.with(ThoughtStream::is_active)>
							<button on:click=move |_| session.get_value().think()>"Think"</button>
						</Show>
						<button on:click=toggle>"Collapse"</button>
						<button on:click=move |_| session.get_value().close()>"Close"</button>
					</header>
					<ol class="thought-chain">
						{move || {
							stream
								.with(|s| s.visible_nodes().to_vec())
								.into_iter()
								.enumerate()
								.map(|(i, node)| {
									view! {
										<li class=kind_class(node.kind)>
											<span class="thought-kind">{node.kind.label()}</span>
											<span class="thought-step">{format!("Step {}", i + 1)}</span>
											<p>{node.content}</p>
										</li>
									}
								})
								.collect_view()
						}}
					</ol>
					<Show when=move || stream.with(ThoughtStream::has_more)>
						<div class="thought-processing">"..."</div>
					</Show>
					<Show when=move || !stream.with(ThoughtStream::is_active)>
						<p class="thought-empty">"No active thought stream"</p>
					</Show>
				</div>
			</Show>
		</div>
	}
}
