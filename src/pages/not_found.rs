use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="not-found">
			<h1>"Nothing here"</h1>
			<p>"This page wandered off."</p>
			<a href="/">"Back home"</a>
		</main>
	}
}
