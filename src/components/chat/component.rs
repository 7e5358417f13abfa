use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use log::debug;

use super::conversation::{Conversation, Message, Sender};
use super::session::ChatSession;
use crate::content::{ChatScript, SiteContent};
use crate::schedule::{BrowserScheduler, random_seed};

type BrowserChat = ChatSession<BrowserScheduler>;
type StoredChat = StoredValue<BrowserChat, LocalStorage>;

/// How much of the screen the floating assistant takes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PanelMode {
	#[default]
	Closed,
	Docked,
	Expanded,
}

impl PanelMode {
	pub fn is_open(self) -> bool {
		self != PanelMode::Closed
	}

	/// Switch between docked and expanded. A closed panel stays closed.
	pub fn toggle_expanded(self) -> Self {
		match self {
			PanelMode::Closed => PanelMode::Closed,
			PanelMode::Docked => PanelMode::Expanded,
			PanelMode::Expanded => PanelMode::Docked,
		}
	}

	fn class(self) -> &'static str {
		match self {
			PanelMode::Closed => "closed",
			PanelMode::Docked => "docked",
			PanelMode::Expanded => "expanded",
		}
	}
}

/// Start a session whose every change lands in `conversation`.
fn start_chat(script: &ChatScript, conversation: RwSignal<Conversation>) -> StoredChat {
	let session = ChatSession::new(
		BrowserScheduler,
		script.table(),
		script.timing(),
		random_seed(),
		move |c| {
			let _ = conversation.try_set(c.clone());
		},
	);
	let stored = StoredValue::new_local(session);
	on_cleanup(move || {
		if let Some(s) = stored.try_get_value() {
			s.teardown();
		}
	});
	stored
}

fn script_from_context(pick: fn(SiteContent) -> ChatScript) -> ChatScript {
	pick(use_context::<SiteContent>().unwrap_or_default())
}

/// Message history, thinking indicator and the reply being typed.
#[component]
fn ChatLog(conversation: RwSignal<Conversation>) -> impl IntoView {
	view! {
		<div class="chat-log">
			<For
				each=move || conversation.with(|c| c.messages().to_vec())
				key=|m: &Message| m.id
				children=move |m: Message| {
					let class = match m.sender {
						Sender::User => "chat-message user",
						Sender::Assistant => "chat-message assistant",
					};
					view! { <div class=class>{m.content}</div> }
				}
			/>
			<Show when=move || conversation.with(Conversation::is_thinking)>
				<div class="chat-thinking">"Thinking..."</div>
			</Show>
			{move || {
				conversation
					.with(|c| c.revealed().map(str::to_string))
					.map(|text| {
						view! {
							<div class="chat-message assistant revealing">
								{text}
								<span class="chat-cursor">"|"</span>
							</div>
						}
					})
			}}
		</div>
	}
}

/// Text input plus send button. Disabled while a reply is pending.
#[component]
fn ChatForm(
	session: StoredChat,
	conversation: RwSignal<Conversation>,
	input: RwSignal<String>,
	#[prop(into)] placeholder: String,
) -> impl IntoView {
	let busy = move || !conversation.with(Conversation::is_idle);
	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let text = input.get_untracked();
		match session.get_value().submit(&text) {
			Ok(_) => input.set(String::new()),
			Err(e) => debug!("message not sent: {}", e),
		}
	};

	view! {
		<form class="chat-form" on:submit=on_submit>
			<input
				type="text"
				placeholder=placeholder
				prop:value=move || input.get()
				on:input=move |ev| input.set(event_target_value(&ev))
				disabled=busy
			/>
			<button type="submit" disabled=move || busy() || input.with(|t| t.trim().is_empty())>
				"Send"
			</button>
		</form>
	}
}

/// Floating assistant button that opens into a docked or expanded chat panel.
///
/// Opening an empty conversation greets the visitor, picking the greeting
/// for the first of `interests` the content knows about.
#[component]
pub fn AssistantWidget(#[prop(optional)] interests: Vec<String>) -> impl IntoView {
	let script = script_from_context(|c| c.assistant);
	let conversation = RwSignal::new(Conversation::new());
	let input = RwSignal::new(String::new());
	let mode = RwSignal::new(PanelMode::Closed);
	let session = start_chat(&script, conversation);
	let greeting = script.greeting_for(&interests).map(str::to_string);

	let open = move |_| {
		mode.set(PanelMode::Docked);
		if let Some(text) = &greeting {
			session.get_value().greet(text);
		}
	};

	view! {
		<div class=move || format!("assistant-widget {}", mode.get().class())>
			<button
				class="assistant-launcher"
				on:click=open
				style:display=move || if mode.get().is_open() { "none" } else { "" }
			>
				"Ask my assistant"
			</button>
			<div
				class="assistant-panel"
				style:display=move || if mode.get().is_open() { "" } else { "none" }
			>
				<header class="assistant-header">
					<span>{script.title.clone()}</span>
					<button on:click=move |_| mode.update(|m| *m = m.toggle_expanded())>
						{move || if mode.get() == PanelMode::Expanded { "Shrink" } else { "Expand" }}
					</button>
					<button on:click=move |_| mode.set(PanelMode::Closed)>"Close"</button>
				</header>
				<ChatLog conversation=conversation />
				<ChatForm session=session conversation=conversation input=input placeholder="Ask me anything..." />
			</div>
		</div>
	}
}

/// Inline question-and-answer panel with one-click sample questions.
#[component]
pub fn AskPanel() -> impl IntoView {
	let script = script_from_context(|c| c.ask);
	let conversation = RwSignal::new(Conversation::new());
	let input = RwSignal::new(String::new());
	let session = start_chat(&script, conversation);

	let samples = script
		.samples()
		.into_iter()
		.map(|question| {
			let fill = question.clone();
			view! {
				<button class="ask-sample" on:click=move |_| input.set(fill.clone())>
					{question}
				</button>
			}
		})
		.collect_view();

	view! {
		<section class="ask-panel">
			<header class="ask-header">
				<h2>{script.title.clone()}</h2>
				<button
					class="ask-clear"
					on:click=move |_| session.get_value().clear()
					disabled=move || conversation.with(|c| c.messages().is_empty() && c.is_idle())
				>
					"Clear"
				</button>
			</header>
			<div class="ask-samples">{samples}</div>
			<ChatLog conversation=conversation />
			<ChatForm session=session conversation=conversation input=input placeholder="Ask a question..." />
		</section>
	}
}
