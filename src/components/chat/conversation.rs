use thiserror::Error;

use super::rules::ResponseTable;
use super::typewriter::Typewriter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
	User,
	Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
	pub id: MessageId,
	pub content: String,
	pub sender: Sender,
}

/// Where a conversation is in its scripted exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ChatPhase {
	/// Accepting input.
	#[default]
	Idle,
	/// Waiting out the thinking delay for `prompt`.
	Thinking { prompt: String },
	/// Exposing a canned response one character at a time.
	Revealing(Typewriter),
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
	#[error("message is empty")]
	Empty,
	#[error("still answering the previous message")]
	Busy,
	#[error("conversation is closed")]
	Closed,
}

/// Progress of one reveal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealStep {
	/// One more character is visible.
	Typed,
	/// The last character landed: the response was appended to the history
	/// and the phase is idle again. The complete text only ever shows up as
	/// that message, never as a revealed prefix.
	Finished(MessageId),
	/// Nothing is being revealed.
	Idle,
}

/// Append-only message history plus the scripted exchange state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conversation {
	messages: Vec<Message>,
	phase: ChatPhase,
	next_id: u64,
}

impl Conversation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn messages(&self) -> &[Message] {
		&self.messages
	}

	pub fn phase(&self) -> &ChatPhase {
		&self.phase
	}

	pub fn is_idle(&self) -> bool {
		self.phase == ChatPhase::Idle
	}

	pub fn is_thinking(&self) -> bool {
		matches!(self.phase, ChatPhase::Thinking { .. })
	}

	/// Currently visible prefix of the response being revealed.
	pub fn revealed(&self) -> Option<&str> {
		match &self.phase {
			ChatPhase::Revealing(t) => Some(t.visible()),
			_ => None,
		}
	}

	fn push(&mut self, sender: Sender, content: String) -> MessageId {
		self.next_id += 1;
		let id = MessageId(self.next_id);
		self.messages.push(Message {
			id,
			content,
			sender,
		});
		id
	}

	/// Add an assistant greeting to an empty, idle conversation.
	pub fn greet(&mut self, greeting: &str) -> Option<MessageId> {
		if !self.messages.is_empty() || !self.is_idle() || greeting.trim().is_empty() {
			return None;
		}
		Some(self.push(Sender::Assistant, greeting.to_string()))
	}

	/// Record the user's message and start thinking about it.
	pub fn submit(&mut self, input: &str) -> Result<MessageId, SubmitError> {
		let input = input.trim();
		if input.is_empty() {
			return Err(SubmitError::Empty);
		}
		if !self.is_idle() {
			return Err(SubmitError::Busy);
		}
		let id = self.push(Sender::User, input.to_string());
		self.phase = ChatPhase::Thinking {
			prompt: input.to_string(),
		};
		Ok(id)
	}

	/// End the thinking delay: look up the response and start revealing it.
	/// Returns false when there was nothing to think about.
	pub fn start_reveal(&mut self, table: &ResponseTable) -> bool {
		let ChatPhase::Thinking { prompt } = &self.phase else {
			return false;
		};
		let response = table.respond(prompt).to_string();
		self.phase = ChatPhase::Revealing(Typewriter::new(response));
		true
	}

	/// Reveal one more character. The step that makes the whole response
	/// visible appends it to the history and returns to idle.
	pub fn reveal_step(&mut self) -> RevealStep {
		let ChatPhase::Revealing(typewriter) = &mut self.phase else {
			return RevealStep::Idle;
		};
		typewriter.step();
		if !typewriter.is_complete() {
			return RevealStep::Typed;
		}
		let ChatPhase::Revealing(typewriter) = std::mem::take(&mut self.phase) else {
			return RevealStep::Idle;
		};
		RevealStep::Finished(self.push(Sender::Assistant, typewriter.into_full()))
	}

	/// Drop every message and any in-flight response.
	pub fn clear(&mut self) {
		self.messages.clear();
		self.phase = ChatPhase::Idle;
	}
}
