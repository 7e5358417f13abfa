use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::conversation::{Conversation, MessageId, RevealStep, SubmitError};
use super::rules::ResponseTable;
use crate::schedule::Scheduler;

/// Pacing of the scripted reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChatTiming {
	pub think_min_ms: u32,
	pub think_max_ms: u32,
	pub reveal_ms: u32,
}

impl Default for ChatTiming {
	fn default() -> Self {
		Self {
			think_min_ms: 1000,
			think_max_ms: 1000,
			reveal_ms: 15,
		}
	}
}

type Observer = Box<dyn Fn(&Conversation)>;

struct ChatInner<S: Scheduler> {
	scheduler: S,
	table: ResponseTable,
	timing: ChatTiming,
	conversation: RefCell<Conversation>,
	pending: RefCell<Option<S::Task>>,
	rng: RefCell<SmallRng>,
	closed: Cell<bool>,
	observer: Observer,
}

/// Drives a `Conversation` through its thinking delay and reveal with timers.
///
/// At most one timer is pending at a time. Clones share the conversation;
/// timers hold only a weak reference, so dropping the last clone cancels them.
pub struct ChatSession<S: Scheduler> {
	inner: Rc<ChatInner<S>>,
}

impl<S: Scheduler> Clone for ChatSession<S> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<S: Scheduler> ChatSession<S> {
	/// `observer` sees the conversation after every change.
	pub fn new(
		scheduler: S,
		table: ResponseTable,
		timing: ChatTiming,
		seed: u64,
		observer: impl Fn(&Conversation) + 'static,
	) -> Self {
		Self {
			inner: Rc::new(ChatInner {
				scheduler,
				table,
				timing,
				conversation: RefCell::new(Conversation::new()),
				pending: RefCell::new(None),
				rng: RefCell::new(SmallRng::seed_from_u64(seed)),
				closed: Cell::new(false),
				observer: Box::new(observer),
			}),
		}
	}

	pub fn snapshot(&self) -> Conversation {
		self.inner.conversation.borrow().clone()
	}

	pub fn greet(&self, greeting: &str) {
		if self.inner.closed.get() {
			return;
		}
		let greeted = self.inner.conversation.borrow_mut().greet(greeting);
		if greeted.is_some() {
			self.inner.notify();
		}
	}

	/// Append the user's message and schedule the reply.
	pub fn submit(&self, input: &str) -> Result<MessageId, SubmitError> {
		if self.inner.closed.get() {
			return Err(SubmitError::Closed);
		}
		let id = self.inner.conversation.borrow_mut().submit(input)?;
		self.inner.notify();

		let timing = self.inner.timing;
		let (lo, hi) = (
			timing.think_min_ms.min(timing.think_max_ms),
			timing.think_max_ms.max(timing.think_min_ms),
		);
		let delay = self.inner.rng.borrow_mut().gen_range(lo..=hi);
		debug!("thinking for {}ms", delay);

		let weak = Rc::downgrade(&self.inner);
		let task = self.inner.scheduler.after(delay, move || {
			if let Some(inner) = weak.upgrade() {
				ChatInner::finish_thinking(&inner);
			}
		});
		*self.inner.pending.borrow_mut() = Some(task);
		Ok(id)
	}

	/// Reset to an empty idle conversation, cancelling any pending reply.
	pub fn clear(&self) {
		if self.inner.closed.get() {
			return;
		}
		self.inner.pending.borrow_mut().take();
		self.inner.conversation.borrow_mut().clear();
		self.inner.notify();
	}

	/// Cancel pending timers for good. Later calls are ignored.
	pub fn teardown(&self) {
		self.inner.closed.set(true);
		self.inner.pending.borrow_mut().take();
	}

	#[cfg(test)]
	fn has_pending_timer(&self) -> bool {
		self.inner.pending.borrow().is_some()
	}
}

impl<S: Scheduler> ChatInner<S> {
	fn notify(&self) {
		(self.observer)(&self.conversation.borrow());
	}

	fn finish_thinking(this: &Rc<Self>) {
		if this.closed.get() {
			return;
		}
		let started = this.conversation.borrow_mut().start_reveal(&this.table);
		if !started {
			this.pending.borrow_mut().take();
			return;
		}
		this.notify();
		ChatInner::schedule_reveal(this);
	}

	fn schedule_reveal(this: &Rc<Self>) {
		let weak = Rc::downgrade(this);
		let task = this.scheduler.after(this.timing.reveal_ms, move || {
			if let Some(inner) = weak.upgrade() {
				ChatInner::reveal(&inner);
			}
		});
		*this.pending.borrow_mut() = Some(task);
	}

	fn reveal(this: &Rc<Self>) {
		if this.closed.get() {
			return;
		}
		let step = this.conversation.borrow_mut().reveal_step();
		match step {
			RevealStep::Typed => {
				this.notify();
				ChatInner::schedule_reveal(this);
			}
			RevealStep::Finished(id) => {
				this.pending.borrow_mut().take();
				debug!("response {:?} revealed", id);
				this.notify();
			}
			RevealStep::Idle => {
				this.pending.borrow_mut().take();
			}
		}
	}
}
