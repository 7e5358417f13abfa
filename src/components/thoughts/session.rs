use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::stream::{ThoughtStep, ThoughtStream};
use crate::schedule::Scheduler;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThoughtTiming {
	/// How often to consider starting a chain.
	pub poll_ms: u32,
	/// Probability of starting on each poll while hidden.
	pub chance: f64,
	/// Delay between nodes.
	pub step_ms: u32,
	/// How long a finished chain stays up.
	pub linger_ms: u32,
}

impl Default for ThoughtTiming {
	fn default() -> Self {
		Self {
			poll_ms: 15_000,
			chance: 0.3,
			step_ms: 3_000,
			linger_ms: 5_000,
		}
	}
}

struct ThoughtInner<S: Scheduler> {
	scheduler: S,
	timing: ThoughtTiming,
	stream: RefCell<ThoughtStream>,
	poll: RefCell<Option<S::Task>>,
	pending: RefCell<Option<S::Task>>,
	rng: RefCell<SmallRng>,
	closed: Cell<bool>,
	observer: Box<dyn Fn(&ThoughtStream)>,
}

/// Timers around a `ThoughtStream`: a repeating poll plus one reveal or
/// linger timer at a time.
pub struct ThoughtSession<S: Scheduler> {
	inner: Rc<ThoughtInner<S>>,
}

impl<S: Scheduler> Clone for ThoughtSession<S> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<S: Scheduler> ThoughtSession<S> {
	pub fn new(
		scheduler: S,
		stream: ThoughtStream,
		timing: ThoughtTiming,
		seed: u64,
		observer: impl Fn(&ThoughtStream) + 'static,
	) -> Self {
		Self {
			inner: Rc::new(ThoughtInner {
				scheduler,
				timing,
				stream: RefCell::new(stream),
				poll: RefCell::new(None),
				pending: RefCell::new(None),
				rng: RefCell::new(SmallRng::seed_from_u64(seed)),
				closed: Cell::new(false),
				observer: Box::new(observer),
			}),
		}
	}

	pub fn snapshot(&self) -> ThoughtStream {
		self.inner.stream.borrow().clone()
	}

	/// Begin polling for spontaneous chains.
	pub fn run(&self) {
		if self.inner.closed.get() {
			return;
		}
		ThoughtInner::schedule_poll(&self.inner);
	}

	/// Start a random chain now, if none is showing.
	pub fn think(&self) {
		if self.inner.closed.get() {
			return;
		}
		ThoughtInner::try_start(&self.inner, 0.0, 1.0);
	}

	pub fn close(&self) {
		if self.inner.closed.get() {
			return;
		}
		self.inner.pending.borrow_mut().take();
		self.inner.stream.borrow_mut().close();
		self.inner.notify();
	}

	pub fn toggle_expanded(&self) {
		if self.inner.closed.get() {
			return;
		}
		self.inner.stream.borrow_mut().toggle_expanded();
		self.inner.notify();
	}

	pub fn teardown(&self) {
		self.inner.closed.set(true);
		self.inner.poll.borrow_mut().take();
		self.inner.pending.borrow_mut().take();
	}
}

impl<S: Scheduler> ThoughtInner<S> {
	fn notify(&self) {
		(self.observer)(&self.stream.borrow());
	}

	fn schedule_poll(this: &Rc<Self>) {
		let weak = Rc::downgrade(this);
		let task = this.scheduler.after(this.timing.poll_ms, move || {
			if let Some(inner) = weak.upgrade() {
				ThoughtInner::poll(&inner);
			}
		});
		*this.poll.borrow_mut() = Some(task);
	}

	fn poll(this: &Rc<Self>) {
		if this.closed.get() {
			return;
		}
		let roll = this.rng.borrow_mut().r#gen::<f64>();
		ThoughtInner::try_start(this, roll, this.timing.chance);
		ThoughtInner::schedule_poll(this);
	}

	fn try_start(this: &Rc<Self>, roll: f64, chance: f64) {
		let pick = this.rng.borrow_mut().r#gen::<u32>() as usize;
		let started = this.stream.borrow_mut().roll(roll, chance, pick);
		if !started {
			return;
		}
		debug!("thinking about {:?}", this.stream.borrow().topic());
		this.notify();
		ThoughtInner::schedule(this, this.timing.step_ms, ThoughtInner::step);
	}

	fn schedule(this: &Rc<Self>, delay_ms: u32, action: fn(&Rc<Self>)) {
		let weak = Rc::downgrade(this);
		let task = this.scheduler.after(delay_ms, move || {
			if let Some(inner) = weak.upgrade() {
				if !inner.closed.get() {
					action(&inner);
				}
			}
		});
		*this.pending.borrow_mut() = Some(task);
	}

	fn step(this: &Rc<Self>) {
		let step = this.stream.borrow_mut().step();
		match step {
			ThoughtStep::Revealed => {
				this.notify();
				ThoughtInner::schedule(this, this.timing.step_ms, ThoughtInner::step);
			}
			ThoughtStep::Lingering => {
				this.notify();
				ThoughtInner::schedule(this, this.timing.linger_ms, ThoughtInner::expire);
			}
			ThoughtStep::Idle => {
				this.pending.borrow_mut().take();
			}
		}
	}

	fn expire(this: &Rc<Self>) {
		this.pending.borrow_mut().take();
		this.stream.borrow_mut().expire();
		this.notify();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::content::{ThoughtChain, ThoughtKind, ThoughtNode};
	use crate::schedule::manual::ManualScheduler;

	fn chains() -> Vec<ThoughtChain> {
		vec![ThoughtChain {
			topic: "AI Ethics".to_string(),
			nodes: (0..3)
				.map(|i| ThoughtNode {
					kind: ThoughtKind::Premise,
					content: i.to_string(),
				})
				.collect(),
		}]
	}

	fn session(timing: ThoughtTiming) -> (ThoughtSession<ManualScheduler>, ManualScheduler) {
		let scheduler = ManualScheduler::default();
		let s = ThoughtSession::new(scheduler.clone(), ThoughtStream::new(chains()), timing, 7, |_| {});
		(s, scheduler)
	}

	#[test]
	fn manual_chain_reveals_lingers_and_hides() {
		let (s, scheduler) = session(ThoughtTiming::default());
		s.think();
		assert_eq!(s.snapshot().visible_nodes().len(), 1);

		scheduler.advance(3_000.0);
		scheduler.advance(3_000.0);
		assert_eq!(s.snapshot().visible_nodes().len(), 3);

		scheduler.advance(3_000.0);
		assert!(s.snapshot().is_lingering());
		scheduler.advance(4_999.0);
		assert!(s.snapshot().is_active());
		scheduler.advance(1.0);
		assert!(!s.snapshot().is_active());
		assert_eq!(scheduler.pending(), 0);
	}

	#[test]
	fn certain_poll_starts_a_chain() {
		let timing = ThoughtTiming {
			chance: 1.0,
			..ThoughtTiming::default()
		};
		let (s, scheduler) = session(timing);
		s.run();
		scheduler.advance(14_999.0);
		assert!(!s.snapshot().is_active());
		scheduler.advance(1.0);
		assert_eq!(s.snapshot().topic(), Some("AI Ethics"));
		// the poll keeps running alongside the reveal timer
		assert_eq!(scheduler.pending_timers(), 2);
	}

	#[test]
	fn impossible_poll_never_starts() {
		let timing = ThoughtTiming {
			chance: 0.0,
			..ThoughtTiming::default()
		};
		let (s, scheduler) = session(timing);
		s.run();
		scheduler.advance(15_000.0 * 10.0);
		assert!(!s.snapshot().is_active());
	}

	#[test]
	fn close_cancels_the_reveal() {
		let (s, scheduler) = session(ThoughtTiming::default());
		s.toggle_expanded();
		s.think();
		s.close();
		assert_eq!(scheduler.pending(), 0);
		let snap = s.snapshot();
		assert!(!snap.is_active());
		assert!(!snap.is_expanded());
	}

	#[test]
	fn teardown_cancels_polling() {
		let (s, scheduler) = session(ThoughtTiming::default());
		s.run();
		s.think();
		s.teardown();
		assert_eq!(scheduler.pending(), 0);
		s.run();
		s.think();
		assert_eq!(scheduler.pending(), 0);
	}
}
