use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use super::render;
use super::state::FieldState;
use super::surface::Surface;
use super::types::{TickOutcome, Vec2};
use crate::schedule::Scheduler;

struct FieldLoop<S: Scheduler, D: Surface> {
	scheduler: S,
	surface: D,
	field: RefCell<FieldState>,
	pending: RefCell<Option<S::Task>>,
	closed: Cell<bool>,
}

/// Owns a field, its drawing surface and at most one pending frame request.
///
/// Clones share the same loop. Frame callbacks only hold a weak reference, so
/// dropping the last clone cancels the pending frame too.
pub struct AnimationSession<S: Scheduler, D: Surface + 'static> {
	inner: Rc<FieldLoop<S, D>>,
}

impl<S: Scheduler, D: Surface + 'static> Clone for AnimationSession<S, D> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<S: Scheduler, D: Surface + 'static> AnimationSession<S, D> {
	pub fn new(scheduler: S, surface: D, field: FieldState) -> Self {
		Self {
			inner: Rc::new(FieldLoop {
				scheduler,
				surface,
				field: RefCell::new(field),
				pending: RefCell::new(None),
				closed: Cell::new(false),
			}),
		}
	}

	/// (Re)build the entities for `width` x `height` and restart the loop.
	/// Any previously requested frame is cancelled first, so repeated calls
	/// never leave two loops running.
	pub fn initialize(&self, width: f64, height: f64, now: f64) {
		if self.inner.closed.get() {
			return;
		}
		self.inner.pending.borrow_mut().take();
		self.inner.field.borrow_mut().initialize(width, height, now);
		debug!(
			"field initialized: {}x{} with {} entities",
			width,
			height,
			self.inner.field.borrow().entities.len()
		);
		FieldLoop::request_frame(&self.inner);
	}

	/// Initialize from the surface's current size.
	pub fn fit_surface(&self, now: f64) {
		let (w, h) = self.inner.surface.size();
		self.initialize(w, h, now);
	}

	pub fn pointer_entered(&self, at: Vec2, now: f64) {
		self.inner.field.borrow_mut().pointer_entered(at, now);
		self.wake();
	}

	pub fn pointer_moved(&self, at: Vec2, now: f64) {
		self.inner.field.borrow_mut().pointer_moved(at, now);
		self.wake();
	}

	pub fn pointer_left(&self, now: f64) {
		self.inner.field.borrow_mut().pointer_left(now);
		self.wake();
	}

	pub fn click(&self, at: Vec2, now: f64) -> Option<usize> {
		let picked = self.inner.field.borrow_mut().click(at, now);
		self.wake();
		picked
	}

	/// Cancel the pending frame for good. Later calls are ignored.
	pub fn teardown(&self) {
		self.inner.closed.set(true);
		self.inner.pending.borrow_mut().take();
	}

	/// Whether a frame is currently requested.
	pub fn is_running(&self) -> bool {
		self.inner.pending.borrow().is_some()
	}

	#[cfg(test)]
	pub(crate) fn with_field<R>(&self, f: impl FnOnce(&FieldState) -> R) -> R {
		f(&self.inner.field.borrow())
	}

	fn wake(&self) {
		if !self.inner.closed.get() && !self.is_running() {
			debug!("field woke up");
			FieldLoop::request_frame(&self.inner);
		}
	}
}

impl<S: Scheduler, D: Surface + 'static> FieldLoop<S, D> {
	fn request_frame(this: &Rc<Self>) {
		let weak = Rc::downgrade(this);
		let task = this.scheduler.next_frame(move |now| {
			if let Some(inner) = weak.upgrade() {
				FieldLoop::frame(&inner, now);
			}
		});
		*this.pending.borrow_mut() = Some(task);
	}

	fn frame(this: &Rc<Self>, now: f64) {
		if this.closed.get() {
			return;
		}
		let outcome = this.field.borrow_mut().tick(now);
		render::render(&this.field.borrow(), &this.surface);
		match outcome {
			TickOutcome::Advanced => FieldLoop::request_frame(this),
			TickOutcome::Dormant => {
				this.pending.borrow_mut().take();
				debug!("field idle, pausing frames");
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::field::config::FieldConfig;
	use crate::components::field::surface::recording::RecordingSurface;
	use crate::schedule::manual::ManualScheduler;

	fn session(
		config: FieldConfig,
	) -> (
		AnimationSession<ManualScheduler, RecordingSurface>,
		ManualScheduler,
		RecordingSurface,
	) {
		let scheduler = ManualScheduler::default();
		let surface = RecordingSurface::new(800.0, 600.0);
		let field = FieldState::new(config, 17);
		let session = AnimationSession::new(scheduler.clone(), surface.clone(), field);
		(session, scheduler, surface)
	}

	#[test]
	fn each_frame_reschedules_exactly_once() {
		let (session, scheduler, surface) = session(FieldConfig::particles());
		session.fit_surface(0.0);
		for _ in 0..10 {
			assert_eq!(scheduler.run_frame(), 1);
			assert_eq!(scheduler.pending_frames(), 1);
		}
		assert_eq!(surface.frames(), 10);
		assert_eq!(session.with_field(|f| f.entities.len()), 100);
	}

	#[test]
	fn reinitializing_never_doubles_the_loop() {
		let (session, scheduler, surface) = session(FieldConfig::particles());
		session.initialize(800.0, 600.0, 0.0);
		session.initialize(1024.0, 768.0, 0.0);
		session.initialize(1024.0, 768.0, 0.0);
		assert_eq!(scheduler.pending_frames(), 1);

		assert_eq!(scheduler.run_frame(), 1);
		assert_eq!(surface.frames(), 1);
		assert_eq!(session.with_field(|f| f.entities.len()), 128);
	}

	#[test]
	fn teardown_stops_all_callbacks() {
		let (session, scheduler, surface) = session(FieldConfig::neural());
		session.fit_surface(0.0);
		scheduler.run_frame();
		let drawn = surface.frames();

		session.teardown();
		assert_eq!(scheduler.pending(), 0);
		assert!(!session.is_running());

		session.pointer_moved(Vec2::new(10.0, 10.0), 100.0);
		session.initialize(800.0, 600.0, 100.0);
		assert_eq!(scheduler.run_frame(), 0);
		assert_eq!(surface.frames(), drawn);
	}

	#[test]
	fn dropping_the_session_cancels_the_frame() {
		let (session, scheduler, _surface) = session(FieldConfig::particles());
		session.fit_surface(0.0);
		assert_eq!(scheduler.pending_frames(), 1);
		drop(session);
		assert_eq!(scheduler.pending_frames(), 0);
	}

	#[test]
	fn idle_field_pauses_until_pointer_activity() {
		let config = FieldConfig {
			idle_timeout_ms: Some(100.0),
			random_pulse_chance: 0.0,
			..FieldConfig::neural()
		};
		let (session, scheduler, _surface) = session(config);
		session.initialize(800.0, 600.0, 0.0);

		let mut frames = 0;
		while scheduler.run_frame() > 0 {
			frames += 1;
			assert!(frames < 100);
		}
		assert!(!session.is_running());
		assert!(session.with_field(|f| f.is_dormant()));

		session.pointer_moved(Vec2::new(50.0, 50.0), scheduler.now());
		assert!(session.is_running());
		assert_eq!(scheduler.run_frame(), 1);
		assert!(session.is_running());
	}
}
