//! Frame and timer scheduling behind a small capability trait.
//!
//! Every scheduled callback is owned by the task handle it returns. Dropping
//! the handle cancels the callback, so a widget that owns its pending task can
//! never leave an orphaned frame or timer running after it is gone.

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;

/// Source of "next frame" and "after a delay" callbacks.
pub trait Scheduler: Clone + 'static {
	/// Pending callback. Dropping it cancels the callback if it has not run yet.
	type Task: 'static;

	/// Run `callback` on the next display frame with the frame timestamp in ms.
	fn next_frame(&self, callback: impl FnOnce(f64) + 'static) -> Self::Task;

	/// Run `callback` once after `delay_ms` milliseconds.
	fn after(&self, delay_ms: u32, callback: impl FnOnce() + 'static) -> Self::Task;
}

/// Scheduler backed by `requestAnimationFrame` and `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

/// A pending browser callback.
pub enum BrowserTask {
	/// Waiting on `requestAnimationFrame`.
	Frame(#[allow(dead_code)] AnimationFrame),
	/// Waiting on `setTimeout`.
	Timeout(#[allow(dead_code)] Timeout),
}

impl Scheduler for BrowserScheduler {
	type Task = BrowserTask;

	fn next_frame(&self, callback: impl FnOnce(f64) + 'static) -> BrowserTask {
		BrowserTask::Frame(request_animation_frame(callback))
	}

	fn after(&self, delay_ms: u32, callback: impl FnOnce() + 'static) -> BrowserTask {
		BrowserTask::Timeout(Timeout::new(delay_ms, callback))
	}
}

/// Current high resolution time in ms, on the same clock as frame and event
/// timestamps. Falls back to zero outside a browser.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or(0.0)
}

/// Seed for a widget's random source, drawn from `Math.random`.
pub fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}
