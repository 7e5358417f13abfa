//! Scripted conversation widgets: canned responses revealed like live typing.

mod component;
mod conversation;
mod rules;
mod session;
mod typewriter;

pub use component::{AskPanel, AssistantWidget};
pub use rules::{ResponseRule, ResponseTable};
pub use session::ChatTiming;
pub(crate) use typewriter::Typewriter;
