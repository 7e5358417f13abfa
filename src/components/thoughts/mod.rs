//! Ambient thought stream: a chain of reasoning revealed one step at a time.

mod component;
mod session;
mod stream;

pub use component::ThoughtPanel;
