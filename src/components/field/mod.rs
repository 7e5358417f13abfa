mod component;
mod config;
mod render;
mod session;
mod state;
mod surface;
mod types;

pub use component::FieldCanvas;
pub use config::FieldKind;
