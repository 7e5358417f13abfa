use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Vec2) -> f64 {
		(self - other).length()
	}

	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}
}

impl Add for Vec2 {
	type Output = Vec2;

	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Vec2 {
	type Output = Vec2;

	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Vec2 {
	type Output = Vec2;

	fn mul(self, k: f64) -> Vec2 {
		Vec2::new(self.x * k, self.y * k)
	}
}

/// Expanding ring drawn around an entity after it is clicked or fires.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
	pub radius: f64,
	pub opacity: f64,
}

/// A single animated point owned by a field.
#[derive(Clone, Debug)]
pub struct Entity {
	pub pos: Vec2,
	pub vel: Vec2,
	pub radius: f64,
	/// Radius oscillation direction for breathing particles.
	pub growing: bool,
	pub hue: f64,
	pub alpha: f64,
	/// Indices into the field's base entities (neural variant only).
	pub links: Vec<usize>,
	pub active: bool,
	pub pulse: Option<Pulse>,
	pub label: Option<String>,
}

impl Entity {
	pub fn is_pulsing(&self) -> bool {
		self.pulse.is_some()
	}
}

/// What a tick did, so the owner knows whether to keep requesting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	Advanced,
	/// Idle window elapsed; nothing moved and nothing should be drawn.
	Dormant,
}
