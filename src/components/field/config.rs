/// Which look and interaction set a field uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
	/// Breathing particles with proximity links and a pointer trail.
	Particles,
	/// Sparse node graph with fixed adjacency, pulses and click toggling.
	Neural,
}

/// Particles spawned from the pointer while it is inside the canvas.
#[derive(Clone, Copy, Debug)]
pub struct SpawnConfig {
	pub per_tick: usize,
	/// Oldest spawned particles are pruned past this count.
	pub max_spawned: usize,
	pub speed: f64,
	pub jitter: f64,
	pub hue_step: f64,
}

/// Tuning for one field instance.
#[derive(Clone, Debug)]
pub struct FieldConfig {
	pub kind: FieldKind,
	/// Viewport width in px per entity.
	pub density: f64,
	pub max_entities: usize,
	/// Each velocity component is drawn from `[-speed / 2, speed / 2)`.
	pub speed: f64,
	pub min_radius: f64,
	pub max_radius: f64,
	/// Breathing bounds and step; `None` keeps radii fixed.
	pub breathe: Option<(f64, f64, f64)>,
	pub hue_range: (f64, f64),
	pub link_distance: f64,
	pub link_alpha: f64,
	/// `Some(n)` gives every entity 1..=n random adjacency links and only
	/// those are drawn. `None` links every pair closer than `link_distance`.
	pub max_links: Option<usize>,
	pub active_chance: f64,
	pub pointer_radius: f64,
	pub pointer_attraction: f64,
	pub pointer_alpha: f64,
	pub halo_radius: Option<f64>,
	pub pick_radius: Option<f64>,
	pub idle_timeout_ms: Option<f64>,
	pub pulse_start: f64,
	pub pulse_growth: f64,
	pub pulse_decay: f64,
	pub random_pulse_chance: f64,
	pub spawn: Option<SpawnConfig>,
	/// Translucent fill drawn instead of a clear, leaving trails.
	pub trail: Option<&'static str>,
}

impl FieldConfig {
	/// Full-screen background particles.
	pub fn particles() -> Self {
		Self {
			kind: FieldKind::Particles,
			density: 8.0,
			max_entities: 150,
			speed: 0.3,
			min_radius: 1.0,
			max_radius: 3.0,
			breathe: Some((0.8, 3.0, 0.02)),
			hue_range: (240.0, 300.0),
			link_distance: 120.0,
			link_alpha: 0.05,
			max_links: None,
			active_chance: 0.0,
			pointer_radius: 150.0,
			pointer_attraction: 0.002,
			pointer_alpha: 0.15,
			halo_radius: None,
			pick_radius: None,
			idle_timeout_ms: None,
			pulse_start: 0.0,
			pulse_growth: 0.0,
			pulse_decay: 0.0,
			random_pulse_chance: 0.0,
			spawn: Some(SpawnConfig {
				per_tick: 2,
				max_spawned: 150,
				speed: 1.0,
				jitter: 20.0,
				hue_step: 0.5,
			}),
			trail: Some("rgba(0, 0, 0, 0.05)"),
		}
	}

	/// Neural node graph reacting to clicks, asleep when left alone.
	pub fn neural() -> Self {
		Self {
			kind: FieldKind::Neural,
			density: 100.0,
			max_entities: 30,
			speed: 0.2,
			min_radius: 1.0,
			max_radius: 3.0,
			breathe: None,
			hue_range: (270.0, 270.0),
			link_distance: 200.0,
			link_alpha: 0.05,
			max_links: Some(3),
			active_chance: 0.3,
			pointer_radius: 150.0,
			pointer_attraction: 0.001,
			pointer_alpha: 0.1,
			halo_radius: Some(100.0),
			pick_radius: Some(100.0),
			idle_timeout_ms: Some(30_000.0),
			pulse_start: 0.5,
			pulse_growth: 1.0,
			pulse_decay: 0.01,
			random_pulse_chance: 0.03,
			spawn: None,
			trail: None,
		}
	}

	/// Number of base entities for a viewport `width` px wide.
	pub fn entity_count(&self, width: f64) -> usize {
		if !(width > 0.0) || self.density <= 0.0 {
			return 0;
		}
		((width / self.density).floor() as usize).min(self.max_entities)
	}
}
