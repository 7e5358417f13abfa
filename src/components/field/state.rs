use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::FieldConfig;
use super::types::{Entity, Pulse, TickOutcome, Vec2};

pub const SPAWN_ALPHA: f64 = 0.8;

/// Simulation state of one canvas field. Owns every entity exclusively; the
/// base set is sized once per `initialize` and only the pointer-spawned
/// overflow list changes length afterwards.
pub struct FieldState {
	pub config: FieldConfig,
	pub width: f64,
	pub height: f64,
	pub entities: Vec<Entity>,
	pub spawned: VecDeque<Entity>,
	/// Hue used for the next pointer-spawned particles.
	pub spawn_hue: f64,
	pointer: Option<Vec2>,
	last_interaction: f64,
	dormant: bool,
	labels: Vec<String>,
	rng: SmallRng,
}

impl FieldState {
	pub fn new(config: FieldConfig, seed: u64) -> Self {
		Self {
			config,
			width: 0.0,
			height: 0.0,
			entities: Vec::new(),
			spawned: VecDeque::new(),
			spawn_hue: 0.0,
			pointer: None,
			last_interaction: 0.0,
			dormant: false,
			labels: Vec::new(),
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	/// Labels handed to the first entities on every `initialize`.
	pub fn with_labels(mut self, labels: Vec<String>) -> Self {
		self.labels = labels;
		self
	}

	/// Replace every entity with a fresh random set sized for the viewport.
	/// A zero or negative size yields an empty field.
	pub fn initialize(&mut self, width: f64, height: f64, now: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
		self.entities.clear();
		self.spawned.clear();
		self.last_interaction = now;
		self.dormant = false;
		self.pointer = self.pointer.map(|p| self.clamp(p));

		let count = if self.height > 0.0 {
			self.config.entity_count(self.width)
		} else {
			0
		};

		for i in 0..count {
			let entity = self.random_entity(i);
			self.entities.push(entity);
		}

		if let Some(max_links) = self.config.max_links {
			for i in 0..count {
				let wanted = self.rng.gen_range(1..=max_links.max(1));
				for _ in 0..wanted {
					let target = self.rng.gen_range(0..count);
					let links = &mut self.entities[i].links;
					if target != i && !links.contains(&target) {
						links.push(target);
					}
				}
			}
		}
	}

	fn random_entity(&mut self, i: usize) -> Entity {
		let c = &self.config;
		let (w, h) = (self.width, self.height);
		let r = &mut self.rng;
		Entity {
			pos: Vec2::new(r.r#gen::<f64>() * w, r.r#gen::<f64>() * h),
			vel: Vec2::new(
				(r.r#gen::<f64>() - 0.5) * c.speed,
				(r.r#gen::<f64>() - 0.5) * c.speed,
			),
			radius: c.min_radius + r.r#gen::<f64>() * (c.max_radius - c.min_radius),
			growing: r.r#gen::<bool>(),
			hue: c.hue_range.0 + r.r#gen::<f64>() * (c.hue_range.1 - c.hue_range.0),
			alpha: r.r#gen::<f64>() * 0.5 + 0.2,
			links: Vec::new(),
			active: r.r#gen::<f64>() < c.active_chance,
			pulse: None,
			label: self.labels.get(i).cloned(),
		}
	}

	pub fn pointer(&self) -> Option<Vec2> {
		self.pointer
	}

	pub fn is_dormant(&self) -> bool {
		self.dormant
	}

	/// Base entities followed by pointer-spawned ones.
	pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
		self.entities.iter().chain(self.spawned.iter())
	}

	pub fn pointer_entered(&mut self, at: Vec2, now: f64) {
		self.pointer_moved(at, now);
	}

	pub fn pointer_moved(&mut self, at: Vec2, now: f64) {
		self.pointer = Some(self.clamp(at));
		self.touch(now);
	}

	pub fn pointer_left(&mut self, now: f64) {
		self.pointer = None;
		self.touch(now);
	}

	/// Toggle the nearest base entity within the pick radius and start its
	/// pulse. Returns its index, or `None` when nothing is in range.
	pub fn click(&mut self, at: Vec2, now: f64) -> Option<usize> {
		self.touch(now);
		let pick = self.config.pick_radius?;
		let (idx, dist) = self
			.entities
			.iter()
			.enumerate()
			.map(|(i, e)| (i, e.pos.distance(at)))
			.min_by(|a, b| a.1.total_cmp(&b.1))?;
		if dist >= pick {
			return None;
		}
		let start = self.config.pulse_start;
		let entity = &mut self.entities[idx];
		entity.active = !entity.active;
		entity.pulse = Some(Pulse {
			radius: 0.0,
			opacity: start,
		});
		Some(idx)
	}

	fn touch(&mut self, now: f64) {
		self.last_interaction = self.last_interaction.max(now);
		self.dormant = false;
	}

	fn clamp(&self, p: Vec2) -> Vec2 {
		Vec2::new(p.x.clamp(0.0, self.width), p.y.clamp(0.0, self.height))
	}

	/// Advance the simulation by one frame.
	pub fn tick(&mut self, now: f64) -> TickOutcome {
		if let Some(timeout) = self.config.idle_timeout_ms {
			if now - self.last_interaction >= timeout {
				self.dormant = true;
				return TickOutcome::Dormant;
			}
		}
		self.dormant = false;

		self.spawn_from_pointer();

		let (w, h) = (self.width, self.height);
		let config = &self.config;
		let pointer = self.pointer;
		for entity in self.entities.iter_mut().chain(self.spawned.iter_mut()) {
			if let Some((min, max, step)) = config.breathe {
				breathe(entity, min, max, step);
			}
			bounce(&mut entity.pos.x, &mut entity.vel.x, w);
			bounce(&mut entity.pos.y, &mut entity.vel.y, h);

			if let Some(mut pulse) = entity.pulse {
				pulse.radius += config.pulse_growth;
				pulse.opacity -= config.pulse_decay;
				entity.pulse = (pulse.opacity > 1e-9).then_some(pulse);
			}

			if let Some(p) = pointer {
				if entity.pos.distance(p) < config.pointer_radius {
					entity.pos = entity.pos + (p - entity.pos) * config.pointer_attraction;
				}
			}
		}

		self.random_pulse();
		TickOutcome::Advanced
	}

	fn spawn_from_pointer(&mut self) {
		let Some(spawn) = self.config.spawn else {
			return;
		};
		self.spawn_hue = (self.spawn_hue + spawn.hue_step) % 360.0;
		let Some(at) = self.pointer else {
			return;
		};

		for _ in 0..spawn.per_tick {
			let r = &mut self.rng;
			let offset = Vec2::new(r.r#gen::<f64>() - 0.5, r.r#gen::<f64>() - 0.5) * spawn.jitter;
			let vel = Vec2::new(r.r#gen::<f64>() - 0.5, r.r#gen::<f64>() - 0.5) * spawn.speed;
			let radius = r.r#gen::<f64>() * 3.0 + 2.0;
			let pos = self.clamp(at + offset);
			self.spawned.push_back(Entity {
				pos,
				vel,
				radius,
				growing: true,
				hue: self.spawn_hue,
				alpha: SPAWN_ALPHA,
				links: Vec::new(),
				active: false,
				pulse: None,
				label: None,
			});
		}
		while self.spawned.len() > spawn.max_spawned {
			self.spawned.pop_front();
		}
	}

	fn random_pulse(&mut self) {
		let chance = self.config.random_pulse_chance.clamp(0.0, 1.0);
		if chance <= 0.0 || self.entities.is_empty() || !self.rng.gen_bool(chance) {
			return;
		}
		let idx = self.rng.gen_range(0..self.entities.len());
		let start = self.config.pulse_start;
		let entity = &mut self.entities[idx];
		if !entity.is_pulsing() {
			entity.pulse = Some(Pulse {
				radius: 0.0,
				opacity: start,
			});
		}
	}
}

fn breathe(entity: &mut Entity, min: f64, max: f64, step: f64) {
	if entity.growing {
		entity.radius += step;
		if entity.radius > max {
			entity.growing = false;
		}
	} else {
		entity.radius -= step;
		if entity.radius < min {
			entity.growing = true;
		}
	}
}

/// Move one axis and reflect off `[0, max]`, flipping the velocity.
fn bounce(pos: &mut f64, vel: &mut f64, max: f64) {
	*pos += *vel;
	if *pos < 0.0 {
		*pos = -*pos;
		*vel = -*vel;
	} else if *pos > max {
		*pos = 2.0 * max - *pos;
		*vel = -*vel;
	}
	*pos = pos.clamp(0.0, max);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn quiet_neural() -> FieldConfig {
		FieldConfig {
			random_pulse_chance: 0.0,
			..FieldConfig::neural()
		}
	}

	fn in_bounds(state: &FieldState) -> bool {
		state.all_entities().all(|e| {
			(0.0..=state.width).contains(&e.pos.x) && (0.0..=state.height).contains(&e.pos.y)
		})
	}

	#[test]
	fn initialize_sizes_from_width() {
		let mut state = FieldState::new(FieldConfig::particles(), 7);
		state.initialize(800.0, 600.0, 0.0);
		assert_eq!(state.entities.len(), 100);
		assert!(in_bounds(&state));

		state.initialize(4000.0, 600.0, 0.0);
		assert_eq!(state.entities.len(), 150);
	}

	#[test]
	fn zero_sized_canvas_is_empty() {
		let mut state = FieldState::new(FieldConfig::particles(), 7);
		state.initialize(1024.0, 0.0, 0.0);
		assert!(state.entities.is_empty());
		assert_eq!(state.tick(16.0), TickOutcome::Advanced);
		assert!(state.all_entities().next().is_none());
	}

	#[test]
	fn entities_stay_inside_over_many_ticks() {
		for seed in 0..8 {
			let mut state = FieldState::new(FieldConfig::particles(), seed);
			state.initialize(300.0, 200.0, 0.0);
			state.pointer_entered(Vec2::new(290.0, 5.0), 0.0);
			for frame in 0..2_000 {
				state.tick(frame as f64 * 16.0);
				assert!(in_bounds(&state), "seed {seed} frame {frame}");
			}
		}
	}

	#[test]
	fn crossing_a_bound_flips_that_velocity_component() {
		let mut state = FieldState::new(quiet_neural(), 1);
		state.initialize(1000.0, 500.0, 0.0);
		let e = &mut state.entities[0];
		e.pos = Vec2::new(0.05, 250.0);
		e.vel = Vec2::new(-0.1, 0.07);
		let e = &mut state.entities[1];
		e.pos = Vec2::new(500.0, 499.98);
		e.vel = Vec2::new(0.02, 0.09);

		state.tick(16.0);

		let first = &state.entities[0];
		assert!((first.vel.x - 0.1).abs() < 1e-12);
		assert!((first.vel.y - 0.07).abs() < 1e-12);
		assert!(first.pos.x >= 0.0);

		let second = &state.entities[1];
		assert!((second.vel.y + 0.09).abs() < 1e-12);
		assert!((second.vel.x - 0.02).abs() < 1e-12);
		assert!(second.pos.y <= 500.0);
	}

	#[test]
	fn neural_links_are_unique_and_never_self() {
		let mut state = FieldState::new(quiet_neural(), 42);
		state.initialize(3000.0, 900.0, 0.0);
		assert_eq!(state.entities.len(), 30);
		for (i, e) in state.entities.iter().enumerate() {
			assert!(e.links.len() <= 3);
			assert!(!e.links.contains(&i));
			let mut sorted = e.links.clone();
			sorted.sort_unstable();
			sorted.dedup();
			assert_eq!(sorted.len(), e.links.len());
			assert!(e.links.iter().all(|&t| t < 30));
		}
	}

	#[test]
	fn pulse_decays_to_nothing() {
		let mut state = FieldState::new(quiet_neural(), 3);
		state.initialize(1000.0, 800.0, 0.0);
		let target = state.entities[4].pos;
		let was_active = state.entities[4].active;

		assert_eq!(state.click(target, 10.0), Some(4));
		assert_eq!(state.entities[4].active, !was_active);
		assert!(state.entities[4].is_pulsing());

		let mut last = f64::INFINITY;
		let mut ticks = 0;
		while let Some(pulse) = state.entities[4].pulse {
			assert!(pulse.opacity < last);
			last = pulse.opacity;
			state.tick(10.0 + ticks as f64);
			ticks += 1;
			assert!(ticks <= 60);
		}
		assert_eq!(ticks, 50);
	}

	#[test]
	fn click_out_of_range_is_a_no_op() {
		let mut state = FieldState::new(quiet_neural(), 5);
		state.initialize(1000.0, 800.0, 0.0);
		for e in &mut state.entities {
			e.pos = Vec2::new(900.0, 700.0);
		}
		let before: Vec<bool> = state.entities.iter().map(|e| e.active).collect();
		assert_eq!(state.click(Vec2::new(10.0, 10.0), 5.0), None);
		let after: Vec<bool> = state.entities.iter().map(|e| e.active).collect();
		assert_eq!(before, after);
		assert!(state.entities.iter().all(|e| !e.is_pulsing()));
	}

	#[test]
	fn particles_ignore_clicks() {
		let mut state = FieldState::new(FieldConfig::particles(), 5);
		state.initialize(800.0, 600.0, 0.0);
		let at = state.entities[0].pos;
		assert_eq!(state.click(at, 0.0), None);
	}

	#[test]
	fn idles_into_dormancy_and_wakes_on_pointer() {
		let mut state = FieldState::new(quiet_neural(), 9);
		state.initialize(1000.0, 800.0, 1_000.0);
		assert_eq!(state.tick(30_999.0), TickOutcome::Advanced);

		let frozen: Vec<Vec2> = state.entities.iter().map(|e| e.pos).collect();
		assert_eq!(state.tick(31_000.0), TickOutcome::Dormant);
		assert!(state.is_dormant());
		let still: Vec<Vec2> = state.entities.iter().map(|e| e.pos).collect();
		assert_eq!(frozen, still);

		state.pointer_moved(Vec2::new(5.0, 5.0), 31_500.0);
		assert!(!state.is_dormant());
		assert_eq!(state.tick(31_516.0), TickOutcome::Advanced);
	}

	#[test]
	fn pointer_spawn_list_is_bounded() {
		let mut state = FieldState::new(FieldConfig::particles(), 11);
		state.initialize(640.0, 480.0, 0.0);
		let base = state.entities.len();
		state.pointer_entered(Vec2::new(320.0, 240.0), 0.0);
		for frame in 0..500 {
			state.tick(frame as f64 * 16.0);
		}
		assert_eq!(state.entities.len(), base);
		assert_eq!(state.spawned.len(), 150);

		state.pointer_left(8_000.0);
		state.tick(8_016.0);
		assert_eq!(state.spawned.len(), 150);
	}

	#[test]
	fn pointer_attracts_nearby_entities() {
		let config = FieldConfig {
			speed: 0.0,
			..quiet_neural()
		};
		let mut state = FieldState::new(config, 2);
		state.initialize(1000.0, 1000.0, 0.0);
		state.entities[0].pos = Vec2::new(500.0, 500.0);
		state.entities[1].pos = Vec2::new(900.0, 900.0);
		let pointer = Vec2::new(550.0, 500.0);
		state.pointer_moved(pointer, 0.0);

		state.tick(16.0);

		assert!(state.entities[0].pos.distance(pointer) < 50.0);
		assert_eq!(state.entities[1].pos, Vec2::new(900.0, 900.0));
	}

	#[test]
	fn labels_go_to_the_first_entities() {
		let labels = vec!["AI Alignment".to_string(), "Consciousness".to_string()];
		let mut state = FieldState::new(quiet_neural(), 4).with_labels(labels);
		state.initialize(1000.0, 800.0, 0.0);
		assert_eq!(state.entities[0].label.as_deref(), Some("AI Alignment"));
		assert_eq!(state.entities[1].label.as_deref(), Some("Consciousness"));
		assert!(state.entities[2].label.is_none());
	}
}
