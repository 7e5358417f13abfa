use super::config::FieldKind;
use super::state::FieldState;
use super::surface::Surface;
use super::types::{Entity, Vec2};

const LABEL_FONT: &str = "10px sans-serif";

fn accent(kind: FieldKind) -> &'static str {
	match kind {
		FieldKind::Particles => "255, 255, 255",
		FieldKind::Neural => "120, 0, 255",
	}
}

fn rgba(rgb: &str, alpha: f64) -> String {
	format!("rgba({}, {:.4})", rgb, alpha)
}

/// Fade factor for a link of length `dist` that is drawn up to `max`.
fn falloff(dist: f64, max: f64) -> f64 {
	1.0 - dist / max
}

pub fn render(state: &FieldState, surface: &impl Surface) {
	match state.config.trail {
		Some(style) if !state.is_dormant() => surface.fill_rect(style),
		_ => surface.clear(),
	}
	if state.is_dormant() {
		return;
	}
	draw_links(state, surface);
	draw_entities(state, surface);
	draw_pointer(state, surface);
}

fn draw_links(state: &FieldState, surface: &impl Surface) {
	let config = &state.config;
	let color = accent(config.kind);
	let max = config.link_distance;

	if config.max_links.is_some() {
		for node in &state.entities {
			for &target in &node.links {
				let Some(other) = state.entities.get(target) else {
					continue;
				};
				let dist = node.pos.distance(other.pos);
				if dist < max {
					let alpha = config.link_alpha * falloff(dist, max);
					surface.line(node.pos, other.pos, &rgba(color, alpha), 0.5);
				}
			}
		}
		return;
	}

	let points: Vec<Vec2> = state.all_entities().map(|e| e.pos).collect();
	for (i, &a) in points.iter().enumerate() {
		for &b in &points[i + 1..] {
			let dist = a.distance(b);
			if dist < max {
				let alpha = config.link_alpha * falloff(dist, max);
				surface.line(a, b, &rgba(color, alpha), 0.5);
			}
		}
	}
}

fn entity_style(kind: FieldKind, entity: &Entity) -> (String, f64) {
	match kind {
		FieldKind::Particles => (
			format!("hsla({:.1}, 100%, 70%, 0.7)", entity.hue),
			entity.alpha,
		),
		FieldKind::Neural if entity.active => (rgba(accent(kind), 0.5), 1.0),
		FieldKind::Neural => ("rgba(255, 255, 255, 0.2)".into(), 1.0),
	}
}

fn draw_entities(state: &FieldState, surface: &impl Surface) {
	let kind = state.config.kind;
	for entity in state.all_entities() {
		let (style, alpha) = entity_style(kind, entity);
		surface.fill_circle(entity.pos, entity.radius, &style, alpha);

		if let Some(pulse) = entity.pulse {
			surface.stroke_circle(
				entity.pos,
				pulse.radius,
				&rgba(accent(kind), pulse.opacity),
				1.0,
			);
		}

		if let Some(label) = &entity.label {
			let at = entity.pos + Vec2::new(entity.radius + 3.0, 3.0);
			surface.text(label, at, "rgba(255, 255, 255, 0.6)", LABEL_FONT);
		}
	}
}

fn draw_pointer(state: &FieldState, surface: &impl Surface) {
	let Some(pointer) = state.pointer() else {
		return;
	};
	let config = &state.config;
	let color = accent(config.kind);

	if let Some(halo) = config.halo_radius {
		surface.fill_circle(pointer, halo, &rgba(color, 0.03), 1.0);
	}

	let width = match config.kind {
		FieldKind::Particles => 1.0,
		FieldKind::Neural => 0.5,
	};
	for entity in state.all_entities() {
		let dist = entity.pos.distance(pointer);
		if dist < config.pointer_radius {
			let alpha = config.pointer_alpha * falloff(dist, config.pointer_radius);
			surface.line(entity.pos, pointer, &rgba(color, alpha), width);
		}
	}
}
