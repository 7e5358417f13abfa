use gloo::events::EventListener;
use leptos::prelude::*;
use log::{info, warn};
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::config::{FieldConfig, FieldKind};
use super::session::AnimationSession;
use super::state::FieldState;
use super::surface::CanvasSurface;
use super::types::Vec2;
use crate::schedule::{BrowserScheduler, now_ms, random_seed};

type BrowserSession = AnimationSession<BrowserScheduler, CanvasSurface>;

fn measure(canvas: &HtmlCanvasElement, window: &Window, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
		};
		(read(window.inner_width()), read(window.inner_height()))
	} else {
		canvas
			.parent_element()
			.map(|p| (p.client_width() as f64, p.client_height() as f64))
			.unwrap_or((0.0, 0.0))
	}
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Vec2 {
	let rect = canvas.get_bounding_client_rect();
	Vec2::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Full-bleed animated canvas. The animation loop lives as long as the
/// component and is cancelled on unmount.
#[component]
pub fn FieldCanvas(
	kind: FieldKind,
	#[prop(default = false)] fullscreen: bool,
	#[prop(optional)] labels: Vec<String>,
	#[prop(into, optional)] class: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = StoredValue::new_local(None::<BrowserSession>);
	let resize_listener = StoredValue::new_local(None::<EventListener>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, field stays empty");
			return;
		};

		let (w, h) = measure(&canvas, &window, fullscreen);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(surface) = CanvasSurface::from_canvas(&canvas) else {
			warn!("2d context unavailable, field stays empty");
			return;
		};
		let config = match kind {
			FieldKind::Particles => FieldConfig::particles(),
			FieldKind::Neural => FieldConfig::neural(),
		};
		let field = FieldState::new(config, random_seed()).with_labels(labels.clone());
		let started = AnimationSession::new(BrowserScheduler, surface, field);
		started.fit_surface(now_ms());
		info!("{:?} field started", kind);

		// Replacing the stored session drops the old one and its frame.
		if let Some(previous) = session.get_value() {
			previous.teardown();
		}
		session.set_value(Some(started));

		let canvas_resize = canvas.clone();
		let listener = EventListener::new(&window, "resize", move |_| {
			let Some(window) = web_sys::window() else {
				return;
			};
			let (nw, nh) = measure(&canvas_resize, &window, fullscreen);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(s) = session.get_value() {
				s.initialize(nw, nh, now_ms());
			}
		});
		resize_listener.set_value(Some(listener));
	});

	on_cleanup(move || {
		if let Some(Some(s)) = session.try_get_value() {
			s.teardown();
		}
		let _ = resize_listener.try_set_value(None);
		let _ = session.try_set_value(None);
	});

	let with_session = move |ev: &MouseEvent, f: &dyn Fn(&BrowserSession, Vec2, f64)| {
		let (Some(canvas), Some(s)) = (canvas_ref.get_untracked(), session.get_value()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		f(&s, pointer_position(&canvas, ev), ev.time_stamp());
	};

	let on_mousemove = move |ev: MouseEvent| {
		with_session(&ev, &|s, at, now| s.pointer_moved(at, now));
	};
	let on_mouseenter = move |ev: MouseEvent| {
		with_session(&ev, &|s, at, now| s.pointer_entered(at, now));
	};
	let on_mouseleave = move |ev: MouseEvent| {
		with_session(&ev, &|s, _, now| s.pointer_left(now));
	};
	let on_click = move |ev: MouseEvent| {
		with_session(&ev, &|s, at, now| {
			let _ = s.click(at, now);
		});
	};

	let position = if fullscreen { "fixed" } else { "absolute" };
	view! {
		<canvas
			node_ref=canvas_ref
			class=format!("field-canvas {class}")
			on:mousemove=on_mousemove
			on:mouseenter=on_mouseenter
			on:mouseleave=on_mouseleave
			on:click=on_click
			style=format!("display: block; position: {position}; inset: 0;")
		/>
	}
}
