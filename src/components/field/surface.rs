use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::types::Vec2;

/// Drawing capability a field renders into.
pub trait Surface {
	fn size(&self) -> (f64, f64);
	fn clear(&self);
	fn fill_rect(&self, style: &str);
	fn fill_circle(&self, at: Vec2, radius: f64, style: &str, alpha: f64);
	fn stroke_circle(&self, at: Vec2, radius: f64, style: &str, line_width: f64);
	fn line(&self, from: Vec2, to: Vec2, style: &str, line_width: f64);
	fn text(&self, text: &str, at: Vec2, style: &str, font: &str);
}

/// A 2d canvas context.
#[derive(Clone)]
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// `None` when the canvas cannot hand out a 2d context.
	pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self { ctx })
	}
}

impl Surface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		self.ctx
			.canvas()
			.map(|c| (c.width() as f64, c.height() as f64))
			.unwrap_or((0.0, 0.0))
	}

	fn clear(&self) {
		let (w, h) = self.size();
		self.ctx.clear_rect(0.0, 0.0, w, h);
	}

	fn fill_rect(&self, style: &str) {
		let (w, h) = self.size();
		self.ctx.set_fill_style_str(style);
		self.ctx.fill_rect(0.0, 0.0, w, h);
	}

	fn fill_circle(&self, at: Vec2, radius: f64, style: &str, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
		self.ctx.begin_path();
		let _ = self.ctx.arc(at.x, at.y, radius.max(0.0), 0.0, TAU);
		self.ctx.set_fill_style_str(style);
		self.ctx.fill();
		self.ctx.set_global_alpha(1.0);
	}

	fn stroke_circle(&self, at: Vec2, radius: f64, style: &str, line_width: f64) {
		self.ctx.begin_path();
		let _ = self.ctx.arc(at.x, at.y, radius.max(0.0), 0.0, TAU);
		self.ctx.set_stroke_style_str(style);
		self.ctx.set_line_width(line_width);
		self.ctx.stroke();
	}

	fn line(&self, from: Vec2, to: Vec2, style: &str, line_width: f64) {
		self.ctx.begin_path();
		self.ctx.move_to(from.x, from.y);
		self.ctx.line_to(to.x, to.y);
		self.ctx.set_stroke_style_str(style);
		self.ctx.set_line_width(line_width);
		self.ctx.stroke();
	}

	fn text(&self, text: &str, at: Vec2, style: &str, font: &str) {
		self.ctx.set_fill_style_str(style);
		self.ctx.set_font(font);
		let _ = self.ctx.fill_text(text, at.x, at.y);
	}
}
