//! HTML canvas backend

use web_sys::CanvasRenderingContext2d;

use super::surface::Surface;

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.clear_rect(x, y, width, height);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        let full_turn = std::f64::consts::TAU;
        if let Err(e) = CanvasRenderingContext2d::arc(self, x, y, radius, 0.0, full_turn) {
            log::warn!("arc({}, {}, {}) failed: {:?}", x, y, radius, e);
        }
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if let Err(e) = CanvasRenderingContext2d::fill_text(self, text, x, y) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}
