//! SVG output for headless snapshots

use std::fmt::Write;

use super::surface::Surface;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, STROKE_DEFAULT};

/// Surface that accumulates strokes and text as SVG elements
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    stroke: String,
    path: String,
    elements: Vec<String>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            stroke: STROKE_DEFAULT.to_string(),
            path: String::new(),
            elements: Vec::new(),
        }
    }

    /// Complete SVG document for everything drawn since the last clear
    pub fn to_svg(&self) -> String {
        let mut out = format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
            ),
            w = self.width,
            h = self.height
        );
        out.push('\n');
        out.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="white"/>"#,
            self.width, self.height
        ));
        out.push('\n');
        for element in &self.elements {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // Partial clears are not tracked; a full-canvas clear starts over
        if x <= 0.0 && y <= 0.0 && width >= self.width && height >= self.height {
            self.elements.clear();
        }
        self.path.clear();
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.stroke = color.to_string();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "M{:.3} {:.3} ", x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let _ = write!(self.path, "L{:.3} {:.3} ", x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        // Two half arcs make a full circle
        let _ = write!(
            self.path,
            "M{:.3} {y:.3} A{r:.3} {r:.3} 0 1 0 {:.3} {y:.3} A{r:.3} {r:.3} 0 1 0 {:.3} {y:.3} ",
            x + radius,
            x - radius,
            x + radius,
            y = y,
            r = radius
        );
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.elements.push(format!(
            r#"<path d="{}" stroke="{}" fill="none"/>"#,
            self.path.trim_end(),
            escape(&self.stroke)
        ));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.elements.push(format!(
            r#"<text x="{:.3}" y="{:.3}" font-family="sans-serif" font-size="10">{}</text>"#,
            x,
            y,
            escape(text)
        ));
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
