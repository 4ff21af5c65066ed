//! Scene drawing for one simulation frame

use glam::DVec2;

use super::surface::Surface;
use crate::consts::*;
use crate::sim::{
    DerivedConstants, OverlayFlags, SimulationParameters, position_at_frame, time_at_frame,
};

/// Draw the projectile at `frame` plus the enabled overlays.
///
/// Returns the projectile position that was drawn.
pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    frame: u64,
    params: &SimulationParameters,
    derived: &DerivedConstants,
    overlays: &OverlayFlags,
) -> DVec2 {
    surface.clear(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT);

    let pos = position_at_frame(frame, params, derived);

    draw_circle(surface, pos, params.radius);
    if overlays.show_path {
        draw_path(surface, frame, params, derived);
    }
    if overlays.show_horizontal_line {
        draw_horizontal(surface, pos.y);
    }
    if overlays.show_vertical_line {
        draw_vertical(surface, pos.x);
    }
    if overlays.show_coordinates {
        let t = time_at_frame(frame, derived.milliseconds_per_frame);
        draw_coordinates(surface, t, pos);
    }
    if overlays.show_axes {
        draw_axes(surface);
    }
    if overlays.show_grid {
        draw_grid(surface);
    }

    pos
}

/// Projectile outline
pub fn draw_circle<S: Surface + ?Sized>(surface: &mut S, center: DVec2, radius: f64) {
    surface.begin_path();
    surface.arc(center.x, center.y, radius);
    surface.stroke();
}

/// Polyline through every position from frame 0 to `frame`, rebuilt each call
pub fn draw_path<S: Surface + ?Sized>(
    surface: &mut S,
    frame: u64,
    params: &SimulationParameters,
    derived: &DerivedConstants,
) {
    surface.set_stroke_style(STROKE_PATH);
    surface.begin_path();

    let start = position_at_frame(0, params, derived);
    surface.move_to(start.x, start.y);
    for i in 1..=frame {
        let p = position_at_frame(i, params, derived);
        surface.line_to(p.x, p.y);
    }

    surface.stroke();
    surface.set_stroke_style(STROKE_DEFAULT);
}

pub fn draw_horizontal<S: Surface + ?Sized>(surface: &mut S, y: f64) {
    surface.begin_path();
    surface.move_to(0.0, y);
    surface.line_to(CANVAS_WIDTH, y);
    surface.stroke();
}

pub fn draw_vertical<S: Surface + ?Sized>(surface: &mut S, x: f64) {
    surface.begin_path();
    surface.move_to(x, 0.0);
    surface.line_to(x, CANVAS_HEIGHT);
    surface.stroke();
}

/// Readout of time, distance travelled and height above the baseline
pub fn draw_coordinates<S: Surface + ?Sized>(surface: &mut S, t: f64, pos: DVec2) {
    let label_x = pos.x + 10.0;
    surface.fill_text(&format!("t: {:.3}s", t), label_x, pos.y - 50.0);
    surface.fill_text(&format!("x: {:.3}m", pos.x - X_OFFSET), label_x, pos.y - 40.0);
    surface.fill_text(&format!("y: {:.3}m", Y_OFFSET - pos.y), label_x, pos.y - 30.0);
}

/// Baseline and left axis with metre labels
pub fn draw_axes<S: Surface + ?Sized>(surface: &mut S) {
    let top = CANVAS_HEIGHT - Y_OFFSET;

    surface.begin_path();
    surface.move_to(X_OFFSET, Y_OFFSET);
    surface.line_to(CANVAS_WIDTH - X_OFFSET, Y_OFFSET);
    surface.stroke();

    surface.fill_text("m", CANVAS_WIDTH - X_OFFSET + 5.0, Y_OFFSET + 2.0);
    for i in (0..=AXIS_EXTENT).step_by(GRID_STEP) {
        surface.fill_text(&i.to_string(), X_OFFSET + i as f64 - 5.0, Y_OFFSET + TEXT_OFFSET);
    }

    surface.begin_path();
    surface.move_to(X_OFFSET, Y_OFFSET);
    surface.line_to(X_OFFSET, top);
    surface.stroke();

    surface.fill_text("m", X_OFFSET - 5.0, 20.0);
    for height in (0..=(Y_OFFSET - top) as usize).step_by(GRID_STEP) {
        let y = Y_OFFSET - height as f64;
        surface.fill_text(&height.to_string(), X_OFFSET - TEXT_OFFSET, y + 2.0);
    }
}

/// Grey reference lines every grid step
pub fn draw_grid<S: Surface + ?Sized>(surface: &mut S) {
    let top = CANVAS_HEIGHT - Y_OFFSET;
    surface.set_stroke_style(STROKE_GRID);

    for i in (GRID_STEP..=AXIS_EXTENT).step_by(GRID_STEP) {
        let x = X_OFFSET + i as f64;
        surface.begin_path();
        surface.move_to(x, Y_OFFSET);
        surface.line_to(x, top);
        surface.stroke();
    }

    for height in (0..=(Y_OFFSET - top) as usize).step_by(GRID_STEP) {
        let y = Y_OFFSET - height as f64;
        surface.begin_path();
        surface.move_to(X_OFFSET, y);
        surface.line_to(CANVAS_WIDTH - X_OFFSET, y);
        surface.stroke();
    }

    surface.set_stroke_style(STROKE_DEFAULT);
}
