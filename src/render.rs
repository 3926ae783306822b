//! Renderer
//!
//! Pure painting of the diagram: clears and fully repaints the drawing
//! surface from (states, routed edges, positions, active simulation state)
//! every call. Nothing else mutates the painter.

use egui::epaint::{CubicBezierShape, QuadraticBezierShape};
use egui::{Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

use crate::automaton::State;
use crate::layout::{Positions, CANVAS_HEIGHT, CANVAS_WIDTH, STATE_RADIUS};
use crate::routing::{EdgeKind, EdgePath};

const BACKGROUND: Color32 = Color32::from_rgb(25, 28, 32);
const GRID: Color32 = Color32::from_rgba_premultiplied(100, 100, 100, 30);
const EDGE_COLOR: Color32 = Color32::from_rgb(150, 160, 180);
const LABEL_COLOR: Color32 = Color32::from_rgb(255, 230, 120);
const STATE_FILL: Color32 = Color32::from_rgb(40, 55, 75);
const STATE_TEXT: Color32 = Color32::WHITE;

const ACTIVE_STROKE: Color32 = Color32::from_rgb(255, 220, 120);
const INITIAL_STROKE: Color32 = Color32::from_rgb(100, 220, 100);
const TERMINATING_STROKE: Color32 = Color32::from_rgb(120, 200, 160);
const PLAIN_STROKE: Color32 = Color32::from_rgb(100, 120, 145);

/// Pan/zoom mapping between layout canvas coordinates and screen pixels.
/// The layout canvas center maps to the widget center plus the pan offset.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub screen_center: Pos2,
    pub zoom: f32,
    pub pan: Vec2,
}

impl Viewport {
    pub fn to_screen(&self, p: Pos2) -> Pos2 {
        let centered = p - Pos2::new(CANVAS_WIDTH * 0.5, CANVAS_HEIGHT * 0.5);
        self.screen_center + centered * self.zoom + self.pan
    }

    pub fn to_canvas(&self, p: Pos2) -> Pos2 {
        let centered = (p - self.screen_center - self.pan) / self.zoom;
        Pos2::new(
            centered.x + CANVAS_WIDTH * 0.5,
            centered.y + CANVAS_HEIGHT * 0.5,
        )
    }
}

/// Marker appearance, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Active,
    Initial,
    Terminating,
    Plain,
}

pub fn marker_for(state: &State, active_state: Option<&str>) -> Marker {
    if active_state == Some(state.id.as_str()) {
        Marker::Active
    } else if state.is_initial {
        Marker::Initial
    } else if state.is_terminating {
        Marker::Terminating
    } else {
        Marker::Plain
    }
}

/// Repaint the whole diagram.
pub fn draw_diagram(
    painter: &Painter,
    rect: Rect,
    viewport: &Viewport,
    states: &[State],
    edges: &[EdgePath],
    positions: &Positions,
    active_state: Option<&str>,
) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
    draw_grid(painter, rect, viewport.zoom, viewport.pan);

    for edge in edges {
        draw_edge(painter, viewport, edge);
    }

    for state in states {
        if let Some(pos) = positions.get(&state.id) {
            draw_state_marker(
                painter,
                viewport.to_screen(pos),
                &state.id,
                state.is_terminating,
                marker_for(state, active_state),
                viewport.zoom,
            );
        }
    }
}

fn draw_edge(painter: &Painter, viewport: &Viewport, edge: &EdgePath) {
    let zoom = viewport.zoom;
    let stroke = Stroke::new(2.0 * zoom, EDGE_COLOR);

    match edge.kind {
        EdgeKind::Line { start, end } => {
            painter.line_segment([viewport.to_screen(start), viewport.to_screen(end)], stroke);
        }
        EdgeKind::Curve { start, ctrl, end } => {
            painter.add(QuadraticBezierShape::from_points_stroke(
                [
                    viewport.to_screen(start),
                    viewport.to_screen(ctrl),
                    viewport.to_screen(end),
                ],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
        EdgeKind::SelfLoop {
            start,
            ctrl_out,
            ctrl_in,
            end,
        } => {
            painter.add(CubicBezierShape::from_points_stroke(
                [
                    viewport.to_screen(start),
                    viewport.to_screen(ctrl_out),
                    viewport.to_screen(ctrl_in),
                    viewport.to_screen(end),
                ],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
    }

    let arrow: Vec<Pos2> = edge.arrow.iter().map(|p| viewport.to_screen(*p)).collect();
    painter.add(egui::Shape::convex_polygon(arrow, EDGE_COLOR, Stroke::NONE));

    if !edge.label.is_empty() {
        painter.text(
            viewport.to_screen(edge.label_pos),
            egui::Align2::CENTER_CENTER,
            &edge.label,
            FontId::proportional(14.0 * zoom),
            LABEL_COLOR,
        );
    }
}

fn draw_state_marker(
    painter: &Painter,
    pos: Pos2,
    id: &str,
    is_terminating: bool,
    marker: Marker,
    zoom: f32,
) {
    let radius = STATE_RADIUS * zoom;
    let (stroke_color, stroke_width) = match marker {
        Marker::Active => (ACTIVE_STROKE, 3.5),
        Marker::Initial => (INITIAL_STROKE, 3.0),
        Marker::Terminating => (TERMINATING_STROKE, 2.0),
        Marker::Plain => (PLAIN_STROKE, 2.0),
    };
    let stroke = Stroke::new(stroke_width * zoom, stroke_color);

    painter.circle_filled(pos, radius, STATE_FILL);
    painter.circle_stroke(pos, radius, stroke);
    // Terminating states keep their double ring whatever the precedence
    // picked for the stroke color.
    if is_terminating {
        painter.circle_stroke(pos, radius - 5.0 * zoom, stroke);
    }

    painter.text(
        pos,
        egui::Align2::CENTER_CENTER,
        id,
        FontId::proportional(14.0 * zoom),
        STATE_TEXT,
    );
}

fn draw_grid(painter: &Painter, rect: Rect, zoom: f32, offset: Vec2) {
    let grid_size = 50.0 * zoom;
    let stroke = Stroke::new(1.0, GRID);

    let start_x = ((rect.left() - offset.x) / grid_size).floor() * grid_size + offset.x;
    let start_y = ((rect.top() - offset.y) / grid_size).floor() * grid_size + offset.y;

    let mut x = start_x;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += grid_size;
    }

    let mut y = start_y;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += grid_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(id: &str, initial: bool, terminating: bool) -> State {
        State {
            id: id.into(),
            is_initial: initial,
            is_terminating: terminating,
        }
    }

    #[test]
    fn test_marker_precedence() {
        let s = state("S0", true, true);
        assert_eq!(marker_for(&s, Some("S0")), Marker::Active);
        assert_eq!(marker_for(&s, Some("S1")), Marker::Initial);
        assert_eq!(marker_for(&s, None), Marker::Initial);

        let t = state("S1", false, true);
        assert_eq!(marker_for(&t, None), Marker::Terminating);

        let p = state("S2", false, false);
        assert_eq!(marker_for(&p, None), Marker::Plain);
        assert_eq!(marker_for(&p, Some("S2")), Marker::Active);
    }

    #[test]
    fn test_viewport_round_trip() {
        let viewport = Viewport {
            screen_center: Pos2::new(640.0, 400.0),
            zoom: 1.6,
            pan: Vec2::new(33.0, -12.0),
        };
        let canvas = Pos2::new(120.0, 480.0);
        let back = viewport.to_canvas(viewport.to_screen(canvas));
        assert!((back - canvas).length() < 1e-3);
    }
}
