//! Edge Router
//!
//! Groups transitions into drawable edges and computes their geometry from
//! current state positions. Symbols sharing a `(from, to)` pair merge into
//! one comma-joined label; reciprocal pairs bow to opposite sides of the
//! connecting line; self-loops become a fixed-size cubic loop above the
//! state. Every non-loop edge is clipped to the marker's boundary circle so
//! arrowheads land on the circle edge.
//!
//! Pure: identical inputs yield identical paths. Edges with a missing
//! endpoint position are skipped (and flagged), never fatal.

use std::collections::BTreeMap;

use egui::{Pos2, Vec2};

use crate::automaton::{display_symbol, Transition};
use crate::geometry::{
    arrowhead, circle_anchor, cubic_point, direction, perp, quad_point, unit_toward,
};
use crate::layout::{Positions, STATE_RADIUS};

#[cfg(test)]
mod tests;

/// Arrowhead leg length.
const ARROW_LEN: f32 = 12.0;
/// Base bow offset for a reciprocal curve.
const BOW_BASE: f32 = 40.0;
/// Extra bow per symbol carried by the opposite direction.
const BOW_PER_SYMBOL: f32 = 14.0;
/// Perpendicular clearance between a straight edge and its label.
const LABEL_CLEARANCE: f32 = 16.0;
/// How far self-loop anchors sit from straight up, in radians.
const LOOP_SPREAD: f32 = 0.6;
/// Control-point distance for the self-loop, in state radii.
const LOOP_REACH: f32 = 3.2;

/// Geometry of one drawable edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeKind {
    /// Cubic loop leaving and re-entering the same state from above.
    SelfLoop {
        start: Pos2,
        ctrl_out: Pos2,
        ctrl_in: Pos2,
        end: Pos2,
    },
    /// Boundary-to-boundary straight segment.
    Line { start: Pos2, end: Pos2 },
    /// Quadratic curve bowed off the straight line (reciprocal pairs).
    Curve { start: Pos2, ctrl: Pos2, end: Pos2 },
}

/// A routed edge: merged label, path geometry, arrowhead and label anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePath {
    pub from: String,
    pub to: String,
    /// Comma-joined symbols, epsilon rendered as ε.
    pub label: String,
    /// Distinguishes multiple groups routed between the same endpoints.
    /// Grouping by pair currently yields a single group, so this is always
    /// zero; kept so parallel distinct curves stay representable.
    pub ordinal: usize,
    pub kind: EdgeKind,
    pub label_pos: Pos2,
    pub arrow: [Pos2; 3],
}

impl EdgePath {
    pub fn is_self_loop(&self) -> bool {
        matches!(self.kind, EdgeKind::SelfLoop { .. })
    }

    /// Point along the path at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Pos2 {
        match self.kind {
            EdgeKind::SelfLoop {
                start,
                ctrl_out,
                ctrl_in,
                end,
            } => cubic_point(start, ctrl_out, ctrl_in, end, t),
            EdgeKind::Line { start, end } => start + (end - start) * t,
            EdgeKind::Curve { start, ctrl, end } => quad_point(start, ctrl, end, t),
        }
    }
}

/// Route every drawable edge for the given transitions and positions.
///
/// One path per distinct ordered `(from, to)` pair, emitted in
/// lexicographic pair order so repeated calls yield identical output.
pub fn route_edges(transitions: &[Transition], positions: &Positions) -> Vec<EdgePath> {
    // Merge parallel symbols per ordered pair.
    let mut groups: BTreeMap<(&str, &str), Vec<&str>> = BTreeMap::new();
    for t in transitions {
        groups
            .entry((t.from.as_str(), t.to.as_str()))
            .or_default()
            .push(t.symbol.as_str());
    }

    let mut edges = Vec::with_capacity(groups.len());
    for (&(from, to), symbols) in &groups {
        let (Some(from_pos), Some(to_pos)) = (positions.get(from), positions.get(to)) else {
            // Dangling reference or not yet laid out: skip this pass.
            log::warn!("skipping edge {from} -> {to}: endpoint has no position");
            continue;
        };

        let label = symbols
            .iter()
            .map(|s| display_symbol(s))
            .collect::<Vec<_>>()
            .join(", ");

        let edge = if from == to {
            route_self_loop(from, label, from_pos)
        } else {
            let opposite = groups.get(&(to, from)).map_or(0, Vec::len);
            if opposite > 0 {
                route_reciprocal(from, to, label, from_pos, to_pos, opposite)
            } else {
                route_straight(from, to, label, from_pos, to_pos)
            }
        };
        edges.push(edge);
    }
    edges
}

/// Signed bow offset for a reciprocal curve: side chosen by lexicographic
/// endpoint order (stable across redraws), magnitude growing with the number
/// of symbols the opposite direction carries.
fn bow_offset(from: &str, to: &str, opposite_symbols: usize) -> f32 {
    let magnitude = BOW_BASE + BOW_PER_SYMBOL * opposite_symbols as f32;
    if from < to {
        magnitude
    } else {
        -magnitude
    }
}

/// Perpendicular of the canonical (lexicographically ordered) pair axis, so
/// both directions of a pair measure their bow against the same line.
fn pair_perp(from: &str, to: &str, from_pos: Pos2, to_pos: Pos2) -> Vec2 {
    if from < to {
        perp(unit_toward(from_pos, to_pos))
    } else {
        perp(unit_toward(to_pos, from_pos))
    }
}

fn route_straight(from: &str, to: &str, label: String, from_pos: Pos2, to_pos: Pos2) -> EdgePath {
    let start = circle_anchor(from_pos, STATE_RADIUS, to_pos);
    let end = circle_anchor(to_pos, STATE_RADIUS, from_pos);
    let tangent = direction(start, end);
    let mid = start + (end - start) * 0.5;
    let label_pos = mid + perp(unit_toward(start, end)) * -LABEL_CLEARANCE;

    EdgePath {
        from: from.to_string(),
        to: to.to_string(),
        label,
        ordinal: 0,
        kind: EdgeKind::Line { start, end },
        label_pos,
        arrow: arrowhead(end, tangent, ARROW_LEN),
    }
}

fn route_reciprocal(
    from: &str,
    to: &str,
    label: String,
    from_pos: Pos2,
    to_pos: Pos2,
    opposite_symbols: usize,
) -> EdgePath {
    let offset = bow_offset(from, to, opposite_symbols);
    let axis_perp = pair_perp(from, to, from_pos, to_pos);
    let mid = from_pos + (to_pos - from_pos) * 0.5;
    let ctrl = mid + axis_perp * offset;

    // Clip both ends toward the control point so the curve's terminal
    // tangents cross the boundary circles cleanly.
    let start = circle_anchor(from_pos, STATE_RADIUS, ctrl);
    let end = circle_anchor(to_pos, STATE_RADIUS, ctrl);
    let tangent = direction(ctrl, end);
    let label_pos = quad_point(start, ctrl, end, 0.5) + axis_perp * offset.signum() * LABEL_CLEARANCE;

    EdgePath {
        from: from.to_string(),
        to: to.to_string(),
        label,
        ordinal: 0,
        kind: EdgeKind::Curve { start, ctrl, end },
        label_pos,
        arrow: arrowhead(end, tangent, ARROW_LEN),
    }
}

fn route_self_loop(state: &str, label: String, center: Pos2) -> EdgePath {
    let up = -std::f32::consts::FRAC_PI_2;
    let out_angle = up - LOOP_SPREAD;
    let in_angle = up + LOOP_SPREAD;

    let radial = |angle: f32, dist: f32| -> Pos2 {
        center + Vec2::new(angle.cos(), angle.sin()) * dist
    };

    let start = radial(out_angle, STATE_RADIUS);
    let end = radial(in_angle, STATE_RADIUS);
    // Controls sit on the anchors' radials, so the curve leaves and re-enters
    // along the circle normal and never dips back inside.
    let ctrl_out = radial(out_angle, STATE_RADIUS * LOOP_REACH);
    let ctrl_in = radial(in_angle, STATE_RADIUS * LOOP_REACH);

    let tangent = direction(ctrl_in, end);
    let apex = cubic_point(start, ctrl_out, ctrl_in, end, 0.5);
    let label_pos = apex + Vec2::new(0.0, -LABEL_CLEARANCE);

    EdgePath {
        from: state.to_string(),
        to: state.to_string(),
        label,
        ordinal: 0,
        kind: EdgeKind::SelfLoop {
            start,
            ctrl_out,
            ctrl_in,
            end,
        },
        label_pos,
        arrow: arrowhead(end, tangent, ARROW_LEN),
    }
}
