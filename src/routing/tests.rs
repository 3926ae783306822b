//! Unit tests for the edge router

use egui::pos2;

use crate::automaton::{Transition, EPSILON};
use crate::layout::{Positions, STATE_RADIUS};
use crate::routing::{route_edges, EdgeKind, EdgePath};

fn positions(entries: &[(&str, f32, f32)]) -> Positions {
    let mut p = Positions::default();
    for (id, x, y) in entries {
        p.set(*id, pos2(*x, *y));
    }
    p
}

fn find<'a>(edges: &'a [EdgePath], from: &str, to: &str) -> &'a EdgePath {
    edges
        .iter()
        .find(|e| e.from == from && e.to == to)
        .unwrap_or_else(|| panic!("no edge {from} -> {to}"))
}

#[test]
fn test_parallel_symbols_merge_into_one_label() {
    let transitions = vec![
        Transition::new("A", "B", "a"),
        Transition::new("A", "B", "b"),
        Transition::new("A", "B", EPSILON),
    ];
    let pos = positions(&[("A", 100.0, 100.0), ("B", 400.0, 100.0)]);
    let edges = route_edges(&transitions, &pos);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].label, "a, b, ε");
    assert_eq!(edges[0].ordinal, 0);
}

#[test]
fn test_one_directional_edge_is_straight_and_clipped() {
    let transitions = vec![Transition::new("A", "B", "a")];
    let pos = positions(&[("A", 100.0, 100.0), ("B", 400.0, 100.0)]);
    let edges = route_edges(&transitions, &pos);
    let EdgeKind::Line { start, end } = find(&edges, "A", "B").kind else {
        panic!("expected straight line");
    };
    // Clipped to the boundary circles, not the centers.
    assert!((start.x - (100.0 + STATE_RADIUS)).abs() < 1e-3);
    assert!((end.x - (400.0 - STATE_RADIUS)).abs() < 1e-3);
    assert!((start.y - 100.0).abs() < 1e-3);
}

#[test]
fn test_arrowhead_lands_on_destination_circle() {
    let transitions = vec![Transition::new("A", "B", "a")];
    let pos = positions(&[("A", 100.0, 100.0), ("B", 380.0, 260.0)]);
    let edges = route_edges(&transitions, &pos);
    let edge = find(&edges, "A", "B");
    let tip = edge.arrow[0];
    let dist = (tip - pos2(380.0, 260.0)).length();
    assert!(
        (dist - STATE_RADIUS).abs() < 1e-3,
        "tip at distance {dist} from center"
    );
    // Wings sit behind the tip, on the source side.
    assert!(edge.arrow[1].x < tip.x && edge.arrow[2].x < tip.x);
}

#[test]
fn test_reciprocal_pair_bows_to_opposite_sides() {
    let transitions = vec![
        Transition::new("A", "B", "a"),
        Transition::new("B", "A", "b"),
    ];
    let pos = positions(&[("A", 100.0, 300.0), ("B", 500.0, 300.0)]);
    let edges = route_edges(&transitions, &pos);

    let EdgeKind::Curve { ctrl: ctrl_ab, .. } = find(&edges, "A", "B").kind else {
        panic!("A->B should curve");
    };
    let EdgeKind::Curve { ctrl: ctrl_ba, .. } = find(&edges, "B", "A").kind else {
        panic!("B->A should curve");
    };
    // The pair axis is horizontal at y=300: opposite signs relative to it.
    let off_ab = ctrl_ab.y - 300.0;
    let off_ba = ctrl_ba.y - 300.0;
    assert!(
        off_ab * off_ba < 0.0,
        "bows on same side: {off_ab} vs {off_ba}"
    );
}

#[test]
fn test_bow_grows_with_opposite_symbol_count() {
    let base = vec![
        Transition::new("A", "B", "a"),
        Transition::new("B", "A", "x"),
    ];
    let heavy = vec![
        Transition::new("A", "B", "a"),
        Transition::new("B", "A", "x"),
        Transition::new("B", "A", "y"),
        Transition::new("B", "A", "z"),
    ];
    let pos = positions(&[("A", 100.0, 300.0), ("B", 500.0, 300.0)]);

    let ctrl_of = |transitions: &[Transition]| -> f32 {
        let edges = route_edges(transitions, &pos);
        let EdgeKind::Curve { ctrl, .. } = find(&edges, "A", "B").kind else {
            panic!("expected curve");
        };
        (ctrl.y - 300.0).abs()
    };

    assert!(
        ctrl_of(&heavy) > ctrl_of(&base),
        "three opposite symbols should push A->B further out"
    );
}

#[test]
fn test_self_loop_stays_outside_boundary_circle() {
    let transitions = vec![Transition::new("A", "A", "a")];
    let center = pos2(200.0, 200.0);
    let pos = positions(&[("A", 200.0, 200.0)]);
    let edges = route_edges(&transitions, &pos);
    let edge = find(&edges, "A", "A");
    assert!(edge.is_self_loop());

    for i in 1..20 {
        let t = i as f32 / 20.0;
        let d = (edge.point_at(t) - center).length();
        assert!(
            d >= STATE_RADIUS - 1e-3,
            "loop dips inside circle at t={t}: distance {d}"
        );
    }
    // Label sits above the loop apex, well clear of the state.
    assert!(edge.label_pos.y < center.y - STATE_RADIUS);
}

#[test]
fn test_missing_endpoint_skips_edge_without_panic() {
    let transitions = vec![
        Transition::new("A", "Ghost", "a"),
        Transition::new("A", "B", "b"),
    ];
    let pos = positions(&[("A", 100.0, 100.0), ("B", 400.0, 100.0)]);
    let edges = route_edges(&transitions, &pos);
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to, "B");
}

#[test]
fn test_route_edges_is_idempotent() {
    let transitions = vec![
        Transition::new("A", "B", "a"),
        Transition::new("B", "A", "b"),
        Transition::new("A", "A", "c"),
        Transition::new("B", "C", "d"),
    ];
    let pos = positions(&[
        ("A", 100.0, 100.0),
        ("B", 400.0, 150.0),
        ("C", 250.0, 400.0),
    ]);
    let first = route_edges(&transitions, &pos);
    let second = route_edges(&transitions, &pos);
    assert_eq!(first, second);
}

#[test]
fn test_moved_position_immediately_reflected() {
    let transitions = vec![Transition::new("A", "B", "a")];
    let mut pos = positions(&[("A", 100.0, 100.0), ("B", 400.0, 100.0)]);
    let before = route_edges(&transitions, &pos);

    // Simulate a drag of B.
    pos.set("B", pos2(400.0, 500.0));
    let after = route_edges(&transitions, &pos);

    assert_ne!(before, after);
    let EdgeKind::Line { end, .. } = find(&after, "A", "B").kind else {
        panic!("expected line");
    };
    let d = (end - pos2(400.0, 500.0)).length();
    assert!((d - STATE_RADIUS).abs() < 1e-3);
}

#[test]
fn test_label_never_on_the_stroke() {
    let transitions = vec![Transition::new("A", "B", "a")];
    let pos = positions(&[("A", 100.0, 100.0), ("B", 500.0, 100.0)]);
    let edges = route_edges(&transitions, &pos);
    let edge = find(&edges, "A", "B");
    // Straight horizontal edge at y=100; label is perpendicular-offset.
    assert!((edge.label_pos.y - 100.0).abs() > 4.0);
}
