//! Layout Engine
//!
//! Assigns every declared state an initial canvas position using a layered
//! breadth-first placement with boustrophedon packing: layers advance across
//! the canvas and the walk direction rotates 90° (right → down → left → up)
//! whenever the next layer would leave the padded bounds, so large automata
//! snake through the full canvas area instead of running off one edge.
//!
//! The result is owned by a [`Positions`] store; a drag overrides an entry
//! and stays authoritative until the automaton is replaced.

use std::collections::{HashMap, HashSet, VecDeque};

use egui::{pos2, Pos2, Vec2};

use crate::automaton::{State, Transition};


/// Radius of a state marker, in canvas units (matches the drawn circle).
pub const STATE_RADIUS: f32 = 30.0;

/// Reference canvas the layout targets; rendering pans/zooms on top of it.
pub const CANVAS_WIDTH: f32 = 1000.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Distance the cursor advances between layers.
const LAYER_STEP: f32 = 150.0;
/// Spacing between states stacked within one layer.
const STACK_STEP: f32 = 90.0;
/// Keep-out margin from each canvas edge for the traversal cursor.
const EDGE_PAD: f32 = STATE_RADIUS * 2.0;
/// Collision retries before clamping wherever we are.
const MAX_PLACE_ATTEMPTS: usize = 4;

/// Owned mapping from state id to canvas position. Read by the router and
/// renderer, written by the layout engine and the drag controller.
#[derive(Debug, Clone, Default)]
pub struct Positions {
    map: HashMap<String, Pos2>,
}

impl Positions {
    pub fn get(&self, id: &str) -> Option<Pos2> {
        self.map.get(id).copied()
    }

    pub fn set(&mut self, id: impl Into<String>, pos: Pos2) {
        self.map.insert(id.into(), pos);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Pos2)> {
        self.map.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Right,
    Down,
    Left,
    Up,
}

impl Walk {
    fn step(self) -> Vec2 {
        match self {
            Walk::Right => Vec2::new(1.0, 0.0),
            Walk::Down => Vec2::new(0.0, 1.0),
            Walk::Left => Vec2::new(-1.0, 0.0),
            Walk::Up => Vec2::new(0.0, -1.0),
        }
    }

    /// Direction states stack within a layer: perpendicular to travel.
    fn stack(self) -> Vec2 {
        match self {
            Walk::Right | Walk::Left => Vec2::new(0.0, 1.0),
            Walk::Down | Walk::Up => Vec2::new(1.0, 0.0),
        }
    }

    fn rotate(self) -> Self {
        match self {
            Walk::Right => Walk::Down,
            Walk::Down => Walk::Left,
            Walk::Left => Walk::Up,
            Walk::Up => Walk::Right,
        }
    }
}

/// Compute an initial position for every declared state.
///
/// Deterministic for identical inputs, total (disconnected states get
/// trailing singleton layers), and bounded: every returned coordinate lies
/// within the canvas minus one state radius.
pub fn compute_layout(
    start_state: &str,
    states: &[State],
    transitions: &[Transition],
    canvas_width: f32,
    canvas_height: f32,
) -> Positions {
    let mut positions = Positions::default();
    if states.is_empty() {
        return positions;
    }

    let layers = build_layers(start_state, states, transitions);

    let mut walk = Walk::Right;
    let mut cursor = pos2(EDGE_PAD, canvas_height * 0.5);
    let mut occupied: HashSet<(i64, i64)> = HashSet::new();

    for layer in &layers {
        for (i, id) in layer.iter().enumerate() {
            let lane = i as f32 - (layer.len() as f32 - 1.0) * 0.5;
            let candidate = cursor + walk.stack() * (lane * STACK_STEP);
            let placed = place(
                candidate,
                walk.step() * STACK_STEP,
                canvas_width,
                canvas_height,
                &mut occupied,
            );
            positions.set(id.clone(), placed);
        }

        let next = cursor + walk.step() * LAYER_STEP;
        if in_padded_bounds(next, canvas_width, canvas_height) {
            cursor = next;
        } else {
            walk = walk.rotate();
            cursor = clamp_to_pad(cursor + walk.step() * LAYER_STEP, canvas_width, canvas_height);
        }
    }

    positions
}

/// Breadth-first layering from the start state, self-loops excluded from the
/// adjacency. States unreachable by forward expansion are appended as
/// singleton trailing layers in declared order.
fn build_layers(start_state: &str, states: &[State], transitions: &[Transition]) -> Vec<Vec<String>> {
    let declared: HashSet<&str> = states.iter().map(|s| s.id.as_str()).collect();

    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in transitions {
        if t.is_self_loop() || !declared.contains(t.from.as_str()) || !declared.contains(t.to.as_str())
        {
            continue;
        }
        let targets = successors.entry(t.from.as_str()).or_default();
        if !targets.contains(&t.to.as_str()) {
            targets.push(t.to.as_str());
        }
    }

    let mut layers: Vec<Vec<String>> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

    if declared.contains(start_state) {
        visited.insert(start_state);
        queue.push_back((start_state, 0));
    }

    while let Some((id, depth)) = queue.pop_front() {
        if layers.len() <= depth {
            layers.push(Vec::new());
        }
        layers[depth].push(id.to_string());

        if let Some(targets) = successors.get(id) {
            for &next in targets {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }

    for state in states {
        if !visited.contains(state.id.as_str()) {
            layers.push(vec![state.id.clone()]);
        }
    }

    layers
}

/// Round a coordinate to its occupancy key.
fn coord_key(pos: Pos2) -> (i64, i64) {
    (pos.x.round() as i64, pos.y.round() as i64)
}

/// Accept a candidate if its rounded coordinate is free; otherwise retry
/// along `step` a few times, then take whatever is left after clamping.
fn place(
    candidate: Pos2,
    step: Vec2,
    canvas_width: f32,
    canvas_height: f32,
    occupied: &mut HashSet<(i64, i64)>,
) -> Pos2 {
    let mut pos = clamp_to_canvas(candidate, canvas_width, canvas_height);
    for _ in 0..MAX_PLACE_ATTEMPTS {
        if !occupied.contains(&coord_key(pos)) {
            break;
        }
        pos = clamp_to_canvas(pos + step, canvas_width, canvas_height);
    }
    occupied.insert(coord_key(pos));
    pos
}

fn in_padded_bounds(pos: Pos2, canvas_width: f32, canvas_height: f32) -> bool {
    pos.x >= EDGE_PAD
        && pos.x <= canvas_width - EDGE_PAD
        && pos.y >= EDGE_PAD
        && pos.y <= canvas_height - EDGE_PAD
}

fn clamp_to_pad(pos: Pos2, canvas_width: f32, canvas_height: f32) -> Pos2 {
    pos2(
        pos.x.clamp(EDGE_PAD, canvas_width - EDGE_PAD),
        pos.y.clamp(EDGE_PAD, canvas_height - EDGE_PAD),
    )
}

/// No state center may sit within one radius of the canvas edge.
fn clamp_to_canvas(pos: Pos2, canvas_width: f32, canvas_height: f32) -> Pos2 {
    pos2(
        pos.x.clamp(STATE_RADIUS, canvas_width - STATE_RADIUS),
        pos.y.clamp(STATE_RADIUS, canvas_height - STATE_RADIUS),
    )
}
