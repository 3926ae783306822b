//! Statescope - interactive finite automaton visualizer
//! Loads NFA/DFA/minimized-DFA bundles and provides layout, edge routing,
//! rendering, dragging, and timed input simulation for them.

pub mod automaton;
pub mod export;
pub mod geometry;
pub mod interact;
pub mod layout;
pub mod render;
pub mod routing;
pub mod sim;

pub use automaton::{parse_document, Automaton, AutomatonKind};
pub use layout::compute_layout;
pub use routing::route_edges;
pub use sim::Stepper;
