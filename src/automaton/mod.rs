//! Automaton Data Structures
//! Core types representing finite-state automata as delivered by the
//! generation backend: a declared start state plus flat state/transition lists.

use serde::{Deserialize, Serialize};

pub mod raw;

pub use raw::{load_file, parse_document, LoadError};


/// The distinguished transition symbol consumable without input.
/// Only nondeterministic automata carry it.
pub const EPSILON: &str = "epsilon";

/// Symbol text as shown on edge labels and in summaries.
pub fn display_symbol(symbol: &str) -> &str {
    if symbol == EPSILON {
        "ε"
    } else {
        symbol
    }
}

/// Which construction stage an automaton came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomatonKind {
    #[serde(rename = "NFA")]
    Nfa,
    #[serde(rename = "DFA")]
    Dfa,
    #[serde(rename = "MIN_DFA")]
    MinDfa,
}

impl AutomatonKind {
    pub fn label(&self) -> &'static str {
        match self {
            AutomatonKind::Nfa => "NFA",
            AutomatonKind::Dfa => "DFA",
            AutomatonKind::MinDfa => "MIN_DFA",
        }
    }
}

/// A state in the automaton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    /// State name (unique identifier)
    pub id: String,
    /// Whether this is the automaton's declared starting state
    #[serde(rename = "isInitial")]
    pub is_initial: bool,
    /// Whether this state accepts (double ring in the diagram)
    #[serde(rename = "isTerminating")]
    pub is_terminating: bool,
}

impl State {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_initial: false,
            is_terminating: false,
        }
    }

    pub fn terminating(mut self) -> Self {
        self.is_terminating = true;
        self
    }
}

/// A symbol-labeled transition between two states.
/// Multiple transitions may share the same `(from, to)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub symbol: String,
}

impl Transition {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            symbol: symbol.into(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// A complete automaton: explicit tagged record, states and transitions as
/// separate typed fields (never the wire format's state-keyed object).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Automaton {
    #[serde(rename = "type")]
    pub kind: AutomatonKind,
    #[serde(rename = "startingState")]
    pub starting_state: String,
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

impl Automaton {
    pub fn new(kind: AutomatonKind, starting_state: impl Into<String>) -> Self {
        Self {
            kind,
            starting_state: starting_state.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn is_terminating(&self, id: &str) -> bool {
        self.state(id).is_some_and(|s| s.is_terminating)
    }

    /// The symbol alphabet actually used by transitions, epsilon excluded,
    /// sorted and deduplicated.
    pub fn alphabet(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .transitions
            .iter()
            .filter(|t| !t.is_epsilon())
            .map(|t| t.symbol.as_str())
            .collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// True when the stepper is meaningful: no epsilon transitions and at
    /// most one successor per `(state, symbol)` pair.
    pub fn is_deterministic(&self) -> bool {
        if self.transitions.iter().any(Transition::is_epsilon) {
            return false;
        }
        let mut seen: Vec<(&str, &str)> = Vec::with_capacity(self.transitions.len());
        for t in &self.transitions {
            let key = (t.from.as_str(), t.symbol.as_str());
            if seen.contains(&key) {
                return false;
            }
            seen.push(key);
        }
        true
    }

    /// Validate the automaton definition
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.starting_state.is_empty() {
            errors.push("No starting state declared".to_string());
        } else if self.state(&self.starting_state).is_none() {
            errors.push(format!(
                "Starting state '{}' not found",
                self.starting_state
            ));
        }

        let initials = self.states.iter().filter(|s| s.is_initial).count();
        if initials != 1 {
            errors.push(format!(
                "Expected exactly one initial state, found {initials}"
            ));
        }

        for t in &self.transitions {
            if self.state(&t.from).is_none() {
                errors.push(format!("Transition source state '{}' not found", t.from));
            }
            if self.state(&t.to).is_none() {
                errors.push(format!("Transition target state '{}' not found", t.to));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
