//! Wire-format parsing.
//!
//! The generation backend ships automata in a duck-typed shape where state
//! names double as object keys and `isTerminatingState` is a reserved key
//! sharing a namespace with transition symbols:
//!
//! ```json
//! {
//!   "startingState": "S0",
//!   "S0": { "isTerminatingState": false, "a": ["S1"], "b": ["S0"] },
//!   "S1": { "isTerminatingState": true }
//! }
//! ```
//!
//! This module turns that into the explicit tagged [`Automaton`] record.
//! A full response bundles all three construction stages under
//! `{"nfa": ..., "dfa": ..., "min_dfa": ...}`.

use serde_json::Value;
use thiserror::Error;

use super::{Automaton, AutomatonKind, State, Transition};

const STARTING_STATE_KEY: &str = "startingState";
const TERMINATING_KEY: &str = "isTerminatingState";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read automaton file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("automaton document must be a JSON object")]
    NotAnObject,
    #[error("missing or non-string '{STARTING_STATE_KEY}' key")]
    MissingStartingState,
    #[error("state '{state}' must be an object, got {found}")]
    BadState { state: String, found: String },
    #[error("state '{state}', symbol '{symbol}': targets must be a string or array of strings")]
    BadTargets { state: String, symbol: String },
    #[error("document contains neither a raw automaton nor an nfa/dfa/min_dfa bundle")]
    EmptyDocument,
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse one raw automaton object into the tagged record.
///
/// States are emitted in sorted name order so the same document always
/// produces the same state list (and therefore the same layout).
pub fn parse_raw(value: &Value, kind: AutomatonKind) -> Result<Automaton, LoadError> {
    let obj = value.as_object().ok_or(LoadError::NotAnObject)?;

    let starting_state = obj
        .get(STARTING_STATE_KEY)
        .and_then(Value::as_str)
        .ok_or(LoadError::MissingStartingState)?
        .to_string();

    let mut automaton = Automaton::new(kind, starting_state.clone());

    let mut names: Vec<&String> = obj.keys().filter(|k| *k != STARTING_STATE_KEY).collect();
    names.sort();

    for name in names {
        let state_obj = obj[name].as_object().ok_or_else(|| LoadError::BadState {
            state: name.clone(),
            found: value_kind(&obj[name]).to_string(),
        })?;

        let terminating = state_obj
            .get(TERMINATING_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        automaton.states.push(State {
            id: name.clone(),
            is_initial: *name == starting_state,
            is_terminating: terminating,
        });

        for (symbol, targets) in state_obj {
            if symbol == TERMINATING_KEY {
                continue;
            }
            match targets {
                Value::String(to) => {
                    automaton
                        .transitions
                        .push(Transition::new(name.clone(), to.clone(), symbol.clone()));
                }
                Value::Array(items) => {
                    for item in items {
                        let to = item.as_str().ok_or_else(|| LoadError::BadTargets {
                            state: name.clone(),
                            symbol: symbol.clone(),
                        })?;
                        automaton
                            .transitions
                            .push(Transition::new(name.clone(), to, symbol.clone()));
                    }
                }
                _ => {
                    return Err(LoadError::BadTargets {
                        state: name.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }
    }

    Ok(automaton)
}

/// Parse a JSON document that is either a single raw automaton (treated as a
/// DFA) or a `{nfa, dfa, min_dfa}` bundle. Bundle entries that are absent or
/// empty objects are skipped.
pub fn parse_document(json: &str) -> Result<Vec<Automaton>, LoadError> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value.as_object().ok_or(LoadError::NotAnObject)?;

    let bundle_keys = [
        ("nfa", AutomatonKind::Nfa),
        ("dfa", AutomatonKind::Dfa),
        ("min_dfa", AutomatonKind::MinDfa),
    ];

    let mut automata = Vec::new();
    if bundle_keys.iter().any(|(key, _)| obj.contains_key(*key)) {
        for (key, kind) in bundle_keys {
            let Some(entry) = obj.get(key) else { continue };
            if entry.as_object().is_some_and(|m| m.is_empty()) {
                continue;
            }
            automata.push(parse_raw(entry, kind)?);
        }
    } else if obj.contains_key(STARTING_STATE_KEY) {
        automata.push(parse_raw(&value, AutomatonKind::Dfa)?);
    }

    if automata.is_empty() {
        return Err(LoadError::EmptyDocument);
    }
    Ok(automata)
}

/// Read and parse an automaton document from disk.
pub fn load_file(path: &std::path::Path) -> Result<Vec<Automaton>, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content)
}
