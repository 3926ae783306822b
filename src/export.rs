//! Saving automata and diagram snapshots to disk.

use std::path::Path;

use thiserror::Error;

use crate::automaton::Automaton;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize automaton: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

pub fn to_json(automaton: &Automaton) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(automaton)?)
}

pub fn write_json(path: &Path, automaton: &Automaton) -> Result<(), ExportError> {
    std::fs::write(path, to_json(automaton)?)?;
    Ok(())
}

/// Encode a captured frame as a PNG. The image arrives from the viewport
/// screenshot event already cropped to the canvas rect.
pub fn write_png(path: &Path, frame: &egui::ColorImage) -> Result<(), ExportError> {
    let [width, height] = frame.size;
    image::save_buffer(
        path,
        frame.as_raw(),
        width as u32,
        height as u32,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{AutomatonKind, State, Transition};

    #[test]
    fn test_to_json_keeps_wire_field_names() {
        let mut a = Automaton::new(AutomatonKind::Dfa, "S0");
        a.states.push(State::new("S0"));
        a.states.push(State::new("S1").terminating());
        a.transitions.push(Transition::new("S0", "S1", "a"));

        let json = to_json(&a).unwrap();
        assert!(json.contains("\"startingState\": \"S0\""));
        assert!(json.contains("\"type\": \"DFA\""));
        assert!(json.contains("\"isTerminating\": true"));
    }
}
