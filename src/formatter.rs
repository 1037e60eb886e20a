//! Trick formatter: four landed values -> display text.

use crate::GameMode;

/// Shown while a round is live.
pub const ROLLING: &str = "ROLLING...";
/// Shown when every part of the trick came up empty.
pub const SKATERS_CHOICE: &str = "SKATER'S CHOICE";

/// True for the two placeholder texts that never go into history.
pub fn is_placeholder(text: &str) -> bool {
    text == ROLLING || text == SKATERS_CHOICE
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Regular is the default stance and never named.
fn spoken_stance(stance: &str) -> &str {
    if stance == "Regular" { "" } else { stance }
}

/// Compose the trick text. Values are in reel order for `mode`.
pub fn format_trick(mode: GameMode, values: [&str; 4]) -> String {
    match mode {
        GameMode::Flatground => {
            let [stance, rotation, degree, trick] = values;
            let joined = join_present(&[spoken_stance(stance), rotation, degree, trick]);
            if joined.is_empty() {
                SKATERS_CHOICE.to_string()
            } else if trick.is_empty() {
                format!("ANYTHING {}", joined.to_uppercase())
            } else {
                joined.to_uppercase()
            }
        }
        GameMode::Ledge => {
            let [stance, grind, rotation, tries] = values;
            let name = join_present(&[spoken_stance(stance), rotation, grind]);
            let name = if name.is_empty() {
                SKATERS_CHOICE.to_string()
            } else {
                name.to_uppercase()
            };
            format!("{name}\n{}", tries.to_uppercase())
        }
    }
}
