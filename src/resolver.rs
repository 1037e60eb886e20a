//! Slot resolver: which faces each of the four reels may land on this round.

use crate::catalog::{Category, Face};
use crate::settings::CustomConfig;
use crate::{Difficulty, GameMode};

/// Filtered, never-empty faces for one reel. Frozen once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    category: Category,
    faces: Vec<Face>,
}

impl OptionSet {
    /// Keep the faces `allow` accepts; an empty result falls back to the full base set.
    fn filtered(category: Category, allow: impl Fn(&Face) -> bool) -> Self {
        let base = category.faces();
        let mut faces: Vec<Face> = base.iter().copied().filter(|f| allow(f)).collect();
        if faces.is_empty() {
            faces = base.to_vec();
        }
        Self { category, faces }
    }

    /// Unfiltered base set.
    pub fn full(category: Category) -> Self {
        Self {
            category,
            faces: category.faces().to_vec(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Value at `index`, falling back to the first face when out of range.
    pub fn value_or_first(&self, index: usize) -> &'static str {
        self.faces
            .get(index)
            .or_else(|| self.faces.first())
            .map_or("", |f| f.value)
    }
}

/// The four option sets of a round, in reel order.
pub type SlotSet = [OptionSet; 4];

/// Preset allow-list for `difficulty` (easy/medium/hard only).
fn preset_allows(category: Category, difficulty: Difficulty, value: &str) -> bool {
    use Difficulty::{Easy, Medium};
    match (category, difficulty) {
        (Category::Stance, Easy) => matches!(value, "Regular" | "Fakie"),
        // Medium lists every stance, same as hard.
        (Category::Stance, Medium) => matches!(value, "Regular" | "Fakie" | "Switch" | "Nollie"),
        (Category::Rotation, Easy) => matches!(value, "" | "Backside" | "Frontside"),
        (Category::Degree, Easy) => matches!(value, "" | "180"),
        (Category::Trick, Easy) => matches!(value, "Kickflip" | "Heelflip" | ""),
        (Category::Grind, Easy) => {
            matches!(value, "50-50" | "Boardslide" | "Noseslide" | "Tailslide")
        }
        (Category::Grind, Medium) => !matches!(value, "Bluntslide" | "Noseblunt"),
        _ => true,
    }
}

fn resolve_category(category: Category, difficulty: Difficulty, custom: &CustomConfig) -> OptionSet {
    if !category.is_customizable() {
        return OptionSet::full(category);
    }
    match difficulty {
        Difficulty::Custom => {
            OptionSet::filtered(category, |f| !custom.is_disabled(category, f.value))
        }
        preset => OptionSet::filtered(category, |f| preset_allows(category, preset, f.value)),
    }
}

/// Resolve the four option sets for a round. Total: every set is non-empty.
pub fn resolve(mode: GameMode, difficulty: Difficulty, custom: &CustomConfig) -> SlotSet {
    mode.categories()
        .map(|category| resolve_category(category, difficulty, custom))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [GameMode; 2] = [GameMode::Flatground, GameMode::Ledge];
    const DIFFICULTIES: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Custom,
    ];

    fn values(set: &OptionSet) -> Vec<&'static str> {
        set.faces().iter().map(|f| f.value).collect()
    }

    fn disable_everything() -> CustomConfig {
        let mut custom = CustomConfig::default();
        for c in Category::CUSTOMIZABLE {
            for f in c.faces() {
                if !custom.is_disabled(c, f.value) {
                    custom.toggle(c, f.value);
                }
            }
        }
        custom
    }

    #[test]
    fn every_resolution_is_non_empty() {
        let configs = [CustomConfig::default(), disable_everything()];
        for mode in MODES {
            for difficulty in DIFFICULTIES {
                for custom in &configs {
                    for set in resolve(mode, difficulty, custom) {
                        assert!(!set.faces().is_empty(), "{mode:?}/{difficulty:?} {:?}", set.category());
                    }
                }
            }
        }
    }

    #[test]
    fn custom_disabling_everything_falls_back_to_full_set() {
        let custom = disable_everything();
        for mode in MODES {
            for set in resolve(mode, Difficulty::Custom, &custom) {
                assert_eq!(set, OptionSet::full(set.category()));
            }
        }
    }

    #[test]
    fn hard_is_unfiltered() {
        let custom = disable_everything();
        for mode in MODES {
            for set in resolve(mode, Difficulty::Hard, &custom) {
                assert_eq!(set, OptionSet::full(set.category()));
            }
        }
    }

    #[test]
    fn easy_flatground_presets() {
        let [stance, rotation, degree, trick] =
            resolve(GameMode::Flatground, Difficulty::Easy, &CustomConfig::default());
        assert_eq!(values(&stance), ["Regular", "Fakie"]);
        assert_eq!(values(&rotation), ["Backside", "Frontside", "", ""]);
        assert_eq!(values(&degree), ["180", "", ""]);
        assert_eq!(values(&trick), ["Kickflip", "Heelflip", "", ""]);
    }

    #[test]
    fn medium_keeps_all_stances_and_drops_blunts() {
        let [stance, grind, _, _] =
            resolve(GameMode::Ledge, Difficulty::Medium, &CustomConfig::default());
        assert_eq!(stance, OptionSet::full(Category::Stance));
        assert_eq!(grind.len(), 8);
        assert!(!values(&grind).contains(&"Bluntslide"));
        assert!(!values(&grind).contains(&"Noseblunt"));
    }

    #[test]
    fn easy_ledge_grinds() {
        let [_, grind, _, _] = resolve(GameMode::Ledge, Difficulty::Easy, &CustomConfig::default());
        assert_eq!(values(&grind), ["50-50", "Boardslide", "Noseslide", "Tailslide"]);
    }

    #[test]
    fn tries_never_filtered() {
        let custom = disable_everything();
        for difficulty in DIFFICULTIES {
            let [.., tries] = resolve(GameMode::Ledge, difficulty, &custom);
            assert_eq!(tries, OptionSet::full(Category::Tries));
        }
    }

    #[test]
    fn custom_removes_disabled_values() {
        let mut custom = CustomConfig::default();
        custom.toggle(Category::Stance, "Switch");
        custom.toggle(Category::Degree, "");
        let [stance, _, degree, _] = resolve(GameMode::Flatground, Difficulty::Custom, &custom);
        assert_eq!(values(&stance), ["Regular", "Fakie", "Nollie"]);
        assert_eq!(values(&degree), ["180", "360"]);
    }

    #[test]
    fn value_or_first_falls_back() {
        let set = OptionSet::full(Category::Stance);
        assert_eq!(set.value_or_first(2), "Switch");
        assert_eq!(set.value_or_first(99), "Regular");
    }
}
