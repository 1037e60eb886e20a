//! Option catalog: every face each reel can carry, per trick category.

use crate::GameMode;

/// One face of a reel: display label (may contain `\n`) and canonical value.
/// An empty `value` means "nothing" (the X faces).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub label: &'static str,
    pub value: &'static str,
}

const fn face(label: &'static str, value: &'static str) -> Face {
    Face { label, value }
}

pub const STANCE: [Face; 4] = [
    face("REGULAR", "Regular"),
    face("FAKIE", "Fakie"),
    face("SWITCH", "Switch"),
    face("NOLLIE", "Nollie"),
];

pub const ROTATION: [Face; 4] = [
    face("BACK\nSIDE", "Backside"),
    face("FRONT\nSIDE", "Frontside"),
    face("X", ""),
    face("X", ""),
];

pub const DEGREE: [Face; 4] = [
    face("180", "180"),
    face("360", "360"),
    face("X", ""),
    face("X", ""),
];

pub const TRICK: [Face; 4] = [
    face("KICK\nFLIP", "Kickflip"),
    face("HEEL\nFLIP", "Heelflip"),
    face("X", ""),
    face("X", ""),
];

pub const GRIND: [Face; 10] = [
    face("50-50", "50-50"),
    face("5-0", "5-0"),
    face("BOARD\nSLIDE", "Boardslide"),
    face("NOSE\nSLIDE", "Noseslide"),
    face("TAIL\nSLIDE", "Tailslide"),
    face("SMITH", "Smith"),
    face("FEEBLE", "Feeble"),
    face("CROOKED", "Crooked"),
    face("BLUNT\nSLIDE", "Bluntslide"),
    face("NOSE\nBLUNT", "Noseblunt"),
];

pub const TRIES: [Face; 4] = [
    face("1\nTRY", "1 Try"),
    face("3\nTRIES", "3 Tries"),
    face("5\nTRIES", "5 Tries"),
    face("UNTIL\nLANDED", "Until Landed"),
];

/// Trick category bound to a reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Stance,
    Rotation,
    Degree,
    Trick,
    Grind,
    Tries,
}

impl Category {
    /// Categories the user can customise, in settings-screen order.
    pub const CUSTOMIZABLE: [Self; 5] = [
        Self::Stance,
        Self::Rotation,
        Self::Degree,
        Self::Trick,
        Self::Grind,
    ];

    /// The unfiltered base option set.
    pub fn faces(self) -> &'static [Face] {
        match self {
            Self::Stance => &STANCE,
            Self::Rotation => &ROTATION,
            Self::Degree => &DEGREE,
            Self::Trick => &TRICK,
            Self::Grind => &GRIND,
            Self::Tries => &TRIES,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Stance => "Stances",
            Self::Rotation => "Rotations",
            Self::Degree => "Degrees",
            Self::Trick => "Tricks",
            Self::Grind => "Grinds",
            Self::Tries => "Tries",
        }
    }

    /// Whether a user opt-out list exists for this category.
    pub fn is_customizable(self) -> bool {
        self != Self::Tries
    }
}

impl GameMode {
    /// The four reel categories of a round, in reel order.
    pub fn categories(self) -> [Category; 4] {
        match self {
            GameMode::Flatground => [
                Category::Stance,
                Category::Rotation,
                Category::Degree,
                Category::Trick,
            ],
            GameMode::Ledge => [
                Category::Stance,
                Category::Grind,
                Category::Rotation,
                Category::Tries,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_faces() {
        for c in [
            Category::Stance,
            Category::Rotation,
            Category::Degree,
            Category::Trick,
            Category::Grind,
            Category::Tries,
        ] {
            assert!(!c.faces().is_empty(), "{c:?} is empty");
        }
    }

    #[test]
    fn ledge_reels_are_stance_grind_rotation_tries() {
        assert_eq!(
            GameMode::Ledge.categories(),
            [
                Category::Stance,
                Category::Grind,
                Category::Rotation,
                Category::Tries
            ]
        );
    }

    #[test]
    fn tries_is_not_customizable() {
        assert!(!Category::Tries.is_customizable());
        assert!(!Category::CUSTOMIZABLE.contains(&Category::Tries));
    }
}
