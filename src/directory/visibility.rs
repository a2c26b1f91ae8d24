use bitflags::bitflags;
use std::str::FromStr;

use crate::error::{RollcallError, UnknownFieldSnafu};

bitflags! {
    /// Which optional sections of a record get rendered.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct SectionVisibility: u16 {
        const NAME               = 0b0_0000_0001;
        const MASCOT             = 0b0_0000_0010;
        const IMAGE              = 0b0_0000_0100;
        const PERSONAL_STATEMENT = 0b0_0000_1000;
        const BACKGROUNDS        = 0b0_0001_0000;
        const CLASSES            = 0b0_0010_0000;
        const EXTRA_INFO         = 0b0_0100_0000;
        const QUOTE              = 0b0_1000_0000;
        const LINKS              = 0b1_0000_0000;
    }
}

/// Every toggle with its route slug and checkbox label, in display order.
pub const FIELDS: [(SectionVisibility, &str, &str); 9] = [
    (SectionVisibility::NAME, "name", "Name"),
    (SectionVisibility::MASCOT, "mascot", "Mascot"),
    (SectionVisibility::IMAGE, "image", "Image"),
    (
        SectionVisibility::PERSONAL_STATEMENT,
        "personalStatement",
        "Personal Statement",
    ),
    (SectionVisibility::BACKGROUNDS, "backgrounds", "Backgrounds"),
    (SectionVisibility::CLASSES, "classes", "Classes"),
    (SectionVisibility::EXTRA_INFO, "extraInfo", "Extra Information"),
    (SectionVisibility::QUOTE, "quote", "Quote"),
    (SectionVisibility::LINKS, "links", "Links"),
];

impl Default for SectionVisibility {
    fn default() -> Self {
        Self::all()
    }
}

impl SectionVisibility {
    /// Flips exactly one field, leaving the rest alone.
    #[must_use]
    pub fn toggled(self, field: Self) -> Self {
        self ^ field
    }
}

impl FromStr for SectionVisibility {
    type Err = RollcallError;

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        FIELDS
            .iter()
            .find(|(_, s, _)| *s == slug)
            .map(|(flag, _, _)| *flag)
            .ok_or_else(|| UnknownFieldSnafu { slug }.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shows_everything() {
        assert_eq!(SectionVisibility::default(), SectionVisibility::all());
    }

    #[test]
    fn toggles_are_independent() {
        for (flag, _, _) in FIELDS {
            let toggled = SectionVisibility::default().toggled(flag);
            assert!(!toggled.contains(flag));
            assert_eq!(toggled | flag, SectionVisibility::all());
            assert_eq!(toggled.toggled(flag), SectionVisibility::all());
        }
    }

    #[test]
    fn slugs_round_trip_and_unknown_slugs_fail() {
        for (flag, slug, _) in FIELDS {
            assert_eq!(slug.parse::<SectionVisibility>().unwrap(), flag);
        }
        assert!(matches!(
            "shoeSize".parse::<SectionVisibility>(),
            Err(RollcallError::UnknownField { .. })
        ));
    }
}
