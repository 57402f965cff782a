//! Surface alignment classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation class of a surface or of an object resting on one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Horizontal,
    Vertical,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alignment::Horizontal => write!(f, "horizontal"),
            Alignment::Vertical => write!(f, "vertical"),
        }
    }
}

/// Set of alignments a model may be placed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Alignment>", into = "Vec<Alignment>")]
pub struct AlignmentSet {
    horizontal: bool,
    vertical: bool,
}

impl AlignmentSet {
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    pub const HORIZONTAL: Self = Self {
        horizontal: true,
        vertical: false,
    };
    pub const VERTICAL: Self = Self {
        horizontal: false,
        vertical: true,
    };
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };

    pub fn contains(&self, alignment: Alignment) -> bool {
        match alignment {
            Alignment::Horizontal => self.horizontal,
            Alignment::Vertical => self.vertical,
        }
    }

    pub fn insert(&mut self, alignment: Alignment) {
        match alignment {
            Alignment::Horizontal => self.horizontal = true,
            Alignment::Vertical => self.vertical = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.horizontal && !self.vertical
    }

    /// Iterate members, horizontal first
    pub fn iter(&self) -> impl Iterator<Item = Alignment> {
        let horizontal = self.horizontal.then_some(Alignment::Horizontal);
        let vertical = self.vertical.then_some(Alignment::Vertical);
        horizontal.into_iter().chain(vertical)
    }
}

impl From<Vec<Alignment>> for AlignmentSet {
    fn from(alignments: Vec<Alignment>) -> Self {
        alignments.into_iter().collect()
    }
}

impl From<AlignmentSet> for Vec<Alignment> {
    fn from(set: AlignmentSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Alignment> for AlignmentSet {
    fn from_iter<I: IntoIterator<Item = Alignment>>(iter: I) -> Self {
        let mut set = AlignmentSet::NONE;
        for alignment in iter {
            set.insert(alignment);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_membership() {
        assert!(AlignmentSet::BOTH.contains(Alignment::Horizontal));
        assert!(AlignmentSet::BOTH.contains(Alignment::Vertical));
        assert!(!AlignmentSet::VERTICAL.contains(Alignment::Horizontal));
        assert!(AlignmentSet::NONE.is_empty());
    }

    #[test]
    fn test_set_from_list() {
        let set: AlignmentSet = vec![Alignment::Vertical, Alignment::Vertical].into();
        assert_eq!(set, AlignmentSet::VERTICAL);

        let list: Vec<Alignment> = AlignmentSet::BOTH.into();
        assert_eq!(list, vec![Alignment::Horizontal, Alignment::Vertical]);
    }

    #[test]
    fn test_set_serde() {
        let set: AlignmentSet = serde_json::from_str(r#"["horizontal", "vertical"]"#).unwrap();
        assert_eq!(set, AlignmentSet::BOTH);
        assert_eq!(
            serde_json::to_string(&AlignmentSet::VERTICAL).unwrap(),
            r#"["vertical"]"#
        );
    }
}
