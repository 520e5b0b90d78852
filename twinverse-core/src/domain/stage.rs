//! Pipeline stage enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four creation phases, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Music,
    Avatar,
    Film,
    Publication,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ORDER: [Stage; 4] = [Stage::Music, Stage::Avatar, Stage::Film, Stage::Publication];

    /// The stage that follows this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Music => Some(Stage::Avatar),
            Stage::Avatar => Some(Stage::Film),
            Stage::Film => Some(Stage::Publication),
            Stage::Publication => None,
        }
    }

    /// Stages whose identifiers must be known before this stage can submit.
    pub fn upstream(self) -> &'static [Stage] {
        match self {
            Stage::Music => &[],
            Stage::Avatar => &[Stage::Music],
            Stage::Film => &[Stage::Music, Stage::Avatar],
            Stage::Publication => &[Stage::Music, Stage::Avatar, Stage::Film],
        }
    }

    /// Position in [`Stage::ORDER`].
    pub fn index(self) -> usize {
        match self {
            Stage::Music => 0,
            Stage::Avatar => 1,
            Stage::Film => 2,
            Stage::Publication => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Music => "music",
            Stage::Avatar => "avatar",
            Stage::Film => "film",
            Stage::Publication => "publication",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Music.next(), Some(Stage::Avatar));
        assert_eq!(Stage::Avatar.next(), Some(Stage::Film));
        assert_eq!(Stage::Film.next(), Some(Stage::Publication));
        assert_eq!(Stage::Publication.next(), None);
    }

    #[test]
    fn test_upstream_stages() {
        assert!(Stage::Music.upstream().is_empty());
        assert_eq!(Stage::Film.upstream(), &[Stage::Music, Stage::Avatar]);
        assert_eq!(
            Stage::Publication.upstream(),
            &[Stage::Music, Stage::Avatar, Stage::Film]
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(Stage::Publication.as_str(), "publication");
        assert_eq!(
            serde_json::to_string(&Stage::Avatar).unwrap(),
            "\"avatar\""
        );
    }
}
