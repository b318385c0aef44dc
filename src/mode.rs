//! Persona modes and their fixed system prompts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PersonaError;

/// One of the four fixed persona contexts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Casual general-purpose conversation
    #[default]
    Chat,
    /// Social media content creation
    Creator,
    /// Patient explanations of concepts
    Study,
    /// Writing help
    Writer,
}

struct ModeInfo {
    slug: &'static str,
    name: &'static str,
    label: &'static str,
    system_prompt: &'static str,
}

static MODE_TABLE: [ModeInfo; 4] = [
    ModeInfo {
        slug: "chat",
        name: "Chat",
        label: "💬 Chat",
        system_prompt: "You are a friendly, casual Meta-style AI assistant.",
    },
    ModeInfo {
        slug: "creator",
        name: "Creator",
        label: "📸 Creator",
        system_prompt: "You are a social media content creator expert.",
    },
    ModeInfo {
        slug: "study",
        name: "Study",
        label: "🧠 Study",
        system_prompt: "You are a patient teacher who explains things simply.",
    },
    ModeInfo {
        slug: "writer",
        name: "Writer",
        label: "✍️ Writer",
        system_prompt: "You are a professional writing assistant.",
    },
];

impl Mode {
    /// Every mode, in selector order.
    pub const ALL: [Mode; 4] = [Mode::Chat, Mode::Creator, Mode::Study, Mode::Writer];

    fn info(&self) -> &'static ModeInfo {
        &MODE_TABLE[self.index()]
    }

    /// Position of this mode in [`Mode::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Mode::Chat => 0,
            Mode::Creator => 1,
            Mode::Study => 2,
            Mode::Writer => 3,
        }
    }

    /// URL/form identifier, e.g. `creator`.
    pub fn slug(&self) -> &'static str {
        self.info().slug
    }

    /// Plain name without decoration, e.g. `Creator`.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Display label shown in the selector, e.g. `📸 Creator`.
    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn system_prompt(&self) -> &'static str {
        self.info().system_prompt
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a mode slug, case-insensitively.
///
/// ```
/// use std::str::FromStr;
/// use persona_ai::mode::Mode;
///
/// assert_eq!(Mode::from_str("Study").unwrap(), Mode::Study);
/// assert!(Mode::from_str("poet").is_err());
/// ```
impl std::str::FromStr for Mode {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.slug() == wanted)
            .ok_or_else(|| PersonaError::InvalidMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn table_order_matches_all() {
        for (i, mode) in Mode::ALL.iter().enumerate() {
            assert_eq!(mode.index(), i);
            assert_eq!(Mode::from_str(mode.slug()).unwrap(), *mode);
        }
    }

    #[test]
    fn prompts_are_distinct() {
        let mut prompts: Vec<_> = Mode::ALL.iter().map(|m| m.system_prompt()).collect();
        prompts.sort();
        prompts.dedup();
        assert_eq!(prompts.len(), 4);
    }

    #[test]
    fn writer_prompt() {
        assert_eq!(
            Mode::Writer.system_prompt(),
            "You are a professional writing assistant."
        );
    }

    #[test]
    fn unknown_slug_is_invalid_mode() {
        let err = Mode::from_str("💬 Chat").unwrap_err();
        assert!(matches!(err, PersonaError::InvalidMode(_)));
    }
}
