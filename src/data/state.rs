//! Classification of the twin's primary physiological state.

use crate::source::RawState;

/// The categorical states the backend reports.
///
/// Anything outside this set normalizes to [`PrimaryState::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimaryState {
    #[default]
    Neutral,
    Chill,
    BeastMode,
    Dizzy,
}

impl PrimaryState {
    /// Parse the wire identifier; `None` for unknown values.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "neutral" => Some(PrimaryState::Neutral),
            "is_chill" => Some(PrimaryState::Chill),
            "is_beast_mode" => Some(PrimaryState::BeastMode),
            "is_dizzy" => Some(PrimaryState::Dizzy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PrimaryState::Neutral => "Neutral",
            PrimaryState::Chill => "Chill",
            PrimaryState::BeastMode => "Beast Mode",
            PrimaryState::Dizzy => "Dizzy",
        }
    }

    /// Fallback description when the backend omits one.
    pub fn default_description(&self) -> &'static str {
        match self {
            PrimaryState::Neutral => "Twin is in a neutral state",
            PrimaryState::Chill => "Twin is chill",
            PrimaryState::BeastMode => "Twin is in beast mode",
            PrimaryState::Dizzy => "Twin is dizzy",
        }
    }
}

/// The classified state plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInfo {
    pub state: PrimaryState,
    pub description: String,
}

impl Default for StateInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

impl StateInfo {
    pub fn unknown() -> Self {
        Self {
            state: PrimaryState::Neutral,
            description: "Unknown state".to_string(),
        }
    }
}

/// Derive the state view from the raw `current_state` section.
///
/// Total over all inputs: an absent section, an absent `primary_state`, or
/// an unrecognized value all yield Neutral with an "Unknown state"
/// description. The backend has shipped the description under both
/// `description` and `state_description`; the more specific key wins when
/// both are present.
pub fn classify(raw: Option<&RawState>) -> StateInfo {
    let Some(raw) = raw else {
        return StateInfo::unknown();
    };

    let Some(state) = raw.primary_state.as_deref().and_then(PrimaryState::from_wire) else {
        return StateInfo::unknown();
    };

    let description = raw
        .state_description
        .clone()
        .or_else(|| raw.description.clone())
        .unwrap_or_else(|| state.default_description().to_string());

    StateInfo { state, description }
}
