use crate::detection::domain::face_observation::FaceObservation;

use super::identity_matcher::MatchOutcome;

/// Per-cycle access outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessState {
    /// The owner is in frame.
    Unlocked,
    /// Faces are in frame, none of them the owner.
    Denied,
    /// Nobody is in frame.
    Locked,
}

impl AccessState {
    pub const ALL: [AccessState; 3] = [
        AccessState::Unlocked,
        AccessState::Denied,
        AccessState::Locked,
    ];

    pub fn classify(is_match: bool, observation_count: usize) -> Self {
        match (is_match, observation_count) {
            (true, _) => AccessState::Unlocked,
            (false, 0) => AccessState::Locked,
            (false, _) => AccessState::Denied,
        }
    }

    /// One-line operator message, or `None` when nobody is in frame.
    pub fn audit_message(self) -> Option<&'static str> {
        match self {
            AccessState::Unlocked => Some("Access Granted: Owner detected"),
            AccessState::Denied => Some("Access Denied: Unknown face"),
            AccessState::Locked => None,
        }
    }
}

impl std::fmt::Display for AccessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessState::Unlocked => write!(f, "unlocked"),
            AccessState::Denied => write!(f, "denied"),
            AccessState::Locked => write!(f, "locked"),
        }
    }
}

pub const OWNER_LABEL: &str = "Owner";
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The cycle's decision together with the observations it was made from.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub state: AccessState,
    pub outcome: MatchOutcome,
    pub observations: Vec<FaceObservation>,
}

impl Verdict {
    pub fn new(outcome: MatchOutcome, observations: Vec<FaceObservation>) -> Self {
        Self {
            state: AccessState::classify(outcome.is_match(), observations.len()),
            outcome,
            observations,
        }
    }

    pub fn is_match(&self) -> bool {
        self.outcome.is_match()
    }

    /// Whether the observation at `index` is the one that matched.
    pub fn is_matched_observation(&self, index: usize) -> bool {
        self.outcome.matched_index == Some(index)
    }

    /// Label drawn under every face this cycle.
    ///
    /// Derived from the overall outcome, so all faces share it even when
    /// only one of several is the owner.
    pub fn region_label(&self) -> &'static str {
        if self.is_match() {
            OWNER_LABEL
        } else {
            UNKNOWN_LABEL
        }
    }
}
