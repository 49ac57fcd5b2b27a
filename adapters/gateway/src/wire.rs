//! JSON bodies exchanged with the AI service.

use adaptive_defence_core::{AttackPlan, Outcome, PlanRequest, WaveTier};
use serde::{Deserialize, Serialize};

use crate::GatewayError;

/// Body of `POST /ai/next_wave`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct NextWaveRequest {
    towers: Vec<[u32; 2]>,
    round: u32,
}

impl From<&PlanRequest> for NextWaveRequest {
    fn from(request: &PlanRequest) -> Self {
        Self {
            towers: request
                .towers
                .iter()
                .map(|cell| [cell.row(), cell.column()])
                .collect(),
            round: request.round,
        }
    }
}

/// Response of `POST /ai/next_wave`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct NextWaveResponse {
    attack_row: i64,
    wave_type: i64,
}

impl NextWaveResponse {
    /// Validates the response into a playable plan.
    pub(crate) fn into_plan(self) -> Result<AttackPlan, GatewayError> {
        let invalid = GatewayError::InvalidPlan {
            attack_row: self.attack_row,
            wave_type: self.wave_type,
        };
        let (Ok(row), Ok(wave_type)) =
            (u32::try_from(self.attack_row), u32::try_from(self.wave_type))
        else {
            return Err(invalid);
        };
        WaveTier::from_index(wave_type)
            .and_then(|tier| AttackPlan::new(row, tier))
            .ok_or(invalid)
    }
}

/// Body of `POST /ai/feedback`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct FeedbackRequest {
    reward: i32,
    state: Vec<u8>,
    action_idx: u32,
    next_state: Vec<u8>,
    done: bool,
    attack_row: u32,
}

impl From<&Outcome> for FeedbackRequest {
    fn from(outcome: &Outcome) -> Self {
        Self {
            reward: outcome.reward.value(),
            state: outcome.state.codes(),
            action_idx: outcome.action_index,
            next_state: outcome.next_state.codes(),
            done: outcome.done,
            attack_row: outcome.attack_row,
        }
    }
}

/// Response of `POST /ai/feedback`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct FeedbackResponse {
    pub(crate) message: String,
}
