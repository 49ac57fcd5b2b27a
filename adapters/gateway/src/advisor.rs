//! Contract between the session and whoever plans the attacks.

use std::future::Future;

use adaptive_defence_core::{AttackPlan, Outcome, PlanRequest};

use crate::GatewayError;

/// Opponent that chooses each wave and adapts to how it went.
pub trait AttackAdvisor {
    /// Asks for the attack plan of the next wave.
    fn request_plan(
        &self,
        request: &PlanRequest,
    ) -> impl Future<Output = Result<AttackPlan, GatewayError>> + Send;

    /// Reports how a wave went and returns the advisory message for the player.
    fn report_outcome(
        &self,
        outcome: &Outcome,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Asks the opponent to learn from the reports gathered so far.
    ///
    /// Fire-and-forget: implementations must not block and the result is never
    /// observed by the caller.
    fn request_training(&self);
}
