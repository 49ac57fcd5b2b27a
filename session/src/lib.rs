#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game session that sequences the world, the pure systems and the AI gateway.
//!
//! The session owns the [`World`] exclusively. Player actions are applied
//! synchronously, while starting a wave and delivering its outcome suspend on
//! the [`AttackAdvisor`]. Ticks are paced by a [`TickClock`] supplied by the
//! caller.

mod clock;
mod config;

use std::collections::VecDeque;

use adaptive_defence_core::{
    AttackPlan, CellCoord, Command, Event, Outcome, WavePhase, WaveRejection,
};
use adaptive_defence_gateway::{AttackAdvisor, GatewayError};
use adaptive_defence_system_feedback::Feedback;
use adaptive_defence_system_spawning::Spawning;
use adaptive_defence_system_tower_combat::TowerCombat;
use adaptive_defence_world::{self as world, query, World};
use tracing::{debug, info, warn};

pub use clock::{IntervalClock, ManualClock, TickClock};
pub use config::SessionConfig;

/// Result of asking the session to start a wave.
#[derive(Debug)]
pub enum WaveStart {
    /// The AI answered and the wave is running.
    Launched(AttackPlan),
    /// The world refused to start a wave; the AI was not contacted.
    Rejected(WaveRejection),
    /// The AI could not provide a plan and the world is idle again.
    Aborted(GatewayError),
}

/// Result of delivering a wave outcome to the AI.
#[derive(Debug)]
pub enum ReportStatus {
    /// The AI acknowledged the outcome with an advisory message.
    Delivered {
        /// Message shown to the player.
        message: String,
    },
    /// Every attempt failed; the outcome waits in the backlog.
    Deferred {
        /// Error of the last attempt.
        error: GatewayError,
    },
}

/// Everything a single tick produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Events emitted by the world while resolving the tick.
    pub events: Vec<Event>,
    /// Report of the wave, present on the tick that completed it.
    pub outcome: Option<Outcome>,
}

/// Interactive game session driven by player input and a tick clock.
#[derive(Debug)]
pub struct Session<A> {
    world: World,
    advisor: A,
    config: SessionConfig,
    spawning: Spawning,
    combat: TowerCombat,
    feedback: Feedback,
    backlog: VecDeque<Outcome>,
}

impl<A: AttackAdvisor> Session<A> {
    /// Creates a session over a fresh world.
    pub fn new(advisor: A, config: SessionConfig) -> Self {
        Self {
            world: World::new(),
            advisor,
            config,
            spawning: Spawning::new(),
            combat: TowerCombat::new(),
            feedback: Feedback::new(),
            backlog: VecDeque::new(),
        }
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Settings the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Outcomes that could not be delivered yet, oldest first.
    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Flips tower placement mode.
    pub fn toggle_placement(&mut self) -> Vec<Event> {
        self.execute(Command::TogglePlacementMode)
    }

    /// Forwards a cell selection; places a tower only in placement mode.
    pub fn select_cell(&mut self, cell: CellCoord) -> Vec<Event> {
        self.execute(Command::SelectCell { cell })
    }

    /// Places a tower regardless of placement mode.
    pub fn place_tower(&mut self, cell: CellCoord) -> Vec<Event> {
        self.execute(Command::PlaceTower { cell })
    }

    /// Buys the upgrade shared by every tower.
    pub fn purchase_upgrade(&mut self) -> Vec<Event> {
        self.execute(Command::PurchaseUpgrade)
    }

    /// Starts a wave by asking the AI for a plan and spawning its enemies.
    ///
    /// The AI is contacted only when the world accepted the start request, so
    /// a start issued while a wave is in progress never produces a second
    /// plan request.
    pub async fn start_wave(&mut self) -> WaveStart {
        let events = self.execute(Command::BeginWave);
        if let Some(reason) = events.iter().find_map(|event| match event {
            Event::WaveRejected { reason } => Some(*reason),
            _ => None,
        }) {
            debug!(?reason, "wave start rejected");
            return WaveStart::Rejected(reason);
        }

        let request = query::plan_request(&self.world);
        info!(
            round = request.round,
            towers = request.towers.len(),
            "requesting attack plan"
        );
        let plan = match self.advisor.request_plan(&request).await {
            Ok(plan) => plan,
            Err(error) => {
                warn!(%error, "attack plan unavailable; aborting wave");
                let _ = self.execute(Command::AbortWave {
                    message: format!("AI unavailable: {error}"),
                });
                return WaveStart::Aborted(error);
            }
        };

        let mut commands = Vec::new();
        self.spawning.handle(
            query::phase(&self.world),
            plan,
            query::round(&self.world),
            &mut commands,
        );
        for command in commands {
            let _ = self.execute(command);
        }
        info!(
            round = query::round(&self.world),
            spawn_row = plan.spawn_row(),
            tier = ?plan.tier(),
            enemies = query::wave_progress(&self.world),
            "wave launched"
        );
        WaveStart::Launched(plan)
    }

    /// Resolves one simulation tick if a wave is running.
    pub fn tick(&mut self) -> TickOutcome {
        let mut commands = Vec::new();
        self.combat.handle(
            query::phase(&self.world),
            &query::enemy_view(&self.world),
            &query::tower_view(&self.world),
            query::towers_upgraded(&self.world),
            &mut commands,
        );

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let mut outcomes = Vec::new();
        self.feedback.handle(
            &events,
            &query::enemy_view(&self.world),
            &query::tower_view(&self.world),
            &mut outcomes,
        );
        debug!(
            events = events.len(),
            remaining = query::wave_progress(&self.world),
            health = query::health(&self.world),
            "tick resolved"
        );
        if let Some(Event::WaveCompleted {
            round,
            kills,
            breaches,
        }) = events
            .iter()
            .find(|event| matches!(event, Event::WaveCompleted { .. }))
        {
            info!(
                round = *round,
                kills = *kills,
                breaches = *breaches,
                "wave completed"
            );
        }

        TickOutcome {
            events,
            outcome: outcomes.pop(),
        }
    }

    /// Reports a completed wave to the AI and returns the world to idle.
    ///
    /// Outcomes left over from earlier failures are sent first. The report is
    /// retried according to the session settings; when every attempt fails the
    /// outcome joins the backlog and the player is told the feedback failed.
    /// Training is requested only after a successful report.
    pub async fn deliver(&mut self, outcome: Outcome) -> ReportStatus {
        self.flush_backlog().await;

        let status = match self.report_with_retry(&outcome).await {
            Ok(message) => {
                info!(reward = outcome.reward.value(), "outcome delivered");
                ReportStatus::Delivered { message }
            }
            Err(error) => {
                warn!(%error, backlog = self.backlog.len() + 1, "outcome deferred");
                self.backlog.push_back(outcome);
                ReportStatus::Deferred { error }
            }
        };

        let message = match &status {
            ReportStatus::Delivered { message } => message.clone(),
            ReportStatus::Deferred { error } => format!("AI feedback failed: {error}"),
        };
        let _ = self.execute(Command::FinishReport { message });

        if matches!(status, ReportStatus::Delivered { .. }) {
            self.advisor.request_training();
        }
        status
    }

    /// Runs the current wave to completion and delivers its outcome.
    ///
    /// `on_tick` observes the world after every tick. Returns `None` when no
    /// wave was running.
    pub async fn run_wave<C, F>(
        &mut self,
        clock: &mut C,
        mut on_tick: F,
    ) -> Option<ReportStatus>
    where
        C: TickClock,
        F: FnMut(&World, &[Event]),
    {
        clock.restart();
        while query::phase(&self.world) == WavePhase::Running {
            clock.next_tick().await;
            let TickOutcome { events, outcome } = self.tick();
            on_tick(&self.world, &events);
            if let Some(outcome) = outcome {
                return Some(self.deliver(outcome).await);
            }
        }
        None
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        events
    }

    async fn report_with_retry(&self, outcome: &Outcome) -> Result<String, GatewayError> {
        let attempts = self.config.report_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.advisor.report_outcome(outcome).await {
                Ok(message) => return Ok(message),
                Err(error) if attempt < attempts => {
                    warn!(attempt, attempts, %error, "outcome report failed; retrying");
                    tokio::time::sleep(self.config.retry_backoff(attempt)).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn flush_backlog(&mut self) {
        while let Some(pending) = self.backlog.front() {
            match self.advisor.report_outcome(pending).await {
                Ok(message) => {
                    debug!(%message, "backlogged outcome delivered");
                    let _ = self.backlog.pop_front();
                }
                Err(error) => {
                    warn!(%error, pending = self.backlog.len(), "backlog still undeliverable");
                    return;
                }
            }
        }
    }
}
