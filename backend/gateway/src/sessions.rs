//! Per-visitor app sessions and the effect runner.
//!
//! ## Locking
//!
//! Each update takes the hub lock, runs [`reduce`] on the stored state,
//! stores the result, and releases the lock before any effect starts. The
//! lock is never held across an `.await`; scheduled tasks and AI calls
//! report back through [`SessionHub::report`], which takes the lock again.
//!
//! ## Screen tasks
//!
//! Every session holds one [`CancellationToken`] for its current screen.
//! `Effect::CancelScreenTasks` cancels it and installs a fresh one, so the
//! donor ticker, a pending certificate save, and in-flight AI calls of the
//! old screen all stop together. Settlement is the exception: it runs to
//! completion because navigation is locked while it is pending.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use leshan_core::session::clamp_name;
use leshan_core::{reduce, Action, AppState, Effect, Settlement};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{GatewayError, Result};
use crate::gemini::Assistant;
use crate::tasks;

/// Payment backend behind the donation modal.
#[async_trait]
pub trait Settler: Send + Sync {
    /// Settle one donation. `Err` carries the message shown in the modal.
    async fn settle(&self, settlement: &Settlement) -> std::result::Result<(), String>;
}

/// Accepts every donation after a fixed delay.
pub struct SimulatedSettler {
    delay: Duration,
}

impl SimulatedSettler {
    pub fn new(delay: Duration) -> Self {
        SimulatedSettler { delay }
    }
}

#[async_trait]
impl Settler for SimulatedSettler {
    async fn settle(&self, settlement: &Settlement) -> std::result::Result<(), String> {
        tokio::time::sleep(self.delay).await;
        debug!(ticket = settlement.ticket, amount = %settlement.amount, "simulated settlement");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub ticker_interval: Duration,
    pub certificate_save: Duration,
    pub session_ttl: Duration,
}

impl Timings {
    pub fn from_config(config: &Config) -> Self {
        Timings {
            ticker_interval: config.ticker_interval(),
            certificate_save: leshan_core::certificate::SAVE_DELAY,
            session_ttl: config.session_ttl(),
        }
    }
}

struct Slot {
    state: AppState,
    screen: CancellationToken,
    last_seen: Instant,
}

/// Result of one accepted action.
pub struct Dispatched {
    pub state: AppState,
    /// Tasks started by the action's effects.
    pub tasks: Vec<JoinHandle<()>>,
}

pub struct SessionHub {
    sessions: Mutex<HashMap<Uuid, Slot>>,
    assistant: Arc<dyn Assistant>,
    settler: Arc<dyn Settler>,
    timings: Timings,
}

impl SessionHub {
    pub fn new(assistant: Arc<dyn Assistant>, settler: Arc<dyn Settler>, timings: Timings) -> Arc<Self> {
        Arc::new(SessionHub {
            sessions: Mutex::new(HashMap::new()),
            assistant,
            settler,
            timings,
        })
    }

    pub fn assistant(&self) -> &Arc<dyn Assistant> {
        &self.assistant
    }

    pub fn create(&self) -> (Uuid, AppState) {
        let id = Uuid::new_v4();
        let state = AppState::default();
        self.sessions.lock().insert(
            id,
            Slot {
                state: state.clone(),
                screen: CancellationToken::new(),
                last_seen: Instant::now(),
            },
        );
        info!(%id, "session created");
        (id, state)
    }

    pub fn snapshot(&self, id: Uuid) -> Result<AppState> {
        let mut sessions = self.sessions.lock();
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| GatewayError::SessionNotFound(id.to_string()))?;
        slot.last_seen = Instant::now();
        Ok(slot.state.clone())
    }

    /// Apply a visitor action. Actions that only the host may raise are
    /// refused.
    pub fn dispatch(self: &Arc<Self>, id: Uuid, action: Action) -> Result<Dispatched> {
        if action.is_internal() {
            return Err(GatewayError::BadRequest(
                "action is reserved for the server".to_string(),
            ));
        }
        let action = match action {
            Action::UpdateProfile { name, avatar } => Action::UpdateProfile {
                name: clamp_name(&name),
                avatar,
            },
            other => other,
        };
        self.apply(id, action)
    }

    /// Feed a task's completion back into its session. Failures are logged
    /// and dropped: the session may be gone, or the screen may have moved on.
    pub fn report(self: &Arc<Self>, id: Uuid, action: Action) {
        if let Err(e) = self.apply(id, action) {
            debug!(%id, "task result dropped: {e}");
        }
    }

    fn apply(self: &Arc<Self>, id: Uuid, action: Action) -> Result<Dispatched> {
        let (state, effects, token) = {
            let mut sessions = self.sessions.lock();
            let slot = sessions
                .get_mut(&id)
                .ok_or_else(|| GatewayError::SessionNotFound(id.to_string()))?;

            let transition = reduce(&slot.state, action)?;
            slot.state = transition.state;
            slot.last_seen = Instant::now();

            if transition.effects.contains(&Effect::CancelScreenTasks) {
                slot.screen.cancel();
                slot.screen = CancellationToken::new();
            }
            (slot.state.clone(), transition.effects, slot.screen.clone())
        };

        let tasks = effects
            .into_iter()
            .filter_map(|effect| self.run_effect(id, effect, &token))
            .collect();
        Ok(Dispatched { state, tasks })
    }

    fn run_effect(self: &Arc<Self>, id: Uuid, effect: Effect, token: &CancellationToken) -> Option<JoinHandle<()>> {
        let hub = Arc::clone(self);
        let handle = match effect {
            Effect::CancelScreenTasks => return None,

            Effect::ScheduleSettlement(settlement) => tokio::spawn(async move {
                let ticket = settlement.ticket;
                let action = match hub.settler.settle(&settlement).await {
                    Ok(()) => Action::SettlementCompleted { ticket },
                    Err(reason) => {
                        warn!(%id, ticket, %reason, "settlement failed");
                        Action::SettlementFailed { ticket, reason }
                    }
                };
                hub.report(id, action);
            }),

            Effect::StartTicker => {
                tasks::spawn_every(self.timings.ticker_interval, token.clone(), move || {
                    hub.report(id, Action::TickDonor)
                })
            }

            Effect::ScheduleCertificateSave => {
                tasks::spawn_after(self.timings.certificate_save, token.clone(), move || {
                    hub.report(id, Action::CertificateSaved)
                })
            }

            Effect::RequestChat(pending) => tasks::spawn_guarded(token.clone(), async move {
                let outcome = hub
                    .assistant
                    .chat(&pending.prompt, &pending.history)
                    .await
                    .map_err(|e| {
                        warn!(%id, "chat request failed: {e}");
                        e.to_string()
                    });
                hub.report(id, Action::ChatReplied { pending, outcome });
            }),

            Effect::RequestImage(pending) => tasks::spawn_guarded(token.clone(), async move {
                let outcome = hub
                    .assistant
                    .generate_image(&pending.prompt)
                    .await
                    .map_err(|e| {
                        warn!(%id, "image generation failed: {e}");
                        e.to_string()
                    });
                hub.report(id, Action::ImageGenerated { pending, outcome });
            }),
        };
        Some(handle)
    }

    /// Drop sessions idle for longer than the TTL. Returns how many went.
    pub fn sweep(&self) -> usize {
        let ttl = self.timings.session_ttl;
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|id, slot| {
            let keep = slot.last_seen.elapsed() < ttl;
            if !keep {
                slot.screen.cancel();
                debug!(%id, "session expired");
            }
            keep
        });
        before - sessions.len()
    }

    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = hub.sweep();
                if evicted > 0 {
                    info!(evicted, remaining = hub.len(), "idle sessions evicted");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }
}
