//! # App
//!
//! The whole app as one value and one update function.
//!
//! [`reduce`] takes the current [`AppState`] by reference and an [`Action`],
//! and returns a [`Transition`]: the next state plus the [`Effect`]s the host
//! must run. A rejected action returns an error and the caller keeps the old
//! state, so a failed update never leaves a half-applied state behind.
//!
//! ## Screen lifetime
//!
//! Every time the active view changes, the host is told to cancel the tasks
//! of the screen being left ([`Effect::CancelScreenTasks`]); entering the
//! detail screen starts its donor ticker. The chat and image-studio screens
//! are rebuilt on entry and exit, which also retires any reply still in
//! flight for the old screen.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::assistant::{ChatScreen, ImageStudio, PendingChat, PendingImage};
use crate::catalog::{self, DONOR_TICKER};
use crate::certificate::{Certificate, SAVED_NOTICE, SHARED_NOTICE};
use crate::donation::{DonationFlow, Settlement};
use crate::errors::{CoreError, Result};
use crate::feed::Feed;
use crate::money::Amount;
use crate::router::{self, NavAction, Router};
use crate::session::UserInfo;
use crate::types::{CharityEntity, View};

pub const ENTITY_MISSING_NOTICE: &str = "该项目暂不可用";

/// Per-visit state of the detail screen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailScreen {
    pub entity_id: String,
    pub active_tab: String,
    /// Index into the donor ticker lines.
    pub ticker_index: usize,
}

impl DetailScreen {
    pub fn ticker_line(&self) -> &'static str {
        DONOR_TICKER[self.ticker_index % DONOR_TICKER.len()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub router: Router,
    pub user: UserInfo,
    pub detail: Option<DetailScreen>,
    pub flow: DonationFlow,
    pub feed: Feed,
    pub certificate: Option<Certificate>,
    pub is_saving_certificate: bool,
    pub chat: ChatScreen,
    pub studio: ImageStudio,
    /// One-shot message for the visitor (toast / alert).
    pub notice: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            router: Router::new(),
            user: UserInfo::default(),
            detail: None,
            flow: DonationFlow::new(),
            feed: Feed::default(),
            certificate: None,
            is_saving_certificate: false,
            chat: ChatScreen::new(0),
            studio: ImageStudio::new(0),
            notice: None,
        }
    }
}

impl AppState {
    /// The screen to render. A detail view without an entity fails closed
    /// to `Home`.
    pub fn screen(&self) -> View {
        match self.router.screen() {
            View::Detail if self.detail.is_none() => View::Home,
            other => other,
        }
    }

    pub fn selected_entity(&self) -> Option<&'static CharityEntity> {
        self.detail
            .as_ref()
            .and_then(|d| catalog::find(&d.entity_id))
    }
}

/// Everything that can happen to the app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Navigate { to: NavAction },
    OpenEntity { id: String },
    SelectTab { tab: String },
    OpenDonation,
    CloseDonation,
    SelectPreset { amount: u32 },
    SelectCustom,
    SetCustomAmount { value: String },
    ConfirmDonation,
    ToggleLike { id: String },
    UpdateProfile { name: String, avatar: String },
    SaveCertificate,
    DismissNotice,
    SendChat { input: String },
    GenerateImage { prompt: String },

    // Reported back by the host.
    SettlementCompleted { ticket: u64 },
    SettlementFailed { ticket: u64, reason: String },
    TickDonor,
    CertificateSaved,
    ChatReplied {
        pending: PendingChat,
        outcome: std::result::Result<String, String>,
    },
    ImageGenerated {
        pending: PendingImage,
        outcome: std::result::Result<String, String>,
    },
}

impl Action {
    /// Actions that only the host may raise, never a visitor.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Action::SettlementCompleted { .. }
                | Action::SettlementFailed { .. }
                | Action::TickDonor
                | Action::CertificateSaved
                | Action::ChatReplied { .. }
                | Action::ImageGenerated { .. }
        )
    }
}

/// Work the host performs on behalf of the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Report `SettlementCompleted` after the delay. Not cancellable.
    ScheduleSettlement(Settlement),
    /// Raise `TickDonor` periodically until the screen's tasks are cancelled.
    StartTicker,
    /// Report `CertificateSaved` after the save delay, unless cancelled.
    ScheduleCertificateSave,
    /// The screen was left; stop its timers.
    CancelScreenTasks,
    RequestChat(PendingChat),
    RequestImage(PendingImage),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

// ─────────────────────────────────────────────────────────
// Reducer
// ─────────────────────────────────────────────────────────

pub fn reduce(state: &AppState, action: Action) -> Result<Transition> {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::Navigate { to } => navigate(&mut next, to, &mut effects)?,

        Action::OpenEntity { id } => open_entity(&mut next, &id, &mut effects)?,

        Action::SelectTab { tab } => {
            let detail = next.detail.as_mut().ok_or_else(|| not_on(View::Detail))?;
            let entity =
                catalog::find(&detail.entity_id).ok_or_else(|| CoreError::EntityNotFound(detail.entity_id.clone()))?;
            if !catalog::detail_tabs(entity.kind).contains(&tab.as_str()) {
                return Err(CoreError::NotAllowed(format!("unknown tab {tab}")));
            }
            detail.active_tab = tab;
        }

        Action::OpenDonation => {
            require_screen(&next, View::Detail)?;
            next.flow.open()?;
        }
        Action::CloseDonation => next.flow.close()?,
        Action::SelectPreset { amount } => next.flow.select_preset(amount)?,
        Action::SelectCustom => next.flow.select_custom()?,
        Action::SetCustomAmount { value } => next.flow.set_custom(&value)?,

        Action::ConfirmDonation => {
            require_screen(&next, View::Detail)?;
            match next.flow.confirm() {
                Ok(Some(settlement)) => effects.push(Effect::ScheduleSettlement(settlement)),
                Ok(None) => {}
                // The modal now shows the validation message.
                Err(CoreError::InvalidAmount(raw)) => debug!(%raw, "donation amount rejected"),
                Err(e) => return Err(e),
            }
        }

        Action::SettlementCompleted { ticket } => {
            if let Some(amount) = next.flow.settled(ticket) {
                complete_donation(&mut next, amount, &mut effects);
            }
        }
        Action::SettlementFailed { ticket, reason } => {
            next.flow.failed(ticket, &reason);
        }

        Action::TickDonor => {
            if let Some(detail) = next.detail.as_mut() {
                detail.ticker_index = (detail.ticker_index + 1) % DONOR_TICKER.len();
            }
        }

        Action::ToggleLike { id } => {
            next.feed.toggle_like(&id)?;
        }

        Action::UpdateProfile { name, avatar } => {
            let screen = next.screen();
            if !matches!(screen, View::Profile | View::Certificate) {
                return Err(CoreError::NotAllowed(format!(
                    "profile cannot be edited from {screen:?}"
                )));
            }
            next.user = next.user.update_profile(&name, &avatar);
        }

        Action::SaveCertificate => {
            require_screen(&next, View::Certificate)?;
            if !next.is_saving_certificate {
                next.is_saving_certificate = true;
                effects.push(Effect::ScheduleCertificateSave);
            }
        }
        Action::CertificateSaved => {
            if next.is_saving_certificate {
                next.is_saving_certificate = false;
                next.notice = Some(SAVED_NOTICE.to_string());
            }
        }

        Action::DismissNotice => next.notice = None,

        Action::SendChat { input } => {
            require_screen(&next, View::Chat)?;
            let pending = next.chat.begin(&input)?;
            effects.push(Effect::RequestChat(pending));
        }
        Action::ChatReplied { pending, outcome } => {
            if !next.chat.finish(&pending, outcome) {
                debug!(epoch = pending.epoch, "chat reply for a closed screen dropped");
            }
        }

        Action::GenerateImage { prompt } => {
            require_screen(&next, View::Images)?;
            let pending = next.studio.begin(&prompt)?;
            effects.push(Effect::RequestImage(pending));
        }
        Action::ImageGenerated { pending, outcome } => {
            if !next.studio.finish(&pending, outcome) {
                debug!(epoch = pending.epoch, "image for a closed screen dropped");
            }
        }
    }

    Ok(Transition {
        state: next,
        effects,
    })
}

fn navigate(state: &mut AppState, to: NavAction, effects: &mut Vec<Effect>) -> Result<()> {
    if state.flow.is_processing() {
        return Err(CoreError::FlowLocked);
    }
    match to {
        NavAction::OpenDetail => {
            return Err(CoreError::NotAllowed("open an entity by id".into()));
        }
        NavAction::DonationSettled => {
            return Err(CoreError::NotAllowed("settlement is reported by the host".into()));
        }
        NavAction::ShowCertificate => {
            let amount = match (state.user.has_certificate(), state.user.last_donation) {
                (true, Some(amount)) => amount,
                _ => return Err(CoreError::NotAllowed("no donation to certify yet".into())),
            };
            move_to(state, to, effects)?;
            state.certificate = Some(issue_certificate(amount));
        }
        NavAction::ShareCertificate => {
            move_to(state, to, effects)?;
            state.notice = Some(SHARED_NOTICE.to_string());
        }
        _ => move_to(state, to, effects)?,
    }
    Ok(())
}

fn open_entity(state: &mut AppState, id: &str, effects: &mut Vec<Effect>) -> Result<()> {
    if state.flow.is_processing() {
        return Err(CoreError::FlowLocked);
    }
    let from = state.router.current();
    if router::transition(from, NavAction::OpenDetail).is_none() {
        return Err(CoreError::InvalidTransition {
            from,
            action: NavAction::OpenDetail.to_string(),
        });
    }
    let Some(entity) = catalog::find(id) else {
        // Fail closed: nothing to show, go home.
        info!(%id, "entity not in catalog, redirecting home");
        state.router.navigate(View::Home);
        leave_and_enter(state, from, effects);
        state.notice = Some(ENTITY_MISSING_NOTICE.to_string());
        return Ok(());
    };

    move_to(state, NavAction::OpenDetail, effects)?;
    state.detail = Some(DetailScreen {
        entity_id: entity.id.clone(),
        active_tab: catalog::detail_tabs(entity.kind)[0].to_string(),
        ticker_index: 0,
    });
    state.flow.reset();
    effects.push(Effect::StartTicker);
    Ok(())
}

fn complete_donation(state: &mut AppState, amount: Amount, effects: &mut Vec<Effect>) {
    state.user = state.user.record_amount(amount);
    info!(
        %amount,
        total = %state.user.donated_amount,
        count = state.user.donation_count,
        "donation settled"
    );

    let from = state.router.current();
    if state.router.dispatch(NavAction::DonationSettled).is_err() {
        state.router.navigate(View::Certificate);
    }
    leave_and_enter(state, from, effects);
    state.certificate = Some(issue_certificate(amount));
}

/// Dispatch through the router and run the screen lifetime hooks.
fn move_to(state: &mut AppState, action: NavAction, effects: &mut Vec<Effect>) -> Result<()> {
    let from = state.router.current();
    let generation = state.router.generation();
    state.router.dispatch(action)?;
    if state.router.generation() != generation {
        leave_and_enter(state, from, effects);
    }
    Ok(())
}

fn leave_and_enter(state: &mut AppState, from: View, effects: &mut Vec<Effect>) {
    let to = state.router.current();
    let generation = state.router.generation();
    effects.push(Effect::CancelScreenTasks);

    match from {
        View::Detail => {
            state.detail = None;
            state.flow.reset();
        }
        View::Certificate => state.is_saving_certificate = false,
        _ => {}
    }
    if from == View::Chat || to == View::Chat {
        state.chat = ChatScreen::new(generation);
    }
    if from == View::Images || to == View::Images {
        state.studio = ImageStudio::new(generation);
    }
}

fn issue_certificate(amount: Amount) -> Certificate {
    Certificate::issue(amount, Local::now().date_naive(), &mut rand::rng())
}

fn require_screen(state: &AppState, view: View) -> Result<()> {
    if state.screen() == view {
        Ok(())
    } else {
        Err(not_on(view))
    }
}

fn not_on(view: View) -> CoreError {
    CoreError::NotAllowed(format!("only available on {view:?}"))
}
