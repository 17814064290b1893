//! # Donation flow
//!
//! The donation modal on the detail screen, as a finite-state machine:
//!
//! ```text
//!            open              confirm (valid)          settled(ticket)
//! Idle ───────────► AmountSelection ─────────► Confirming ──────────► Idle
//!  ▲      close        │  ▲   ▲                    │
//!  └───────────────────┘  │   └────────────────────┘ failed(ticket, reason)
//!                         └── select_preset / select_custom / set_custom
//!                             confirm (invalid) → error message
//! ```
//!
//! `Confirming` is sticky: a second confirm is ignored and the modal cannot
//! be closed until the host reports the settlement outcome. Each settlement
//! carries a ticket so a late report for an earlier attempt is dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CoreError, Result};
use crate::money::Amount;

/// Preset buttons, in yuan.
pub const PRESET_AMOUNTS: [u32; 5] = [10, 20, 50, 100, 200];
pub const DEFAULT_PRESET: u32 = 20;

/// Simulated payment settlement.
pub const SETTLEMENT_DELAY: Duration = Duration::from_millis(1500);

pub const INVALID_AMOUNT_MESSAGE: &str = "请输入有效的捐赠金额";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AmountChoice {
    Preset(u32),
    /// Free-form text, validated only on confirm.
    Custom(String),
}

impl AmountChoice {
    pub fn resolve(&self) -> Result<Amount> {
        match self {
            Self::Preset(yuan) => Ok(Amount::from_yuan(i64::from(*yuan))),
            Self::Custom(text) => Amount::parse(text),
        }
    }
}

impl Default for AmountChoice {
    fn default() -> Self {
        Self::Preset(DEFAULT_PRESET)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    AmountSelection {
        choice: AmountChoice,
        /// Text kept in the custom box while a preset is selected.
        custom_input: String,
        error: Option<String>,
    },
    Confirming {
        amount: Amount,
        ticket: u64,
        /// Restored if settlement fails.
        choice: AmountChoice,
        custom_input: String,
    },
}

/// A settlement the host must complete by reporting back `ticket`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub ticket: u64,
    pub amount: Amount,
    pub delay: Duration,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationFlow {
    state: FlowState,
    next_ticket: u64,
}

impl DonationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, FlowState::Idle)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, FlowState::Confirming { .. })
    }

    /// Forget any previous attempt; used when a new detail screen opens.
    pub fn reset(&mut self) {
        if !self.is_processing() {
            self.state = FlowState::Idle;
        }
    }

    /// Show the modal with the default preset selected.
    pub fn open(&mut self) -> Result<()> {
        self.ensure_not_processing()?;
        self.state = FlowState::AmountSelection {
            choice: AmountChoice::default(),
            custom_input: String::new(),
            error: None,
        };
        Ok(())
    }

    /// Dismiss the modal. Refused while settling.
    pub fn close(&mut self) -> Result<()> {
        self.ensure_not_processing()?;
        self.state = FlowState::Idle;
        Ok(())
    }

    pub fn select_preset(&mut self, yuan: u32) -> Result<()> {
        if !PRESET_AMOUNTS.contains(&yuan) {
            return Err(CoreError::NotAllowed(format!("{yuan} is not a preset amount")));
        }
        self.edit_selection(|choice, _| *choice = AmountChoice::Preset(yuan))
    }

    pub fn select_custom(&mut self) -> Result<()> {
        self.edit_selection(|choice, custom| *choice = AmountChoice::Custom(custom.clone()))
    }

    /// Update the custom box. Switches to the custom choice, as focusing the
    /// box does.
    pub fn set_custom(&mut self, text: &str) -> Result<()> {
        self.edit_selection(|choice, custom| {
            *custom = text.to_string();
            *choice = AmountChoice::Custom(text.to_string());
        })
    }

    /// Start settlement of the selected amount.
    ///
    /// Returns `Ok(None)` if a settlement is already running. An invalid
    /// custom amount keeps the modal on amount selection with an error.
    pub fn confirm(&mut self) -> Result<Option<Settlement>> {
        let (choice, custom_input, amount) = match &mut self.state {
            FlowState::Confirming { .. } => {
                debug!("confirm ignored: settlement already running");
                return Ok(None);
            }
            FlowState::Idle => {
                return Err(CoreError::NotAllowed("donation modal is closed".into()));
            }
            FlowState::AmountSelection {
                choice,
                custom_input,
                error,
            } => match choice.resolve() {
                Ok(amount) => (choice.clone(), std::mem::take(custom_input), amount),
                Err(e) => {
                    *error = Some(INVALID_AMOUNT_MESSAGE.to_string());
                    return Err(e);
                }
            },
        };

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.state = FlowState::Confirming {
            amount,
            ticket,
            choice,
            custom_input,
        };
        debug!(ticket, %amount, "settlement started");
        Ok(Some(Settlement {
            ticket,
            amount,
            delay: SETTLEMENT_DELAY,
        }))
    }

    /// Settlement finished. Yields the amount if `ticket` is the one running.
    pub fn settled(&mut self, ticket: u64) -> Option<Amount> {
        match self.state {
            FlowState::Confirming {
                amount,
                ticket: running,
                ..
            } if running == ticket => {
                self.state = FlowState::Idle;
                Some(amount)
            }
            _ => {
                debug!(ticket, "stale settlement ignored");
                None
            }
        }
    }

    /// Settlement failed: back to amount selection with `reason` shown.
    /// Returns false for a stale ticket.
    pub fn failed(&mut self, ticket: u64, reason: &str) -> bool {
        let (choice, custom_input) = match &self.state {
            FlowState::Confirming {
                ticket: running,
                choice,
                custom_input,
                ..
            } if *running == ticket => (choice.clone(), custom_input.clone()),
            _ => return false,
        };
        self.state = FlowState::AmountSelection {
            choice,
            custom_input,
            error: Some(reason.to_string()),
        };
        true
    }

    fn ensure_not_processing(&self) -> Result<()> {
        if self.is_processing() {
            Err(CoreError::FlowLocked)
        } else {
            Ok(())
        }
    }

    fn edit_selection(&mut self, edit: impl FnOnce(&mut AmountChoice, &mut String)) -> Result<()> {
        match &mut self.state {
            FlowState::AmountSelection {
                choice,
                custom_input,
                error,
            } => {
                edit(choice, custom_input);
                *error = None;
                Ok(())
            }
            FlowState::Confirming { .. } => Err(CoreError::FlowLocked),
            FlowState::Idle => Err(CoreError::NotAllowed("donation modal is closed".into())),
        }
    }
}
