//! # Session
//!
//! The visitor's identity and cumulative donation stats.
//!
//! Updates are pure: each operation consumes the current [`UserInfo`] by
//! reference and returns the next one. A donation doubles as the demo
//! "login": completing one overwrites the identity with the fixed demo
//! account.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::money::Amount;

pub const DEFAULT_NAME: &str = "爱心用户";
pub const PLACEHOLDER_PHONE: &str = "136****6052";

pub const DEMO_NAME: &str = "李德尔";
pub const DEMO_AVATAR: &str = "https://picsum.photos/100/100";
pub const DEMO_PHONE: &str = PLACEHOLDER_PHONE;

/// Longest nickname the profile editor accepts.
pub const MAX_NAME_CHARS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub avatar: String,
    pub phone: String,
    pub is_logged_in: bool,
    /// Never decreases.
    pub donated_amount: Amount,
    /// Never decreases; one per completed donation.
    pub donation_count: u32,
    pub last_donation: Option<Amount>,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            avatar: String::new(),
            phone: String::new(),
            is_logged_in: false,
            donated_amount: Amount::ZERO,
            donation_count: 0,
            last_donation: None,
        }
    }
}

impl UserInfo {
    /// Set nickname and avatar, marking the visitor as logged in.
    ///
    /// A blank name resets to [`DEFAULT_NAME`]. An existing phone number is
    /// kept; otherwise the placeholder is assigned.
    pub fn update_profile(&self, name: &str, avatar: &str) -> UserInfo {
        let name = name.trim();
        UserInfo {
            name: if name.is_empty() {
                DEFAULT_NAME.to_string()
            } else {
                name.to_string()
            },
            avatar: avatar.to_string(),
            phone: if self.phone.is_empty() {
                PLACEHOLDER_PHONE.to_string()
            } else {
                self.phone.clone()
            },
            is_logged_in: true,
            ..self.clone()
        }
    }

    /// Record a completed donation given as user text.
    pub fn record_donation(&self, amount: &str) -> Result<UserInfo> {
        Ok(self.record_amount(Amount::parse(amount)?))
    }

    /// Record a completed donation of an already validated amount.
    pub fn record_amount(&self, amount: Amount) -> UserInfo {
        UserInfo {
            name: DEMO_NAME.to_string(),
            avatar: DEMO_AVATAR.to_string(),
            phone: DEMO_PHONE.to_string(),
            is_logged_in: true,
            donated_amount: self.donated_amount + amount,
            donation_count: self.donation_count.saturating_add(1),
            last_donation: Some(amount),
        }
    }

    /// Certificates carry real data only once something has been donated.
    pub fn has_certificate(&self) -> bool {
        self.donation_count > 0
    }
}

/// Truncate a nickname the way the editor's input box does.
pub fn clamp_name(raw: &str) -> String {
    raw.chars().take(MAX_NAME_CHARS).collect()
}
