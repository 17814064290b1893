//! # Leshan Core
//!
//! State core of the **乐善市南** charity app and the Lumina assistant
//! dashboard. Every screen of the app reads from, and every user action
//! flows through, the single [`AppState`] value defined here:
//!
//! | Concern            | Module          | Entry point(s)                         |
//! |--------------------|-----------------|----------------------------------------|
//! | Donatable records  | [`catalog`]     | `list_by_type`, `featured`, `find`     |
//! | Screen routing     | [`router`]      | [`Router::dispatch`], `navigate`       |
//! | Visitor identity   | [`session`]     | `update_profile`, `record_donation`    |
//! | Donation modal     | [`donation`]    | [`DonationFlow::confirm`], `settled`   |
//! | Community feed     | [`feed`]        | [`Feed::toggle_like`]                  |
//! | Certificates       | [`certificate`] | [`Certificate::issue`]                 |
//! | AI screens         | [`assistant`]   | [`ChatScreen::begin`], `finish`        |
//! | Everything at once | [`app`]         | [`reduce`]                             |
//!
//! ## Architecture
//!
//! Nothing in this crate performs I/O or sleeps. Updates are pure functions
//! from `(state, action)` to a new state plus a list of [`Effect`]s; the host
//! (the gateway service) executes those effects as scheduled tasks and feeds
//! their completions back in as actions.

pub mod analytics;
pub mod app;
pub mod assistant;
pub mod catalog;
pub mod certificate;
pub mod donation;
pub mod errors;
pub mod feed;
pub mod money;
pub mod router;
pub mod session;
pub mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_donation_flow;
#[cfg(test)]
mod test_navigation;
#[cfg(test)]
mod test_properties;

pub use app::{reduce, Action, AppState, Effect, Transition};
pub use assistant::{ChatScreen, ImageStudio, PendingChat, PendingImage};
pub use certificate::Certificate;
pub use donation::{AmountChoice, DonationFlow, FlowState, Settlement};
pub use errors::{CoreError, Result};
pub use feed::{Feed, Moment};
pub use money::Amount;
pub use router::{NavAction, Router};
pub use session::UserInfo;
pub use types::{CharityEntity, EntityType, View};
