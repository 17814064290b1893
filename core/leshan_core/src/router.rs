//! # Router
//!
//! Holds the single active [`View`] and moves between views through an
//! explicit transition table:
//!
//! ```text
//! Home ──OpenCategory(k)──► <k>List ──OpenDetail──► Detail ──DonationSettled──► Certificate
//!  ▲  ◄────────Back───────────┘  ▲                    │                          │   ▲
//!  └─────────────────Back─────────┼────────────────────┘                  Back / Share │
//!                                 │                                              ▼   │
//! Home ◄─Tab─► Community ◄─Tab─► Profile ───────────ShowCertificate──────────────────┘
//!
//! any ──Sidebar(Chat | Images | Analytics | Settings)──► that view
//! Chat | Images | Analytics | Settings ──Tab──► Home | Community | Profile
//! ```
//!
//! Anything not in the table is rejected and the router is left untouched.
//! [`Router::navigate`] bypasses the table for hosts that need an
//! unconditional jump.
//!
//! Every change of view bumps [`Router::generation`]. Async work started on a
//! screen captures the generation and is discarded if it no longer matches.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CoreError, Result};
use crate::types::{EntityType, View};

/// User intents that move between screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum NavAction {
    /// Bottom tab bar.
    Tab(View),
    /// Category tile on the home screen.
    OpenCategory(EntityType),
    /// Tap on an entity card.
    OpenDetail,
    /// The per-screen back arrow.
    Back,
    /// "我的证书" on the profile screen.
    ShowCertificate,
    /// Settlement finished on the detail screen.
    DonationSettled,
    /// "分享到公益秀" on the certificate screen.
    ShareCertificate,
    /// Lumina dashboard sidebar.
    Sidebar(View),
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Look up `(from, action)` in the transition table.
pub fn transition(from: View, action: NavAction) -> Option<View> {
    use NavAction::*;
    use View::*;

    match (from, action) {
        (_, Sidebar(to)) if to.is_dashboard() => Some(to),
        (from, Tab(to)) if to.is_tab() && (from.is_tab() || from.is_dashboard()) => Some(to),
        (Home, OpenCategory(kind)) => Some(kind.list_view()),
        (Home, OpenDetail) => Some(Detail),
        (list, OpenDetail) if list.is_list() => Some(Detail),
        (list, Back) if list.is_list() => Some(Home),
        (Detail, Back) => Some(Home),
        (Detail, DonationSettled) => Some(Certificate),
        (Profile, ShowCertificate) => Some(Certificate),
        (Certificate, Back | ShareCertificate) => Some(Profile),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Router {
    current: View,
    generation: u64,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the current view unconditionally.
    pub fn navigate(&mut self, view: View) {
        if view != self.current {
            debug!(from = ?self.current, to = ?view, "navigate");
        }
        self.current = view;
        self.generation += 1;
    }

    /// Apply `action` through the transition table. Landing on the view
    /// that is already active changes nothing.
    pub fn dispatch(&mut self, action: NavAction) -> Result<View> {
        let to = transition(self.current, action).ok_or_else(|| CoreError::InvalidTransition {
            from: self.current,
            action: action.to_string(),
        })?;
        if to != self.current {
            self.navigate(to);
        }
        Ok(to)
    }

    /// The screen that is actually rendered for the current view.
    /// Views without a screen of their own fall back to `Home`.
    pub fn screen(&self) -> View {
        match self.current {
            View::Settings => View::Home,
            other => other,
        }
    }

    /// Whether the bottom tab bar is visible.
    pub fn shows_tab_bar(&self) -> bool {
        !(self.current.is_list() || matches!(self.current, View::Detail | View::Certificate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_home() {
        let router = Router::new();
        assert_eq!(router.current(), View::Home);
        assert_eq!(router.generation(), 0);
        assert!(router.shows_tab_bar());
    }

    #[test]
    fn back_targets_come_from_the_table() {
        assert_eq!(transition(View::FundList, NavAction::Back), Some(View::Home));
        assert_eq!(transition(View::Detail, NavAction::Back), Some(View::Home));
        assert_eq!(transition(View::Certificate, NavAction::Back), Some(View::Profile));
        assert_eq!(transition(View::Home, NavAction::Back), None);
        assert_eq!(transition(View::Profile, NavAction::Back), None);
    }

    #[test]
    fn rejected_actions_leave_router_untouched() {
        let mut router = Router::new();
        let err = router.dispatch(NavAction::DonationSettled).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { from: View::Home, .. }));
        assert_eq!(router.current(), View::Home);
        assert_eq!(router.generation(), 0);
    }

    #[test]
    fn tabs_only_switch_between_tab_views() {
        assert_eq!(
            transition(View::Community, NavAction::Tab(View::Profile)),
            Some(View::Profile)
        );
        assert_eq!(transition(View::Home, NavAction::Tab(View::Detail)), None);
        assert_eq!(transition(View::Detail, NavAction::Tab(View::Home)), None);
        assert_eq!(
            transition(View::Analytics, NavAction::Tab(View::Home)),
            Some(View::Home)
        );
    }

    #[test]
    fn sidebar_reaches_dashboard_views_only() {
        assert_eq!(
            transition(View::Detail, NavAction::Sidebar(View::Chat)),
            Some(View::Chat)
        );
        assert_eq!(transition(View::Chat, NavAction::Sidebar(View::Profile)), None);
    }

    #[test]
    fn dispatch_to_current_view_keeps_generation() {
        let mut router = Router::new();
        router.dispatch(NavAction::Sidebar(View::Chat)).unwrap();
        router.dispatch(NavAction::Sidebar(View::Chat)).unwrap();
        assert_eq!(router.generation(), 1);
    }

    #[test]
    fn settings_renders_home() {
        let mut router = Router::new();
        router.dispatch(NavAction::Sidebar(View::Settings)).unwrap();
        assert_eq!(router.current(), View::Settings);
        assert_eq!(router.screen(), View::Home);
    }

    #[test]
    fn generation_advances_on_every_navigation() {
        let mut router = Router::new();
        router.dispatch(NavAction::OpenCategory(EntityType::Market)).unwrap();
        router.dispatch(NavAction::Back).unwrap();
        router.navigate(View::Home);
        assert_eq!(router.generation(), 3);
    }

    #[test]
    fn tab_bar_hidden_on_pushed_screens() {
        let mut router = Router::new();
        router.navigate(View::MarketList);
        assert!(!router.shows_tab_bar());
        router.navigate(View::Certificate);
        assert!(!router.shows_tab_bar());
        router.navigate(View::Community);
        assert!(router.shows_tab_bar());
    }
}
