//! # Types
//!
//! Shared data structures used across the core.
//!
//! ### Views
//!
//! [`View`] names every screen the app can show. Exactly one is active at a
//! time (see [`crate::router`]); `Settings` has no screen of its own and is
//! rendered as `Home`. Views decode leniently: a name that matches no screen
//! becomes `Home`.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::money::Amount;

/// Kind of donatable record. Fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Project,
    Fund,
    SpecialFund,
    Market,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Project,
        EntityType::Fund,
        EntityType::SpecialFund,
        EntityType::Market,
    ];

    /// The list screen that shows entities of this kind.
    pub fn list_view(self) -> View {
        match self {
            Self::Project => View::ProjectList,
            Self::Fund => View::FundList,
            Self::SpecialFund => View::SpecialFundList,
            Self::Market => View::MarketList,
        }
    }

    /// Funds and special funds are presented as "基金", everything else as "项目".
    pub fn is_fund_like(self) -> bool {
        matches!(self, Self::Fund | Self::SpecialFund)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Fund => "fund",
            Self::SpecialFund => "special_fund",
            Self::Market => "market",
        }
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "fund" => Ok(Self::Fund),
            "special_fund" | "special-fund" => Ok(Self::SpecialFund),
            "market" => Ok(Self::Market),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A donatable target: project, community fund, special fund or charity market.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharityEntity {
    pub id: String,
    pub kind: EntityType,
    pub title: String,
    pub description: String,
    pub org: String,
    pub cover: Option<String>,
    /// Fundraising goal.
    pub target: Amount,
    /// Raised so far. May exceed `target`.
    pub current: Amount,
    /// Disclosed spending, independent of `current`.
    pub spent: Option<Amount>,
    pub donors_count: u32,
    pub category: Option<String>,
    pub date_range: Option<String>,
}

impl CharityEntity {
    /// Display cap for over-funded entities.
    pub const MAX_PROGRESS_PERCENT: u32 = 200;

    pub fn progress_percent(&self) -> u32 {
        self.current
            .percent_of(self.target)
            .min(Self::MAX_PROGRESS_PERCENT)
    }
}

/// Every screen of the app and the Lumina dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    #[default]
    Home,
    Community,
    Profile,
    Detail,
    Certificate,
    ProjectList,
    FundList,
    SpecialFundList,
    MarketList,
    Chat,
    Images,
    Analytics,
    Settings,
}

impl<'de> Deserialize<'de> for View {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(View::parse_or_home(&name))
    }
}

impl View {
    /// Parse a view name, falling back to `Home` for anything unrecognised.
    pub fn parse_or_home(name: &str) -> View {
        match name.trim().to_ascii_uppercase().as_str() {
            "HOME" => View::Home,
            "COMMUNITY" => View::Community,
            "PROFILE" => View::Profile,
            "DETAIL" => View::Detail,
            "CERTIFICATE" => View::Certificate,
            "PROJECT_LIST" => View::ProjectList,
            "FUND_LIST" => View::FundList,
            "SPECIAL_FUND_LIST" => View::SpecialFundList,
            "MARKET_LIST" => View::MarketList,
            "CHAT" => View::Chat,
            "IMAGES" => View::Images,
            "ANALYTICS" => View::Analytics,
            "SETTINGS" => View::Settings,
            _ => View::Home,
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            View::ProjectList | View::FundList | View::SpecialFundList | View::MarketList
        )
    }

    /// Entity kind shown by a list screen.
    pub fn list_kind(self) -> Option<EntityType> {
        match self {
            View::ProjectList => Some(EntityType::Project),
            View::FundList => Some(EntityType::Fund),
            View::SpecialFundList => Some(EntityType::SpecialFund),
            View::MarketList => Some(EntityType::Market),
            _ => None,
        }
    }

    /// Views reachable from the Lumina sidebar.
    pub fn is_dashboard(self) -> bool {
        matches!(
            self,
            View::Chat | View::Images | View::Analytics | View::Settings
        )
    }

    /// Bottom tab bar destinations.
    pub fn is_tab(self) -> bool {
        matches!(self, View::Home | View::Community | View::Profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn unknown_view_names_fall_back_to_home() {
        assert_eq!(View::parse_or_home("fund_list"), View::FundList);
        assert_eq!(View::parse_or_home("WALLET"), View::Home);
        assert_eq!(View::parse_or_home(""), View::Home);

        let decoded: Vec<View> = serde_json::from_str(r#"["CHAT","special_fund_list","WALLET"]"#).unwrap();
        assert_eq!(decoded, [View::Chat, View::SpecialFundList, View::Home]);
    }

    #[test]
    fn progress_is_capped_for_over_funded_entities() {
        let lp3 = catalog::find("lp3").unwrap();
        assert!(lp3.current > lp3.target);
        assert_eq!(lp3.progress_percent(), 200);

        let lp1 = catalog::find("lp1").unwrap();
        assert_eq!(lp1.progress_percent(), 28);
    }

    #[test]
    fn entity_type_round_trips_through_path_names() {
        for kind in EntityType::ALL {
            assert_eq!(kind.as_str().parse::<EntityType>().unwrap(), kind);
            assert_eq!(kind.list_view().list_kind(), Some(kind));
        }
        assert!("charity".parse::<EntityType>().is_err());
    }
}
