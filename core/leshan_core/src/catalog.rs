//! # Catalog
//!
//! Static records of every donatable entity, grouped by [`EntityType`].
//!
//! | Kind           | Ids           | List title     |
//! |----------------|---------------|----------------|
//! | `Project`      | `lp1`..`lp3`  | 慈善项目       |
//! | `Fund`         | `lf1`..`lf2`  | 社区慈善基金   |
//! | `SpecialFund`  | `ls1`..`ls3`  | 专项基金       |
//! | `Market`       | `lm1`..`lm2`  | 慈善超市       |
//!
//! The home screen's featured project (`p1`) is kept apart from the lists.
//! The data is built once and never mutated.

use std::sync::LazyLock;

use crate::money::Amount;
use crate::types::{CharityEntity, EntityType};

/// Cumulative donations shown on the home banner, in yuan.
pub const PLATFORM_TOTAL_YUAN: u64 = 68_013_705;

/// Canned lines rotated by the detail screen's donor ticker.
pub const DONOR_TICKER: [&str; 4] = [
    "簇拥烈日的花捐了10元",
    "我捐了50元",
    "张虎捐了50元",
    "爱心人士捐了100元",
];

const CHARITY_FEDERATION: &str = "市南区慈善总会";

struct Seed {
    id: &'static str,
    kind: EntityType,
    title: &'static str,
    cover: &'static str,
    target_yuan: i64,
    current_cents: i64,
    spent_yuan: Option<i64>,
    donors: u32,
    category: Option<&'static str>,
    description: &'static str,
    org: &'static str,
}

impl Seed {
    fn build(&self) -> CharityEntity {
        CharityEntity {
            id: self.id.to_string(),
            kind: self.kind,
            title: self.title.to_string(),
            description: self.description.to_string(),
            org: self.org.to_string(),
            cover: (!self.cover.is_empty()).then(|| self.cover.to_string()),
            target: Amount::from_yuan(self.target_yuan),
            current: Amount::from_cents(self.current_cents),
            spent: self.spent_yuan.map(Amount::from_yuan),
            donors_count: self.donors,
            category: self.category.map(str::to_string),
            date_range: None,
        }
    }
}

const COMMUNITY_FUND: Seed = Seed {
    id: "",
    kind: EntityType::Fund,
    title: "珠海路街道辛家庄社区慈善基金",
    cover: "",
    target_yuan: 500_000,
    current_cents: 3_920_087,
    spent_yuan: None,
    donors: 520,
    category: None,
    description: "用于资助社区困难群众。",
    org: "珠海路街道",
};

const SEEDS: &[Seed] = &[
    Seed {
        id: "lp1",
        kind: EntityType::Project,
        title: "乐善市南——爱上你，疗愈我",
        cover: "https://images.unsplash.com/photo-1488521787991-ed7bbaae773c?w=400",
        target_yuan: 100_000,
        current_cents: 2_835_583,
        spent_yuan: None,
        donors: 2739,
        category: Some("综合"),
        description: "汇聚微光，照亮需要帮助的邻里。",
        org: CHARITY_FEDERATION,
    },
    Seed {
        id: "lp2",
        kind: EntityType::Project,
        title: "市南慈善协会综合募捐项目",
        cover: "https://images.unsplash.com/photo-1459749411177-042180ce673c?w=400",
        target_yuan: 500_000,
        current_cents: 1_500_000,
        spent_yuan: Some(5_000),
        donors: 520,
        category: Some("综合"),
        description: "非定向公益捐助，助力各类困难群体。",
        org: CHARITY_FEDERATION,
    },
    Seed {
        id: "lp3",
        kind: EntityType::Project,
        title: "保护海洋你我同行",
        cover: "https://images.unsplash.com/photo-1559128010-7c1ad6e1b6a5?w=400",
        target_yuan: 500_000,
        current_cents: 100_000_000,
        spent_yuan: Some(250_000),
        donors: 187,
        category: Some("环境保护"),
        description: "回收海洋垃圾，清理浒苔。",
        org: CHARITY_FEDERATION,
    },
    Seed {
        id: "lf1",
        cover: "https://picsum.photos/400/220?1",
        ..COMMUNITY_FUND
    },
    Seed {
        id: "lf2",
        cover: "https://picsum.photos/400/220?2",
        ..COMMUNITY_FUND
    },
    Seed {
        id: "ls1",
        kind: EntityType::SpecialFund,
        title: "文艺发展专项基金",
        description: "支持社区文艺事业发展。",
        org: CHARITY_FEDERATION,
        ..COMMUNITY_FUND
    },
    Seed {
        id: "ls2",
        kind: EntityType::SpecialFund,
        title: "体育发展专项基金",
        description: "支持社区体育事业。",
        org: CHARITY_FEDERATION,
        ..COMMUNITY_FUND
    },
    Seed {
        id: "ls3",
        kind: EntityType::SpecialFund,
        title: "音乐发展专项基金",
        description: "音乐艺术公益支持。",
        org: CHARITY_FEDERATION,
        ..COMMUNITY_FUND
    },
    Seed {
        id: "lm1",
        kind: EntityType::Market,
        title: "宁夏路爱心小屋慈善超市",
        description: "为宁夏路爱心小屋慈善超市募捐运营经费，帮助附近的困难群众。",
        org: "宁夏路街道",
        ..COMMUNITY_FUND
    },
    Seed {
        id: "lm2",
        kind: EntityType::Market,
        title: "澳门路小学爱心超市",
        description: "爱心超市募捐运营经费。",
        org: "澳门路街道",
        ..COMMUNITY_FUND
    },
];

const FEATURED: Seed = Seed {
    id: "p1",
    kind: EntityType::Project,
    title: "乐善市南——爱上你，疗愈我",
    cover: "https://images.unsplash.com/photo-1488521787991-ed7bbaae773c?q=80&w=800&auto=format&fit=crop",
    target_yuan: 100_000,
    current_cents: 2_835_583,
    spent_yuan: None,
    donors: 2739,
    category: Some("助学教育"),
    description: "汇聚微光，照亮需要帮助的邻里，让善意成为习惯。",
    org: CHARITY_FEDERATION,
};

struct Catalog {
    projects: Vec<CharityEntity>,
    funds: Vec<CharityEntity>,
    special_funds: Vec<CharityEntity>,
    markets: Vec<CharityEntity>,
    featured: CharityEntity,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    let of_kind = |kind: EntityType| -> Vec<CharityEntity> {
        SEEDS
            .iter()
            .filter(|s| s.kind == kind)
            .map(Seed::build)
            .collect()
    };
    Catalog {
        projects: of_kind(EntityType::Project),
        funds: of_kind(EntityType::Fund),
        special_funds: of_kind(EntityType::SpecialFund),
        markets: of_kind(EntityType::Market),
        featured: FEATURED.build(),
    }
});

// ─────────────────────────────────────────────────────────
// Lookups
// ─────────────────────────────────────────────────────────

/// All entities of one kind, in display order.
pub fn list_by_type(kind: EntityType) -> &'static [CharityEntity] {
    match kind {
        EntityType::Project => &CATALOG.projects,
        EntityType::Fund => &CATALOG.funds,
        EntityType::SpecialFund => &CATALOG.special_funds,
        EntityType::Market => &CATALOG.markets,
    }
}

/// The project promoted on the home screen.
pub fn featured() -> &'static CharityEntity {
    &CATALOG.featured
}

/// Look an entity up by id across every list, including the featured one.
pub fn find(id: &str) -> Option<&'static CharityEntity> {
    if CATALOG.featured.id == id {
        return Some(&CATALOG.featured);
    }
    EntityType::ALL
        .iter()
        .flat_map(|kind| list_by_type(*kind))
        .find(|e| e.id == id)
}

// ─────────────────────────────────────────────────────────
// Presentation metadata
// ─────────────────────────────────────────────────────────

pub fn list_title(kind: EntityType) -> &'static str {
    match kind {
        EntityType::Project => "慈善项目",
        EntityType::Fund => "社区慈善基金",
        EntityType::SpecialFund => "专项基金",
        EntityType::Market => "慈善超市",
    }
}

/// Filter tabs across the top of a list screen.
pub fn list_tabs(kind: EntityType) -> &'static [&'static str] {
    match kind {
        EntityType::Project => &["全部", "综合", "助老", "扶贫", "助农", "教育"],
        EntityType::Fund => &["珠海路街道", "香港中路街道", "八大峡街道", "云南路街道"],
        EntityType::SpecialFund | EntityType::Market => &["全部"],
    }
}

/// Section tabs of the detail screen. The first one is active on open.
pub fn detail_tabs(kind: EntityType) -> &'static [&'static str; 4] {
    if kind.is_fund_like() {
        &["基金介绍", "捐款明细", "基金动态", "募捐资质"]
    } else {
        &["项目详情", "捐款明细", "项目进展", "募捐资质"]
    }
}
