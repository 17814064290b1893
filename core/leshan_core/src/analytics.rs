//! Usage figures for the Lumina analytics dashboard.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    pub name: &'static str,
    pub usage: u32,
    pub cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelUsage {
    pub name: &'static str,
    /// Thousands of tokens.
    pub tokens: u32,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeadlineStat {
    pub label: &'static str,
    pub value: &'static str,
    pub change: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub stats: Vec<HeadlineStat>,
    pub weekly: Vec<DailyUsage>,
    pub models: Vec<ModelUsage>,
}

impl AnalyticsReport {
    pub fn total_usage(&self) -> u32 {
        self.weekly.iter().map(|d| d.usage).sum()
    }
}

pub fn report() -> AnalyticsReport {
    let day = |name, usage, cost| DailyUsage { name, usage, cost };
    let stat = |label, value, change| HeadlineStat {
        label,
        value,
        change,
    };
    AnalyticsReport {
        stats: vec![
            stat("Total API Calls", "12,482", "+12%"),
            stat("Average Latency", "450ms", "-5%"),
            stat("Tokens Processed", "1.2M", "+24%"),
            stat("Active Sessions", "42", "+3%"),
        ],
        weekly: vec![
            day("Mon", 4000, 2400),
            day("Tue", 3000, 1398),
            day("Wed", 2000, 9800),
            day("Thu", 2780, 3908),
            day("Fri", 1890, 4800),
            day("Sat", 2390, 3800),
            day("Sun", 3490, 4300),
        ],
        models: vec![
            ModelUsage { name: "Gemini 3 Pro", tokens: 120, color: "#6366f1" },
            ModelUsage { name: "Gemini Flash", tokens: 80, color: "#a855f7" },
            ModelUsage { name: "Imagen V3", tokens: 45, color: "#ec4899" },
            ModelUsage { name: "Embeddings", tokens: 25, color: "#f43f5e" },
        ],
    }
}
