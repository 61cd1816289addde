use std::collections::BTreeMap;

use serde::Serialize;

/// Fixed-shape throw statistics for one rollup node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub overall: ScoreLine,
    pub hatchet: ToolStats,
    pub big_axe: ToolStats,
}

/// Statistics for throws made with one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStats {
    pub overall: ScoreLine,
    pub bullseye: TargetStats,
    pub clutch: TargetStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreLine {
    pub attempts: u32,
    pub total_score: u32,
    pub score_per_axe: f64,
}

/// Statistics for throws at one target, bucketed by score.
///
/// `count` and `percent` always hold every legal score of the target, even
/// when nothing landed in a bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetStats {
    pub attempts: u32,
    pub total_score: u32,
    pub score_per_axe: f64,
    pub count: BTreeMap<u32, u32>,
    pub percent: BTreeMap<u32, f64>,
}
