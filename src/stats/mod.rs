//! Throw statistics, identical at every rollup granularity.

pub mod rollup;

use std::collections::BTreeMap;

use crate::error::{AxeError, Result};
use crate::model::{ScoreLine, StatsSummary, Target, TargetStats, Throw, Tool, ToolStats};

pub use rollup::build_career;

/// Running counts from which a [`StatsSummary`] is derived.
///
/// Tallies of disjoint throw sets can be merged in any order; the derived
/// summary only depends on the multiset of throws that went in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    hatchet: ToolTally,
    big_axe: ToolTally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ToolTally {
    bullseye: TargetTally,
    clutch: TargetTally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TargetTally {
    target: Target,
    attempts: u32,
    total_score: u32,
    count: BTreeMap<u32, u32>,
}

impl Tally {
    pub fn new() -> Self {
        Self {
            hatchet: ToolTally::new(),
            big_axe: ToolTally::new(),
        }
    }

    pub fn from_throws<'a>(throws: impl IntoIterator<Item = &'a Throw>) -> Result<Self> {
        let mut tally = Self::new();
        for throw in throws {
            tally.add(throw)?;
        }
        Ok(tally)
    }

    /// Count one throw. Fails if the score is not a bucket of its target.
    pub fn add(&mut self, throw: &Throw) -> Result<()> {
        let tool = match throw.tool {
            Tool::Hatchet => &mut self.hatchet,
            Tool::BigAxe => &mut self.big_axe,
        };
        let target = match throw.target {
            Target::Bullseye => &mut tool.bullseye,
            Target::Clutch => &mut tool.clutch,
        };
        target.add(throw.score)
    }

    pub fn merge(&mut self, other: &Tally) {
        self.hatchet.merge(&other.hatchet);
        self.big_axe.merge(&other.big_axe);
    }

    pub fn summary(&self) -> StatsSummary {
        let hatchet = self.hatchet.stats();
        let big_axe = self.big_axe.stats();
        StatsSummary {
            overall: score_line(
                hatchet.overall.attempts + big_axe.overall.attempts,
                hatchet.overall.total_score + big_axe.overall.total_score,
            ),
            hatchet,
            big_axe,
        }
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolTally {
    fn new() -> Self {
        Self {
            bullseye: TargetTally::new(Target::Bullseye),
            clutch: TargetTally::new(Target::Clutch),
        }
    }

    fn merge(&mut self, other: &ToolTally) {
        self.bullseye.merge(&other.bullseye);
        self.clutch.merge(&other.clutch);
    }

    fn stats(&self) -> ToolStats {
        ToolStats {
            overall: score_line(
                self.bullseye.attempts + self.clutch.attempts,
                self.bullseye.total_score + self.clutch.total_score,
            ),
            bullseye: self.bullseye.stats(),
            clutch: self.clutch.stats(),
        }
    }
}

impl TargetTally {
    fn new(target: Target) -> Self {
        Self {
            target,
            attempts: 0,
            total_score: 0,
            count: target.buckets().iter().map(|score| (*score, 0)).collect(),
        }
    }

    fn add(&mut self, score: u32) -> Result<()> {
        if !self.target.is_legal_score(score) {
            return Err(AxeError::IllegalThrowScore {
                target: self.target,
                score,
            });
        }
        *self.count.entry(score).or_default() += 1;
        self.attempts += 1;
        self.total_score += score;
        Ok(())
    }

    fn merge(&mut self, other: &TargetTally) {
        self.attempts += other.attempts;
        self.total_score += other.total_score;
        for (score, count) in &other.count {
            *self.count.entry(*score).or_default() += count;
        }
    }

    fn stats(&self) -> TargetStats {
        let percent = self
            .count
            .iter()
            .map(|(score, count)| {
                (
                    *score,
                    ratio_3dp(100 * u64::from(*count), u64::from(self.attempts)),
                )
            })
            .collect();
        TargetStats {
            attempts: self.attempts,
            total_score: self.total_score,
            score_per_axe: ratio_3dp(u64::from(self.total_score), u64::from(self.attempts)),
            count: self.count.clone(),
            percent,
        }
    }
}

/// Aggregate any set of throws into the fixed statistics tree.
pub fn aggregate<'a>(throws: impl IntoIterator<Item = &'a Throw>) -> Result<StatsSummary> {
    Ok(Tally::from_throws(throws)?.summary())
}

fn score_line(attempts: u32, total_score: u32) -> ScoreLine {
    ScoreLine {
        attempts,
        total_score,
        score_per_axe: ratio_3dp(u64::from(total_score), u64::from(attempts)),
    }
}

/// `numerator / max(1, denominator)` rounded half away from zero to 3 decimals.
///
/// Done in integer thousandths so the result is exact before the final
/// conversion to `f64`.
fn ratio_3dp(numerator: u64, denominator: u64) -> f64 {
    let denominator = denominator.max(1);
    let thousandths = (2000 * numerator + denominator) / (2 * denominator);
    thousandths as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throw(tool: Tool, target: Target, score: u32) -> Throw {
        Throw {
            match_id: 1,
            round_id: if tool == Tool::BigAxe { 4 } else { 1 },
            throw_id: 1,
            tool,
            target,
            score,
        }
    }

    fn throws(tool: Tool, target: Target, scores: &[u32]) -> Vec<Throw> {
        scores.iter().map(|s| throw(tool, target, *s)).collect()
    }

    #[test]
    fn test_bullseye_hatchet_arithmetic() {
        let input = throws(Tool::Hatchet, Target::Bullseye, &[0, 1, 3, 5]);
        let stats = aggregate(&input).unwrap();
        let bullseye = &stats.hatchet.bullseye;

        assert_eq!(bullseye.attempts, 4);
        assert_eq!(bullseye.total_score, 9);
        assert_eq!(bullseye.score_per_axe, 2.25);
        for score in [0, 1, 3, 5] {
            assert_eq!(bullseye.count[&score], 1);
            assert_eq!(bullseye.percent[&score], 25.0);
        }
        assert_eq!(stats.overall.attempts, 4);
        assert_eq!(stats.overall.score_per_axe, 2.25);
        assert_eq!(stats.hatchet.overall.total_score, 9);
        assert_eq!(stats.big_axe.overall.attempts, 0);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = aggregate(std::iter::empty()).unwrap();

        assert_eq!(stats.overall.attempts, 0);
        assert_eq!(stats.overall.total_score, 0);
        assert_eq!(stats.overall.score_per_axe, 0.0);
        for tool in [&stats.hatchet, &stats.big_axe] {
            assert_eq!(tool.overall.score_per_axe, 0.0);
            assert_eq!(tool.bullseye.percent.len(), 4);
            assert_eq!(tool.clutch.percent.len(), 3);
            assert!(tool.bullseye.percent.values().all(|p| *p == 0.0));
            assert!(tool.clutch.percent.values().all(|p| *p == 0.0));
        }
    }

    #[test]
    fn test_rounding_to_three_decimals() {
        let input = throws(Tool::Hatchet, Target::Clutch, &[7, 0, 0]);
        let clutch = aggregate(&input).unwrap().hatchet.clutch;

        assert_eq!(clutch.score_per_axe, 2.333);
        assert_eq!(clutch.percent[&0], 66.667);
        assert_eq!(clutch.percent[&7], 33.333);
        assert_eq!(clutch.percent[&5], 0.0);
    }

    #[test]
    fn test_halves_round_away_from_zero() {
        let mut scores = vec![1];
        scores.extend([0; 15]);
        let bullseye = aggregate(&throws(Tool::Hatchet, Target::Bullseye, &scores))
            .unwrap()
            .hatchet
            .bullseye;
        // 1 / 16 = 0.0625
        assert_eq!(bullseye.score_per_axe, 0.063);
        assert_eq!(bullseye.percent[&1], 6.25);

        let mut scores = vec![5];
        scores.extend([0; 63]);
        let big_axe = aggregate(&throws(Tool::BigAxe, Target::Bullseye, &scores))
            .unwrap()
            .big_axe;
        // 100 / 64 = 1.5625 and 6300 / 64 = 98.4375
        assert_eq!(big_axe.bullseye.percent[&5], 1.563);
        assert_eq!(big_axe.bullseye.percent[&0], 98.438);
        assert_eq!(big_axe.bullseye.score_per_axe, 0.078);
        assert_eq!(big_axe.overall.score_per_axe, 0.078);
    }

    #[test]
    fn test_routing_by_tool_and_target() {
        let mut input = throws(Tool::BigAxe, Target::Clutch, &[7, 5]);
        input.extend(throws(Tool::BigAxe, Target::Bullseye, &[3]));
        input.extend(throws(Tool::Hatchet, Target::Clutch, &[0]));
        let stats = aggregate(&input).unwrap();

        assert_eq!(stats.overall.attempts, 4);
        assert_eq!(stats.overall.total_score, 15);
        assert_eq!(stats.overall.score_per_axe, 3.75);
        assert_eq!(stats.big_axe.overall.attempts, 3);
        assert_eq!(stats.big_axe.clutch.count[&7], 1);
        assert_eq!(stats.big_axe.clutch.count[&5], 1);
        assert_eq!(stats.big_axe.clutch.percent[&7], 50.0);
        assert_eq!(stats.big_axe.bullseye.count[&3], 1);
        assert_eq!(stats.hatchet.clutch.count[&0], 1);
        assert_eq!(stats.hatchet.bullseye.attempts, 0);
    }

    #[test]
    fn test_illegal_score_is_a_fault() {
        let input = throws(Tool::Hatchet, Target::Bullseye, &[5, 7]);
        let err = aggregate(&input).unwrap_err();

        assert!(matches!(
            err,
            AxeError::IllegalThrowScore {
                target: Target::Bullseye,
                score: 7
            }
        ));
        assert!(aggregate(&throws(Tool::BigAxe, Target::Clutch, &[3])).is_err());
    }

    #[test]
    fn test_merged_tallies_match_union() {
        let a = throws(Tool::Hatchet, Target::Bullseye, &[5, 5, 3, 0, 1]);
        let mut b = throws(Tool::Hatchet, Target::Clutch, &[7, 0]);
        b.extend(throws(Tool::BigAxe, Target::Bullseye, &[5]));

        let mut merged = Tally::from_throws(&a).unwrap();
        merged.merge(&Tally::from_throws(&b).unwrap());
        let union = aggregate(a.iter().chain(b.iter())).unwrap();
        assert_eq!(merged.summary(), union);

        let stats_a = aggregate(&a).unwrap();
        let stats_b = aggregate(&b).unwrap();
        for score in [0, 1, 3, 5] {
            assert_eq!(
                union.hatchet.bullseye.count[&score],
                stats_a.hatchet.bullseye.count[&score] + stats_b.hatchet.bullseye.count[&score]
            );
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let mut input = throws(Tool::Hatchet, Target::Bullseye, &[5, 1, 3]);
        input.extend(throws(Tool::Hatchet, Target::Clutch, &[7]));
        let forward = aggregate(&input).unwrap();
        input.reverse();

        assert_eq!(forward, aggregate(&input).unwrap());
    }
}
