use crate::models::{Fighter, VoteRecord, WinMethod};
use std::collections::BTreeMap;

/// Per-fighter vote counts. Both fighters are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FighterCounts {
    pub tyson: u32,
    pub paul: u32,
}

impl FighterCounts {
    pub fn get(&self, fighter: Fighter) -> u32 {
        match fighter {
            Fighter::Tyson => self.tyson,
            Fighter::Paul => self.paul,
        }
    }

    fn increment(&mut self, fighter: Fighter) {
        match fighter {
            Fighter::Tyson => self.tyson += 1,
            Fighter::Paul => self.paul += 1,
        }
    }
}

/// Counts derived from every vote in the tally, grouped three ways.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteStats {
    pub by_fighter: FighterCounts,
    pub by_round: BTreeMap<u32, u32>,
    pub by_method: BTreeMap<WinMethod, u32>,
}

impl VoteStats {
    pub fn total(&self) -> u32 {
        self.by_fighter.tyson + self.by_fighter.paul
    }

    pub fn fighter_percentage(&self, fighter: Fighter) -> u32 {
        percentage(self.by_fighter.get(fighter), self.total())
    }

    /// The `limit` most picked methods, highest count first. Ties keep
    /// declaration order.
    pub fn top_methods(&self, limit: usize) -> Vec<(WinMethod, u32)> {
        let mut methods: Vec<(WinMethod, u32)> =
            self.by_method.iter().map(|(method, count)| (*method, *count)).collect();
        methods.sort_by(|a, b| b.1.cmp(&a.1));
        methods.truncate(limit);
        methods
    }

    /// Every picked round in ascending order.
    pub fn rounds(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.by_round.iter().map(|(round, count)| (*round, *count))
    }
}

/// Recompute the stats from scratch. Rounds and methods only count when
/// present; round 0 is never a legal pick and is skipped too.
pub fn calculate_stats(votes: &[VoteRecord]) -> VoteStats {
    let mut stats = VoteStats::default();

    for vote in votes {
        stats.by_fighter.increment(vote.fighter);

        if let Some(round) = vote.round.filter(|round| *round != 0) {
            *stats.by_round.entry(round).or_insert(0) += 1;
        }
        if let Some(how) = vote.how {
            *stats.by_method.entry(how).or_insert(0) += 1;
        }
    }

    stats
}

/// `count / total * 100`, rounded half up. Zero when there are no votes.
pub fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (u64::from(count), u64::from(total));
    ((count * 200 + total) / (total * 2)) as u32
}
