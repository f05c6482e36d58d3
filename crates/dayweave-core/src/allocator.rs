//! Gap allocation: assigning suggestions to the day's free time windows.
//!
//! The allocator is a greedy, deterministic best-fit, not a global
//! optimizer: the same inputs always produce the same placement, which is
//! what keeps suggestions stable across reloads. Mandatory candidates
//! (need >= 1.0) are placed before any optional one, each candidate takes
//! the smallest compatible gap it fits, and candidates that fit nowhere
//! may shrink down to their base duration before giving up. A gap hosts at
//! most one suggestion and is consumed whole; leftover capacity is
//! reported, never re-used within the pass.
//!
//! A mandatory candidate with no feasible gap is not an error: it lands on
//! the unplaced list so the UI can flag an overcommitted day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::memo::LocationPreference;
use crate::suggestion::Suggestion;

/// Best-effort location label of a gap, derived from adjacent events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapLocation {
    Home,
    Workplace,
    Other,
    Unknown,
}

impl GapLocation {
    /// Location compatibility: equal labels match, and either side having
    /// no information matches everything.
    pub fn accepts(&self, preference: LocationPreference) -> bool {
        match (preference, self) {
            (LocationPreference::None, _) => true,
            (_, GapLocation::Unknown) => true,
            (LocationPreference::Home, GapLocation::Home) => true,
            (LocationPreference::Workplace, GapLocation::Workplace) => true,
            _ => false,
        }
    }
}

impl Default for GapLocation {
    fn default() -> Self {
        GapLocation::Unknown
    }
}

/// A free time window in the day's calendar.
///
/// Supplied by the external calendar collaborator as an ordered,
/// non-overlapping set; ephemeral, recomputed per pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub id: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub location: GapLocation,
}

impl Gap {
    pub fn new(id: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            location: GapLocation::Unknown,
        }
    }

    pub fn with_location(mut self, location: GapLocation) -> Self {
        self.location = location;
        self
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Check if this gap can host a session of `minutes`.
    pub fn can_fit(&self, minutes: u32) -> bool {
        self.duration_minutes() >= minutes as i64
    }
}

/// A suggestion placed into a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub memo_id: String,
    pub suggestion_id: String,
    pub gap_id: String,
    /// Minutes actually planned, possibly shrunk toward the base.
    pub planned_minutes: u32,
    /// Whether the session had to shrink below its ideal duration.
    pub shrunk: bool,
    /// Gap capacity left over; reported, never re-used in this pass.
    pub spare_minutes: i64,
}

/// Result of one allocation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub placements: Vec<Placement>,
    /// Memo ids of candidates that fit no gap, in priority order.
    pub unplaced: Vec<String>,
}

impl AllocationResult {
    /// Placements as a memo-id to gap-id map.
    pub fn placement_map(&self) -> std::collections::HashMap<String, String> {
        self.placements
            .iter()
            .map(|p| (p.memo_id.clone(), p.gap_id.clone()))
            .collect()
    }
}

/// Greedy best-fit allocator.
pub struct GapAllocator {
    config: EngineConfig,
}

impl GapAllocator {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Assign candidates to gaps.
    ///
    /// `candidates` should already be visibility-filtered; hidden
    /// suggestions passed in are skipped. The gap pool is consumed
    /// sequentially in priority order.
    pub fn allocate(&self, candidates: &[Suggestion], gaps: &[Gap]) -> AllocationResult {
        let mut ordered: Vec<&Suggestion> =
            candidates.iter().filter(|s| !s.is_hidden).collect();
        ordered.sort_by(|a, b| self.priority_order(a, b));

        let mut pool: Vec<&Gap> = gaps.iter().collect();
        let mut result = AllocationResult::default();

        for candidate in ordered {
            match self.take_best_fit(&mut pool, candidate) {
                Some(placement) => result.placements.push(placement),
                None => result.unplaced.push(candidate.memo_id.clone()),
            }
        }

        result
    }

    /// Priority: mandatory before optional, then need descending,
    /// importance descending, duration ascending (quick wins), and memo id
    /// as the final deterministic tie-break.
    fn priority_order(&self, a: &Suggestion, b: &Suggestion) -> std::cmp::Ordering {
        let mandatory_a = a.is_mandatory(&self.config);
        let mandatory_b = b.is_mandatory(&self.config);
        mandatory_b
            .cmp(&mandatory_a)
            .then_with(|| b.need.total_cmp(&a.need))
            .then_with(|| b.importance.total_cmp(&a.importance))
            .then_with(|| a.duration_minutes.cmp(&b.duration_minutes))
            .then_with(|| a.memo_id.cmp(&b.memo_id))
    }

    /// Remove and return the smallest compatible gap that fits the
    /// candidate, shrinking to the base duration if nothing holds the
    /// ideal one.
    fn take_best_fit(&self, pool: &mut Vec<&Gap>, candidate: &Suggestion) -> Option<Placement> {
        let ideal = candidate.duration_minutes;
        let floor = candidate.base_minutes.min(ideal);

        for (minutes, shrunk) in [(ideal, false), (floor, true)] {
            if shrunk && floor >= ideal {
                break; // nothing left to shrink
            }
            if let Some(index) = self.best_fit_index(pool, minutes, candidate.location) {
                let gap = pool.remove(index);
                return Some(Placement {
                    memo_id: candidate.memo_id.clone(),
                    suggestion_id: candidate.id.clone(),
                    gap_id: gap.id.clone(),
                    planned_minutes: minutes,
                    shrunk,
                    spare_minutes: gap.duration_minutes() - minutes as i64,
                });
            }
        }
        None
    }

    fn best_fit_index(
        &self,
        pool: &[&Gap],
        minutes: u32,
        preference: LocationPreference,
    ) -> Option<usize> {
        pool.iter()
            .enumerate()
            .filter(|(_, gap)| gap.can_fit(minutes) && gap.location.accepts(preference))
            .min_by_key(|(index, gap)| (gap.duration_minutes(), *index))
            .map(|(index, _)| index)
    }
}

impl Default for GapAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to allocate with default settings.
pub fn allocate(candidates: &[Suggestion], gaps: &[Gap]) -> AllocationResult {
    GapAllocator::new().allocate(candidates, gaps)
}
