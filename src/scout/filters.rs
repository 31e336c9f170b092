//! Scout filters: rule-based candidate detection over live match state.
//!
//! Two independent filters inspect a match's elapsed time, score, and
//! normalized statistics and emit at most one `Candidate` per match per
//! cycle:
//!
//! * **First Half Sniper** (`IY_05`): scoreless matches between the 15th
//!   and 40th minute with sustained attacking pressure.
//! * **Late Game Momentum** (`MS_GOL`): close matches between the 60th and
//!   85th minute where momentum, shot volume, or goal timing favors another
//!   goal.
//!
//! Both are pure functions; the shared dangerous-attacks-per-minute rate is
//! the momentum proxy.

use crate::feed::models::LiveEvent;
use crate::feed::stats::NormalizedStats;

pub const FIRST_HALF_SNIPER: &str = "First Half Sniper";
pub const FIRST_HALF_SNIPER_CODE: &str = "IY_05";
pub const LATE_GAME_MOMENTUM: &str = "Late Game Momentum";
pub const LATE_GAME_MOMENTUM_CODE: &str = "MS_GOL";

/// Aggregated stats carried on a candidate, as shown to the analyst and the
/// operator.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_shots: u32,
    pub shots_on_target: u32,
    /// Dangerous attacks per elapsed minute, rounded to 2 decimals.
    pub da_per_min: f64,
    pub corners: u32,
    /// Combined expected goals, rounded to 2 decimals.
    pub xg: f64,
}

/// A match flagged as alert-worthy, pending advisory confirmation.
/// Transient: lives only within one scan cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub strategy: &'static str,
    pub strategy_code: &'static str,
    pub event_id: String,
    pub home: String,
    pub away: String,
    pub minute: i32,
    pub score: String,
    pub league: String,
    pub summary: StatsSummary,
    /// Which trigger branch fired (late-game filter only).
    pub trigger_reason: Option<String>,
}

/// Cheap eligibility check over elapsed time and score alone. Run before
/// the detailed-stats fetch so ineligible matches cost no extra API call.
pub fn prefilter(event: &LiveEvent) -> bool {
    in_first_half_window(event) || in_late_game_window(event)
}

fn in_first_half_window(event: &LiveEvent) -> bool {
    (15..=40).contains(&event.elapsed) && event.home_score == 0 && event.away_score == 0
}

fn in_late_game_window(event: &LiveEvent) -> bool {
    (60..=85).contains(&event.elapsed) && event.goal_diff() <= 2
}

/// Dangerous attacks per elapsed minute; 0 when no time has elapsed.
fn da_rate(stats: &NormalizedStats, elapsed: i32) -> f64 {
    if elapsed <= 0 {
        return 0.0;
    }
    stats.dangerous_attacks.total() / elapsed as f64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn summarize(stats: &NormalizedStats, elapsed: i32) -> StatsSummary {
    StatsSummary {
        total_shots: stats.shots.total() as u32,
        shots_on_target: stats.shots_on_target.total() as u32,
        da_per_min: round2(da_rate(stats, elapsed)),
        corners: stats.corners.total() as u32,
        xg: round2(stats.expected_goals.total()),
    }
}

fn candidate(
    strategy: &'static str,
    code: &'static str,
    event: &LiveEvent,
    stats: &NormalizedStats,
    trigger_reason: Option<String>,
) -> Candidate {
    Candidate {
        strategy,
        strategy_code: code,
        event_id: event.event_id.clone(),
        home: event.home_team.clone(),
        away: event.away_team.clone(),
        minute: event.elapsed,
        score: event.score_line(),
        league: event.league.clone(),
        summary: summarize(stats, event.elapsed),
        trigger_reason,
    }
}

/// Filter A: First Half Sniper.
///
/// Eligibility: 15'–40' and exactly 0-0.
/// Trigger: total shots on target >= 2 AND dangerous attacks per minute
/// strictly above 1.0.
pub fn first_half_sniper(event: &LiveEvent, stats: &NormalizedStats) -> Option<Candidate> {
    if !in_first_half_window(event) {
        return None;
    }

    let total_sot = stats.shots_on_target.total();
    let rate = da_rate(stats, event.elapsed);

    if total_sot >= 2.0 && rate > 1.0 {
        return Some(candidate(
            FIRST_HALF_SNIPER,
            FIRST_HALF_SNIPER_CODE,
            event,
            stats,
            None,
        ));
    }
    None
}

/// Filter B: Late Game Momentum.
///
/// Eligibility: 60'–85' with a goal differential of at most 2.
/// Trigger branches are evaluated in order and the first match wins, each
/// with its own reason string:
///   1. dangerous attacks per minute strictly above 0.9
///   2. total shots strictly above 13
///   3. elapsed within the 65'–78' peak goal window
pub fn late_game_momentum(event: &LiveEvent, stats: &NormalizedStats) -> Option<Candidate> {
    if !in_late_game_window(event) {
        return None;
    }

    let total_shots = stats.shots.total();
    let rate = da_rate(stats, event.elapsed);

    let reason = if rate > 0.9 {
        format!("High DA rate: {:.2}/min", rate)
    } else if total_shots > 13.0 {
        format!("High shot volume: {}", total_shots as u32)
    } else if (65..=78).contains(&event.elapsed) {
        format!("Peak goal window: {}'", event.elapsed)
    } else {
        return None;
    };

    Some(candidate(
        LATE_GAME_MOMENTUM,
        LATE_GAME_MOMENTUM_CODE,
        event,
        stats,
        Some(reason),
    ))
}

/// Run both filters against one match. The first-half filter is attempted
/// first; the late-game filter only runs if it produced nothing. The time
/// windows are disjoint, but the ordering is enforced here regardless so a
/// match can never yield two candidates in one cycle.
pub fn evaluate(event: &LiveEvent, stats: &NormalizedStats) -> Option<Candidate> {
    first_half_sniper(event, stats).or_else(|| late_game_momentum(event, stats))
}
