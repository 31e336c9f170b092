//! Operator console output.
//!
//! Progress and diagnostics go through `tracing`; the startup banner and the
//! alert block are printed raw to stdout so they stay readable without log
//! prefixes.

use crate::advisory::AdvisoryVerdict;
use crate::scout::{Candidate, FIRST_HALF_SNIPER_CODE};

const GREEN: &str = "\x1b[92m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Sink for confirmed alerts. The production sink prints a boxed block to
/// the console; tests substitute a capturing stub.
pub trait AlertSink: Send + Sync {
    fn emit(&self, candidate: &Candidate, verdict: &AdvisoryVerdict);
}

pub struct ConsoleSink;

impl AlertSink for ConsoleSink {
    fn emit(&self, c: &Candidate, v: &AdvisoryVerdict) {
        let label = if c.strategy_code == FIRST_HALF_SNIPER_CODE {
            "IY GOL"
        } else {
            "MS GOL"
        };

        let rule = "=".repeat(60);
        println!();
        println!("{}{}{}{}", GREEN, BOLD, rule, RESET);
        println!(
            "{}{}[SIGNAL]{} [{}] {} vs {}",
            GREEN, BOLD, RESET, label, c.home, c.away
        );
        println!(
            "   Time: {}' | Score: {} | League: {}",
            c.minute, c.score, c.league
        );
        println!(
            "   Shots: {} | SoT: {} | Corners: {} | xG: {}",
            c.summary.total_shots, c.summary.shots_on_target, c.summary.corners, c.summary.xg
        );
        println!("   DA/min: {}", c.summary.da_per_min);
        if let Some(reason) = &c.trigger_reason {
            println!("   Trigger: {}", reason);
        }
        println!("   Confidence: {}{}%{}", GREEN, v.confidence, RESET);
        println!("   Reason: {}", v.reason);
        println!("{}{}{}{}", GREEN, BOLD, rule, RESET);
        println!();
    }
}

pub fn print_banner(poll_interval_secs: u64, cooldown_minutes: i64) {
    println!();
    println!("{}{}+======================================================+{}", GREEN, BOLD, RESET);
    println!("{}{}|        GoalScout - Live Goal Alert Scanner           |{}", GREEN, BOLD, RESET);
    println!("{}{}|        Flashscore4 feed + Gemini validation          |{}", GREEN, BOLD, RESET);
    println!("{}{}+======================================================+{}", GREEN, BOLD, RESET);
    println!();
    println!("  Poll interval: {}s | Cooldown: {}min", poll_interval_secs, cooldown_minutes);
    println!("  Strategies: First Half Sniper (15'-40') + Late Game Momentum (60'-85')");
    println!();
}
