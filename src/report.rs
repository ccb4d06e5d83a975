//! Console presentation of the running statistics
//!
//! Prints the running average of every bucket each time the collision count
//! reaches a multiple of the report interval.

use crate::sim::{CollisionEvent, Presenter, StatisticsTracker, StatsSnapshot};

/// Periodic console report
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    every: u64,
}

impl ConsoleReporter {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1) }
    }
}

/// Render the report block for a snapshot (`None` before the first collision)
pub fn format_report(snapshot: &StatsSnapshot) -> Option<String> {
    let averages = snapshot.running_average()?;
    let mut out = format!("Collision # {}", snapshot.collision_count);
    for (coins, avg) in averages.iter().enumerate() {
        out.push_str(&format!("\n{coins} coins: {avg:.2}"));
    }
    Some(out)
}

impl Presenter for ConsoleReporter {
    fn on_collision(&mut self, _event: &CollisionEvent, stats: &StatisticsTracker) {
        if stats.collision_count() % self.every != 0 {
            return;
        }
        if let Some(report) = format_report(&stats.snapshot()) {
            log::info!("Reached {} collisions", stats.collision_count());
            println!("\n{report}");
        }
    }
}
