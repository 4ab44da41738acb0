//! Funnel stage summary (`funnel stages`).

use anyhow::Result;
use std::path::Path;

use super::super::{FilterArgs, SortArgs};

pub fn cmd_stages(input: &Path, filters: &FilterArgs) -> Result<()> {
    let session = super::load_session(input, filters, &SortArgs::default())?;
    let counts = session.stage_counts();
    let matched: usize = counts.iter().map(|(_, n)| n).sum();

    println!();
    println!("{:<24} {:>8} {:>8}", "Stage", "Count", "Share");
    println!("{:<24} {:>8} {:>8}", "-".repeat(24), "--------", "--------");
    for (stage, count) in &counts {
        let share = if matched == 0 {
            0.0
        } else {
            *count as f64 / matched as f64 * 100.0
        };
        println!("{:<24} {:>8} {:>7.1}%", stage.label(), count, share);
    }
    println!("{:<24} {:>8}", "Total", matched);
    println!();
    Ok(())
}
