mod card;
mod stats;
mod steps;

use crate::models::Fighter;
use crate::voting::{Step, VoteStats, Wizard};

pub const TITLE: &str = "Tyson vs. Paul";
pub const TAGLINE: &str = "Who's Taking The W?";

/// Everything the page shows, in top-to-bottom order.
pub fn render_page(stats: &VoteStats, wizard: &Wizard, show_stats: bool) -> String {
    let mut page = String::new();

    page.push_str(&format!("==== {} ====\n", TITLE));
    page.push_str(&format!("{}\n", TAGLINE));
    page.push_str(&header(stats.total(), show_stats));
    page.push('\n');

    if show_stats {
        page.push('\n');
        page.push_str(&stats::render_panel(stats));
    }

    if let Some(prompt) = steps::render_step(wizard) {
        page.push('\n');
        page.push_str(&prompt);
    }

    if wizard.step() == Step::SelectFighter {
        for fighter in Fighter::ALL {
            page.push('\n');
            page.push_str(&card::render_card(fighter, stats, wizard.has_voted()));
        }
    }

    page
}

fn header(total: u32, show_stats: bool) -> String {
    let toggle = if show_stats { "▲ stats shown" } else { "▼ stats hidden" };
    format!("{} Fight Fans Have Spoken! ({}, type `stats` to toggle)", total, toggle)
}

/// A fixed-width bar filled to `percent`.
pub(crate) fn bar(percent: u32, width: usize) -> String {
    let filled = (percent.min(100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
