use super::bar;
use crate::models::Fighter;
use crate::voting::{percentage, VoteStats};

const TOP_METHODS: usize = 3;
const BAR_WIDTH: usize = 10;

pub fn render_panel(stats: &VoteStats) -> String {
    let total = stats.total();
    let mut panel = String::from("-- Fighter Stats --\n");

    for fighter in Fighter::ALL {
        let percent = stats.fighter_percentage(fighter);
        panel.push_str(&format!(
            "  {:<6} {:>3}% {}\n",
            fighter.short_name(),
            percent,
            bar(percent, BAR_WIDTH)
        ));
    }

    panel.push_str("-- Round Picks --\n");
    let rounds: Vec<String> = stats
        .rounds()
        .map(|(round, count)| format!("R{} {}%", round, percentage(count, total)))
        .collect();
    if rounds.is_empty() {
        panel.push_str("  no picks yet\n");
    } else {
        panel.push_str(&format!("  {}\n", rounds.join("  ")));
    }

    panel.push_str("-- Top Methods --\n");
    let methods = stats.top_methods(TOP_METHODS);
    if methods.is_empty() {
        panel.push_str("  no picks yet\n");
    }
    for (method, count) in methods {
        let percent = percentage(count, total);
        panel.push_str(&format!(
            "  {:<6} {:>3}% {}\n",
            method.code(),
            percent,
            bar(percent, BAR_WIDTH)
        ));
    }

    panel
}
