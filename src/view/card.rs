use super::bar;
use crate::models::Fighter;
use crate::voting::VoteStats;

const BAR_WIDTH: usize = 20;

pub fn render_card(fighter: Fighter, stats: &VoteStats, has_voted: bool) -> String {
    let percent = stats.fighter_percentage(fighter);
    let action = if has_voted {
        "type `again` to vote again".to_string()
    } else {
        format!("type `vote {}` to vote", fighter.key())
    };

    format!(
        "{}\n  {}% votes {}\n  {} | `smack {}` to talk smack\n",
        fighter.full_name(),
        percent,
        bar(percent, BAR_WIDTH),
        action,
        fighter.key(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VoteRecord;
    use crate::voting::calculate_stats;

    #[test]
    fn test_card_switches_action_after_voting() {
        let stats = calculate_stats(&[
            VoteRecord::new(Fighter::Paul),
            VoteRecord::new(Fighter::Tyson),
        ]);

        let fresh = render_card(Fighter::Paul, &stats, false);
        assert!(fresh.contains("50% votes"));
        assert!(fresh.contains("`vote paul`"));

        let voted = render_card(Fighter::Paul, &stats, true);
        assert!(voted.contains("`again`"));
    }

    #[test]
    fn test_card_without_votes_is_zero() {
        let card = render_card(Fighter::Tyson, &VoteStats::default(), false);
        assert!(card.contains("0% votes"));
    }
}
