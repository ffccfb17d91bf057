use crate::models::{WinMethod, MAX_ROUND, MIN_ROUND};
use crate::voting::{Step, Wizard};

/// The input prompt for steps 2 and 3. Step 1 is the fighter cards.
pub fn render_step(wizard: &Wizard) -> Option<String> {
    let draft = wizard.draft();

    match wizard.step() {
        Step::SelectFighter => None,
        Step::SelectRound => {
            let fighter = draft.fighter.map(|f| f.short_name()).unwrap_or("your fighter");
            let rounds: Vec<String> = (MIN_ROUND..=MAX_ROUND)
                .map(|round| format!("Round {}", round))
                .collect();
            Some(format!(
                "Step 2/3: Which round will {} win?\n  {}\n  type `round <{}-{}>`\n",
                fighter,
                rounds.join(" | "),
                MIN_ROUND,
                MAX_ROUND
            ))
        }
        Step::SelectMethod => {
            let mut prompt = String::from("Step 3/3: How will they win?\n");
            for method in WinMethod::ALL {
                let marker = if draft.how == Some(method) { "*" } else { " " };
                prompt.push_str(&format!(" {} {:<5} {}\n", marker, method.code(), method.label()));
            }
            prompt.push_str("  type `method <code>`\n");
            Some(prompt)
        }
    }
}
