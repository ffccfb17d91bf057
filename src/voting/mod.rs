pub mod tally;
pub mod wizard;

pub use tally::{calculate_stats, percentage, VoteStats};
pub use wizard::{Step, Wizard, WizardAction};
