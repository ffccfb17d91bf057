use super::App;
use crate::error::AppError;
use crate::memory::VOTE_KEY;
use crate::models::{Fighter, VoteRecord, WinMethod};
use crate::toast::{self, Notification};
use crate::voting::WizardAction;
use log::{debug, error, info, warn};

const SUBMIT_FAILED: &str = "Failed to cast vote. Please try again.";

impl App {
    pub(super) fn pick_fighter(&mut self, fighter: Fighter) -> Result<(), AppError> {
        self.wizard.update(WizardAction::PickFighter(fighter))?;
        Ok(())
    }

    pub(super) fn pick_round(&mut self, round: u32) -> Result<(), AppError> {
        self.wizard.update(WizardAction::PickRound(round))?;
        Ok(())
    }

    /// The last wizard choice: write the vote, remember it, and refresh.
    pub(super) async fn select_method(&mut self, how: WinMethod) -> Result<(), AppError> {
        let Some(record) = self.wizard.update(WizardAction::PickMethod(how))? else {
            return Ok(());
        };

        if let Err(e) = self.store.insert_vote(&record).await {
            error!("Error casting vote: {}", e);
            self.notify(Notification::error(SUBMIT_FAILED));
            self.wizard.update(WizardAction::SubmitFailed)?;
            return Err(AppError::Submit(e));
        }

        info!("Vote cast for {} ({:?}, {:?})", record.fighter, record.round, record.how);
        self.remember_vote(&record);
        self.wizard.update(WizardAction::SubmitSucceeded(record.clone()))?;
        self.show_stats = true;

        let quote = toast::pick_quote(record.fighter, &mut rand::rng());
        self.notify(Notification::success(quote));

        // The vote is in even if the tally can't be reloaded right now.
        if let Err(e) = self.refresh().await {
            debug!("Refresh after voting failed: {}", e);
        }
        Ok(())
    }

    /// Forget the local vote. The record already in the tally stays.
    pub(super) fn reset_vote(&mut self) {
        if let Err(e) = self.memory.remove(VOTE_KEY) {
            warn!("Could not clear local vote memory: {}", e);
        }
        if let Err(e) = self.wizard.update(WizardAction::Reset) {
            warn!("Could not reset the wizard: {}", e);
        }
        info!("Local vote cleared, ready to vote again");
    }

    fn remember_vote(&mut self, record: &VoteRecord) {
        let remembered = match serde_json::to_string(record) {
            Ok(remembered) => remembered,
            Err(e) => {
                warn!("Could not serialize vote for local memory: {}", e);
                return;
            }
        };
        if let Err(e) = self.memory.set(VOTE_KEY, remembered) {
            warn!("Could not remember vote locally: {}", e);
        }
    }
}
