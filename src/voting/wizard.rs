use crate::error::WizardError;
use crate::models::{Fighter, VoteDraft, VoteRecord, WinMethod, MAX_ROUND, MIN_ROUND};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectFighter,
    SelectRound,
    SelectMethod,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::SelectFighter => 1,
            Step::SelectRound => 2,
            Step::SelectMethod => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    PickFighter(Fighter),
    PickRound(u32),
    PickMethod(WinMethod),
    SubmitSucceeded(VoteRecord),
    SubmitFailed,
    /// Rehydrate a vote remembered from an earlier session.
    Restore(VoteRecord),
    /// "Vote again": forget the local vote and start over.
    Reset,
}

/// fighter -> round -> method, then submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    draft: VoteDraft,
    voted: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: Step::SelectFighter,
            draft: VoteDraft::default(),
            voted: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &VoteDraft {
        &self.draft
    }

    pub fn has_voted(&self) -> bool {
        self.voted
    }

    /// Apply `action`. Returns the record to submit when the last choice
    /// completes the draft. A rejected action leaves the wizard unchanged.
    pub fn update(&mut self, action: WizardAction) -> Result<Option<VoteRecord>, WizardError> {
        debug!("Wizard at step {} handling {:?}", self.step.number(), action);

        match action {
            WizardAction::PickFighter(fighter) => {
                if self.voted {
                    return Err(WizardError::AlreadyVoted);
                }
                self.expect_step(Step::SelectFighter)?;
                self.draft.fighter = Some(fighter);
                self.step = Step::SelectRound;
                Ok(None)
            }
            WizardAction::PickRound(round) => {
                self.expect_step(Step::SelectRound)?;
                if !(MIN_ROUND..=MAX_ROUND).contains(&round) {
                    return Err(WizardError::InvalidRound {
                        got: round,
                        min: MIN_ROUND,
                        max: MAX_ROUND,
                    });
                }
                self.draft.round = Some(round);
                self.step = Step::SelectMethod;
                Ok(None)
            }
            WizardAction::PickMethod(how) => {
                self.expect_step(Step::SelectMethod)?;
                self.draft.how = Some(how);
                Ok(self.draft.to_record())
            }
            WizardAction::SubmitSucceeded(record) => {
                self.draft = record.into();
                self.voted = true;
                self.step = Step::SelectFighter;
                Ok(None)
            }
            // Stay on the method step with the draft intact for a retry.
            WizardAction::SubmitFailed => Ok(None),
            WizardAction::Restore(record) => {
                self.draft = record.into();
                self.voted = true;
                self.step = Step::SelectFighter;
                Ok(None)
            }
            WizardAction::Reset => {
                *self = Self::new();
                Ok(None)
            }
        }
    }

    fn expect_step(&self, wanted: Step) -> Result<(), WizardError> {
        if self.step == wanted {
            Ok(())
        } else {
            Err(WizardError::WrongStep(self.step.number()))
        }
    }
}
