use crate::models::Fighter;
use rand::seq::IndexedRandom;
use rand::Rng;

pub const GLOVE: &str = "🥊";

const TYSON_QUOTES: [&str; 8] = [
    "Iron Mike never needed permission to bite into his competition!",
    "You really think Jake can handle the baddest man on the planet?",
    "Mike's fists speak louder than Jake's tweets. Good choice!",
    "This vote might just be the knockout Tyson was waiting for!",
    "Mike Tyson: delivering punches and wisdom, one match at a time.",
    "Did someone say power punch? Mike's already in the ring waiting.",
    "You're backing the legend. Let's hope Jake packed a mouthguard!",
    "Mike Tyson doesn't throw shade, just uppercuts.",
];

const PAUL_QUOTES: [&str; 8] = [
    "Jake Paul's biggest fight yet, and his vlog camera's ready for the highlights!",
    "From YouTube to knockouts, Jake's ready to take the W!",
    "You really think Mike can keep up with Jake's TikTok footwork?",
    "Jake says, 'It's not a phase, mom. I'm a real boxer now.'",
    "A vote for Jake is a vote for memes. Let's get this content trending!",
    "Jake's about to go from influencer to fist-fluencer.",
    "This vote might just be Jake's next big headline!",
    "From Disney to dynamite punches, Jake's in it to win it!",
];

pub fn quotes(fighter: Fighter) -> &'static [&'static str] {
    match fighter {
        Fighter::Tyson => &TYSON_QUOTES,
        Fighter::Paul => &PAUL_QUOTES,
    }
}

pub fn pick_quote<R: Rng + ?Sized>(fighter: Fighter, rng: &mut R) -> &'static str {
    quotes(fighter).choose(rng).copied().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

/// A transient message shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub icon: Option<&'static str>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            icon: Some(GLOVE),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            icon: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: &'static str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn render(&self) -> String {
        let marker = match self.level {
            Level::Success => "✔",
            Level::Error => "✖",
            Level::Info => "»",
        };
        match self.icon {
            Some(icon) => format!("{} {} {}", marker, icon, self.message),
            None => format!("{} {}", marker, self.message),
        }
    }
}
