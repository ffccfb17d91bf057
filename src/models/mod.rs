use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_ROUND: u32 = 1;
pub const MAX_ROUND: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fighter {
    Tyson,
    Paul,
}

impl Fighter {
    pub const ALL: [Fighter; 2] = [Fighter::Tyson, Fighter::Paul];

    pub fn key(self) -> &'static str {
        match self {
            Fighter::Tyson => "tyson",
            Fighter::Paul => "paul",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Fighter::Tyson => "Mike Tyson",
            Fighter::Paul => "Jake Paul",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Fighter::Tyson => "Tyson",
            Fighter::Paul => "Paul",
        }
    }
}

impl fmt::Display for Fighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Fighter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tyson" | "mike" => Ok(Fighter::Tyson),
            "paul" | "jake" => Ok(Fighter::Paul),
            other => Err(format!("Unknown fighter: {}", other)),
        }
    }
}

/// How the predicted winner takes the fight.
///
/// Declaration order is the order the methods are offered in, and the
/// tie-break order for the "top methods" panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WinMethod {
    #[serde(rename = "KO")]
    Ko,
    #[serde(rename = "TKO")]
    Tko,
    #[serde(rename = "UD")]
    Ud,
    #[serde(rename = "SD")]
    Sd,
    #[serde(rename = "MD")]
    Md,
    Draw,
    #[serde(rename = "DQ")]
    Dq,
    #[serde(rename = "NC")]
    Nc,
}

impl WinMethod {
    pub const ALL: [WinMethod; 8] = [
        WinMethod::Ko,
        WinMethod::Tko,
        WinMethod::Ud,
        WinMethod::Sd,
        WinMethod::Md,
        WinMethod::Draw,
        WinMethod::Dq,
        WinMethod::Nc,
    ];

    pub fn code(self) -> &'static str {
        match self {
            WinMethod::Ko => "KO",
            WinMethod::Tko => "TKO",
            WinMethod::Ud => "UD",
            WinMethod::Sd => "SD",
            WinMethod::Md => "MD",
            WinMethod::Draw => "Draw",
            WinMethod::Dq => "DQ",
            WinMethod::Nc => "NC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WinMethod::Ko => "Knockout (KO)",
            WinMethod::Tko => "Technical Knockout (TKO)",
            WinMethod::Ud => "Unanimous Decision (UD)",
            WinMethod::Sd => "Split Decision (SD)",
            WinMethod::Md => "Majority Decision (MD)",
            WinMethod::Draw => "Draw",
            WinMethod::Dq => "Disqualification (DQ)",
            WinMethod::Nc => "No Contest (NC)",
        }
    }
}

impl fmt::Display for WinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WinMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        WinMethod::ALL
            .into_iter()
            .find(|method| method.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown win method: {}", wanted))
    }
}

/// One submitted prediction, as stored in the tally and in local memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub fighter: Fighter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how: Option<WinMethod>,
}

#[cfg(test)]
impl VoteRecord {
    pub fn new(fighter: Fighter) -> Self {
        Self {
            fighter,
            round: None,
            how: None,
        }
    }
}

/// The in-progress selection while the wizard is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteDraft {
    pub fighter: Option<Fighter>,
    pub round: Option<u32>,
    pub how: Option<WinMethod>,
}

impl VoteDraft {
    /// Assemble the record to submit, or `None` while no fighter is picked.
    pub fn to_record(&self) -> Option<VoteRecord> {
        self.fighter.map(|fighter| VoteRecord {
            fighter,
            round: self.round,
            how: self.how,
        })
    }
}

impl From<VoteRecord> for VoteDraft {
    fn from(record: VoteRecord) -> Self {
        Self {
            fighter: Some(record.fighter),
            round: record.round,
            how: record.how,
        }
    }
}
