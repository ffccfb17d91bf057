use crate::error::CommandError;
use crate::models::{Fighter, WinMethod};

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Vote(Fighter),
    Round(u32),
    Method(WinMethod),
    VoteAgain,
    ToggleStats,
    Smack(Fighter),
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  vote <tyson|paul>     pick who takes the W
  round <1-8>           pick the round
  method <KO|TKO|UD|SD|MD|Draw|DQ|NC>
                        pick how they win (submits your vote)
  again                 vote again
  stats                 show or hide the fight stats
  smack <tyson|paul>    talk smack
  refresh               reload the tally
  help                  show this list
  quit                  leave";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let argument = words.next();

        let command = match name.as_str() {
            "vote" => Command::Vote(parse_fighter(argument, "vote")?),
            "smack" => Command::Smack(parse_fighter(argument, "smack")?),
            "round" => {
                let round = argument.ok_or(CommandError::MissingArgument("round"))?;
                let round = round.parse().map_err(|_| {
                    CommandError::InvalidArgument(format!("`{}` is not a round number", round))
                })?;
                Command::Round(round)
            }
            "method" => {
                let method = argument.ok_or(CommandError::MissingArgument("method"))?;
                Command::Method(method.parse().map_err(CommandError::InvalidArgument)?)
            }
            "again" | "reset" => Command::VoteAgain,
            "stats" => Command::ToggleStats,
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };

        Ok(command)
    }
}

fn parse_fighter(argument: Option<&str>, command: &'static str) -> Result<Fighter, CommandError> {
    argument
        .ok_or(CommandError::MissingArgument(command))?
        .parse()
        .map_err(CommandError::InvalidArgument)
}
