//! nom grammar for player commands
//!
//! Keywords are case-insensitive; surrounding whitespace is ignored.

use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{i32 as signed, space0, space1, u32 as unsigned};
use nom::combinator::{all_consuming, map, value};
use nom::sequence::{delimited, pair, preceded, separated_pair};
use nom::{IResult, Parser};

use crate::command::PlayerCommand;
use crate::core::error::{CombatError, Result};
use crate::core::types::UnitId;

fn wait(input: &str) -> IResult<&str, PlayerCommand> {
    value(PlayerCommand::Wait, tag_no_case("wait")).parse(input)
}

fn move_to(input: &str) -> IResult<&str, PlayerCommand> {
    map(
        preceded(
            pair(tag_no_case("move"), space1),
            separated_pair(signed, space1, signed),
        ),
        |(x, y)| PlayerCommand::Move { x, y },
    )
    .parse(input)
}

fn attack(input: &str) -> IResult<&str, PlayerCommand> {
    map(preceded(pair(tag_no_case("attack"), space1), unsigned), |id| {
        PlayerCommand::Attack { target: UnitId(id) }
    })
    .parse(input)
}

fn command(input: &str) -> IResult<&str, PlayerCommand> {
    alt((wait, move_to, attack)).parse(input)
}

/// Parse one command line
pub fn parse_command(input: &str) -> Result<PlayerCommand> {
    all_consuming(delimited(space0, command, space0))
        .parse(input.trim())
        .map(|(_, cmd)| cmd)
        .map_err(|e| CombatError::CommandParse(format!("'{}': {}", input.trim(), e)))
}

/// Parse a command script: one command per line, `#` starts a comment
pub fn parse_script(text: &str) -> Result<Vec<PlayerCommand>> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(parse_command)
        .collect()
}
