//! Outbound commands typed by the user

use strum::{Display, EnumString};

/// A command the user can issue against the focused view
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
    /// Send text to the focused channel
    Say,
    /// Join the named channel on the focused connection
    Join,
    /// Send an action (`/me`) to the focused channel
    Action,
}

/// A line of user input, split into what it asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// `/name args`
    Command { name: &'a str, args: &'a str },
    /// Anything else is text to say
    Text(&'a str),
}

/// Split a line of input. A leading `/` introduces a command whose name runs
/// to the first space; empty input is nothing at all.
pub fn parse_input(line: &str) -> Option<InputLine<'_>> {
    if line.is_empty() {
        return None;
    }

    match line.strip_prefix('/') {
        Some(rest) => {
            let (name, args) = rest.split_once(' ').unwrap_or((rest, ""));
            Some(InputLine::Command { name, args })
        }
        None => Some(InputLine::Text(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn command_names() {
        assert_eq!(Command::from_str("say").unwrap(), Command::Say);
        assert_eq!(Command::from_str("join").unwrap(), Command::Join);
        assert_eq!(Command::from_str("action").unwrap(), Command::Action);
        assert!(Command::from_str("part").is_err());
        assert_eq!(Command::Action.to_string(), "action");
    }

    #[test]
    fn slash_lines_are_commands() {
        assert_eq!(
            parse_input("/join #rust"),
            Some(InputLine::Command { name: "join", args: "#rust" })
        );
        assert_eq!(
            parse_input("/action waves at everyone"),
            Some(InputLine::Command { name: "action", args: "waves at everyone" })
        );
        assert_eq!(parse_input("/names"), Some(InputLine::Command { name: "names", args: "" }));
    }

    #[test]
    fn other_lines_are_text() {
        assert_eq!(parse_input("hello /there"), Some(InputLine::Text("hello /there")));
        assert_eq!(parse_input(""), None);
    }
}
