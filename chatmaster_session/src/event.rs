//! Events reported by protocol clients

use crate::names::ChannelName;
use crate::roster::RosterSnapshot;
use serde::{Deserialize, Serialize};

/// A structured server error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub command: String,
    /// Error arguments; the first is the error code or our own nick
    pub args: Vec<String>,
}

impl ErrorPayload {
    /// The human-readable part of the error, without the leading code token
    pub fn text(&self) -> String {
        self.args.iter().skip(1).map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// Something that happened on one server connection.
///
/// The variants correspond one-to-one with the notifications a protocol
/// client can raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    /// Registration with the server completed
    Registered,
    /// `nick` joined `channel`
    Join { channel: ChannelName, nick: String },
    /// The full member list of a channel, nick to mode prefixes
    Names { channel: ChannelName, users: RosterSnapshot },
    /// A fresh member list for a channel whose roster is already known; the
    /// difference against the current roster is applied
    UsersChanged { channel: ChannelName, users: RosterSnapshot },
    /// A single member appeared in a channel's live roster
    UserAdded {
        channel: ChannelName,
        nick: String,
        #[serde(default)]
        modes: String,
    },
    /// A single member disappeared from a channel's live roster
    UserRemoved { channel: ChannelName, nick: String },
    Part {
        channel: ChannelName,
        nick: String,
        #[serde(default)]
        reason: Option<String>,
    },
    Quit {
        nick: String,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        channels: Vec<ChannelName>,
    },
    Topic { channel: ChannelName, topic: String, nick: String },
    /// A message we sent, echoed back by the client
    SelfMessage { to: String, text: String },
    Message { from: String, to: String, text: String },
    Notice {
        #[serde(default)]
        from: Option<String>,
        to: String,
        text: String,
    },
    Action { from: String, to: String, text: String },
    Error(ErrorPayload),
}

/// A [`ProtocolEvent`] tagged with the name of the connection it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    pub connection: String,
    #[serde(flatten)]
    pub event: ProtocolEvent,
}

impl ConnectionEvent {
    pub fn new(connection: impl Into<String>, event: ProtocolEvent) -> Self {
        Self {
            connection: connection.into(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn error_text_drops_code() {
        let payload = ErrorPayload {
            command: "err_unknowncommand".to_string(),
            args: vec!["421".to_string(), "foo".to_string(), "Unknown command".to_string()],
        };
        assert_eq!(payload.text(), "foo Unknown command");
    }

    #[test]
    fn empty_error_has_empty_text() {
        let payload = ErrorPayload { command: String::new(), args: vec![] };
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn events_read_from_tagged_json() {
        let event: ConnectionEvent = serde_json::from_str(
            r##"{ "connection": "libera", "type": "part", "channel": "#rust", "nick": "eve" }"##,
        )
        .unwrap();

        assert_eq!(
            event,
            ConnectionEvent::new(
                "libera",
                ProtocolEvent::Part { channel: "#rust".into(), nick: "eve".to_string(), reason: None }
            )
        );
    }
}
