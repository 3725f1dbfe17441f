//! The protocol client capability consumed by a session.
//!
//! Wire handling, reconnection and flood control all live behind
//! [`ProtocolClient`]. A client reports what happens through the
//! [`EventSender`] it was built with and accepts outbound commands, none of
//! which wait for an acknowledgement.

use crate::config::{ChatSettings, ServerConfig};
use crate::event::{ConnectionEvent, ProtocolEvent};
use tokio::sync::mpsc::{error::SendError, UnboundedSender};

/// Characters that start a channel name
pub const CHANNEL_PREFIXES: &str = "&#";

/// Longest line a client should send before splitting
pub const MESSAGE_SPLIT: usize = 512;

/// Options handed to a protocol client when it is created
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub server: String,
    pub nick: String,
    pub user_name: String,
    pub real_name: String,
    pub port: u16,
    pub password: Option<String>,
    pub secure: bool,
    pub self_signed: bool,
    pub cert_expired: bool,
    pub sasl: bool,
    pub flood_protection: bool,
    pub flood_protection_delay: u64,
    pub strip_colors: bool,
    pub channel_prefixes: String,
    pub message_split: usize,
    pub encoding: String,
    pub auto_rejoin: bool,
    pub auto_connect: bool,
    pub channels: Vec<String>,
}

impl ClientOptions {
    pub fn new(config: &ServerConfig, settings: &ChatSettings) -> Self {
        Self {
            server: config.server.clone(),
            nick: config.nick.clone(),
            user_name: config.username.clone(),
            real_name: config.real_name.clone(),
            port: config.port_or_default(),
            password: config.password().map(str::to_string),
            secure: config.ssl,
            self_signed: config.self_signed,
            cert_expired: false,
            sasl: config.sasl,
            flood_protection: settings.flood_protection,
            flood_protection_delay: settings.flood_protection_delay,
            strip_colors: settings.strip_colors,
            channel_prefixes: CHANNEL_PREFIXES.to_string(),
            message_split: MESSAGE_SPLIT,
            encoding: "UTF-8".to_string(),
            auto_rejoin: false,
            auto_connect: false,
            channels: Vec::new(),
        }
    }
}

/// Delivers a client's events to the session, tagged with the name of the
/// connection the client belongs to
#[derive(Clone, Debug)]
pub struct EventSender {
    connection: String,
    sender: UnboundedSender<ConnectionEvent>,
}

impl EventSender {
    pub fn new(connection: impl Into<String>, sender: UnboundedSender<ConnectionEvent>) -> Self {
        Self {
            connection: connection.into(),
            sender,
        }
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    pub fn send(&self, event: ProtocolEvent) -> Result<(), SendError<ConnectionEvent>> {
        self.sender.send(ConnectionEvent::new(self.connection.clone(), event))
    }
}

/// One connection to a chat server
pub trait ProtocolClient {
    /// The nickname the client is currently using
    fn nick(&self) -> &str;

    /// Start connecting. Success or failure is reported later through events.
    fn connect(&mut self);

    fn say(&mut self, target: &str, text: &str);

    fn join(&mut self, channel: &str);

    fn action(&mut self, target: &str, text: &str);
}

/// Creates protocol clients for a session
pub trait ClientFactory {
    fn create(&mut self, options: ClientOptions, events: EventSender) -> Box<dyn ProtocolClient>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn options_from_config() {
        let config = ServerConfig {
            server: "irc.libera.chat".to_string(),
            port: None,
            nick: "benzene".to_string(),
            username: "C6H6".to_string(),
            real_name: "Chat Master Test".to_string(),
            password: String::new(),
            ssl: true,
            self_signed: false,
            sasl: true,
        };
        let settings = ChatSettings { flood_protection_delay: 250, ..Default::default() };

        let options = ClientOptions::new(&config, &settings);

        assert_eq!(options.port, 6667);
        assert_eq!(options.password, None);
        assert!(options.secure);
        assert!(options.sasl);
        assert!(options.flood_protection);
        assert_eq!(options.flood_protection_delay, 250);
        assert_eq!(options.channel_prefixes, "&#");
        assert_eq!(options.message_split, 512);
        assert!(!options.auto_connect);
        assert!(options.channels.is_empty());
    }

    #[test]
    fn sender_tags_events() {
        let (send, mut recv) = tokio::sync::mpsc::unbounded_channel();
        let events = EventSender::new("libera", send);

        events.send(ProtocolEvent::Registered).unwrap();

        assert_eq!(recv.try_recv().unwrap(), ConnectionEvent::new("libera", ProtocolEvent::Registered));
    }
}
