//! Applies protocol events to session state

use crate::client::CHANNEL_PREFIXES;
use crate::errors::{HandleResult, HandlerError};
use crate::event::{ConnectionEvent, ErrorPayload, ProtocolEvent};
use crate::message_stream::MessageFlags;
use crate::names::ChannelName;
use crate::registry::ConnectionRegistry;
use crate::roster::{RosterSnapshot, UserEntry};

/// Resolves the connection and channel each [`ConnectionEvent`] belongs to,
/// updates them, and pushes the resulting lines to their streams.
///
/// The router holds no state of its own; everything lives in the
/// [`ConnectionRegistry`] it is handed.
#[derive(Debug, Default)]
pub struct EventRouter;

impl EventRouter {
    pub fn new() -> Self {
        Self
    }

    /// Apply a single event.
    ///
    /// Events aimed at channels or connections that aren't tracked are
    /// dropped. Nothing here is fatal; failures are logged and the event is
    /// discarded.
    pub fn route(&self, registry: &mut ConnectionRegistry, event: ConnectionEvent) {
        let ConnectionEvent { connection, event } = event;
        tracing::trace!(%connection, ?event, "Routing event");

        let result = match &event {
            ProtocolEvent::Registered => self.handle_registered(registry, &connection),
            ProtocolEvent::Join { channel, nick } => self.handle_join(registry, &connection, channel, nick),
            ProtocolEvent::Names { channel, users } => self.handle_names(registry, &connection, channel, users),
            ProtocolEvent::UsersChanged { channel, users } => {
                self.handle_users_changed(registry, &connection, channel, users)
            }
            ProtocolEvent::UserAdded { channel, nick, modes } => {
                self.handle_user_added(registry, &connection, channel, nick, modes)
            }
            ProtocolEvent::UserRemoved { channel, nick } => {
                self.handle_user_removed(registry, &connection, channel, nick)
            }
            ProtocolEvent::Part { channel, nick, reason } => {
                self.handle_part(registry, &connection, channel, nick, reason.as_deref())
            }
            ProtocolEvent::Quit { nick, reason, channels } => self.handle_quit(&connection, nick, reason, channels),
            ProtocolEvent::Topic { channel, topic, nick } => {
                self.handle_topic(registry, &connection, channel, topic, nick)
            }
            ProtocolEvent::SelfMessage { to, text } => self.handle_self_message(registry, &connection, to, text),
            ProtocolEvent::Message { from, to, text } => self.handle_message(registry, &connection, from, to, text),
            ProtocolEvent::Notice { from, to, text } => {
                self.handle_notice(registry, &connection, from.as_deref(), to, text)
            }
            ProtocolEvent::Action { from, to, text } => self.handle_action(registry, &connection, from, to, text),
            ProtocolEvent::Error(payload) => self.handle_error(registry, &connection, payload),
        };

        if let Err(e) = result {
            if e.is_resolution_failure() {
                tracing::debug!("Dropped event {:?} on {}: {}", event, connection, e);
            } else {
                tracing::error!("Error ({}) handling event {:?} on {}", e, event, connection);
            }
        }
    }

    fn handle_registered(&self, registry: &mut ConnectionRegistry, connection: &str) -> HandleResult {
        registry.push_notice_line(connection, MessageFlags::INFO | MessageFlags::CONNECTED, None, "Connected")?;
        Ok(())
    }

    fn handle_join(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        nick: &str,
    ) -> HandleResult {
        if registry.connection(connection)?.is_local_nick(nick) {
            registry.add_channel(connection, channel.clone())?;
        } else {
            registry.push_channel_line(
                connection,
                channel,
                MessageFlags::INFO | MessageFlags::JOIN,
                None,
                format!("{} joined {}", nick, channel),
            )?;
        }
        Ok(())
    }

    fn handle_names(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        users: &RosterSnapshot,
    ) -> HandleResult {
        let (chan, colors) = registry.channel_and_colors(connection, channel)?;
        chan.replace_roster(users, colors);
        Ok(())
    }

    fn handle_users_changed(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        users: &RosterSnapshot,
    ) -> HandleResult {
        let (chan, colors) = registry.channel_and_colors(connection, channel)?;
        let diff = chan.sync_roster(users, colors);
        tracing::trace!(%connection, %channel, added = diff.added.len(), removed = diff.removed.len(), "Roster synced");
        Ok(())
    }

    fn handle_user_added(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        nick: &str,
        modes: &str,
    ) -> HandleResult {
        let (chan, colors) = registry.channel_and_colors(connection, channel)?;
        chan.add_user(UserEntry::from_prefixes(nick, modes), colors);
        Ok(())
    }

    fn handle_user_removed(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        nick: &str,
    ) -> HandleResult {
        let (chan, _) = registry.channel_and_colors(connection, channel)?;
        chan.remove_user(nick);
        Ok(())
    }

    fn handle_part(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        nick: &str,
        reason: Option<&str>,
    ) -> HandleResult {
        if registry.connection(connection)?.is_local_nick(nick) {
            // The channel context stays around after we leave
            return Ok(());
        }

        let body = match reason.filter(|r| !r.is_empty()) {
            Some(reason) => format!("{} left {} - {}", nick, channel, reason),
            None => format!("{} left {}", nick, channel),
        };
        registry.push_channel_line(connection, channel, MessageFlags::INFO | MessageFlags::PART, None, body)?;
        Ok(())
    }

    fn handle_quit(&self, connection: &str, nick: &str, reason: &str, channels: &[ChannelName]) -> HandleResult {
        tracing::info!(%connection, %nick, %reason, ?channels, "User quit");
        Ok(())
    }

    fn handle_topic(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        channel: &ChannelName,
        topic: &str,
        nick: &str,
    ) -> HandleResult {
        registry.push_channel_line(
            connection,
            channel,
            MessageFlags::TOPIC,
            None,
            format!("[TOPIC] {} set by {}", topic, nick),
        )?;
        Ok(())
    }

    fn handle_self_message(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        to: &str,
        text: &str,
    ) -> HandleResult {
        let channel = self.known_channel(registry, connection, to)?;
        let nick = registry.connection(connection)?.client().nick().to_string();
        registry.push_channel_line(connection, &channel, MessageFlags::SELF, Some(&nick), text)?;
        Ok(())
    }

    fn handle_message(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        from: &str,
        to: &str,
        text: &str,
    ) -> HandleResult {
        let channel = self.known_channel(registry, connection, to)?;
        registry.push_channel_line(connection, &channel, MessageFlags::USER_MSG, Some(from), text)?;
        Ok(())
    }

    fn handle_notice(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        from: Option<&str>,
        to: &str,
        text: &str,
    ) -> HandleResult {
        let from = from.filter(|f| !f.is_empty());

        match (self.known_channel(registry, connection, to), from) {
            (Ok(channel), _) => {
                registry.push_channel_line(
                    connection,
                    &channel,
                    MessageFlags::USER_MSG | MessageFlags::NOTICE,
                    from,
                    text,
                )?;
            }
            (Err(_), None) => {
                registry.push_notice_line(
                    connection,
                    MessageFlags::NOTICE | MessageFlags::SERVER_INFO,
                    None,
                    text,
                )?;
            }
            (Err(e), Some(_)) => return Err(e),
        }
        Ok(())
    }

    fn handle_action(
        &self,
        registry: &mut ConnectionRegistry,
        connection: &str,
        from: &str,
        to: &str,
        text: &str,
    ) -> HandleResult {
        let channel = self.known_channel(registry, connection, to)?;
        registry.push_channel_line(
            connection,
            &channel,
            MessageFlags::USER_MSG | MessageFlags::ACTION,
            Some(from),
            text,
        )?;
        Ok(())
    }

    fn handle_error(&self, registry: &mut ConnectionRegistry, connection: &str, payload: &ErrorPayload) -> HandleResult {
        tracing::warn!(%connection, command = %payload.command, args = ?payload.args, "Server error");
        registry.broadcast_error(connection, payload.text())?;
        Ok(())
    }

    /// Resolve a message target to a channel we're tracking on `connection`
    fn known_channel(&self, registry: &ConnectionRegistry, connection: &str, target: &str) -> Result<ChannelName, HandlerError> {
        if !ChannelName::is_channel_target(target, CHANNEL_PREFIXES) {
            return Err(HandlerError::UnresolvedTarget(target.to_string()));
        }

        let channel = ChannelName::new(target);
        if registry.connection(connection)?.has_channel(&channel) {
            Ok(channel)
        } else {
            Err(HandlerError::UnresolvedTarget(target.to_string()))
        }
    }
}
