//! Defines the [`ConnectionRegistry`], which owns every connection in a session.

use crate::channel::ChannelContext;
use crate::client::{ClientFactory, ClientOptions, EventSender};
use crate::command::{parse_input, Command, InputLine};
use crate::config::{ChatSettings, ServerConfig};
use crate::connection::SessionConnection;
use crate::errors::{LookupError, LookupResult};
use crate::event::ConnectionEvent;
use crate::message_stream::{MessageFlags, MessageLine, MessageStream};
use crate::names::{ChannelName, ViewId, ViewIdGenerator};
use crate::nick_color::NickColorAssigner;
use crate::view::ViewFactory;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use tokio::sync::mpsc::UnboundedSender;

/// What a switcher row points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTarget {
    pub connection: String,
    pub channel: Option<ChannelName>,
}

/// Owns all of a session's connections, the view bookkeeping that maps
/// switcher rows back to them, and the nick color cache.
///
/// The registry is driven from a single task: protocol events arrive through
/// the [`EventRouter`](crate::router::EventRouter), and user input through
/// [`handle_input`](Self::handle_input) and [`change_view`](Self::change_view).
pub struct ConnectionRegistry {
    connections: HashMap<String, SessionConnection>,
    views: HashMap<ViewId, ViewTarget>,
    current_view: Option<ViewId>,
    view_ids: ViewIdGenerator,
    colors: NickColorAssigner,
    settings: ChatSettings,
    view_factory: Box<dyn ViewFactory>,
    client_factory: Box<dyn ClientFactory>,
    event_sender: UnboundedSender<ConnectionEvent>,
    connected: bool,
}

impl ConnectionRegistry {
    /// Construct a registry. Events from every client it creates are sent to
    /// `event_sender`.
    pub fn new(
        settings: ChatSettings,
        colors: NickColorAssigner,
        view_factory: Box<dyn ViewFactory>,
        client_factory: Box<dyn ClientFactory>,
        event_sender: UnboundedSender<ConnectionEvent>,
    ) -> Self {
        Self {
            connections: HashMap::new(),
            views: HashMap::new(),
            current_view: None,
            view_ids: ViewIdGenerator::new(),
            colors,
            settings,
            view_factory,
            client_factory,
            event_sender,
            connected: false,
        }
    }

    /// Create a connection for each config and start it connecting.
    ///
    /// Connection failures aren't reported here; they arrive later as error
    /// events from the client. This is only done once per session, and later
    /// calls are ignored.
    pub fn connect(&mut self, configs: &BTreeMap<String, ServerConfig>) {
        if self.connected {
            tracing::warn!("Session is already connected; ignoring connect request");
            return;
        }
        self.connected = true;

        let mut first = None;

        for (name, config) in configs {
            let view_id = self.view_ids.next();
            let options = ClientOptions::new(config, &self.settings);

            tracing::info!(connection = %name, server = %options.server, port = options.port, "Connecting");

            let events = EventSender::new(name.clone(), self.event_sender.clone());
            let client = self.client_factory.create(options, events);

            self.view_factory.switcher().add_row(view_id, None, name);
            let notice_stream = MessageStream::new(self.view_factory.message_view(view_id, name));
            self.views.insert(
                view_id,
                ViewTarget {
                    connection: name.clone(),
                    channel: None,
                },
            );

            let connection = self
                .connections
                .entry(name.clone())
                .or_insert_with(|| SessionConnection::new(name.clone(), view_id, client, notice_stream));
            connection.client_mut().connect();

            first.get_or_insert(view_id);
        }

        if let Some(view_id) = first {
            if let Err(e) = self.select_view(view_id) {
                tracing::error!("Couldn't focus first connection: {}", e);
            }
        }
    }

    pub fn colors_mut(&mut self) -> &mut NickColorAssigner {
        &mut self.colors
    }

    pub fn connection(&self, name: &str) -> LookupResult<&SessionConnection> {
        self.connections
            .get(name)
            .ok_or_else(|| LookupError::NoSuchConnection(name.to_string()))
    }

    pub fn connection_mut(&mut self, name: &str) -> LookupResult<&mut SessionConnection> {
        self.connections
            .get_mut(name)
            .ok_or_else(|| LookupError::NoSuchConnection(name.to_string()))
    }

    pub fn connections(&self) -> impl Iterator<Item = &SessionConnection> {
        self.connections.values()
    }

    pub fn current_view(&self) -> Option<ViewId> {
        self.current_view
    }

    pub fn view_target(&self, view: ViewId) -> LookupResult<&ViewTarget> {
        self.views.get(&view).ok_or(LookupError::NoSuchView(view))
    }

    /// Map a switcher row back to the connection, and channel if any, behind it
    pub fn resolve(&self, view: ViewId) -> LookupResult<(&SessionConnection, Option<&ChannelContext>)> {
        let target = self.view_target(view)?;
        let connection = self.connection(&target.connection)?;
        let channel = match &target.channel {
            Some(name) => Some(connection.channel(name)?),
            None => None,
        };
        Ok((connection, channel))
    }

    /// [`resolve`](Self::resolve) the focused view
    pub fn resolve_current(&self) -> LookupResult<(&SessionConnection, Option<&ChannelContext>)> {
        self.resolve(self.current_view.ok_or(LookupError::NoCurrentView)?)
    }

    /// Start tracking a channel we have joined, giving it a view and a
    /// switcher row under its connection. Rejoining a tracked channel reuses
    /// its existing context.
    pub fn add_channel(&mut self, connection: &str, channel: ChannelName) -> LookupResult<ViewId> {
        let conn = self
            .connections
            .get_mut(connection)
            .ok_or_else(|| LookupError::NoSuchConnection(connection.to_string()))?;

        if let Ok(existing) = conn.channel(&channel) {
            return Ok(existing.view_id());
        }

        let view_id = self.view_ids.next();
        self.view_factory.switcher().add_row(view_id, Some(conn.view_id()), channel.as_str());
        let message_view = self.view_factory.message_view(view_id, channel.as_str());
        let roster_view = self.view_factory.roster_view(view_id);

        tracing::info!(%connection, %channel, "Joined channel");

        self.views.insert(
            view_id,
            ViewTarget {
                connection: connection.to_string(),
                channel: Some(channel.clone()),
            },
        );
        conn.add_channel(ChannelContext::new(channel, view_id, message_view, roster_view));

        Ok(view_id)
    }

    /// Look up a channel along with the color assigner, for roster updates
    pub fn channel_and_colors(
        &mut self,
        connection: &str,
        channel: &ChannelName,
    ) -> LookupResult<(&mut ChannelContext, &mut NickColorAssigner)> {
        let conn = self
            .connections
            .get_mut(connection)
            .ok_or_else(|| LookupError::NoSuchConnection(connection.to_string()))?;
        Ok((conn.channel_mut(channel)?, &mut self.colors))
    }

    /// Append a line to a channel's stream
    pub fn push_channel_line(
        &mut self,
        connection: &str,
        channel: &ChannelName,
        flags: MessageFlags,
        from: Option<&str>,
        body: impl Into<String>,
    ) -> LookupResult<()> {
        let conn = self
            .connections
            .get_mut(connection)
            .ok_or_else(|| LookupError::NoSuchConnection(connection.to_string()))?;
        let chan = conn.channel_mut(channel)?;

        let color = from.filter(|f| !f.is_empty()).map(|f| self.colors.get(f));
        let focused = self.current_view == Some(chan.view_id());

        chan.push_line(MessageLine::new(flags, from, body).with_color(color), focused);
        Ok(())
    }

    /// Append a line to a connection's own stream
    pub fn push_notice_line(
        &mut self,
        connection: &str,
        flags: MessageFlags,
        from: Option<&str>,
        body: impl Into<String>,
    ) -> LookupResult<()> {
        let conn = self
            .connections
            .get_mut(connection)
            .ok_or_else(|| LookupError::NoSuchConnection(connection.to_string()))?;

        let color = from.filter(|f| !f.is_empty()).map(|f| self.colors.get(f));
        let visible = self.current_view == Some(conn.view_id());

        conn.notice_stream_mut()
            .push(MessageLine::new(flags, from, body).with_color(color), visible);
        Ok(())
    }

    /// Show an error on every stream belonging to a connection
    pub fn broadcast_error(&mut self, connection: &str, text: impl Into<String>) -> LookupResult<()> {
        let focused = self.current_view;
        let conn = self.connection_mut(connection)?;
        conn.broadcast(MessageLine::new(MessageFlags::ERROR, None, text), focused);
        Ok(())
    }

    /// The user picked a different switcher row.
    ///
    /// The outgoing view's scroll position is remembered, and the incoming
    /// one has its unread badge cleared and is scrolled down if it was pinned.
    pub fn change_view(&mut self, view: ViewId) -> LookupResult<()> {
        let target = self.view_target(view)?.clone();

        if let Some(previous) = self.current_view {
            if let Some(stream) = self.stream_for_view_mut(previous) {
                stream.record_scroll_state();
            }
        }

        let conn = self.connection_mut(&target.connection)?;
        match &target.channel {
            Some(channel) => conn.channel_mut(channel)?.on_focus(),
            None => conn.notice_stream_mut().on_focus(),
        }

        tracing::trace!(?view, connection = %target.connection, channel = ?target.channel, "Changed view");

        self.current_view = Some(view);
        Ok(())
    }

    /// Move focus to a view on the host's behalf, highlighting its switcher row
    /// before switching to it.
    pub fn select_view(&mut self, view: ViewId) -> LookupResult<()> {
        self.view_target(view)?;
        self.view_factory.switcher().set_current(view);
        self.change_view(view)
    }

    fn stream_for_view_mut(&mut self, view: ViewId) -> Option<&mut MessageStream> {
        let target = self.views.get(&view)?;
        let conn = self.connections.get_mut(&target.connection)?;
        match &target.channel {
            Some(channel) => conn.channel_mut(channel).ok().map(ChannelContext::stream_mut),
            None => Some(conn.notice_stream_mut()),
        }
    }

    /// Run a command against the focused view.
    ///
    /// `say` and `action` need a focused channel and do nothing without one.
    /// Unknown commands are ignored.
    pub fn dispatch_command(&mut self, command: &str, args: &str) -> LookupResult<()> {
        match Command::from_str(command) {
            Ok(command) => self.execute(command, args),
            Err(_) => {
                tracing::debug!(command, "Ignoring unknown command");
                Ok(())
            }
        }
    }

    /// Run an already-parsed command against the focused view
    pub fn execute(&mut self, command: Command, args: &str) -> LookupResult<()> {
        let view = self.current_view.ok_or(LookupError::NoCurrentView)?;
        let target = self.view_target(view)?.clone();
        let conn = self.connection_mut(&target.connection)?;

        match (command, &target.channel) {
            (Command::Say, Some(channel)) => conn.client_mut().say(channel.as_str(), args),
            (Command::Action, Some(channel)) => conn.client_mut().action(channel.as_str(), args),
            (Command::Join, _) => conn.client_mut().join(args),
            (command, None) => {
                tracing::debug!(%command, connection = %target.connection, "Command needs a channel");
            }
        }
        Ok(())
    }

    /// Handle a line typed into the input box of the focused view
    pub fn handle_input(&mut self, line: &str) -> LookupResult<()> {
        match parse_input(line) {
            Some(InputLine::Command { name, args }) => self.dispatch_command(name, args),
            Some(InputLine::Text(text)) => self.execute(Command::Say, text),
            None => Ok(()),
        }
    }
}
