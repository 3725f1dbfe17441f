use crate::channel::ChannelContext;
use crate::client::ProtocolClient;
use crate::errors::{LookupError, LookupResult};
use crate::message_stream::{MessageLine, MessageStream};
use crate::names::{same_nick, ChannelName, ViewId};
use std::collections::HashMap;

/// One connection to a chat server, under one configured identity
pub struct SessionConnection {
    name: String,
    view_id: ViewId,
    client: Box<dyn ProtocolClient>,
    channels: HashMap<ChannelName, ChannelContext>,
    notice_stream: MessageStream,
}

impl SessionConnection {
    pub fn new(name: impl Into<String>, view_id: ViewId, client: Box<dyn ProtocolClient>, notice_stream: MessageStream) -> Self {
        Self {
            name: name.into(),
            view_id,
            client,
            channels: HashMap::new(),
            notice_stream,
        }
    }

    /// The name of the configuration this connection was made from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn client(&self) -> &dyn ProtocolClient {
        self.client.as_ref()
    }

    pub fn client_mut(&mut self) -> &mut dyn ProtocolClient {
        self.client.as_mut()
    }

    /// Whether `nick` is our own identity on this connection
    pub fn is_local_nick(&self, nick: &str) -> bool {
        same_nick(self.client.nick(), nick)
    }

    pub fn notice_stream(&self) -> &MessageStream {
        &self.notice_stream
    }

    pub fn notice_stream_mut(&mut self) -> &mut MessageStream {
        &mut self.notice_stream
    }

    pub fn has_channel(&self, name: &ChannelName) -> bool {
        self.channels.contains_key(name)
    }

    pub fn channel(&self, name: &ChannelName) -> LookupResult<&ChannelContext> {
        self.channels
            .get(name)
            .ok_or_else(|| LookupError::NoSuchChannel(self.name.clone(), name.clone()))
    }

    pub fn channel_mut(&mut self, name: &ChannelName) -> LookupResult<&mut ChannelContext> {
        match self.channels.get_mut(name) {
            Some(channel) => Ok(channel),
            None => Err(LookupError::NoSuchChannel(self.name.clone(), name.clone())),
        }
    }

    /// Start tracking a joined channel. An existing context for the same
    /// channel is kept as it is.
    pub fn add_channel(&mut self, channel: ChannelContext) -> &mut ChannelContext {
        self.channels.entry(channel.name().clone()).or_insert(channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = &ChannelContext> {
        self.channels.values()
    }

    /// Push a copy of `line` into the notice stream and every channel stream
    pub fn broadcast(&mut self, line: MessageLine, focused: Option<ViewId>) {
        for channel in self.channels.values_mut() {
            let is_focused = focused == Some(channel.view_id());
            channel.push_line(line.clone(), is_focused);
        }
        self.notice_stream.push(line, focused == Some(self.view_id));
    }
}

impl std::fmt::Debug for SessionConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConnection")
            .field("name", &self.name)
            .field("view_id", &self.view_id)
            .field("nick", &self.client.nick())
            .field("channels", &self.channels)
            .field("notice_stream", &self.notice_stream)
            .finish()
    }
}
