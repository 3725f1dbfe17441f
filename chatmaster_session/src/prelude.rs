//! Collects commonly-used names for convenient import

pub use crate::{
    channel::ChannelContext,
    client::{ClientFactory, ClientOptions, EventSender, ProtocolClient},
    command::Command,
    config::{ChatSettings, ServerConfig},
    connection::SessionConnection,
    errors::{HandleResult, HandlerError, LookupError, LookupResult},
    event::{ConnectionEvent, ErrorPayload, ProtocolEvent},
    message_stream::{MessageFlags, MessageLine, MessageStream},
    names::{ChannelName, ViewId},
    nick_color::{Color, NickColorAssigner},
    registry::ConnectionRegistry,
    roster::{RosterDiff, RosterSnapshot, UserEntry, UserRoster},
    router::EventRouter,
    utils::OrLog,
    view::{ChannelSwitcher, MessageView, RosterView, ViewFactory},
};
