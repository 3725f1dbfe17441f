//! Session state for a multi-server chat client.
//!
//! A [`ConnectionRegistry`](registry::ConnectionRegistry) owns one
//! [`SessionConnection`](connection::SessionConnection) per configured server.
//! Protocol clients report what happens on the wire as
//! [`ConnectionEvent`](event::ConnectionEvent)s, which the
//! [`EventRouter`](router::EventRouter) applies to the registry. All presentation
//! goes through the small set of view traits in [`view`].

pub mod prelude;

pub mod errors;
pub mod config;
pub mod names;

pub mod event;
pub mod client;
pub mod view;

pub mod nick_color;
pub mod roster;
pub mod message_stream;
pub mod channel;
pub mod connection;
pub mod registry;
pub mod router;

pub mod command;

pub mod utils;
