//! Runs chat sessions outside of any graphical host.
//!
//! This provides the config file format, logging setup, and the task that
//! feeds protocol events and user input into a
//! [`ConnectionRegistry`](chatmaster_session::registry::ConnectionRegistry),
//! along with scripted clients and text views for driving a session from a
//! terminal.

pub mod config;
pub mod replay;
pub mod run;
pub mod text_view;
pub mod tracing_config;
