//! Typed request → JSON → element pipeline for the Axios review and AJAX
//! exercise pages.
//!
//! A [`catalog::Page`] is a document plus a list of [`example::Example`]s.
//! Each example fetches (or decodes) one body and appends fresh elements
//! to its container. Everything runs on one thread inside a tokio
//! `LocalSet`, so continuations never interleave mid-render.

pub mod catalog;
pub mod config;
pub mod dom;
pub mod endpoint;
pub mod error;
pub mod example;
pub mod form;
pub mod notify;
pub mod render;
pub mod request;

pub use catalog::Page;
pub use config::{ApiConfig, Config};
pub use dom::{Document, NodeId};
pub use error::{ConfigError, FetchError, PageError};
pub use example::{Example, Session};
pub use form::{FormBridge, SubmitEvent};
pub use notify::{ConsoleNotifier, Notifier, RecordingNotifier};
pub use request::RequestRenderer;
