//! Client for the MailPace transactional email API.
//!
//! ```no_run
//! # async fn run() -> Result<(), mailpace::Error> {
//! use std::time::Duration;
//! use mailpace::{Context, EmailClient, Message};
//!
//! let client = EmailClient::new("server_token", None);
//! let mail = Message::new("service@example.com", "user@example.com")
//!     .with_subject("Welcome")
//!     .with_text_body("Hello!");
//!
//! client.send(&mail, &Context::with_timeout(Duration::from_secs(10))).await
//! # }
//! ```
pub mod client;
pub mod config;
pub mod context;
pub mod message;

mod error;

pub use client::{EmailClient, DEFAULT_ENDPOINT};
pub use context::Context;
pub use error::Error;
pub use message::{Attachment, Message};

pub use tokio_util::sync::CancellationToken;
