//! # Mailinator Client
//! Asynchronous wrapper around the public Mailinator ephemeral email endpoints, draining the site's WebSocket inbox stream and JSON detail API into structured values via [`Inbox`] and [`InboxBuilder`].
//!
//! ## Audience and uses
//! For Rust developers who need to read throwaway addresses in integration tests, signup flows, or automation scripts without running mail infrastructure: open an inbox by name ([`Inbox::open`]), inspect its summaries ([`Message`]), fetch full messages ([`Email`]) on demand, and trash them when done.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. Detail fetches use `reqwest` and the inbox stream uses `tokio-tungstenite`, so ensure the chosen Tokio features (`rt-multi-thread` or `current_thread`) are available in your application.
//!
//! ## Out of scope
//! Not a general-purpose mail client and not a wrapper for Mailinator's authenticated commercial API. It only speaks the anonymous public-zone endpoints and inherits their availability, retention limits, and complete lack of privacy: anyone who knows a mailbox name can read it.
//!
//! ## Errors
//! Transport failures surface as [`Error::Request`] (HTTP, including non-2xx statuses) or [`Error::WebSocket`] (the inbox stream); detail responses of an unexpected shape become [`Error::Json`]. The crate-wide [`Result`] alias wraps these errors. A stream that merely goes quiet is quiescence, not an error, and a removal the service refuses is reported through [`RemoveOutcome`] rather than raised.
//!
//! ## Example
//! ```no_run
//! use mailinator_client::Inbox;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailinator_client::Error> {
//!     let inbox = Inbox::open("myalias").await?;
//!     println!("Watching: {}", inbox.address());
//!
//!     for msg in inbox.messages() {
//!         println!("From: {}, Subject: {}", msg.from, msg.subject.as_deref().unwrap_or(""));
//!     }
//!
//!     if let Some(email) = inbox.latest().await? {
//!         println!("{}", email.text.as_deref().unwrap_or("(no text body)"));
//!         let outcome = inbox.remove(&email.id).await?;
//!         println!("Removed: {}", outcome.success);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod models;

pub use client::{generate_session_id, Inbox, InboxBuilder};
pub use error::Error;
pub use models::{Email, Link, Message, RemoveOutcome};

/// Result type alias for Mailinator operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
