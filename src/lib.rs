//! HyperSender - outbound WhatsApp messaging for applications.
//!
//! This crate turns application notifications into calls against the
//! HyperSender WhatsApp HTTP API:
//! 1. Message builders accumulate a payload through chained calls
//! 2. Long text bodies are split into segments that fit the backend's limit
//! 3. Segments are delivered one after another with a rate-limit pause
//! 4. Failed exchanges are classified into [`SendError`] values
//!
//! # Architecture
//!
//! The system uses:
//! - reqwest for the HTTP transport (JSON and multipart bodies)
//! - unicode-width for display-width aware chunking
//! - minijinja for optional templated message bodies
//! - Tokio for the async runtime
//!
//! # Example
//!
//! ```no_run
//! use hypersender::core::config::ClientConfig;
//! use hypersender::message::{Message, TextMessage};
//! use hypersender::{DispatchOutcome, WhatsappClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     hypersender::setup_logging();
//!
//!     let client = WhatsappClient::new(
//!         ClientConfig::new("my-instance-id").with_token("my-token"),
//!     );
//!
//!     let outcome = TextMessage::create("Your order has shipped.")
//!         .line("Track it in the app.")
//!         .to("201234567890")
//!         .send(&client)
//!         .await?;
//!
//!     if let DispatchOutcome::Chunked(responses) = outcome {
//!         println!("Delivered {} segment(s)", responses.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod channel;
pub mod clients;
pub mod core;
pub mod dispatch;
pub mod errors;
pub mod message;
pub mod render;
pub mod utils;

pub use channel::{Notifiable, WhatsappChannel, WhatsappNotification};
pub use clients::WhatsappClient;
pub use crate::core::config::ClientConfig;
pub use crate::core::models::{DispatchOutcome, Endpoint, FileKind, Payload};
pub use errors::SendError;

/// Configure structured JSON logging.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// hypersender::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
