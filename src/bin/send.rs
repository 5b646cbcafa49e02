//! Send a WhatsApp text from the command line.
//!
//! ```text
//! HYPERSENDER_INSTANCE_ID=... HYPERSENDER_TOKEN=... hypersender-send 201234567890 Hello there
//! echo "Hello from stdin" | hypersender-send 201234567890
//! ```

use std::io::Read;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hypersender::message::{Message, TextMessage};
use hypersender::{DispatchOutcome, WhatsappClient};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hypersender-send")]
#[command(about = "Send a WhatsApp text through HyperSender (config from HYPERSENDER_* env)", long_about = None)]
#[command(version)]
struct Args {
    /// Recipient phone number in international format, e.g. 201234567890.
    phone_number: String,

    /// Message text; read from stdin when omitted.
    text: Vec<String>,

    /// Override HYPERSENDER_TOKEN for this send.
    #[arg(short, long)]
    token: Option<String>,

    /// Use the send-text-safe endpoint.
    #[arg(long)]
    safe: bool,
}

impl Args {
    fn message_text(&self) -> Result<String> {
        let mut text = self.text.join(" ");
        if text.is_empty() {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read message text from stdin")?;
        }
        if text.trim().is_empty() {
            bail!("refusing to send an empty message");
        }
        Ok(text)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    hypersender::setup_logging();

    let args = Args::parse();
    let text = args.message_text()?;

    let client = WhatsappClient::from_env()?;
    let mut message = TextMessage::create(text)
        .safe_mode(args.safe)
        .to(&args.phone_number);
    if let Some(token) = args.token {
        message = message.token(token);
    }

    match message.send(&client).await? {
        DispatchOutcome::Chunked(results) => {
            info!("Delivered {} segment(s)", results.len());
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        DispatchOutcome::Single(response) => {
            println!("{}", response.text().await?);
        }
        DispatchOutcome::Suppressed => info!("Message suppressed"),
    }

    Ok(())
}
