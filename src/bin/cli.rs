use clap::{Parser, Subcommand};
use std::error::Error;
use std::net::SocketAddr;

use handshake_wire::wire::{Decode, Encode, PeerAddress, VersionMessage, constants};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "handshake-wire",
    about = "Encode and inspect handshake `version` payloads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a `version` payload and print it as hex.
    Encode {
        #[arg(long, default_value_t = constants::PROTOCOL_VERSION)]
        version: u32,
        #[arg(long, default_value_t = 0)]
        services: u64,
        /// Unix seconds; defaults to now.
        #[arg(long)]
        timestamp: Option<i64>,
        #[arg(long, default_value = "0.0.0.0:0")]
        recipient: SocketAddr,
        #[arg(long, default_value_t = 0)]
        recipient_services: u64,
        #[arg(long, default_value = "0.0.0.0:0")]
        sender: SocketAddr,
        #[arg(long, default_value_t = 0)]
        sender_services: u64,
        /// Defaults to a random value.
        #[arg(long)]
        nonce: Option<u64>,
        #[arg(long, default_value = "")]
        user_agent: String,
        #[arg(long, default_value_t = 0)]
        start_height: u32,
    },
    /// Decode a hex `version` payload and print every field.
    Decode { payload: String },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode {
            version,
            services,
            timestamp,
            recipient,
            recipient_services,
            sender,
            sender_services,
            nonce,
            user_agent,
            start_height,
        } => {
            let mut builder = VersionMessage::builder()
                .version(version)
                .services(services)
                .recipient(PeerAddress::new(
                    recipient.ip(),
                    recipient.port(),
                    recipient_services,
                ))
                .sender(PeerAddress::new(
                    sender.ip(),
                    sender.port(),
                    sender_services,
                ))
                .user_agent(user_agent)
                .start_height(start_height);

            builder = match timestamp {
                Some(secs) => builder.timestamp_secs(secs),
                None => builder.timestamp_now(),
            };
            builder = match nonce {
                Some(n) => builder.nonce(n),
                None => builder.random_nonce(&mut rand::thread_rng()),
            };

            let msg = builder.build();
            tracing::debug!("encoding:\n{msg}");
            println!("{}", hex::encode(msg.encode()));
        }
        Commands::Decode { payload } => {
            let payload = hex::decode(payload.trim())?;
            let msg = VersionMessage::decode(&payload)?;
            println!("{msg}");
        }
    }

    Ok(())
}
