use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use duplex_client::{
    ControllerConfig, EventQueue, MediaConstraints, NegotiationController, Notice,
    RtcTransportFactory, SyntheticCapture, WsSignaling,
};
use duplex_core::utils::{DEFAULT_ROOM_CAPACITY, default_ice_servers};
use duplex_core::{IceServerConfig, RoomId};
use duplex_server::HubConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duplex")]
#[command(version, about = "Two-party audio/video calls over a WebSocket signaling hub")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling hub
    Serve {
        #[arg(long, env = "DUPLEX_ADDR", default_value = "0.0.0.0:3000")]
        addr: SocketAddr,

        #[arg(long, env = "DUPLEX_ROOM_CAPACITY", default_value_t = DEFAULT_ROOM_CAPACITY)]
        room_capacity: usize,

        #[command(flatten)]
        turn: TurnArgs,
    },

    /// Join a room as a headless participant with synthetic media
    Peer {
        #[arg(long, default_value = "ws://127.0.0.1:3000/ws")]
        url: String,

        /// Room to join. A new room is created when omitted.
        #[arg(long)]
        room: Option<String>,

        /// Hold ICE candidates that arrive before the peer connection exists
        #[arg(long)]
        buffer_candidates: bool,

        #[arg(long)]
        no_audio: bool,

        #[arg(long)]
        no_video: bool,

        #[command(flatten)]
        turn: TurnArgs,
    },

    /// Print a fresh room code
    RoomId,
}

#[derive(clap::Args)]
struct TurnArgs {
    #[arg(long, env = "TURN_URL")]
    turn_url: Option<String>,

    #[arg(long, env = "TURN_USERNAME")]
    turn_username: Option<String>,

    #[arg(long, env = "TURN_CREDENTIAL")]
    turn_credential: Option<String>,
}

impl TurnArgs {
    /// STUN defaults, plus the TURN relay when one is configured.
    fn ice_servers(&self) -> Vec<IceServerConfig> {
        let mut servers = default_ice_servers();
        if let Some(url) = &self.turn_url {
            servers.push(IceServerConfig {
                urls: vec![url.clone()],
                username: self.turn_username.clone(),
                credential: self.turn_credential.clone(),
            });
        }
        servers
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve {
            addr,
            room_capacity,
            turn,
        } => {
            println!("{}", "🚀 Starting signaling hub...".green().bold());
            let config = HubConfig {
                bind_addr: addr,
                room_capacity: room_capacity.max(1),
                ice_servers: turn.ice_servers(),
            };
            duplex_server::serve(config).await?;
        }

        Commands::Peer {
            url,
            room,
            buffer_candidates,
            no_audio,
            no_video,
            turn,
        } => {
            let config = ControllerConfig {
                ice_servers: turn.turn_url.is_some().then(|| turn.ice_servers()),
                media: MediaConstraints {
                    audio: !no_audio,
                    video: !no_video,
                },
                buffer_early_candidates: buffer_candidates,
            };
            run_peer(&url, room, config).await?;
        }

        Commands::RoomId => println!("{}", RoomId::generate()),
    }

    Ok(())
}

async fn run_peer(url: &str, room: Option<String>, config: ControllerConfig) -> Result<()> {
    let queue = EventQueue::new();
    let signaling = WsSignaling::connect(url, queue.handle())
        .await
        .with_context(|| format!("Failed to reach hub at {}", url))?;

    let (controller, mut notices) = NegotiationController::new(
        config,
        Arc::new(SyntheticCapture::new()),
        Arc::new(RtcTransportFactory),
        Arc::new(signaling),
        queue,
    );
    let handle = controller.handle();
    let task = tokio::spawn(controller.run());

    match room {
        Some(room) => handle.join_room(room),
        None => handle.create_room(),
    };
    handle.start_call();

    loop {
        tokio::select! {
            notice = notices.recv() => match notice {
                Some(notice) => print_notice(&notice),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Hanging up");
                handle.end_call().await;
                break;
            }
        }
    }

    task.abort();
    Ok(())
}

fn print_notice(notice: &Notice) {
    match notice {
        Notice::SignalingConnected { local_id } => {
            println!("{} {}", "📡 Connected as".cyan(), local_id)
        }
        Notice::RoomJoined(room_id) => {
            println!("{} {}", "🚪 In room".green().bold(), room_id.as_str().bold())
        }
        Notice::PeerJoined(peer) => println!("{} {}", "👋 Peer joined:".cyan(), peer),
        Notice::PeerConnected => println!("{}", "✨ Call connected".green().bold()),
        Notice::PeerLeft(peer) => println!("{} {}", "👋 Peer left:".yellow(), peer),
        Notice::CallEnded => println!("{}", "📴 Call ended".yellow()),
        Notice::InvalidRoom
        | Notice::HubError { .. }
        | Notice::SignalingUnavailable(_)
        | Notice::MediaAccessDenied(_)
        | Notice::NegotiationFailed(_)
        | Notice::ScreenShareFailed(_)
        | Notice::ConnectionProblem(_) => println!("{} {:?}", "⚠️".red(), notice),
        other => println!("   {:?}", other),
    }
}
