mod controller_event;
mod create_pc_impl;
mod end_call_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod media_controls_impl;
mod notice;
mod session;
mod start_call_impl;
mod transport_event_impl;

pub use controller_event::*;
pub use notice::*;

use crate::config::ControllerConfig;
use crate::media::{MediaCapture, MediaStream};
use crate::signaling::SignalSink;
use crate::transport::{PeerTransportFactory, RemoteTrack};
use duplex_core::utils::default_ice_servers;
use duplex_core::{ClientSignal, IceCandidate, IceServerConfig, PeerId, RoomId};
use session::Session;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Per-participant call state machine.
///
/// Owns the local media, at most one peer connection and the screen share.
/// Signals from the hub, user commands and transport callbacks are all fed
/// through a single [`EventQueue`] and handled one at a time, so no two
/// handlers ever interleave.
pub struct NegotiationController {
    config: ControllerConfig,
    capture: Arc<dyn MediaCapture>,
    transports: Arc<dyn PeerTransportFactory>,
    signaling: Arc<dyn SignalSink>,
    queue: EventQueue,
    notices: mpsc::UnboundedSender<Notice>,

    local_id: Option<PeerId>,
    room: Option<RoomId>,
    hub_ice_servers: Option<Vec<IceServerConfig>>,

    session: Session,
    screen: Option<MediaStream>,
    pending_candidates: Vec<(PeerId, IceCandidate)>,
    generation: u64,
}

impl NegotiationController {
    pub fn new(
        config: ControllerConfig,
        capture: Arc<dyn MediaCapture>,
        transports: Arc<dyn PeerTransportFactory>,
        signaling: Arc<dyn SignalSink>,
        queue: EventQueue,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, notice_rx) = mpsc::unbounded_channel();
        let controller = Self {
            config,
            capture,
            transports,
            signaling,
            queue,
            notices,
            local_id: None,
            room: None,
            hub_ice_servers: None,
            session: Session::Idle { remote: None },
            screen: None,
            pending_candidates: Vec::new(),
            generation: 0,
        };
        (controller, notice_rx)
    }

    pub fn handle(&self) -> ControllerHandle {
        self.queue.handle()
    }

    /// Processes events until the owning task is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.queue.rx.recv().await {
            self.handle_event(event).await;
        }
    }

    /// Handles everything already sitting in the queue, including events
    /// queued by the handlers themselves.
    pub async fn process_queued(&mut self) {
        while let Ok(event) = self.queue.rx.try_recv() {
            self.handle_event(event).await;
        }
    }

    pub async fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Signal(signal) => self.handle_signal(signal).await,
            ControllerEvent::SignalingClosed => {
                warn!("lost connection to hub");
                self.room = None;
                self.notify(Notice::SignalingUnavailable("hub connection closed".into()));
            }
            ControllerEvent::Command(command) => self.handle_command(command).await,
            ControllerEvent::Transport { generation, event } => {
                let current = self.session.call().map(|c| c.link.generation);
                if current != Some(generation) {
                    debug!(generation, "ignoring event from a discarded peer connection");
                    return;
                }
                self.handle_transport_event(event);
            }
            ControllerEvent::ScreenShareEnded { track_id } => {
                self.handle_screen_share_ended(&track_id).await
            }
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::JoinRoom(raw) => match RoomId::parse(&raw) {
                Some(room_id) => self.send_signal(ClientSignal::Join {
                    room_id: room_id.to_string(),
                }),
                None => self.notify(Notice::InvalidRoom),
            },
            Command::CreateRoom => self.send_signal(ClientSignal::CreateRoom),
            Command::StartCall => self.start_call().await,
            Command::EndCall { done } => {
                self.end_call().await;
                if let Some(done) = done {
                    let _ = done.send(());
                }
            }
            Command::ShareScreen => self.share_screen().await,
            Command::StopScreenShare => self.stop_screen_share(),
            Command::ToggleAudio => self.toggle_audio(),
            Command::ToggleVideo => self.toggle_video(),
        }
    }

    pub fn state(&self) -> CallState {
        self.session.state()
    }

    pub fn local_id(&self) -> Option<PeerId> {
        self.local_id
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn remote_peer(&self) -> Option<PeerId> {
        self.session.remote()
    }

    pub fn local_stream(&self) -> Option<&MediaStream> {
        self.session.local()
    }

    pub fn has_peer_connection(&self) -> bool {
        self.session.call().is_some()
    }

    pub fn remote_tracks(&self) -> &[RemoteTrack] {
        self.session
            .call()
            .map(|c| c.link.remote_tracks.as_slice())
            .unwrap_or_default()
    }

    pub fn is_screen_sharing(&self) -> bool {
        self.screen.is_some()
    }

    /// Live local tracks, camera and screen together.
    pub fn live_track_count(&self) -> usize {
        self.local_stream().map_or(0, |s| s.live_track_count())
            + self.screen.as_ref().map_or(0, |s| s.live_track_count())
    }

    pub fn pending_candidate_count(&self) -> usize {
        self.pending_candidates.len()
    }

    fn ice_servers(&self) -> Vec<IceServerConfig> {
        self.config
            .ice_servers
            .clone()
            .or_else(|| self.hub_ice_servers.clone())
            .unwrap_or_else(default_ice_servers)
    }

    fn notify(&self, notice: Notice) {
        let _ = self.notices.send(notice);
    }

    fn send_signal(&self, signal: ClientSignal) {
        if let Err(e) = self.signaling.send(signal) {
            warn!("{}", e);
            self.notify(Notice::SignalingUnavailable(e.to_string()));
        }
    }
}
