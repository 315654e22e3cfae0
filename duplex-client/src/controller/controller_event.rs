use crate::transport::TransportEvent;
use duplex_core::ServerSignal;
use tokio::sync::{mpsc, oneshot};

/// Everything the controller reacts to. All of it goes through one queue and
/// is handled strictly in order.
#[derive(Debug)]
pub enum ControllerEvent {
    Signal(ServerSignal),
    SignalingClosed,
    Command(Command),
    Transport {
        generation: u64,
        event: TransportEvent,
    },
    ScreenShareEnded {
        track_id: String,
    },
}

#[derive(Debug)]
pub enum Command {
    JoinRoom(String),
    CreateRoom,
    StartCall,
    EndCall { done: Option<oneshot::Sender<()>> },
    ShareScreen,
    StopScreenShare,
    ToggleAudio,
    ToggleVideo,
}

/// The controller's inbox. Create it first so the signaling connection can
/// be given a handle before the controller exists.
#[derive(Debug)]
pub struct EventQueue {
    pub(crate) tx: mpsc::UnboundedSender<ControllerEvent>,
    pub(crate) rx: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable sender side used by UI code, the signaling reader and tests.
/// Every method returns `false` once the controller has stopped.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl ControllerHandle {
    pub fn send(&self, event: ControllerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn deliver(&self, signal: ServerSignal) -> bool {
        self.send(ControllerEvent::Signal(signal))
    }

    pub fn signaling_closed(&self) -> bool {
        self.send(ControllerEvent::SignalingClosed)
    }

    fn command(&self, command: Command) -> bool {
        self.send(ControllerEvent::Command(command))
    }

    pub fn join_room(&self, room_id: impl Into<String>) -> bool {
        self.command(Command::JoinRoom(room_id.into()))
    }

    pub fn create_room(&self) -> bool {
        self.command(Command::CreateRoom)
    }

    pub fn start_call(&self) -> bool {
        self.command(Command::StartCall)
    }

    /// Resolves after the controller has released media and the peer
    /// connection.
    pub async fn end_call(&self) -> bool {
        let (done, rx) = oneshot::channel();
        if !self.command(Command::EndCall { done: Some(done) }) {
            return false;
        }
        rx.await.is_ok()
    }

    pub fn share_screen(&self) -> bool {
        self.command(Command::ShareScreen)
    }

    pub fn stop_screen_share(&self) -> bool {
        self.command(Command::StopScreenShare)
    }

    pub fn toggle_audio(&self) -> bool {
        self.command(Command::ToggleAudio)
    }

    pub fn toggle_video(&self) -> bool {
        self.command(Command::ToggleVideo)
    }
}
