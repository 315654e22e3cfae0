use crate::controller::ControllerHandle;
use crate::error::ClientError;
use crate::signaling::SignalSink;
use duplex_core::{ClientSignal, ServerSignal};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// WebSocket connection to the hub. Incoming frames are decoded and queued on
/// the controller; outgoing signals are written in the order they are sent.
#[derive(Debug, Clone)]
pub struct WsSignaling {
    outgoing: mpsc::UnboundedSender<ClientSignal>,
}

impl WsSignaling {
    pub async fn connect(url: &str, controller: ControllerHandle) -> Result<Self, ClientError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| ClientError::SignalingUnavailable(e.to_string()))?;
        info!("connected to hub at {}", url);

        let (mut sender, mut receiver) = stream.split();
        let (outgoing, mut rx) = mpsc::unbounded_channel::<ClientSignal>();

        tokio::spawn(async move {
            while let Some(signal) = rx.recv().await {
                let text = match serde_json::to_string(&signal) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("failed to encode signal: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            let _ = sender.close().await;
        });

        tokio::spawn(async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ServerSignal>(&text) {
                        Ok(signal) => {
                            if !controller.deliver(signal) {
                                break;
                            }
                        }
                        Err(e) => warn!("undecodable frame from hub: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            debug!("hub connection closed");
            controller.signaling_closed();
        });

        Ok(Self { outgoing })
    }
}

impl SignalSink for WsSignaling {
    fn send(&self, signal: ClientSignal) -> Result<(), ClientError> {
        self.outgoing
            .send(signal)
            .map_err(|_| ClientError::SignalingUnavailable("hub connection closed".into()))
    }
}
