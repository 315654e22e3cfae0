use crate::error::ClientError;
use crate::media::{SampleTrack, SharedTrack, TrackKind};
use crate::transport::{
    ConnectionState, PeerTransport, PeerTransportFactory, RemoteTrack, SenderId, TransportEvent,
    TransportNotifier,
};
use async_trait::async_trait;
use duplex_core::{IceCandidate, IceServerConfig, SdpType, SessionDescription};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Builds [`RtcPeerTransport`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct RtcTransportFactory;

#[async_trait]
impl PeerTransportFactory for RtcTransportFactory {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        notifier: TransportNotifier,
    ) -> Result<Box<dyn PeerTransport>, ClientError> {
        let transport = RtcPeerTransport::new(ice_servers, notifier).await?;
        Ok(Box::new(transport))
    }
}

/// [`PeerTransport`] over a webrtc-rs peer connection. Only tracks created
/// by [`SampleTrack`] can be sent.
pub struct RtcPeerTransport {
    peer_connection: Arc<RTCPeerConnection>,
    senders: Mutex<HashMap<SenderId, Arc<RTCRtpSender>>>,
    next_sender: AtomicU64,
}

impl RtcPeerTransport {
    pub async fn new(
        ice_servers: &[IceServerConfig],
        notifier: TransportNotifier,
    ) -> Result<Self, ClientError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let generation = notifier.generation();

        let state_notifier = notifier.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let notifier = state_notifier.clone();
                Box::pin(async move {
                    info!(generation, "peer connection state changed: {:?}", s);
                    notifier.notify(TransportEvent::StateChanged(map_state(s)));
                })
            },
        ));

        let ice_notifier = notifier.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let notifier = ice_notifier.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                notifier.notify(TransportEvent::LocalCandidate(IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                }));
            })
        }));

        let track_notifier = notifier;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let notifier = track_notifier.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        _ => TrackKind::Video,
                    };
                    debug!(generation, "remote {:?} track arrived", kind);
                    notifier.notify(TransportEvent::RemoteTrack(RemoteTrack {
                        id: track.id(),
                        kind,
                    }));
                })
            },
        ));

        Ok(Self {
            peer_connection,
            senders: Mutex::new(HashMap::new()),
            next_sender: AtomicU64::new(1),
        })
    }

    async fn sender(&self, id: SenderId) -> Result<Arc<RTCRtpSender>, ClientError> {
        self.senders
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ClientError::Transport(format!("unknown sender {:?}", id)))
    }
}

fn local_track(track: &SharedTrack) -> Result<Arc<dyn TrackLocal + Send + Sync>, ClientError> {
    track
        .as_any()
        .downcast_ref::<SampleTrack>()
        .map(|t| t.rtc_track() as Arc<dyn TrackLocal + Send + Sync>)
        .ok_or_else(|| ClientError::Transport(format!("track {} cannot be sent", track.id())))
}

fn map_state(s: RTCPeerConnectionState) -> ConnectionState {
    match s {
        RTCPeerConnectionState::Connecting => ConnectionState::Connecting,
        RTCPeerConnectionState::Connected => ConnectionState::Connected,
        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
        RTCPeerConnectionState::Failed => ConnectionState::Failed,
        RTCPeerConnectionState::Closed => ConnectionState::Closed,
        _ => ConnectionState::New,
    }
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, ClientError> {
    let parsed = match desc.sdp_type {
        SdpType::Offer => RTCSessionDescription::offer(desc.sdp),
        SdpType::Answer => RTCSessionDescription::answer(desc.sdp),
        SdpType::Pranswer => RTCSessionDescription::pranswer(desc.sdp),
        SdpType::Rollback => {
            return Err(ClientError::NegotiationFailure(
                "rollback descriptions are not supported".into(),
            ));
        }
    };
    parsed.map_err(|e| ClientError::NegotiationFailure(e.to_string()))
}

fn from_rtc(desc: RTCSessionDescription) -> Result<SessionDescription, ClientError> {
    let sdp_type = match desc.sdp_type {
        RTCSdpType::Offer => SdpType::Offer,
        RTCSdpType::Answer => SdpType::Answer,
        RTCSdpType::Pranswer => SdpType::Pranswer,
        RTCSdpType::Rollback => SdpType::Rollback,
        RTCSdpType::Unspecified => {
            return Err(ClientError::NegotiationFailure(
                "description without a type".into(),
            ));
        }
    };
    Ok(SessionDescription {
        sdp_type,
        sdp: desc.sdp,
    })
}

#[async_trait]
impl PeerTransport for RtcPeerTransport {
    async fn add_track(&self, track: SharedTrack) -> Result<SenderId, ClientError> {
        let rtc_track = local_track(&track)?;
        let sender = self.peer_connection.add_track(rtc_track).await?;

        // RTCP has to be drained for the interceptors to keep working.
        let rtcp_sender = sender.clone();
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while rtcp_sender.read(&mut rtcp_buf).await.is_ok() {}
        });

        let id = SenderId(self.next_sender.fetch_add(1, Ordering::SeqCst));
        self.senders.lock().await.insert(id, sender);
        Ok(id)
    }

    async fn replace_track(&self, sender: SenderId, track: SharedTrack) -> Result<(), ClientError> {
        let rtc_track = local_track(&track)?;
        self.sender(sender)
            .await?
            .replace_track(Some(rtc_track))
            .await?;
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, ClientError> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| ClientError::NegotiationFailure(e.to_string()))?;
        from_rtc(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, ClientError> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| ClientError::NegotiationFailure(e.to_string()))?;
        from_rtc(answer)
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), ClientError> {
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await
            .map_err(|e| ClientError::NegotiationFailure(e.to_string()))
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), ClientError> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await
            .map_err(|e| ClientError::NegotiationFailure(e.to_string()))
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), ClientError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.senders.lock().await.clear();
        self.peer_connection.close().await?;
        Ok(())
    }
}
