use crate::error::ClientError;
use crate::media::{MediaCapture, MediaConstraints, MediaStream, MediaTrack, SharedTrack, TrackKind};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Local track backed by a webrtc sample track. Frames are written by
/// whoever owns the source; the controller only routes the track.
pub struct SampleTrack {
    id: String,
    kind: TrackKind,
    rtc: Arc<TrackLocalStaticSample>,
    enabled: AtomicBool,
    ended: watch::Sender<bool>,
}

impl SampleTrack {
    pub fn new(kind: TrackKind, stream_id: &str) -> Self {
        let id = format!("{}-{}", kind_label(kind), Uuid::new_v4());
        let capability = match kind {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        };
        let rtc = Arc::new(TrackLocalStaticSample::new(
            capability,
            id.clone(),
            stream_id.to_owned(),
        ));
        let (ended, _) = watch::channel(false);

        Self {
            id,
            kind,
            rtc,
            enabled: AtomicBool::new(true),
            ended,
        }
    }

    pub fn rtc_track(&self) -> Arc<TrackLocalStaticSample> {
        self.rtc.clone()
    }
}

#[async_trait]
impl MediaTrack for SampleTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> TrackKind {
        self.kind
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        !*self.ended.borrow()
    }

    fn stop(&self) {
        if !self.ended.send_replace(true) {
            debug!(track = %self.id, "track stopped");
        }
    }

    async fn ended(&self) {
        let mut rx = self.ended.subscribe();
        loop {
            let done = *rx.borrow_and_update();
            if done || rx.changed().await.is_err() {
                return;
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn kind_label(kind: TrackKind) -> &'static str {
    match kind {
        TrackKind::Audio => "audio",
        TrackKind::Video => "video",
    }
}

/// Capture that hands out fresh sample tracks instead of opening devices.
/// Used by headless participants.
#[derive(Debug, Default)]
pub struct SyntheticCapture;

impl SyntheticCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaCapture for SyntheticCapture {
    async fn acquire_local_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<MediaStream, ClientError> {
        if !constraints.audio && !constraints.video {
            return Err(ClientError::MediaAccess("no media kind requested".into()));
        }

        let stream_id = format!("local-{}", Uuid::new_v4());
        let mut tracks: Vec<SharedTrack> = Vec::new();
        if constraints.video {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Video, &stream_id)));
        }
        if constraints.audio {
            tracks.push(Arc::new(SampleTrack::new(TrackKind::Audio, &stream_id)));
        }
        Ok(MediaStream::new(stream_id, tracks))
    }

    async fn acquire_display_media(&self) -> Result<MediaStream, ClientError> {
        let stream_id = format!("screen-{}", Uuid::new_v4());
        let track: SharedTrack = Arc::new(SampleTrack::new(TrackKind::Video, &stream_id));
        Ok(MediaStream::new(stream_id, vec![track]))
    }
}
