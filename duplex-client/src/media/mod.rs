mod synthetic;

pub use synthetic::*;

use crate::error::ClientError;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// A local media track as produced by a [`MediaCapture`].
#[async_trait]
pub trait MediaTrack: Send + Sync + 'static {
    fn id(&self) -> &str;
    fn kind(&self) -> TrackKind;

    fn is_enabled(&self) -> bool;
    /// Muting keeps the track live; only its output is suppressed.
    fn set_enabled(&self, enabled: bool);

    fn is_live(&self) -> bool;
    fn stop(&self);

    /// Resolves once the track has ended, either through [`MediaTrack::stop`]
    /// or because the source went away (e.g. the OS "stop sharing" control).
    async fn ended(&self);

    fn as_any(&self) -> &dyn Any;
}

pub type SharedTrack = Arc<dyn MediaTrack>;

#[derive(Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<SharedTrack>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>, tracks: Vec<SharedTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[SharedTrack] {
        &self.tracks
    }

    pub fn first_of(&self, kind: TrackKind) -> Option<&SharedTrack> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    pub fn first_video(&self) -> Option<&SharedTrack> {
        self.first_of(TrackKind::Video)
    }

    pub fn first_audio(&self) -> Option<&SharedTrack> {
        self.first_of(TrackKind::Audio)
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id() == track_id)
    }

    pub fn live_track_count(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field(
                "tracks",
                &self
                    .tracks
                    .iter()
                    .map(|t| (t.id(), t.kind()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Source of local camera/microphone and display media.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn acquire_local_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<MediaStream, ClientError>;

    async fn acquire_display_media(&self) -> Result<MediaStream, ClientError>;
}
