use tracing::{debug, info, warn};

use crate::controller::{ControllerEvent, NegotiationController, Notice};
use crate::media::TrackKind;

impl NegotiationController {
    pub(super) async fn share_screen(&mut self) {
        if self.session.local().is_none() {
            self.notify(Notice::ScreenShareFailed("call not started".into()));
            return;
        }
        if self.screen.is_some() {
            debug!("already sharing the screen");
            return;
        }

        let stream = match self.capture.acquire_display_media().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("{}", e);
                self.notify(Notice::ScreenShareFailed(e.to_string()));
                return;
            }
        };
        let Some(screen_track) = stream.first_video().cloned() else {
            stream.stop_all();
            self.notify(Notice::ScreenShareFailed("display capture has no video".into()));
            return;
        };

        if let Some(call) = self.session.call()
            && let Some(sender) = call.link.video_sender
            && let Err(e) = call
                .link
                .transport
                .replace_track(sender, screen_track.clone())
                .await
        {
            warn!("failed to switch to screen: {}", e);
            stream.stop_all();
            self.notify(Notice::ScreenShareFailed(e.to_string()));
            return;
        }

        let events = self.queue.handle();
        let watched = screen_track.clone();
        tokio::spawn(async move {
            watched.ended().await;
            events.send(ControllerEvent::ScreenShareEnded {
                track_id: watched.id().to_owned(),
            });
        });

        self.screen = Some(stream);
        info!("screen sharing started");
        self.notify(Notice::ScreenShareStarted);
    }

    /// Ends the share from our side; the swap back happens when the track
    /// reports it has ended.
    pub(super) fn stop_screen_share(&self) {
        if let Some(screen) = &self.screen {
            screen.stop_all();
        }
    }

    /// Restores the camera on the video sender, but only while a call is
    /// still up.
    pub(super) async fn handle_screen_share_ended(&mut self, track_id: &str) {
        if !self.screen.as_ref().is_some_and(|s| s.contains(track_id)) {
            debug!(track_id, "screen share already released");
            return;
        }
        if let Some(screen) = self.screen.take() {
            screen.stop_all();
        }

        if let Some(call) = self.session.call()
            && let Some(sender) = call.link.video_sender
            && let Some(camera) = call.local.first_video().cloned()
            && let Err(e) = call.link.transport.replace_track(sender, camera).await
        {
            warn!("failed to restore camera: {}", e);
        }

        info!("screen sharing ended");
        self.notify(Notice::ScreenShareEnded);
    }

    pub(super) fn toggle_audio(&self) {
        if let Some(enabled) = self.toggle(TrackKind::Audio) {
            self.notify(Notice::AudioToggled { enabled });
        }
    }

    pub(super) fn toggle_video(&self) {
        if let Some(enabled) = self.toggle(TrackKind::Video) {
            self.notify(Notice::VideoToggled { enabled });
        }
    }

    /// Flips the first local track of `kind`. Returns the new state.
    fn toggle(&self, kind: TrackKind) -> Option<bool> {
        let Some(track) = self.session.local().and_then(|l| l.first_of(kind)) else {
            debug!("no local {:?} track to toggle", kind);
            return None;
        };
        let enabled = !track.is_enabled();
        track.set_enabled(enabled);
        Some(enabled)
    }
}
