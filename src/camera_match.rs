use crate::host::{HostContext, ObjectTransform};
use crate::preview_scene::PreviewSceneTracker;
use crate::scheduler::{TickScheduler, TickTask};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraMatchState {
    pub enabled: bool,
}

/// Copies the viewport camera onto the preview scene's camera so captures match what the editor shows.
#[derive(Debug, Clone, Default)]
pub struct CameraMatchController {
    state: CameraMatchState,
}

impl CameraMatchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CameraMatchState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn start(&mut self, scheduler: &mut TickScheduler) {
        self.state.enabled = true;
        scheduler.subscribe(TickTask::CameraMatch);
    }

    pub fn stop(&mut self, scheduler: &mut TickScheduler) {
        scheduler.unsubscribe(TickTask::CameraMatch);
        self.state.enabled = false;
    }

    pub fn toggle(&mut self, scheduler: &mut TickScheduler) {
        if self.state.enabled {
            self.stop(scheduler);
        } else {
            self.start(scheduler);
        }
    }

    /// Align the preview camera once, leaving no live subscription behind.
    pub fn match_once(
        &mut self,
        scheduler: &mut TickScheduler,
        tracker: &PreviewSceneTracker,
        host: &mut HostContext<'_>,
    ) -> bool {
        if self.state.enabled {
            self.stop(scheduler);
        }
        self.state.enabled = true;
        let applied = self.update(tracker, host);
        self.state.enabled = false;
        applied
    }

    /// Per-tick copy. Returns `false` when there was nothing valid to copy onto.
    pub fn update(&mut self, tracker: &PreviewSceneTracker, host: &mut HostContext<'_>) -> bool {
        if !self.state.enabled {
            return false;
        }
        let preview = tracker.preview_scene(&*host.scenes);
        let Some(camera_object) = preview.camera() else {
            log::trace!("[camera_match] no preview camera this tick");
            return false;
        };
        let Some(viewport) = host.viewport.camera() else {
            log::trace!("[camera_match] no viewport camera this tick");
            return false;
        };
        let transform = ObjectTransform { position: viewport.position, rotation: viewport.rotation };
        if !host.scenes.set_transform(camera_object, transform) {
            log::debug!("[camera_match] preview camera {camera_object} no longer exists");
            return false;
        }
        if !host.scenes.set_camera_fov(camera_object, viewport.fov_degrees) {
            log::trace!("[camera_match] {camera_object} has no camera component; fov left untouched");
        }
        true
    }
}
