use crate::camera_match::CameraMatchController;
use crate::config::PreviewConfig;
use crate::error;
use crate::host::{HostContext, PrefabRef};
use crate::monitor::{monitor_scene, MonitorAction};
use crate::orbit::OrbitController;
use crate::panels::{PanelGate, VisibilityIntent};
use crate::preview_scene::{PreviewScene, PreviewSceneTracker};
use crate::scheduler::{TickScheduler, TickTask};
use crate::screenshot;
use std::path::PathBuf;

/// Summary of one dispatched tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub monitor: Option<MonitorAction>,
    pub orbited: bool,
    pub camera_matched: bool,
}

/// Owns every piece of preview tooling state and dispatches the per-tick tasks.
///
/// Create one at tool startup, call [`PreviewManager::tick`] once per host frame and
/// [`PreviewManager::shutdown`] when the tool is torn down.
pub struct PreviewManager {
    config: PreviewConfig,
    scheduler: TickScheduler,
    tracker: PreviewSceneTracker,
    gate: PanelGate,
    orbit: OrbitController,
    camera_match: CameraMatchController,
}

impl PreviewManager {
    pub fn new(config: PreviewConfig, host: &HostContext<'_>) -> Self {
        let tracker = PreviewSceneTracker::adopt(&*host.scenes, &config.stage);
        let mut gate = PanelGate::new(VisibilityIntent {
            show_player: config.panels.anim_player_on_by_default,
            show_retarget: config.panels.anim_retargeter_on_by_default,
        });
        if tracker.is_preview_scene(&*host.scenes) {
            gate.mark_opened_in_preview_scene();
        }
        let mut scheduler = TickScheduler::new();
        scheduler.subscribe(TickTask::SceneMonitor);
        let orbit = OrbitController::new(config.orbit.degrees_per_tick);
        Self { config, scheduler, tracker, gate, orbit, camera_match: CameraMatchController::new() }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    pub fn camera_match(&self) -> &CameraMatchController {
        &self.camera_match
    }

    pub fn intent(&self) -> VisibilityIntent {
        self.gate.intent()
    }

    pub fn intent_mut(&mut self) -> &mut VisibilityIntent {
        self.gate.intent_mut()
    }

    pub fn opened_in_preview_scene(&self) -> bool {
        self.gate.opened_in_preview_scene()
    }

    pub fn tick(&mut self, host: &mut HostContext<'_>) -> TickReport {
        let mut report = TickReport { monitor: None, orbited: false, camera_matched: false };
        for task in self.scheduler.begin_tick() {
            if !self.scheduler.is_subscribed(task) {
                continue;
            }
            match task {
                TickTask::SceneMonitor => {
                    report.monitor = Some(monitor_scene(&mut self.tracker, &mut self.gate, host));
                }
                TickTask::Orbit => report.orbited = self.orbit.update(host).is_some(),
                TickTask::CameraMatch => report.camera_matched = self.camera_match.update(&self.tracker, host),
            }
        }
        report
    }

    pub fn open_preview_scene(&mut self, subject: Option<&PrefabRef>, host: &mut HostContext<'_>) -> PreviewScene {
        match self.try_open_preview_scene(subject, host) {
            Ok(preview) => preview,
            Err(err) => {
                log::debug!("[preview] open skipped: {err}");
                PreviewScene::invalid()
            }
        }
    }

    pub fn try_open_preview_scene(
        &mut self,
        subject: Option<&PrefabRef>,
        host: &mut HostContext<'_>,
    ) -> error::Result<PreviewScene> {
        self.tracker.open(host.scenes, subject, &self.config.stage)
    }

    pub fn is_preview_scene(&self, host: &HostContext<'_>) -> bool {
        self.tracker.is_preview_scene(&*host.scenes)
    }

    pub fn preview_scene(&self, host: &HostContext<'_>) -> PreviewScene {
        self.tracker.preview_scene(&*host.scenes)
    }

    pub fn toggle_orbit(&mut self) {
        self.orbit.toggle(&mut self.scheduler);
    }

    pub fn start_orbit(&mut self) {
        self.orbit.start(&mut self.scheduler);
    }

    pub fn toggle_orbit_tracking(&mut self, host: &HostContext<'_>) -> bool {
        self.orbit.toggle_tracking(&mut self.scheduler, host)
    }

    pub fn stop_orbit(&mut self) {
        self.orbit.stop(&mut self.scheduler);
    }

    pub fn toggle_camera_match(&mut self) {
        self.camera_match.toggle(&mut self.scheduler);
    }

    pub fn start_camera_match(&mut self) {
        self.camera_match.start(&mut self.scheduler);
    }

    pub fn match_camera_once(&mut self, host: &mut HostContext<'_>) -> bool {
        self.camera_match.match_once(&mut self.scheduler, &self.tracker, host)
    }

    pub fn stop_camera_match(&mut self) {
        self.camera_match.stop(&mut self.scheduler);
    }

    /// Stop every controller that moves the viewport or the preview camera.
    pub fn disable_viewport_modifications(&mut self) {
        self.camera_match.stop(&mut self.scheduler);
        self.orbit.stop(&mut self.scheduler);
    }

    pub fn show_animation_player(&mut self, host: &mut HostContext<'_>) {
        self.gate.show_player(&self.tracker, host);
    }

    pub fn hide_animation_player(&mut self, host: &mut HostContext<'_>, persist_intent: bool) {
        self.gate.hide_player(host, persist_intent);
    }

    pub fn show_animation_retargeter(&mut self, host: &mut HostContext<'_>) {
        self.gate.show_retargeter(host);
    }

    pub fn hide_animation_retargeter(&mut self, host: &mut HostContext<'_>, persist_intent: bool) {
        self.gate.hide_retargeter(host, persist_intent);
    }

    /// Capture a timestamped screenshot into the configured directory.
    pub fn take_screenshot(&self, host: &mut HostContext<'_>) -> Option<PathBuf> {
        let now = chrono::Local::now().naive_local();
        match screenshot::take_screenshot(host.viewport, &self.config.screenshot.output_dir, now) {
            Ok(path) => Some(path),
            Err(err) => {
                log::warn!("[screenshot] {err:#}");
                None
            }
        }
    }

    /// Drop every subscription, including the scene monitor.
    pub fn shutdown(&mut self) {
        self.disable_viewport_modifications();
        self.scheduler.clear();
        log::debug!("[preview] tooling shut down");
    }
}
