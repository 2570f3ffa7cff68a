use crate::host::HostContext;
use crate::preview_scene::PreviewSceneTracker;

/// Desired panel visibility, reconciled against the real panels by the scene monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityIntent {
    pub show_player: bool,
    pub show_retarget: bool,
}

impl Default for VisibilityIntent {
    fn default() -> Self {
        Self { show_player: true, show_retarget: false }
    }
}

/// Opens and closes the animation player and retargeter, tracking intent alongside.
#[derive(Debug, Clone, Default)]
pub struct PanelGate {
    intent: VisibilityIntent,
    opened_in_preview_scene: bool,
}

impl PanelGate {
    pub fn new(intent: VisibilityIntent) -> Self {
        Self { intent, opened_in_preview_scene: false }
    }

    pub fn intent(&self) -> VisibilityIntent {
        self.intent
    }

    pub fn intent_mut(&mut self) -> &mut VisibilityIntent {
        &mut self.intent
    }

    /// Whether the player was last opened while a preview scene was active.
    pub fn opened_in_preview_scene(&self) -> bool {
        self.opened_in_preview_scene
    }

    pub(crate) fn mark_opened_in_preview_scene(&mut self) {
        self.opened_in_preview_scene = true;
    }

    pub fn show_player(&mut self, tracker: &PreviewSceneTracker, host: &mut HostContext<'_>) {
        let in_preview = tracker.is_preview_scene(&*host.scenes);
        let subject = if in_preview {
            tracker.preview_scene(&*host.scenes).character()
        } else {
            host.viewport.active_selection()
        };
        host.panels.open_player(subject);
        self.opened_in_preview_scene = in_preview;
        log::debug!("[panels] player opened on {subject:?} (preview scene: {in_preview})");

        if self.intent.show_retarget {
            self.show_retargeter(host);
        }
        self.intent.show_player = true;
    }

    /// Close the player. `persist` distinguishes a user close from a reactive one.
    pub fn hide_player(&mut self, host: &mut HostContext<'_>, persist: bool) {
        if host.panels.is_player_open() {
            host.panels.reset_face();
        }
        host.panels.close_player();
        self.hide_retargeter(host, false);
        if persist {
            self.intent.show_player = false;
        }
    }

    pub fn show_retargeter(&mut self, host: &mut HostContext<'_>) {
        if host.panels.is_player_open() {
            host.panels.open_retargeter();
            self.intent.show_retarget = true;
        }
    }

    pub fn hide_retargeter(&mut self, host: &mut HostContext<'_>, persist: bool) {
        host.panels.close_retargeter();
        if persist {
            self.intent.show_retarget = false;
        }
    }
}
