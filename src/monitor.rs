use crate::host::HostContext;
use crate::panels::PanelGate;
use crate::preview_scene::PreviewSceneTracker;

/// What the scene monitor did on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorAction {
    Idle,
    OpenedPlayer,
    ClosedPlayer,
    /// The player was left open after navigating away from the preview scene.
    ForceClosedPlayer,
}

/// Per-tick reconciliation of the active scene and the player panel.
///
/// Only identity comparisons run every tick; the preview handle is recomputed when the
/// active scene actually changed.
pub fn monitor_scene(
    tracker: &mut PreviewSceneTracker,
    gate: &mut PanelGate,
    host: &mut HostContext<'_>,
) -> MonitorAction {
    tracker.refresh(&*host.scenes);

    let player_shown = host.panels.is_player_open();
    let intent = gate.intent();

    if tracker.is_preview_scene(&*host.scenes) {
        if intent.show_player && !player_shown {
            gate.show_player(tracker, host);
            return MonitorAction::OpenedPlayer;
        }
        if !intent.show_player && player_shown {
            gate.hide_player(host, false);
            return MonitorAction::ClosedPlayer;
        }
    } else if gate.opened_in_preview_scene() && player_shown {
        log::debug!("[monitor] left the preview scene; closing the player");
        gate.hide_player(host, false);
        return MonitorAction::ForceClosedPlayer;
    }
    MonitorAction::Idle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StageConfig;
    use crate::host::{PanelHost, PrefabRef};
    use crate::panels::VisibilityIntent;
    use crate::sim::SimulatedEditor;

    #[test]
    fn outside_preview_player_is_left_alone() {
        let mut editor = SimulatedEditor::new();
        let mut tracker = PreviewSceneTracker::adopt(&editor.scenes, &StageConfig::default());
        let mut gate = PanelGate::default();
        editor.panels.open_player(None);

        let action = monitor_scene(&mut tracker, &mut gate, &mut editor.context());
        assert_eq!(action, MonitorAction::Idle);
        assert!(editor.panels.is_player_open());
    }

    #[test]
    fn opens_player_in_preview_scene_when_wanted() {
        let mut editor = SimulatedEditor::new();
        let stage = StageConfig::default();
        let mut tracker = PreviewSceneTracker::adopt(&editor.scenes, &stage);
        tracker.open(&mut editor.scenes, Some(&PrefabRef::new("hero")), &stage).expect("open");
        let mut gate = PanelGate::new(VisibilityIntent { show_player: true, show_retarget: false });

        let action = monitor_scene(&mut tracker, &mut gate, &mut editor.context());
        assert_eq!(action, MonitorAction::OpenedPlayer);
        assert!(gate.opened_in_preview_scene());
        let second = monitor_scene(&mut tracker, &mut gate, &mut editor.context());
        assert_eq!(second, MonitorAction::Idle);
        assert_eq!(editor.panels.player_opens(), 1);
    }

    #[test]
    fn closes_player_when_intent_is_hidden() {
        let mut editor = SimulatedEditor::new();
        let stage = StageConfig::default();
        let mut tracker = PreviewSceneTracker::adopt(&editor.scenes, &stage);
        tracker.open(&mut editor.scenes, Some(&PrefabRef::new("hero")), &stage).expect("open");
        let mut gate = PanelGate::new(VisibilityIntent { show_player: false, show_retarget: false });
        editor.panels.open_player(None);

        let action = monitor_scene(&mut tracker, &mut gate, &mut editor.context());
        assert_eq!(action, MonitorAction::ClosedPlayer);
        assert!(!editor.panels.is_player_open());
    }
}
