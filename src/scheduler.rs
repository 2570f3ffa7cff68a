use std::collections::BTreeSet;
use std::fmt;

/// Per-tick behaviors the preview tooling can subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TickTask {
    SceneMonitor,
    Orbit,
    CameraMatch,
}

impl TickTask {
    pub fn label(self) -> &'static str {
        match self {
            TickTask::SceneMonitor => "scene_monitor",
            TickTask::Orbit => "orbit",
            TickTask::CameraMatch => "camera_match",
        }
    }
}

impl fmt::Display for TickTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of tasks that run on every host tick. Subscribing twice keeps a single entry.
#[derive(Debug, Default)]
pub struct TickScheduler {
    subscribed: BTreeSet<TickTask>,
    ticks: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the task was not already subscribed.
    pub fn subscribe(&mut self, task: TickTask) -> bool {
        let inserted = self.subscribed.insert(task);
        if inserted {
            log::debug!("[scheduler] subscribed {task}");
        }
        inserted
    }

    /// Returns `true` if the task was subscribed.
    pub fn unsubscribe(&mut self, task: TickTask) -> bool {
        let removed = self.subscribed.remove(&task);
        if removed {
            log::debug!("[scheduler] unsubscribed {task}");
        }
        removed
    }

    pub fn is_subscribed(&self, task: TickTask) -> bool {
        self.subscribed.contains(&task)
    }

    pub fn len(&self) -> usize {
        self.subscribed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty()
    }

    pub fn clear(&mut self) {
        self.subscribed.clear();
    }

    /// Snapshot of the tasks to run this tick. Tasks may (un)subscribe while it is dispatched.
    pub fn begin_tick(&mut self) -> Vec<TickTask> {
        self.ticks = self.ticks.wrapping_add(1);
        self.subscribed.iter().copied().collect()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_subscribe_keeps_one_entry() {
        let mut scheduler = TickScheduler::new();
        assert!(scheduler.subscribe(TickTask::Orbit));
        assert!(!scheduler.subscribe(TickTask::Orbit));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.begin_tick(), vec![TickTask::Orbit]);
    }

    #[test]
    fn double_unsubscribe_is_harmless() {
        let mut scheduler = TickScheduler::new();
        scheduler.subscribe(TickTask::CameraMatch);
        assert!(scheduler.unsubscribe(TickTask::CameraMatch));
        assert!(!scheduler.unsubscribe(TickTask::CameraMatch));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn begin_tick_counts_and_snapshots() {
        let mut scheduler = TickScheduler::new();
        scheduler.subscribe(TickTask::CameraMatch);
        scheduler.subscribe(TickTask::SceneMonitor);
        let tasks = scheduler.begin_tick();
        scheduler.unsubscribe(TickTask::CameraMatch);
        assert_eq!(tasks, vec![TickTask::SceneMonitor, TickTask::CameraMatch]);
        assert_eq!(scheduler.ticks(), 1);
        assert!(!scheduler.is_subscribed(TickTask::CameraMatch));
    }
}
