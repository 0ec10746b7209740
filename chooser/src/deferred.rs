//! Deferred actions that run after the host's settle pass.
//!
//! Opening the list schedules a scroll-into-view, and picking an option in
//! single mode schedules the close. Both must run after the host has
//! painted the current state, so they are queued here and drained by
//! `Select::run_deferred`. Each task carries the visibility generation it was
//! scheduled under; closing the list bumps the generation, so tasks queued
//! for an earlier opening are dropped instead of acting on a stale list.

use tokio::sync::mpsc;

use crate::option::OptionKey;

/// Host hook that scrolls an option into view by key.
pub trait ScrollTarget: Send + Sync {
    fn scroll_to(&self, key: &OptionKey);
}

impl<F> ScrollTarget for F
where
    F: Fn(&OptionKey) + Send + Sync,
{
    fn scroll_to(&self, key: &OptionKey) {
        self(key)
    }
}

/// Work to do after the current settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredTask {
    /// Scroll the highlighted option into view.
    ScrollIntoView(OptionKey),
    /// Close the list after a single-mode pick.
    ClosePopup,
}

/// A task tagged with the generation it was scheduled under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub generation: u64,
    pub task: DeferredTask,
}

/// Queue of deferred tasks.
///
/// Only the synchronous halves of the channel are used, so no runtime is
/// required.
#[derive(Debug)]
pub struct DeferredQueue {
    tx: mpsc::UnboundedSender<Scheduled>,
    rx: mpsc::UnboundedReceiver<Scheduled>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Queue `task` under `generation`.
    pub fn schedule(&self, generation: u64, task: DeferredTask) {
        // The receiver lives alongside the sender, so this can't fail.
        let _ = self.tx.send(Scheduled { generation, task });
    }

    /// Take every pending task in scheduling order.
    pub fn drain(&mut self) -> Vec<Scheduled> {
        let mut tasks = Vec::new();
        while let Ok(task) = self.rx.try_recv() {
            tasks.push(task);
        }
        tasks
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}
