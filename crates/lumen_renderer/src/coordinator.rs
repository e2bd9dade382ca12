//! Multi-threaded render driver.
//!
//! The coordinator owns a pool of worker threads that pull batches from a
//! shared [`Batcher`] and write rendered pixels through a [`BufferWriter`].
//! Its lifecycle is a small state machine:
//!
//! ```text
//! Unstarted --start--> Running <--pause/resume--> Paused
//!                         |                          |
//!                         +--cancel--> Cancelled <---+
//!                         +--all batches done--> Finished
//! ```
//!
//! Requests that do not apply to the current state are ignored. Workers
//! that run out of batches while the render is paused leave it `Paused`;
//! the next `resume` then goes `Running` and straight on to `Finished`.

use std::fmt;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use lumen_core::{Color, ViewportSize};

use crate::batcher::Batcher;
use crate::buffer::BufferWriter;
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::raytracer::Renderer;
use crate::worker::{self, lock, WorkerContext, WorkerFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderState {
    Unstarted,
    Running,
    Paused,
    Cancelled,
    Finished,
}

impl RenderState {
    /// Returns true if no further work will happen without `initialize`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RenderState::Cancelled | RenderState::Finished)
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderState::Unstarted => "Unstarted",
            RenderState::Running => "Running",
            RenderState::Paused => "Paused",
            RenderState::Cancelled => "Cancelled",
            RenderState::Finished => "Finished",
        };
        f.write_str(name)
    }
}

/// A state transition, as published to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub old: RenderState,
    pub new: RenderState,
}

struct StateCell {
    state: RenderState,
    listeners: Vec<mpsc::Sender<StateChange>>,
    /// Every worker of the current render has exited.
    workers_done: bool,
}

impl StateCell {
    fn set(&mut self, to: RenderState) {
        let change = StateChange {
            old: self.state,
            new: to,
        };
        self.state = to;
        self.listeners.retain(|listener| listener.send(change).is_ok());
        log::info!("Render state {} -> {to}", change.old);
    }
}

/// State shared with the completion barrier thread.
struct SharedState {
    cell: Mutex<StateCell>,
}

impl SharedState {
    fn new() -> Self {
        Self {
            cell: Mutex::new(StateCell {
                state: RenderState::Unstarted,
                listeners: Vec::new(),
                workers_done: false,
            }),
        }
    }

    fn get(&self) -> RenderState {
        lock(&self.cell).state
    }

    /// Move to `to` if the current state is one of `from`. Listeners are
    /// notified while the lock is held, so they see transitions in order.
    fn transition(&self, from: &[RenderState], to: RenderState) -> bool {
        let mut cell = lock(&self.cell);
        let old = cell.state;
        if !from.contains(&old) {
            log::debug!("Ignoring transition {old} -> {to}");
            return false;
        }

        cell.set(to);
        true
    }

    /// Called once all workers have exited. Only a running render finishes
    /// here; a paused one finishes on resume.
    fn workers_finished(&self) {
        let mut cell = lock(&self.cell);
        cell.workers_done = true;
        if cell.state == RenderState::Running {
            cell.set(RenderState::Finished);
        }
    }

    /// `Paused -> Running`, then `Running -> Finished` if the workers
    /// already ran out of batches.
    fn resume(&self) -> bool {
        let mut cell = lock(&self.cell);
        if cell.state != RenderState::Paused {
            log::debug!("Ignoring transition {} -> {}", cell.state, RenderState::Running);
            return false;
        }
        cell.set(RenderState::Running);
        if cell.workers_done {
            cell.set(RenderState::Finished);
        }
        true
    }

    fn reset(&self) {
        let mut cell = lock(&self.cell);
        cell.workers_done = false;
        if cell.state != RenderState::Unstarted {
            cell.set(RenderState::Unstarted);
        }
    }

    fn subscribe(&self) -> mpsc::Receiver<StateChange> {
        let (sender, receiver) = mpsc::channel();
        lock(&self.cell).listeners.push(sender);
        receiver
    }
}

/// Drives a render across a pool of worker threads.
pub struct RendererCoordinator {
    renderer: Arc<dyn Renderer>,
    buffer: Arc<dyn BufferWriter>,
    batcher: Arc<Mutex<Box<dyn Batcher>>>,
    viewport: ViewportSize,
    thread_count: usize,
    state: Arc<SharedState>,
    workers: Vec<Arc<WorkerFlags>>,
    barrier: Option<JoinHandle<()>>,
}

impl RendererCoordinator {
    pub fn new(
        renderer: Arc<dyn Renderer>,
        buffer: Arc<dyn BufferWriter>,
        batcher: Box<dyn Batcher>,
        thread_count: usize,
    ) -> Self {
        let thread_count = if thread_count > 1 && !renderer.is_multi_threaded() {
            log::debug!("Renderer is single-threaded; using one worker");
            1
        } else {
            thread_count
        };
        if thread_count == 0 {
            log::warn!("Coordinator created with 0 threads; start() will cancel immediately");
        }

        let mut coordinator = Self {
            renderer,
            viewport: buffer.size(),
            buffer,
            batcher: Arc::new(Mutex::new(batcher)),
            thread_count,
            state: Arc::new(SharedState::new()),
            workers: Vec::new(),
            barrier: None,
        };
        coordinator.initialize();
        coordinator
    }

    /// Coordinator using the configured batcher and thread count.
    pub fn from_config(
        renderer: Arc<dyn Renderer>,
        buffer: Arc<dyn BufferWriter>,
        config: &RenderConfig,
    ) -> Self {
        Self::new(renderer, buffer, config.make_batcher(), config.thread_count)
    }

    pub fn state(&self) -> RenderState {
        self.state.get()
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Share of batches handed out so far, in [0, 1].
    pub fn progress(&self) -> f64 {
        lock(&self.batcher).progress()
    }

    pub fn batcher_name(&self) -> &'static str {
        lock(&self.batcher).display_name()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> mpsc::Receiver<StateChange> {
        self.state.subscribe()
    }

    /// Stop any running workers and return to `Unstarted` with a cleared
    /// buffer and a fresh batcher.
    pub fn initialize(&mut self) {
        self.cancel();
        self.stop_workers();
        self.state.reset();
        self.buffer.clear_all(Color::TRANSPARENT_BLACK);

        let mut batcher = lock(&self.batcher);
        batcher.initialize(self.viewport);
        log::debug!(
            "Initialized {} batcher for {}x{}",
            batcher.display_name(),
            self.viewport.width,
            self.viewport.height
        );
    }

    /// Spawn the workers. Returns `Ok(false)` if the render was not
    /// `Unstarted`.
    pub fn start(&mut self) -> RenderResult<bool> {
        if self.thread_count == 0 {
            return Ok(self
                .state
                .transition(&[RenderState::Unstarted], RenderState::Cancelled));
        }
        if !self
            .state
            .transition(&[RenderState::Unstarted], RenderState::Running)
        {
            return Ok(false);
        }

        let context = WorkerContext {
            renderer: self.renderer.clone(),
            buffer: self.buffer.clone(),
            batcher: self.batcher.clone(),
        };

        let mut handles = Vec::with_capacity(self.thread_count);
        for id in 0..self.thread_count {
            let flags = Arc::new(WorkerFlags::default());
            match worker::spawn(id, context.clone(), flags.clone()) {
                Ok(handle) => {
                    handles.push(handle);
                    self.workers.push(flags);
                }
                Err(err) => {
                    self.abort_start(handles);
                    return Err(err.into());
                }
            }
        }

        let state = self.state.clone();
        let barrier = thread::Builder::new()
            .name("lumen-barrier".to_string())
            .spawn(move || {
                for handle in handles {
                    if handle.join().is_err() {
                        log::warn!("A render worker panicked");
                    }
                }
                state.workers_finished();
            });

        match barrier {
            Ok(barrier) => {
                self.barrier = Some(barrier);
                Ok(true)
            }
            Err(err) => {
                self.abort_start(Vec::new());
                Err(err.into())
            }
        }
    }

    fn abort_start(&mut self, handles: Vec<JoinHandle<()>>) {
        for flags in &self.workers {
            flags.cancel();
        }
        for handle in handles {
            let _ = handle.join();
        }
        self.workers.clear();
        self.state.transition(
            &[RenderState::Running, RenderState::Paused],
            RenderState::Cancelled,
        );
    }

    pub fn pause(&self) -> bool {
        if !self
            .state
            .transition(&[RenderState::Running], RenderState::Paused)
        {
            return false;
        }
        for flags in &self.workers {
            flags.set_paused(true);
        }
        true
    }

    pub fn resume(&self) -> bool {
        if !self.state.resume() {
            return false;
        }
        for flags in &self.workers {
            flags.set_paused(false);
        }
        true
    }

    /// Stop the workers at their next pixel. Pixels already written stay.
    pub fn cancel(&self) -> bool {
        if !self.state.transition(
            &[RenderState::Running, RenderState::Paused],
            RenderState::Cancelled,
        ) {
            return false;
        }
        for flags in &self.workers {
            flags.cancel();
        }
        true
    }

    /// Block until every worker has exited and return the final state.
    ///
    /// Returns immediately when the render was never started, and when it
    /// is paused, since paused workers only exit once resumed or cancelled.
    pub fn wait(&mut self) -> RenderState {
        let state = self.state();
        if state == RenderState::Paused {
            log::debug!("Not waiting on a paused render");
            return state;
        }
        self.join_barrier();
        self.state()
    }

    fn join_barrier(&mut self) {
        if let Some(barrier) = self.barrier.take() {
            if barrier.join().is_err() {
                log::warn!("Render completion barrier panicked");
            }
        }
        self.workers.clear();
    }

    fn stop_workers(&mut self) {
        for flags in &self.workers {
            flags.cancel();
        }
        self.join_barrier();
    }
}

impl Drop for RendererCoordinator {
    fn drop(&mut self) {
        self.cancel();
        self.stop_workers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(RenderState::Unstarted.to_string(), "Unstarted");
        assert_eq!(RenderState::Finished.to_string(), "Finished");
        assert!(RenderState::Cancelled.is_terminal());
        assert!(!RenderState::Paused.is_terminal());
    }

    #[test]
    fn test_transition_rules() {
        let state = SharedState::new();
        let events = state.subscribe();

        assert!(!state.transition(&[RenderState::Running], RenderState::Paused));
        assert!(state.transition(&[RenderState::Unstarted], RenderState::Running));
        assert!(state.transition(&[RenderState::Running], RenderState::Finished));
        state.reset();

        let changes: Vec<StateChange> = events.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                StateChange {
                    old: RenderState::Unstarted,
                    new: RenderState::Running
                },
                StateChange {
                    old: RenderState::Running,
                    new: RenderState::Finished
                },
                StateChange {
                    old: RenderState::Finished,
                    new: RenderState::Unstarted
                },
            ]
        );
    }

    #[test]
    fn test_workers_finishing_while_paused_finish_on_resume() {
        let state = SharedState::new();
        assert!(state.transition(&[RenderState::Unstarted], RenderState::Running));
        assert!(state.transition(&[RenderState::Running], RenderState::Paused));
        let events = state.subscribe();

        state.workers_finished();
        assert_eq!(state.get(), RenderState::Paused);

        assert!(state.resume());
        assert_eq!(state.get(), RenderState::Finished);
        let changes: Vec<StateChange> = events.try_iter().collect();
        assert_eq!(
            changes,
            vec![
                StateChange {
                    old: RenderState::Paused,
                    new: RenderState::Running
                },
                StateChange {
                    old: RenderState::Running,
                    new: RenderState::Finished
                },
            ]
        );

        state.reset();
        assert!(!lock(&state.cell).workers_done);
    }

    #[test]
    fn test_dropped_listener_is_pruned() {
        let state = SharedState::new();
        drop(state.subscribe());
        assert!(state.transition(&[RenderState::Unstarted], RenderState::Running));
        assert!(lock(&state.cell).listeners.is_empty());
    }
}
