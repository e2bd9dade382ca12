//! Render worker threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::batcher::{Batch, Batcher};
use crate::buffer::BufferWriter;
use crate::raytracer::Renderer;

/// How long a paused worker sleeps between checks of its flags.
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Control flags owned by one worker and set by the coordinator.
#[derive(Debug, Default)]
pub(crate) struct WorkerFlags {
    pause: AtomicBool,
    cancel: AtomicBool,
}

impl WorkerFlags {
    pub fn set_paused(&self, paused: bool) {
        self.pause.store(paused, Ordering::Release);
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn is_paused(&self) -> bool {
        self.pause.load(Ordering::Acquire)
    }
}

/// Everything a worker shares with the rest of the render.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub renderer: Arc<dyn Renderer>,
    pub buffer: Arc<dyn BufferWriter>,
    pub batcher: Arc<Mutex<Box<dyn Batcher>>>,
}

/// Lock a mutex, recovering the data if another thread panicked with it held.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawn worker `id` as a named OS thread.
pub(crate) fn spawn(
    id: usize,
    context: WorkerContext,
    flags: Arc<WorkerFlags>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("lumen-worker-{id}"))
        .spawn(move || {
            log::debug!("Worker {id} started");
            run(&context, &flags);
            log::debug!("Worker {id} exited");
        })
}

fn next_batch(context: &WorkerContext) -> Option<Batch> {
    lock(&context.batcher).next_batch()
}

fn run(context: &WorkerContext, flags: &WorkerFlags) {
    while !flags.is_cancelled() {
        let Some(batch) = next_batch(context) else {
            // Out of work
            flags.cancel();
            return;
        };

        for pixel in batch {
            while flags.is_paused() && !flags.is_cancelled() {
                thread::sleep(PAUSE_POLL_INTERVAL);
            }
            if flags.is_cancelled() {
                return;
            }

            let color = context.renderer.render(pixel);
            context.buffer.set_pixel(pixel.x, pixel.y, color);
        }
    }
}
