use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::{error, info};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Receiving side of the shutdown channel, cloned into each background loop.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: Receiver<()>,
}

impl ShutdownSignal {
    /// Block for at most `timeout`. Returns `true` if shutdown was requested.
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    /// Block until `deadline`. Returns `true` if shutdown was requested.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        self.wait(deadline.saturating_duration_since(Instant::now()))
    }

    /// Non-blocking check.
    pub fn is_requested(&self) -> bool {
        self.wait(Duration::ZERO)
    }
}

/// Create a connected trigger/signal pair.
pub fn shutdown_channel() -> (Sender<()>, ShutdownSignal) {
    let (tx, rx) = bounded::<()>(1);
    (tx, ShutdownSignal { rx })
}

/// Named background threads sharing one shutdown trigger.
pub struct BackgroundTasks {
    trigger: Option<Sender<()>>,
    signal: ShutdownSignal,
    handles: Vec<(String, JoinHandle<()>)>,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        let (trigger, signal) = shutdown_channel();
        Self {
            trigger: Some(trigger),
            signal,
            handles: Vec::new(),
        }
    }

    /// Spawn `task` on a named thread, handing it a clone of the shutdown signal.
    pub fn spawn<F>(&mut self, name: &str, task: F) -> std::io::Result<()>
    where
        F: FnOnce(ShutdownSignal) + Send + 'static,
    {
        let signal = self.signal.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || task(signal))?;
        info!("Started background task {}", name);
        self.handles.push((name.to_string(), handle));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Signal every task to stop and join them.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        // Disconnecting wakes every waiter at once.
        self.trigger.take();
        for (name, handle) in self.handles.drain(..) {
            match handle.join() {
                Ok(()) => info!("Background task {} stopped", name),
                Err(_) => error!("Background task {} panicked", name),
            }
        }
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
