use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec2;

/// A request to strike the cue ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub impulse: Vec2,
}

impl ShotRequest {
    pub fn new(impulse: Vec2) -> Self {
        Self { impulse }
    }
}

/// Shot requests waiting for the simulation thread.
/// UI threads push through a `ShotSender`; the owner drains once per step.
pub struct ShotQueue {
    requests: Arc<Mutex<Vec<ShotRequest>>>,
}

impl ShotQueue {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::with_capacity(4))),
        }
    }

    /// A handle other threads can push through.
    pub fn sender(&self) -> ShotSender {
        ShotSender {
            requests: Arc::clone(&self.requests),
        }
    }

    /// Push from the owning thread.
    pub fn push(&self, request: ShotRequest) {
        lock(&self.requests).push(request);
    }

    /// Drain all pending requests, oldest first.
    pub fn drain(&self) -> Vec<ShotRequest> {
        std::mem::take(&mut *lock(&self.requests))
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.requests).is_empty()
    }

    pub fn len(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Default for ShotQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable write end of a `ShotQueue`.
#[derive(Clone)]
pub struct ShotSender {
    requests: Arc<Mutex<Vec<ShotRequest>>>,
}

impl ShotSender {
    pub fn send(&self, impulse: Vec2) {
        lock(&self.requests).push(ShotRequest::new(impulse));
    }
}

fn lock(requests: &Mutex<Vec<ShotRequest>>) -> MutexGuard<'_, Vec<ShotRequest>> {
    requests.lock().unwrap_or_else(|p| p.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let q = ShotQueue::new();
        q.push(ShotRequest::new(Vec2::new(1.0, 0.0)));
        q.push(ShotRequest::new(Vec2::new(0.0, 2.0)));
        assert_eq!(q.len(), 2);
        let requests = q.drain();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].impulse, Vec2::new(1.0, 0.0));
        assert!(q.is_empty());
    }

    #[test]
    fn sender_crosses_threads() {
        let q = ShotQueue::new();
        let sender = q.sender();
        let handle = std::thread::spawn(move || {
            sender.send(Vec2::new(0.5, 0.5));
            sender.send(Vec2::new(0.1, 0.0));
        });
        handle.join().unwrap();

        let requests = q.drain();
        assert_eq!(
            requests,
            vec![
                ShotRequest::new(Vec2::new(0.5, 0.5)),
                ShotRequest::new(Vec2::new(0.1, 0.0)),
            ]
        );
    }
}
