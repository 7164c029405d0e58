use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tiller_core::Telemetry;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Arc<dyn Fn(&Telemetry) + Send + Sync>;

/// Fans decoded telemetry out to zero or more registered observers.
/// Registration and removal take the lock only long enough to touch the
/// map, so they neither block nor are blocked by an in-flight poll.
#[derive(Default)]
pub struct TelemetryHub {
    observers: Mutex<HashMap<u64, Observer>>,
    next_id: AtomicU64,
}

impl TelemetryHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&Telemetry) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().await.insert(id, Arc::new(observer));
        ObserverId(id)
    }

    pub async fn unsubscribe(&self, id: ObserverId) {
        self.observers.lock().await.remove(&id.0);
    }

    pub async fn publish(&self, telemetry: &Telemetry) {
        // Snapshot under the lock, invoke outside it.
        let observers: Vec<Observer> = self.observers.lock().await.values().cloned().collect();
        for observer in observers {
            observer(telemetry);
        }
    }

    pub async fn len(&self) -> usize {
        self.observers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.observers.lock().await.is_empty()
    }
}
