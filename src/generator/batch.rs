use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rand::rngs::SmallRng;

use crate::generator::local::LocalGenerator;
use crate::generator::{ContentSource, ItemSource};
use crate::model::item::ReturnItem;

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_millis(800);

/// Races the content source against a deadline, with the local catalog as
/// the answer whenever the source is late, broken or absent.
pub struct BatchGenerator {
    local: Mutex<LocalGenerator>,
    source: Option<Arc<dyn ContentSource>>,
    remote_timeout: Duration,
}

impl BatchGenerator {
    pub fn new(
        rng: SmallRng,
        source: Option<Arc<dyn ContentSource>>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            local: Mutex::new(LocalGenerator::new(rng)),
            source,
            remote_timeout,
        }
    }

    pub fn local_only(rng: SmallRng) -> Self {
        Self::new(rng, None, DEFAULT_REMOTE_TIMEOUT)
    }

    pub fn has_remote(&self) -> bool {
        self.source.is_some()
    }

    pub fn remote_timeout(&self) -> Duration {
        self.remote_timeout
    }

    pub fn local_batch(&self, level: u32, count: usize) -> Vec<ReturnItem> {
        let mut local = self.local.lock().unwrap_or_else(|e| e.into_inner());
        local.generate(level, count)
    }

    /// Always returns `count` items, within roughly `remote_timeout`.
    pub fn produce(&self, level: u32, count: usize) -> Vec<ReturnItem> {
        let local = self.local_batch(level, count);
        let Some(source) = self.source.as_ref() else {
            return local;
        };

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(source);
        let spawned = thread::Builder::new()
            .name("content-fetch".to_string())
            .spawn(move || {
                // The receiver is gone once the deadline passes; a late
                // result is simply dropped here.
                let _ = tx.send(source.fetch(level, count));
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "could not start content fetch, using local items");
            return local;
        }

        match rx.recv_timeout(self.remote_timeout) {
            Ok(Ok(remote)) => {
                tracing::debug!(level, received = remote.len(), "content source won the race");
                fill_from_local(remote, local, count)
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "content source failed, using local items");
                local
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(
                    timeout_ms = self.remote_timeout.as_millis() as u64,
                    "content source timed out, using local items"
                );
                local
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("content fetch exited without a result, using local items");
                local
            }
        }
    }
}

impl ItemSource for BatchGenerator {
    fn generate(&mut self, level: u32, count: usize) -> Vec<ReturnItem> {
        self.produce(level, count)
    }
}

fn fill_from_local(mut remote: Vec<ReturnItem>, local: Vec<ReturnItem>, count: usize) -> Vec<ReturnItem> {
    remote.truncate(count);
    let missing = count - remote.len();
    remote.extend(local.into_iter().take(missing));
    remote
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;
    use crate::generator::ContentError;
    use crate::model::item::{Category, ItemType, VisualDefect};

    struct Hanging;

    impl ContentSource for Hanging {
        fn fetch(&self, _level: u32, _count: usize) -> Result<Vec<ReturnItem>, ContentError> {
            thread::sleep(Duration::from_secs(30));
            Ok(Vec::new())
        }
    }

    struct Failing;

    impl ContentSource for Failing {
        fn fetch(&self, _level: u32, _count: usize) -> Result<Vec<ReturnItem>, ContentError> {
            Err(ContentError::Http("connection refused".to_string()))
        }
    }

    struct Fixed(usize);

    impl ContentSource for Fixed {
        fn fetch(&self, _level: u32, _count: usize) -> Result<Vec<ReturnItem>, ContentError> {
            Ok((0..self.0).map(|_| remote_item()).collect())
        }
    }

    fn remote_item() -> ReturnItem {
        ReturnItem {
            id: ReturnItem::new_id(),
            name: "Remote Boot".to_string(),
            category: Category::Male,
            item_type: ItemType::Shoe,
            material: "Suede".to_string(),
            description: "From the source.".to_string(),
            visual_defects: vec![VisualDefect::None],
            is_fraud: false,
            color: "#000000".to_string(),
            explanation: "Fine.".to_string(),
        }
    }

    fn generator(source: Option<Arc<dyn ContentSource>>, timeout: Duration) -> BatchGenerator {
        BatchGenerator::new(SmallRng::seed_from_u64(42), source, timeout)
    }

    #[test]
    fn hanging_source_resolves_at_deadline_with_local_items() {
        let g = generator(Some(Arc::new(Hanging)), DEFAULT_REMOTE_TIMEOUT);
        let start = Instant::now();
        let items = g.produce(1, 5);
        let elapsed = start.elapsed();

        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|i| i.name != "Remote Boot"));
        assert!(elapsed >= Duration::from_millis(790), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "{elapsed:?}");
    }

    #[test]
    fn failing_source_falls_back_immediately() {
        let g = generator(Some(Arc::new(Failing)), Duration::from_secs(5));
        let start = Instant::now();
        let items = g.produce(2, 5);
        assert_eq!(items.len(), 5);
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(items.iter().all(|i| i.is_consistent()));
    }

    #[test]
    fn fast_source_wins() {
        let g = generator(Some(Arc::new(Fixed(5))), Duration::from_secs(5));
        let items = g.produce(1, 5);
        assert!(items.iter().all(|i| i.name == "Remote Boot"));
    }

    #[test]
    fn short_remote_batch_is_topped_up() {
        let g = generator(Some(Arc::new(Fixed(2))), Duration::from_secs(5));
        let items = g.produce(1, 5);
        assert_eq!(items.len(), 5);
        assert_eq!(items.iter().filter(|i| i.name == "Remote Boot").count(), 2);
    }

    #[test]
    fn long_remote_batch_is_truncated() {
        let g = generator(Some(Arc::new(Fixed(9))), Duration::from_secs(5));
        assert_eq!(g.produce(1, 5).len(), 5);
    }

    #[test]
    fn no_source_is_local() {
        let g = BatchGenerator::local_only(SmallRng::seed_from_u64(1));
        assert!(!g.has_remote());
        assert_eq!(g.produce(1, 8).len(), 8);
    }
}
