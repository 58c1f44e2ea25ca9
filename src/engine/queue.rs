use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::generator::batch::BatchGenerator;
use crate::model::item::ReturnItem;
use crate::session::rules::GameRules;

/// Slack on top of the race deadline when waiting out an in-flight batch.
const DELIVERY_MARGIN: Duration = Duration::from_millis(200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching { epoch: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefillMode {
    /// Batches are produced on a worker thread.
    Background,
    /// Batches are produced inside `request`; zero-latency generation.
    Inline,
}

struct Delivery {
    epoch: u64,
    items: Vec<ReturnItem>,
}

/// Lookahead buffer of items with single-flight replenishment.
pub struct ItemQueue {
    generator: Arc<BatchGenerator>,
    mode: RefillMode,
    buffer: VecDeque<ReturnItem>,
    current: Option<ReturnItem>,
    fetch: FetchState,
    epoch: u64,
    level: u32,
    low_water: usize,
    refill_batch: usize,
    tx: Sender<Delivery>,
    rx: Receiver<Delivery>,
    emergency_fetches: u32,
}

impl ItemQueue {
    pub fn new(generator: Arc<BatchGenerator>, rules: &GameRules, mode: RefillMode) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            generator,
            mode,
            buffer: VecDeque::new(),
            current: None,
            fetch: FetchState::Idle,
            epoch: 0,
            level: 1,
            low_water: rules.low_water,
            refill_batch: rules.refill_batch.max(1),
            tx,
            rx,
            emergency_fetches: 0,
        }
    }

    /// Drop everything queued for the previous level. Any batch still in
    /// flight belongs to the old epoch and will be ignored on arrival.
    pub fn reset(&mut self, level: u32) -> u64 {
        self.epoch += 1;
        self.level = level;
        self.buffer.clear();
        self.current = None;
        self.fetch = FetchState::Idle;
        self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn fetch_state(&self) -> FetchState {
        self.fetch
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.fetch, FetchState::Fetching { .. })
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn current(&self) -> Option<&ReturnItem> {
        self.current.as_ref()
    }

    pub fn emergency_fetches(&self) -> u32 {
        self.emergency_fetches
    }

    /// No item to show and nothing buffered.
    pub fn is_starving(&self) -> bool {
        self.current.is_none() && self.buffer.is_empty()
    }

    /// Ask for `count` more items. Refused while another request is in
    /// flight.
    pub fn request(&mut self, count: usize) -> bool {
        if self.is_fetching() {
            return false;
        }
        let epoch = self.epoch;
        let level = self.level;
        self.fetch = FetchState::Fetching { epoch };
        tracing::debug!(epoch, level, count, buffered = self.buffer.len(), "requesting batch");

        match self.mode {
            RefillMode::Inline => {
                let items = self.generator.produce(level, count);
                let _ = self.tx.send(Delivery { epoch, items });
            }
            RefillMode::Background => {
                let generator = Arc::clone(&self.generator);
                let tx = self.tx.clone();
                let spawned = thread::Builder::new()
                    .name("queue-refill".to_string())
                    .spawn(move || {
                        let items = generator.produce(level, count);
                        let _ = tx.send(Delivery { epoch, items });
                    });
                if let Err(err) = spawned {
                    tracing::warn!(error = %err, "refill thread failed to start, generating inline");
                    let items = self.generator.local_batch(level, count);
                    let _ = self.tx.send(Delivery { epoch, items });
                }
            }
        }
        true
    }

    /// Collect finished batches, fill the current slot, and start a refill
    /// when the buffer runs low and `replenish` is set.
    pub fn pump(&mut self, replenish: bool) {
        while let Ok(delivery) = self.rx.try_recv() {
            self.accept(delivery);
        }
        self.promote();
        if replenish && self.buffer.len() < self.low_water {
            self.request(self.refill_batch);
        }
    }

    fn accept(&mut self, delivery: Delivery) {
        if delivery.epoch != self.epoch {
            tracing::debug!(
                stale = delivery.epoch,
                current = self.epoch,
                "discarding batch from an earlier level"
            );
            return;
        }
        if self.fetch == (FetchState::Fetching { epoch: delivery.epoch }) {
            self.fetch = FetchState::Idle;
        }
        self.buffer.extend(delivery.items);
    }

    fn promote(&mut self) {
        if self.current.is_none() {
            self.current = self.buffer.pop_front();
        }
    }

    /// Last-resort fill when the player would otherwise face an empty
    /// screen: wait out a batch already in flight, or generate one here.
    pub fn emergency_fill(&mut self) {
        if !self.is_starving() {
            return;
        }
        self.emergency_fetches += 1;
        tracing::warn!(epoch = self.epoch, fetching = self.is_fetching(), "queue starved");

        if self.is_fetching() {
            let deadline = Instant::now() + self.generator.remote_timeout() + DELIVERY_MARGIN;
            while self.is_fetching() {
                let wait = deadline.saturating_duration_since(Instant::now());
                match self.rx.recv_timeout(wait) {
                    Ok(delivery) => self.accept(delivery),
                    Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }

        self.promote();
        if self.current.is_none() {
            let items = self.generator.produce(self.level, self.refill_batch);
            self.buffer.extend(items);
            self.promote();
        }
    }

    /// Release the item that was just judged.
    pub fn finish_current(&mut self) -> Option<ReturnItem> {
        self.current.take()
    }
}
