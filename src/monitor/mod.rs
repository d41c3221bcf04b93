//! Change-detecting stock monitor
//!
//! Polls a [`StockSource`] at a fixed interval and hands the rows to a
//! [`RenderSink`] whenever they differ from the last drawn snapshot. The
//! first successful read always renders.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use tracing::{debug, info, warn};

use crate::database::{StockItem, StockStore};
use crate::error::{StockError, Result};
use crate::render::RenderSink;

/// Comparable form of one stock row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    pub product_code: String,
    pub item: String,
    pub quantity: u64,
    pub low_threshold: u64,
    pub on_order: bool,
}

impl From<&StockItem> for SnapshotRow {
    fn from(item: &StockItem) -> Self {
        Self {
            product_code: item.product_code.clone(),
            item: item.item.clone(),
            quantity: item.quantity,
            low_threshold: item.low_threshold,
            on_order: item.on_order,
        }
    }
}

/// All rows at one point in time, in store order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot(Vec<SnapshotRow>);

impl Snapshot {
    pub fn from_items(items: &[StockItem]) -> Self {
        Self(items.iter().map(SnapshotRow::from).collect())
    }

    pub fn rows(&self) -> &[SnapshotRow] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where the monitor reads stock from
pub trait StockSource {
    /// All rows ordered by item name
    fn fetch_all(&self) -> Result<Vec<StockItem>>;
}

impl StockSource for StockStore {
    fn fetch_all(&self) -> Result<Vec<StockItem>> {
        StockStore::fetch_all(self)
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stock changed and the sink drew it
    Rendered,
    /// Stock matched the last drawn snapshot
    Unchanged,
    /// Reading or drawing failed; the next tick tries again
    Failed,
}

/// Polling loop state
pub struct Monitor<S, R> {
    source: S,
    sink: R,
    interval: Duration,
    /// None until the first frame is drawn
    last_snapshot: Option<Snapshot>,
}

impl<S: StockSource, R: RenderSink> Monitor<S, R> {
    pub fn new(source: S, sink: R, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            last_snapshot: None,
        }
    }

    /// Get the polling interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Get the snapshot most recently drawn
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    /// Get the render sink
    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Get the stock source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read the stock once and render it if it changed
    pub fn tick(&mut self) -> TickOutcome {
        let stock = match self.source.fetch_all() {
            Ok(stock) => stock,
            Err(err) => {
                warn!(error = %err, transient = err.is_transient(), "stock read failed, skipping tick");
                return TickOutcome::Failed;
            }
        };

        let snapshot = Snapshot::from_items(&stock);
        if self.last_snapshot.as_ref() == Some(&snapshot) {
            return TickOutcome::Unchanged;
        }

        match self.sink.render(&stock) {
            Ok(()) => {
                debug!(rows = snapshot.len(), "stock changed, rendered");
                self.last_snapshot = Some(snapshot);
                TickOutcome::Rendered
            }
            Err(err) => {
                warn!(error = %err, "render failed, retrying next tick");
                TickOutcome::Failed
            }
        }
    }

    /// Tick forever on the calling thread
    pub fn run(&mut self) -> ! {
        info!(interval_ms = self.interval.as_millis() as u64, "stock monitor started");
        loop {
            self.tick();
            thread::sleep(self.interval);
        }
    }

    /// Tick until a message arrives on `stop` or its sender is dropped
    ///
    /// Waiting on the channel replaces the sleep between ticks, so a stop
    /// request is noticed without waiting out the interval.
    pub fn run_until(&mut self, stop: &Receiver<()>) {
        info!(interval_ms = self.interval.as_millis() as u64, "stock monitor started");
        loop {
            self.tick();
            match stop.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        info!("stock monitor stopped");
    }
}

impl<S, R> Monitor<S, R>
where
    S: StockSource + Send + 'static,
    R: RenderSink + Send + 'static,
{
    /// Run the loop on a dedicated thread
    pub fn spawn(mut self) -> Result<MonitorHandle<S, R>> {
        let (stop_tx, stop_rx) = bounded(1);
        let thread = thread::Builder::new()
            .name("stock-monitor".to_string())
            .spawn(move || {
                self.run_until(&stop_rx);
                self
            })?;
        Ok(MonitorHandle { stop_tx, thread })
    }
}

/// Handle to a monitor running on its own thread
pub struct MonitorHandle<S, R> {
    stop_tx: Sender<()>,
    thread: JoinHandle<Monitor<S, R>>,
}

impl<S, R> MonitorHandle<S, R> {
    /// Ask the monitor to stop and wait for it, returning its final state
    pub fn stop(self) -> Result<Monitor<S, R>> {
        // A full channel or a gone receiver both mean the loop will exit.
        let _ = self.stop_tx.try_send(());
        self.thread.join().map_err(|_| StockError::MonitorPanicked)
    }

    /// Check if the monitor thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}
