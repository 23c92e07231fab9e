//! Double-buffered wavetable hand-off between control and render contexts.
//!
//! The control side owns a `TablePublisher`; each render-side oscillator owns a
//! `TableReader`. Publishing builds a new reference-counted snapshot and swaps
//! it into a shared cell. Readers pick the current snapshot up once per render
//! block with `refresh()`, which only bumps a reference count.
//!
//! Snapshots released on the audio thread are not freed there. `basedrop`
//! queues them on the publisher's collector, and the publisher frees them on
//! its next `publish()` or `collect_garbage()`.

use crate::Wavetable;
use basedrop::{Collector, Shared, SharedCell};
use std::sync::Arc;

/// Control-side owner of the current wavetable snapshot.
pub struct TablePublisher {
    collector: Collector,
    cell: Arc<SharedCell<Wavetable>>,
}

impl TablePublisher {
    /// Creates a publisher whose first snapshot is `table`.
    pub fn new(table: Wavetable) -> Self {
        let collector = Collector::new();
        let initial = Shared::new(&collector.handle(), table);
        Self {
            collector,
            cell: Arc::new(SharedCell::new(initial)),
        }
    }

    /// Makes `table` the snapshot readers see from their next refresh on.
    pub fn publish(&mut self, table: Wavetable) {
        log::trace!("publishing {}-sample wavetable", table.len());
        let snapshot = Shared::new(&self.collector.handle(), table);
        self.cell.set(snapshot);
        self.collector.collect();
    }

    /// The snapshot readers currently see.
    pub fn current(&self) -> Shared<Wavetable> {
        self.cell.get()
    }

    /// Creates a reader already holding the current snapshot.
    pub fn subscribe(&self) -> TableReader {
        TableReader {
            cell: Arc::clone(&self.cell),
            current: self.cell.get(),
        }
    }

    /// Frees snapshots that readers have released.
    pub fn collect_garbage(&mut self) {
        self.collector.collect();
    }
}

/// Render-side view of the published wavetable.
pub struct TableReader {
    cell: Arc<SharedCell<Wavetable>>,
    current: Shared<Wavetable>,
}

impl TableReader {
    /// Picks up the most recently published snapshot. Never allocates or blocks.
    #[inline]
    pub fn refresh(&mut self) {
        self.current = self.cell.get();
    }

    /// The snapshot taken at the last refresh.
    #[inline]
    pub fn table(&self) -> &Wavetable {
        &self.current
    }
}
