//! Server-backed collections with refresh signalling.
//!
//! A [`RefreshSignal`] is a counter owned by the dashboard. Each [`History`]
//! remembers the last signal value it fetched for, so bumping the counter is
//! enough to make the view re-fetch on the next sync.

/// Monotonic refresh counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSignal(u64);

impl RefreshSignal {
    /// Request a refresh from every view watching this signal.
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Current counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Items as last returned by the server, plus a loading flag.
#[derive(Debug, Clone)]
pub struct History<T> {
    items: Vec<T>,
    loading: bool,
    seen: Option<RefreshSignal>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loading: true, seen: None }
    }
}

impl<T> History<T> {
    /// Unfetched, loading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current signal. Returns true if a fetch is due: on the
    /// first observation and whenever the signal changed since the last one.
    pub fn observe(&mut self, signal: RefreshSignal) -> bool {
        if self.seen == Some(signal) {
            return false;
        }
        self.seen = Some(signal);
        true
    }

    /// Replace the collection with a fresh server response.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
    }

    /// A fetch failed. The previous collection stays.
    pub fn fetch_failed(&mut self) {
        self.loading = false;
    }

    /// Items in server order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// True until the first response (success or failure).
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True once loaded with nothing in it.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
