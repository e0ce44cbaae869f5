//! Items queued for a future tick, e.g. delayed replies a narrative layer
//! wants handed back when their time comes.

#[derive(Debug, Clone)]
pub struct Schedule<T> {
    pending: Vec<(u64, T)>,
}

impl<T> Schedule<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, due: u64, item: T) {
        self.pending.push((due, item));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every item due at or before `tick`, in the order
    /// they were pushed.
    pub fn drain_due(&mut self, tick: u64) -> Vec<T> {
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _)| *at <= tick);
        self.pending = later;
        due.into_iter().map(|(_, item)| item).collect()
    }
}

impl<T> Default for Schedule<T> {
    fn default() -> Self {
        Self::new()
    }
}
