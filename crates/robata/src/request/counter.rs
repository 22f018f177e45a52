use std::sync::atomic::{AtomicU64, Ordering};

/// Issues unique, strictly increasing request identifiers.
///
/// Identifiers are rendered as decimal strings starting at `"0"`. A value is
/// never reissued and the counter never moves backwards for the lifetime of
/// the allocator, so every request a driver instance submits carries a
/// distinct ID regardless of how many `generate` calls produced them.
///
/// The submission loop is single-threaded, but allocation is a fetch-add on
/// an atomic so the contract holds even if IDs are drawn from several
/// threads.
#[derive(Debug, Default)]
pub struct RequestCounter {
    next: AtomicU64,
}

impl RequestCounter {
    /// Creates a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next identifier.
    ///
    /// Strictly greater in issuance order than every previously returned
    /// value.
    pub fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
