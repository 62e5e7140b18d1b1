use std::{fmt::Display, sync::{atomic::{AtomicU64, Ordering}, Arc}};

use once_cell::sync::Lazy;

/// Name of the namespace one synthesis call puts all its symbols in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdentifier(String);

impl ScopeIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<scope>::<symbol>`
    pub fn qualify(&self, symbol: &str) -> String {
        format!("{}::{}", self.0, symbol)
    }
}

impl Display for ScopeIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

static PROCESS_SCOPES: Lazy<Arc<ScopeCounter>> = Lazy::new(|| Arc::new(ScopeCounter::new()));

/// Monotonic source of scope identifiers.
///
/// Identifiers are never reclaimed. Every context submitting to the same
/// compilation service must draw from the same counter.
#[derive(Debug, Default)]
pub struct ScopeCounter {
    next: AtomicU64,
}

impl ScopeCounter {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(0) }
    }

    /// The counter shared by every context of this process.
    pub fn process_wide() -> Arc<ScopeCounter> {
        Arc::clone(&PROCESS_SCOPES)
    }

    pub fn issue(&self, prefix: &str) -> ScopeIdentifier {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ScopeIdentifier(format!("{prefix}{n}"))
    }

    /// How many identifiers were issued so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
