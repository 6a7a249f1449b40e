//! Page load identity.

use std::sync::atomic::{AtomicU32, Ordering};

/// Unique identifier for one page load, attached to every log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadId(pub String);

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

impl LoadId {
    /// Generate a new load ID from the wall clock and a process-wide
    /// sequence number.
    pub fn generate() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{:04x}-{:x}", nanos, seq, std::process::id()))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LoadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = LoadId::generate();
        let b = LoadId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_string() {
        let id = LoadId::from_string("load-1");
        assert_eq!(id.as_str(), "load-1");
        assert_eq!(id.to_string(), "load-1");
    }
}
