/// Identifier assigned by a registry. Unique for the lifetime of the process.
pub type RecordId = u64;

/// Monotonic identifier allocator
///
/// Each registry owns one sequence and advances it while holding its own
/// lock, so identifiers are handed out in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: RecordId,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier (the first one is 1)
    pub fn next_id(&mut self) -> RecordId {
        self.last += 1;
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_starts_at_one_and_increments() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.clone().next_id(), 3);
        assert_eq!(seq.next_id(), 3);
    }
}
