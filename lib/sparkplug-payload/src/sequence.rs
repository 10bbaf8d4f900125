/// A payload sequence counter.
///
/// Sparkplug sequence numbers run from 0 to 255 and then wrap back to 0. A new counter, or one that has just been
/// reset, hands out 0 first, which is the sequence number expected on a birth message.
#[derive(Clone, Debug, Default)]
pub struct SequenceCounter {
    next: u8,
}

impl SequenceCounter {
    /// Creates a new `SequenceCounter` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next sequence number and advances the counter.
    pub fn next_seq(&mut self) -> u64 {
        let seq = self.next;
        self.next = self.next.wrapping_add(1);
        u64::from(seq)
    }

    /// Returns the sequence number that the next call to [`next_seq`][Self::next_seq] will return.
    pub fn peek(&self) -> u64 {
        u64::from(self.next)
    }

    /// Resets the counter to zero.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_after_255() {
        let mut counter = SequenceCounter::new();
        for expected in 0..=255 {
            assert_eq!(counter.next_seq(), expected);
        }
        assert_eq!(counter.next_seq(), 0);
        assert_eq!(counter.next_seq(), 1);
    }

    #[test]
    fn reset() {
        let mut counter = SequenceCounter::new();
        counter.next_seq();
        counter.next_seq();
        assert_eq!(counter.peek(), 2);

        counter.reset();
        assert_eq!(counter.peek(), 0);
        assert_eq!(counter.next_seq(), 0);
    }
}
