//! Tri-state view model for data fetched over the network.
//!
//! Every feed a widget shows is wrapped in a [`FetchSlot`], which pairs a
//! [`Remote`] state with request sequence numbers so that a response
//! older than one already applied is dropped.

/// Loading, failed, or loaded data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Remote<T> {
    /// No response has been applied yet.
    #[default]
    Loading,
    /// The last applied response was a failure.
    Failed(String),
    /// The last applied response carried data.
    Ready(T),
}

impl<T> Remote<T> {
    /// The loaded data, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Whether no response has been applied yet.
    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }
}

/// A [`Remote`] plus the bookkeeping to order its responses.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSlot<T> {
    state: Remote<T>,
    issued: u64,
    applied: u64,
}

impl<T> Default for FetchSlot<T> {
    fn default() -> Self {
        Self {
            state: Remote::Loading,
            issued: 0,
            applied: 0,
        }
    }
}

impl<T> FetchSlot<T> {
    /// Creates an empty slot in the loading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view state.
    pub fn state(&self) -> &Remote<T> {
        &self.state
    }

    /// Registers a new request and returns its sequence number.
    ///
    /// The current state is kept until the response lands.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Applies a response.
    ///
    /// Returns `false` (and changes nothing) when a newer response was
    /// already applied or the slot was reset after the request was issued.
    pub fn settle(&mut self, seq: u64, result: Result<T, String>) -> bool {
        if seq <= self.applied || seq > self.issued {
            return false;
        }
        self.applied = seq;
        self.state = match result {
            Ok(value) => Remote::Ready(value),
            Err(message) => Remote::Failed(message),
        };
        true
    }

    /// Returns to the loading state and invalidates in-flight requests.
    pub fn reset(&mut self) {
        self.state = Remote::Loading;
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_is_loading() {
        let slot: FetchSlot<u32> = FetchSlot::new();
        assert!(slot.state().is_loading());
        assert!(slot.state().ready().is_none());
    }

    #[test]
    fn test_settle_applies_response() {
        let mut slot = FetchSlot::new();
        let seq = slot.begin();
        assert!(slot.settle(seq, Ok(7)));
        assert_eq!(slot.state().ready(), Some(&7));
    }

    #[test]
    fn test_settle_failure() {
        let mut slot: FetchSlot<u32> = FetchSlot::new();
        let seq = slot.begin();
        assert!(slot.settle(seq, Err("boom".to_string())));
        assert_eq!(slot.state(), &Remote::Failed("boom".to_string()));
    }

    #[test]
    fn test_older_response_after_newer_is_dropped() {
        let mut slot = FetchSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(slot.settle(second, Ok("new")));
        assert!(!slot.settle(first, Ok("old")));
        assert_eq!(slot.state().ready(), Some(&"new"));
    }

    #[test]
    fn test_older_response_before_newer_still_applies() {
        let mut slot = FetchSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(slot.settle(first, Ok(1)));
        assert!(slot.settle(second, Ok(2)));
        assert_eq!(slot.state().ready(), Some(&2));
    }

    #[test]
    fn test_reset_drops_in_flight_responses() {
        let mut slot = FetchSlot::new();
        let seq = slot.begin();
        slot.reset();
        assert!(!slot.settle(seq, Ok(1)));
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_unknown_sequence_is_dropped() {
        let mut slot = FetchSlot::new();
        assert!(!slot.settle(5, Ok(1)));
    }

    #[test]
    fn test_state_kept_while_refetching() {
        let mut slot = FetchSlot::new();
        let seq = slot.begin();
        slot.settle(seq, Ok(1));
        slot.begin();
        assert_eq!(slot.state().ready(), Some(&1));
    }
}
