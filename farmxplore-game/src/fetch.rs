//! Generation tokens that let late async completions be recognised and dropped.
use serde::{Deserialize, Serialize};

/// Handed out when a dataset or quiz fetch starts; presented again on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTicket {
    pub level_id: String,
    pub generation: u64,
}

/// Monotonic counter bumped whenever the active run is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchGeneration(u64);

impl FetchGeneration {
    #[must_use]
    pub const fn current(self) -> u64 {
        self.0
    }

    pub const fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    #[must_use]
    pub fn issue(self, level_id: &str) -> FetchTicket {
        FetchTicket {
            level_id: level_id.to_string(),
            generation: self.0,
        }
    }

    /// A ticket is current while no bump happened since it was issued and
    /// its level is still the active one.
    #[must_use]
    pub fn is_current(self, ticket: &FetchTicket, active_level: Option<&str>) -> bool {
        ticket.generation == self.0 && active_level == Some(ticket.level_id.as_str())
    }
}

/// Outcome of presenting a completed fetch to the store.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Delivery<T> {
    Accepted(T),
    Stale,
}

impl<T> Delivery<T> {
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    #[must_use]
    pub fn accepted(self) -> Option<T> {
        match self {
            Self::Accepted(value) => Some(value),
            Self::Stale => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_invalidates_outstanding_tickets() {
        let mut generation = FetchGeneration::default();
        let ticket = generation.issue("drought");
        assert!(generation.is_current(&ticket, Some("drought")));
        assert!(!generation.is_current(&ticket, Some("flood")));
        assert!(!generation.is_current(&ticket, None));

        generation.bump();
        assert_eq!(generation.current(), 1);
        assert!(!generation.is_current(&ticket, Some("drought")));
        assert!(generation.is_current(&generation.issue("drought"), Some("drought")));
    }

    #[test]
    fn delivery_unwraps_accepted_values() {
        assert_eq!(Delivery::Accepted(3).accepted(), Some(3));
        assert!(!Delivery::<u8>::Stale.is_accepted());
    }
}
