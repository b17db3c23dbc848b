//! Order status progression.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fulfilment status of a synthesized order.
///
/// Statuses form a fixed linear sequence; there is no backing event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Confirmed,
    Preparing,
    Shipped,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    /// The full sequence in order.
    pub const SEQUENCE: [Self; 5] = [
        Self::Confirmed,
        Self::Preparing,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Position in [`Self::SEQUENCE`].
    #[must_use]
    pub const fn position(self) -> usize {
        match self {
            Self::Confirmed => 0,
            Self::Preparing => 1,
            Self::Shipped => 2,
            Self::OutForDelivery => 3,
            Self::Delivered => 4,
        }
    }

    /// The next status, or `None` once delivered.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Shipped),
            Self::Shipped => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether the sequence is finished.
    #[must_use]
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Walk forward one status per elapsed `step`, stopping at `Delivered`.
    #[must_use]
    pub fn advanced_by(self, elapsed: Duration, step: Duration) -> Self {
        if step.is_zero() {
            return Self::Delivered;
        }
        let steps = elapsed.as_millis() / step.as_millis();
        let mut status = self;
        for _ in 0..steps {
            match status.next() {
                Some(next) => status = next,
                None => break,
            }
        }
        status
    }

    /// Stable key used for translations and CSS hooks.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_secs(3);

    #[test]
    fn test_sequence_positions() {
        for (i, status) in OrderStatus::SEQUENCE.iter().enumerate() {
            assert_eq!(status.position(), i);
        }
    }

    #[test]
    fn test_next_walks_sequence() {
        let mut status = OrderStatus::Confirmed;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            seen.push(next);
            status = next;
        }
        assert_eq!(seen, OrderStatus::SEQUENCE);
        assert!(status.is_final());
    }

    #[test]
    fn test_advanced_by_elapsed() {
        let start = OrderStatus::Confirmed;
        assert_eq!(start.advanced_by(Duration::from_secs(0), STEP), OrderStatus::Confirmed);
        assert_eq!(start.advanced_by(Duration::from_secs(2), STEP), OrderStatus::Confirmed);
        assert_eq!(start.advanced_by(Duration::from_secs(3), STEP), OrderStatus::Preparing);
        assert_eq!(start.advanced_by(Duration::from_secs(7), STEP), OrderStatus::Shipped);
        assert_eq!(start.advanced_by(Duration::from_secs(600), STEP), OrderStatus::Delivered);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
    }
}
