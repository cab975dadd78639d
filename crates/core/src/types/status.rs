//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Status of an order in the kitchen/delivery lifecycle.
///
/// Orders are created as [`Pending`](Self::Pending). The nominal progression is
/// pending → preparing → delivering → delivered, with canceled reachable from
/// any non-terminal state. Update validation accepts any of the five values
/// regardless of the current status; [`Self::next_statuses`] describes the
/// nominal graph for callers that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Delivering,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Whether no further lifecycle transition is expected from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }

    /// Successors in the nominal lifecycle graph.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Preparing, Self::Canceled],
            Self::Preparing => &[Self::Delivering, Self::Canceled],
            Self::Delivering => &[Self::Delivered, Self::Canceled],
            Self::Delivered | Self::Canceled => &[],
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Preparing => write!(f, "preparing"),
            Self::Delivering => write!(f, "delivering"),
            Self::Delivered => write!(f, "delivered"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "preparing" => Ok(Self::Preparing),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
