//! Card instance identification.
//!
//! Every card that enters a player's possession gets a fresh `InstanceId`,
//! even when several instances share one catalog definition. Ids are handed
//! out by the `InstanceAllocator` owned by the game state and are never reused
//! within a session.
//!
//! ```
//! use dental_ccg::core::{InstanceAllocator, InstanceId};
//!
//! let mut ids = InstanceAllocator::new();
//! let a = ids.alloc();
//! let b = ids.alloc();
//!
//! assert_ne!(a, b);
//! assert_eq!(a, InstanceId(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier of a card instance within one game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl From<u32> for InstanceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// Monotonic source of `InstanceId`s.
///
/// Starts at 1 so that a zeroed id never refers to a live card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceAllocator {
    next: u32,
}

impl Default for InstanceAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl InstanceAllocator {
    /// Create an allocator whose first id is `InstanceId(1)`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn alloc(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}
