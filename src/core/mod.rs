//! Core engine types: instance ids, players, RNG, rule configuration.
//!
//! These are the building blocks every other module leans on. None of them
//! know about patients or procedures.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;

pub use entity::{InstanceAllocator, InstanceId};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{OpeningHand, QuantityPolicy, RulesConfig};
