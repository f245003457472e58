//! Engine-independent progression core for an idle clicker game:
//! gold economy, tiered upgrades, stages, revive, one-shot dialogue
//! triggers and a JSON save codec.

pub mod autoplay;
pub mod bus;
pub mod clock;
pub mod command;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod error;
pub mod event;
pub mod progression;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod upgrade;
