//! Shared primitive types used across the entire game core.

/// Currency and income amounts. Arithmetic on these saturates, never wraps.
pub type Gold = i64;

/// A progression stage. Stage 1 is the first.
pub type Stage = i64;

/// An upgrade level. Levels start at 1.
pub type Level = i64;

/// Stable identifier of an authored dialogue event.
pub type EventId = i64;

/// Identifier of a storage session (one per boot of a persistent backend).
pub type SessionId = String;
