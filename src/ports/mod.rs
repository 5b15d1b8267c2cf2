//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainClient`: Balance queries and swap execution on the chain
//! - `Notifier`: Best-effort outbound activity notifications

pub mod chain_client;
pub mod notifier;
