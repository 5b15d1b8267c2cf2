//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the bot's core workflow.
//!
//! Use cases:
//! - `MirrorEngine`: Poll → diff → size → execute loop

pub mod mirror_engine;
