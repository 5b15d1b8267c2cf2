//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (blockchain RPC, HTTP clients). Each sub-module
//! groups adapters by infrastructure concern.
//!
//! Adapter categories:
//! - `chain`: EVM chain interaction via alloy-rs
//! - `notify`: Telegram notification delivery
//! - `health`: Liveness/readiness probe server

pub mod chain;
pub mod health;
pub mod notify;
