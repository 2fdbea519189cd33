//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `VerificationEngine`, the single entry point for
//! submitting and reviewing verification steps. All mutations flow through
//! it, which is what preserves the sequential-step invariant.

pub mod engine;
