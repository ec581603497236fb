//! Tests for the snip editor as a whole.
//!
//! Scenario tests walk through complete user interactions; property tests
//! sweep long deterministic event sequences and check the editor invariants
//! after every step.
