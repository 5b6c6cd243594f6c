//! Cross-crate integration tests for the Surety Stack live under
//! `tests/`. This library is intentionally empty.
