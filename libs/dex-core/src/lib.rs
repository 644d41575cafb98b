//! DEX Core: Client Computation Layer
//!
//! Deterministic, client-side computation for:
//! - Signed order payloads (create, cancel, timestamped queries)
//! - Clock-skew correction against the matcher
//! - Canonical (amount, price) pair assignment
//! - Spam filtering and display ordering of markets
//! - Order-book level mapping
//! - Market search
//!
//! # Determinism
//! Everything except the wall-clock reads in [`clock`] is pure: no I/O and no
//! shared state. Output never depends on hash-map iteration order.

pub mod signing;
pub mod clock;
pub mod pair;
pub mod market_filter;
pub mod market_sort;
pub mod order_book;
pub mod search;
