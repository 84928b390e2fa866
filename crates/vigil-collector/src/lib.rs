//! Interaction collectors for Vigil
//!
//! The core engine consumes batches of raw interactions through the
//! [`vigil_core::Collector`] trait and is indifferent to where they come
//! from. This crate provides the two concrete sources:
//!
//! - [`SimulatedCollector`]: rand-driven synthetic activity for tests,
//!   demos and load shaping
//! - [`HttpCollector`]: polls a JSON endpoint exposing recent network
//!   activity
//!
//! Transport failures surface as [`vigil_core::CollectorError`]; the
//! orchestrator treats a failed pull as an empty cycle and keeps running.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

mod http;
mod simulated;

pub use http::HttpCollector;
pub use simulated::SimulatedCollector;
