// Library target exists solely for criterion benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `postedit::logger::*` / `postedit::translate::*`.
// Most code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and the integration tests
pub mod document;
pub mod logger;
pub mod store;
pub mod translate;

// Private: required transitively (won't compile without them)
mod config;
mod event;
mod ui;
