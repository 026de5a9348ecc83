// Library target for criterion benchmarks and the integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// harnesses can import types via `dictee::engine::*` / `dictee::session::*`.
// Some code is only exercised through the binary, so suppress dead_code
// warnings here.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod config;
pub mod engine;
pub mod phrases;
pub mod service;
pub mod session;
pub mod store;
