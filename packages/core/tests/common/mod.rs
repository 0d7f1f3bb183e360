//! Common test utilities for core integration tests
//!
//! This module provides shared test infrastructure: a scripted import job
//! runner, an in-memory media element and small fixture builders.

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
