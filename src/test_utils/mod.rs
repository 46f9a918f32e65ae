//! Shared test helpers: config builders, status page fixtures and mocks.

#![cfg(test)]

pub mod config;
pub mod fixtures;
pub mod mocks;
