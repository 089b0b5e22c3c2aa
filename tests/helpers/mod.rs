//! Shared fixtures and assertions for the integration tests.

#![allow(dead_code)]

pub mod fixtures;
pub mod problem_assertions;
