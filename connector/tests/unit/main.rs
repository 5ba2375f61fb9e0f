//! Unit tests for the OpenShift connector
//!
//! These tests use fake ports and run fast without a cluster or Docker daemon.

mod create_container;
mod inspection;
