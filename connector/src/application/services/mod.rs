//! Application services — use-case orchestration.
//!
//! Each service module implements one step of the create / inspect flows by
//! composing domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports` — never from `crate::infra`.

pub mod container;
pub mod deployment;
pub mod discovery;
pub mod inspection;
pub mod project;
pub mod service;
pub mod wait;
