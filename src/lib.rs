//! helm-outdated - Helm chart dependency auditor library
//!
//! This library provides the core functionality for keeping chart
//! dependencies current:
//! - requirements.yaml and Chart.yaml handling
//! - Repository index refresh and caching
//! - Latest stable version resolution and outdated detection
//! - Manifest rewriting and git based release of the result

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod process;
pub mod progress;
pub mod registry;
pub mod release;
pub mod resolver;
pub mod update;
