//! depbump - package.json dependency upgrade library
//!
//! This library provides the core functionality for upgrading one npm
//! dependency and publishing the change for review:
//! - Version specifier parsing with downgrade protection
//! - All-or-nothing package.json rewrites
//! - Branch, commit and pull request creation on Bitbucket Cloud

pub mod cli;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod parser;
pub mod progress;
pub mod remote;
pub mod update;
