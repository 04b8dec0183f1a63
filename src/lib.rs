//! revlock - reproducible dependency installer
//!
//! Fetches source dependencies from git, Mercurial and Bazaar, resolves the dependencies they
//! declare in turn, and pins every one to an exact revision in a lockfile so later installs
//! reproduce the same trees.
//!
//! The engine is split into:
//! - [`repository`]: backend detection and command construction
//! - [`command`]: running (or faking) the backend commands
//! - [`resolver`]: fetching, discovery and concurrent graph resolution
//! - [`reconcile`]: reusing and diffing lock state
//! - [`operations`]: the install and plan workflows

pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod dependency;
pub mod error;
pub mod hash;
pub mod install_root;
pub mod logging;
pub mod operations;
pub mod reconcile;
pub mod repository;
pub mod resolver;
pub mod ui;
pub mod workspace;

pub use dependency::{Dependency, ResolvedDependency, ResolvedSet};
pub use error::{Result, RevlockError};
