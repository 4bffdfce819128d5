//! lanes - Task Board Controller Library
//!
//! This library keeps a small set of task records synchronized between an
//! in-memory cache and a remote keyed record store, projects the cache
//! into a four-lane board view, and applies direct manipulation (drag,
//! inline edit, checklist toggling) optimistically ahead of remote
//! confirmation.
//!
//! # Core Concepts
//!
//! - **Task Cache**: in-session canonical collection, sole source of truth
//!   for rendering
//! - **Record Store**: remote keyed document backend behind an async trait
//! - **Board Projection**: pure derivation of the four status lanes plus
//!   search filtering
//! - **Optimistic updates**: cache first, store second, no rollback on a
//!   failed drag persist
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.lanes.toml`
//! - `error`: error types and result aliases
//! - `task`: task, subtask, and patch records
//! - `contact`: read-only contact snapshot for assignee chips
//! - `store`: record store trait and in-memory implementation
//! - `jsonstore`: JSON-file record store backing the CLI
//! - `cache`: in-session task cache
//! - `board`: four-lane board projection
//! - `dragdrop`: drag-drop status machine
//! - `overlay`: task detail/edit session with a disjoint edit buffer
//! - `checklist`: subtask checklist engine with eager toggle persistence
//! - `controller`: command dispatch over cache + store
//! - `output`: CLI output formatting

pub mod board;
pub mod cache;
pub mod checklist;
pub mod cli;
pub mod config;
pub mod contact;
pub mod controller;
pub mod dragdrop;
pub mod error;
pub mod jsonstore;
pub mod output;
pub mod overlay;
pub mod store;
pub mod task;

pub use error::{Error, Result};
