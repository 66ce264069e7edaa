//! # quickwrap Architecture
//!
//! quickwrap lets users define named *quick tags* (a prefix/suffix pair) and
//! exposes one editor command per tag that wraps the current selection. It is a
//! library that an editor host calls into; the bundled `quickwrap` binary is a
//! minimal file-backed host for driving it from a terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs)                           │
//! │  - Parses arguments, prints results, initializes logging    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - load → sync, update → save → sync                        │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Updates (commands/*.rs)      │ │  Synchronizer (sync.rs)   │
//! │  - Pure settings changes      │ │  - Host command table     │
//! └───────────────────────────────┘ └───────────────────────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Storage (store/)             │ │  Host traits (host/)      │
//! │  - SettingsStore trait        │ │  - CommandTable, KeyBind. │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: The Host Is Borrowed
//!
//! The host's command table is shared, process-wide state. quickwrap only ever
//! reaches it through the capability traits in [`host`], and tracks the
//! commands it owns explicitly in [`sync::CommandSync`] instead of trusting
//! what the host happens to contain.
//!
//! ## Error Policy
//!
//! Nothing escapes to the host as an unhandled fault. Host failures during
//! synchronization are logged per command and skipped. The only user-facing
//! error is the "select some text" notice raised by [`wrap`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Settings updates (add, edit, delete)
//! - [`sync`]: Command synchronization
//! - [`wrap`]: The wrap operation
//! - [`host`]: Host capability traits and implementations
//! - [`store`]: Settings storage
//! - [`model`]: `QuickTag`, `QuickWrapperSettings`
//! - [`config`]: Application configuration
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod store;
pub mod sync;
pub mod wrap;
