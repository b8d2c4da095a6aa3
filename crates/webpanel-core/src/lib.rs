//! # webpanel-core
//!
//! Change-tracking element tree and incremental sync engine for browser
//! control panels served by small devices.
//!
//! This crate provides:
//! - Revision numbers and the request-cycle clock
//! - Elements (span, slider, check button) and containers
//! - Radio groups with mutual exclusion
//! - The page shell and the request cycle emitting JSON deltas
//! - The driver contract towards the HTTP transport, plus an in-memory driver
//!
//! This crate is intentionally runtime-agnostic and contains no async code
//! or I/O, making it usable on both Linux (tokio) and embedded targets.

pub mod driver;
pub mod element;
pub mod node;
pub mod page;
pub mod radio;
pub mod revision;
pub mod widgets;

pub use driver::{BufferDriver, ContentKind, Driver};
pub use element::{Element, ElementState, Property};
pub use node::{Container, Node};
pub use page::{CycleReport, Page};
pub use radio::{RadioGroup, RadioTable};
pub use revision::{Revision, RevisionClock, AHEAD_WINDOW, WRAP_WINDOW};
pub use widgets::{CheckButton, Slider, Span};
