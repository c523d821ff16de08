//! Incremental state-to-view synchronization for a home-automation
//! dashboard.
//!
//! State arrives as a flat stream of `(topic, value)` updates over the
//! hierarchical namespace `home/zone/device/control[/values]`. This crate
//! turns that stream into a live widget tree without ever diffing or
//! rebuilding:
//!
//! - [`topic`] — pure parsing of topic strings into hierarchy segments,
//!   display labels, and units.
//! - [`ValueStore`] — ordered topic → last-value map, the single source
//!   of truth for everything displayed. Keys are never removed.
//! - [`classify`](classify()) — first-match classification of a topic
//!   into its [`ControlKind`] from naming conventions alone.
//! - [`WidgetTree`] — lazily materialized zone → device → control
//!   sections, siblings always in ascending id order.
//! - [`Dashboard`] — the dispatcher. Each [`set`](Dashboard::set) call
//!   records the value, materializes on first sight, and runs exactly one
//!   cached in-place updater.
//! - [`CommandSink`] — the outbound seam. Interactions emit
//!   `(topic, value)` pairs and never mutate local state; the view moves
//!   when the bus echoes the update back.
//!
//! The engine is synchronous and single-threaded by design: no I/O, no
//! tasks, no timers. Transports live in other crates and call
//! [`Dashboard::set`] in arrival order.

pub mod classify;
pub mod command;
pub mod dashboard;
pub mod error;
pub mod store;
pub mod topic;
pub mod tree;

pub use classify::{ControlKind, RangeBounds, classify};
pub use command::CommandSink;
pub use dashboard::{Dashboard, Direction};
pub use error::Error;
pub use store::ValueStore;
pub use tree::{ControlState, ControlWidget, DeviceSection, WidgetTree, ZoneSection};
