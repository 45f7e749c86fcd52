//! View-side helpers shared by the handlers and templates.

pub mod format;
pub mod markdown;
pub mod nav;
pub mod timeline;

pub use format::{format_duration, RecordLine};
pub use nav::{App, NavItem};
pub use timeline::{TimelineLayout, TimelineNode};
