//! Statly UI - Status bar host and widgets.
//!
//! The status bar owns installed widgets and repaints them on request.
//! The file statistics widget listens to the session bus and summarizes
//! the active file.

pub mod file_stats;
pub mod format;
pub mod settings;
pub mod status_bar;
pub mod widget;

pub use file_stats::{FileSnapshot, FileStatsWidget, FileStatsWidgetFactory, WIDGET_ID};
pub use format::format_size;
pub use settings::{SettingsError, StatusBarSettings};
pub use status_bar::{StatusBar, StatusBarHandle};
pub use widget::{Alignment, StatusBarWidget, StatusBarWidgetFactory, WidgetRegistry};
