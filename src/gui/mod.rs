//! GUI module, built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main GuiApp struct, state types, and the update loop
//! - `async_job` - Poll-based handles for background work
//! - `theme` - Centralized theme and styling (AppTheme)
//! - `views` - View rendering (feed screen, detail modal)

mod app;
pub mod async_job;
pub mod theme;
pub mod views;

pub use app::{launch, FeedStatus, GuiApp};
pub use async_job::AsyncJob;
pub use theme::{configure_style, AppTheme};
