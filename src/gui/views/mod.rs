//! View modules for the GUI.
//!
//! Each submodule contains rendering logic for one screen area, implemented
//! as methods on `GuiApp` and called from the main `App::update` loop.
//!
//! - `feed` - controls, status line, notification banner, transaction table
//! - `details` - transaction detail modal window

pub mod details;
pub mod feed;
