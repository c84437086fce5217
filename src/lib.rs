//! Txwatch - live Bitcoin unconfirmed transaction watcher.
//!
//! Streams unconfirmed transactions from the blockchain.info inventory feed
//! and looks up extended details through the BlockCypher API, presented in an
//! egui desktop interface.

pub mod config;
pub mod feed;
pub mod gui;
pub mod lookup;
pub mod store;
pub mod stream;
