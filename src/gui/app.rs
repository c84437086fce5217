//! Main GUI application module.
//!
//! Contains the `GuiApp` struct, its state types, and the per-frame polling
//! that bridges the background feed and lookup work into view state.

use crate::{
    config::Config,
    feed::{FeedConnection, FeedEvent},
    lookup::{LookupClient, TransactionDetails},
    store::{FeedStore, Transaction},
};
use anyhow::Result;
use eframe::{egui, App, NativeOptions};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tokio::runtime::Builder;

use super::async_job::AsyncJob;
use super::theme::{configure_style, AppTheme};

/// Connection status shown in the feed header.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedStatus {
    Connecting,
    Live,
    Reconnecting { attempt: u32 },
    Offline,
}

impl FeedStatus {
    pub fn label(&self) -> String {
        match self {
            FeedStatus::Connecting => "connecting...".to_string(),
            FeedStatus::Live => "live".to_string(),
            FeedStatus::Reconnecting { attempt } => {
                format!("reconnecting (attempt {})", attempt)
            }
            FeedStatus::Offline => "offline".to_string(),
        }
    }
}

/// State of the transaction detail modal.
///
/// The modal is open while a transaction is selected. Each lookup job is
/// tagged with the hash it was started for; a completion whose hash no longer
/// matches the selection is stale and gets dropped instead of stomping newer
/// state.
#[derive(Default)]
pub(crate) struct DetailState {
    pub(crate) selected: Option<Transaction>,
    pub(crate) details: Option<TransactionDetails>,
    pub(crate) error: Option<String>,
    pub(crate) job: Option<AsyncJob<TransactionDetails>>,
    pub(crate) job_hash: Option<String>,
}

impl DetailState {
    pub(crate) fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.details.is_none() && self.error.is_none()
    }

    /// Start a lookup for a newly selected transaction.
    pub(crate) fn begin(&mut self, tx: Transaction, job: AsyncJob<TransactionDetails>) {
        self.job_hash = Some(tx.hash.clone());
        self.selected = Some(tx);
        self.details = None;
        self.error = None;
        self.job = Some(job);
    }

    /// Apply a finished lookup, discarding it when the selection has moved on.
    pub(crate) fn apply(&mut self, hash: &str, result: Result<TransactionDetails>) {
        let still_selected = self.selected.as_ref().map(|t| t.hash.as_str()) == Some(hash);
        if !still_selected {
            tracing::debug!(hash, "Dropping stale lookup result");
            return;
        }
        match result {
            Ok(details) => {
                self.details = Some(details);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(hash, error = %e, "Transaction lookup failed");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Close the modal, clearing selection, details, error, and job state.
    pub(crate) fn close(&mut self) {
        self.selected = None;
        self.details = None;
        self.error = None;
        self.job = None;
        self.job_hash = None;
    }
}

pub struct GuiApp {
    pub(crate) theme: AppTheme,
    pub(crate) store: FeedStore,
    pub(crate) feed: FeedConnection,
    pub(crate) feed_status: FeedStatus,
    pub(crate) lookup: LookupClient,
    pub(crate) detail: DetailState,
}

impl GuiApp {
    fn new(config: Config, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let feed = FeedConnection::open(&config.feed_url);
        let lookup = LookupClient::new(&config.api_base);

        Self {
            theme,
            store: FeedStore::new(),
            feed,
            feed_status: FeedStatus::Connecting,
            lookup,
            detail: DetailState::default(),
        }
    }

    /// Run an async operation on a background thread with its own runtime,
    /// returning a pollable handle.
    pub(crate) fn spawn_job<T, FutBuilder, Fut>(&self, builder: FutBuilder) -> AsyncJob<T>
    where
        T: Send + 'static,
        FutBuilder: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T>> + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(builder()),
                Err(e) => Err(anyhow::anyhow!("Failed to create async runtime: {}", e)),
            };
            let _ = tx.send(result);
        });
        AsyncJob::new(rx)
    }

    /// Drain pending feed events into the store and status indicator.
    fn poll_feed(&mut self) {
        while let Some(event) = self.feed.poll_event() {
            match event {
                FeedEvent::NewTransaction { hash } => {
                    self.store.record(hash);
                }
                FeedEvent::Connected => {
                    self.feed_status = FeedStatus::Live;
                }
                FeedEvent::Reconnecting { attempt } => {
                    self.feed_status = FeedStatus::Reconnecting { attempt };
                }
                FeedEvent::Disconnected => {
                    self.feed_status = FeedStatus::Offline;
                }
            }
        }
    }

    /// Poll the in-flight detail lookup, if any.
    fn poll_jobs(&mut self) {
        if let Some(job) = &mut self.detail.job {
            if let Some(res) = job.poll() {
                self.detail.job = None;
                if let Some(hash) = self.detail.job_hash.take() {
                    self.detail.apply(&hash, res);
                }
            }
        }
    }

    /// Select a transaction from the list and start fetching its details.
    pub(crate) fn select_transaction(&mut self, tx: Transaction) {
        let lookup = self.lookup.clone();
        let hash = tx.hash.clone();
        let job = self.spawn_job(move || async move { lookup.transaction(&hash).await });
        self.detail.begin(tx, job);
    }

    pub(crate) fn close_detail(&mut self) {
        self.detail.close();
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_feed();
        self.poll_jobs();

        let background = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(background).inner_margin(16.0))
            .show(ctx, |ui| {
                self.view_feed(ui);
            });

        self.view_detail_modal(ctx);

        // Feed events arrive without user input; keep repainting so they show.
        ctx.request_repaint_after(Duration::from_millis(200));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.feed.close();
    }
}

/// Launch the application window.
pub fn launch(config: Config) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title(format!("Txwatch v{}", env!("CARGO_PKG_VERSION"))),
        ..Default::default()
    };

    eframe::run_native(
        "Txwatch",
        options,
        Box::new(move |cc| Box::new(GuiApp::new(config, &cc.egui_ctx))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to launch GUI: {}", e))
}
