//! Main feed view: subscription controls, connection status, notification
//! banner, and the live transaction table.

use crate::gui::app::{FeedStatus, GuiApp};
use crate::store::Transaction;
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

/// Truncate a transaction hash for list display.
pub(crate) fn short_hash(hash: &str) -> String {
    if hash.len() <= 20 {
        hash.to_string()
    } else {
        format!("{}…{}", &hash[..12], &hash[hash.len() - 6..])
    }
}

impl GuiApp {
    pub(crate) fn view_feed(&mut self, ui: &mut egui::Ui) {
        self.render_header(ui);
        ui.add_space(self.theme.spacing_md);

        self.render_controls(ui);
        ui.add_space(self.theme.spacing_sm);

        self.render_notification_banner(ui);
        ui.add_space(self.theme.spacing_md);

        self.render_transaction_table(ui);
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("TXWATCH")
                    .size(24.0)
                    .strong()
                    .color(self.theme.primary),
            );
            ui.label(
                RichText::new("live Bitcoin unconfirmed transactions")
                    .color(self.theme.text_secondary),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let (dot_color, label) = match &self.feed_status {
                    FeedStatus::Live => (self.theme.success, self.feed_status.label()),
                    FeedStatus::Connecting => (self.theme.warning, self.feed_status.label()),
                    FeedStatus::Reconnecting { .. } => {
                        (self.theme.warning, self.feed_status.label())
                    }
                    FeedStatus::Offline => (self.theme.error, self.feed_status.label()),
                };
                ui.label(RichText::new(label).color(dot_color));
                ui.label(RichText::new("●").color(dot_color));
            });
        });
        ui.separator();
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let subscribe = self.theme.button_primary("Subscribe");
            if ui
                .add(subscribe)
                .on_hover_text("Start receiving unconfirmed transactions")
                .clicked()
            {
                self.feed.subscribe();
            }

            let unsubscribe = self.theme.button_secondary("Unsubscribe");
            if ui
                .add(unsubscribe)
                .on_hover_text("Stop receiving unconfirmed transactions")
                .clicked()
            {
                self.feed.unsubscribe();
            }

            if !self.feed.is_open() {
                ui.label(
                    RichText::new("controls inactive while disconnected")
                        .small()
                        .color(self.theme.text_secondary),
                );
            } else if self.feed.is_subscribed() {
                ui.label(RichText::new("subscribed").small().color(self.theme.success));
            }
        });
    }

    fn render_notification_banner(&self, ui: &mut egui::Ui) {
        if let Some(note) = self.store.notification() {
            self.theme.frame_surface().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&note.message).color(self.theme.success));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(note.time_ago())
                                .small()
                                .color(self.theme.text_secondary),
                        );
                    });
                });
            });
        }
    }

    fn render_transaction_table(&mut self, ui: &mut egui::Ui) {
        let theme = self.theme;
        theme.frame_panel().show(ui, |ui| {
            ui.label(
                RichText::new(format!("Recent transactions ({})", self.store.len()))
                    .strong()
                    .color(theme.text_primary),
            );
            ui.add_space(theme.spacing_xs);

            if self.store.is_empty() {
                ui.label(
                    RichText::new("No transactions yet. Subscribe to start the feed.")
                        .color(theme.text_secondary),
                );
                return;
            }

            let transactions: Vec<Transaction> = self.store.transactions().cloned().collect();
            let mut clicked: Option<Transaction> = None;

            TableBuilder::new(ui)
                .striped(true)
                .sense(egui::Sense::click())
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(180.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.label(RichText::new("Received").strong());
                    });
                    header.col(|ui| {
                        ui.label(RichText::new("Hash").strong());
                    });
                    header.col(|ui| {
                        ui.label(RichText::new("Event").strong());
                    });
                })
                .body(|body| {
                    body.rows(22.0, transactions.len(), |mut row| {
                        let tx = &transactions[row.index()];
                        row.col(|ui| {
                            ui.monospace(tx.received_at.format("%H:%M:%S").to_string());
                        });
                        row.col(|ui| {
                            ui.monospace(short_hash(&tx.hash));
                        });
                        row.col(|ui| {
                            ui.label(tx.message());
                        });
                        if row.response().clicked() {
                            clicked = Some(tx.clone());
                        }
                    });
                });

            if let Some(tx) = clicked {
                self.select_transaction(tx);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_hash_truncates_long_hashes() {
        let hash = "f854aebae95150b379cc1187d848d58225f3c4157fe992bcd166f58bd5063449";
        let short = short_hash(hash);
        assert!(short.starts_with("f854aebae951"));
        assert!(short.ends_with("063449"));
        assert!(short.contains('…'));
    }

    #[test]
    fn test_short_hash_keeps_short_strings() {
        assert_eq!(short_hash("abc123"), "abc123");
    }
}
