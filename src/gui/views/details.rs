//! Transaction detail modal.

use crate::gui::app::GuiApp;
use eframe::egui::{self, RichText};

impl GuiApp {
    /// Render the detail modal while a transaction is selected.
    pub(crate) fn view_detail_modal(&mut self, ctx: &egui::Context) {
        if !self.detail.is_open() {
            return;
        }

        let mut open = true;
        egui::Window::new("Transaction Details")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(420.0);

                if let Some(details) = &self.detail.details {
                    ui.label(format!("Transaction Hash: {}", details.hash));
                    ui.label(format!(
                        "Transaction amount in BTC: {}",
                        details.amount_btc()
                    ));
                    ui.add_space(self.theme.spacing_sm);

                    egui::Grid::new("tx_details_grid")
                        .num_columns(2)
                        .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                        .show(ui, |ui| {
                            if let Some(fee) = details.fee_btc() {
                                ui.label(RichText::new("Fee (BTC):").color(self.theme.text_secondary));
                                ui.monospace(fee.to_string());
                                ui.end_row();
                            }
                            if let Some(size) = details.size {
                                ui.label(RichText::new("Size:").color(self.theme.text_secondary));
                                ui.monospace(format!("{} bytes", size));
                                ui.end_row();
                            }
                            if let Some(confirmations) = details.confirmations {
                                ui.label(
                                    RichText::new("Confirmations:")
                                        .color(self.theme.text_secondary),
                                );
                                ui.monospace(confirmations.to_string());
                                ui.end_row();
                            }
                            if let (Some(inputs), Some(outputs)) =
                                (details.input_count, details.output_count)
                            {
                                ui.label(
                                    RichText::new("Inputs / outputs:")
                                        .color(self.theme.text_secondary),
                                );
                                ui.monospace(format!("{} / {}", inputs, outputs));
                                ui.end_row();
                            }
                            if let Some(received) = details.received {
                                ui.label(
                                    RichText::new("First seen:").color(self.theme.text_secondary),
                                );
                                ui.monospace(received.format("%Y-%m-%d %H:%M:%S UTC").to_string());
                                ui.end_row();
                            }
                        });

                    if details.double_spend == Some(true) {
                        ui.add_space(self.theme.spacing_xs);
                        ui.label(
                            RichText::new("⚠ Flagged as a double spend")
                                .color(self.theme.warning),
                        );
                    }
                } else if let Some(error) = &self.detail.error {
                    if let Some(tx) = &self.detail.selected {
                        ui.label(format!("Transaction Hash: {}", tx.hash));
                    }
                    ui.add_space(self.theme.spacing_xs);
                    ui.label(
                        RichText::new(format!("Failed to load details: {}", error))
                            .color(self.theme.error),
                    );
                } else {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading transaction details...");
                    });
                }
            });

        if !open {
            self.close_detail();
        }
    }
}
