use eframe::egui::{self, Color32};

use crate::compare::SortKey;
use crate::controller::Interaction;

use super::super::PostGridApp;

impl PostGridApp {
    pub(crate) fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Store URL");
            ui.text_edit_singleline(&mut self.base_url_input);
            if ui.button("Apply").clicked() {
                self.apply_base_url();
            }
            if ui.button("Refresh").clicked() {
                self.interact(Interaction::Refresh);
            }
            if ui.selectable_label(self.users.open, "Users").clicked() {
                self.users.open = !self.users.open;
            }
        });

        ui.horizontal(|ui| {
            if ui.button("New post").clicked() {
                self.interact(Interaction::OpenCreate);
            }
            ui.separator();

            // A search narrows the sorted list, so the sort stays selected.
            let current = self.posts.sort_key();
            let mut chosen = None;
            egui::ComboBox::from_label("Sort by")
                .selected_text(current.map_or_else(|| "unsorted".to_string(), |key| key.to_string()))
                .show_ui(ui, |ui| {
                    for key in SortKey::ALL {
                        if ui.selectable_label(current == Some(key), key.to_string()).clicked() {
                            chosen = Some(key);
                        }
                    }
                });
            if let Some(key) = chosen {
                self.interact(Interaction::SortBy(key));
            }
            ui.separator();

            ui.label("Search titles");
            let response = ui.text_edit_singleline(&mut self.search_input);
            if response.changed() {
                self.interact(Interaction::Search(self.search_input.clone()));
            }
            if !self.search_input.is_empty() && ui.small_button("Clear").clicked() {
                self.search_input.clear();
                self.interact(Interaction::Search(String::new()));
            }

            if self.posts.is_loading() {
                ui.add(egui::Spinner::new());
            }
        });

        if let Some(message) = self.info_banner.clone() {
            let mut dismiss = false;
            egui::Frame::group(ui.style())
                .fill(ui.visuals().extreme_bg_color)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(message.as_str());
                        if ui.button("Dismiss").clicked() {
                            dismiss = true;
                        }
                    });
                });
            if dismiss {
                self.info_banner = None;
            }
        }

        if let Some(err) = self.posts.last_error().map(str::to_string) {
            let mut dismiss = false;
            ui.horizontal(|ui| {
                ui.colored_label(Color32::LIGHT_RED, err);
                if ui.small_button("Dismiss").clicked() {
                    dismiss = true;
                }
            });
            if dismiss {
                self.posts.dismiss_error();
            }
        }
    }
}
