use eframe::egui::{self, Color32, RichText};

use super::super::PostGridApp;

const AVATAR_WIDTH: f32 = 48.0;

impl PostGridApp {
    pub(crate) fn render_users(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Users");
            if self.users.loading {
                ui.add(egui::Spinner::new());
            } else if ui.small_button("Reload").clicked() {
                self.spawn_load_users();
            }
        });
        if let Some(err) = &self.users.error {
            ui.colored_label(Color32::LIGHT_RED, err);
        }
        ui.separator();

        let users = self.users.users.clone();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if users.is_empty() && !self.users.loading {
                ui.label("No users.");
            }
            for user in &users {
                ui.horizontal(|ui| {
                    self.render_image(ui, &user.image, AVATAR_WIDTH);
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&user.name).strong());
                        ui.label(&user.title);
                    });
                });
                ui.separator();
            }
        });
    }
}
