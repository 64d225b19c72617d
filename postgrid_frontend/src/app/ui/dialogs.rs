use eframe::egui::{self, Align2, Color32, Context};

use crate::controller::{Dialog, Interaction};

use super::super::PostGridApp;

impl PostGridApp {
    pub(crate) fn render_post_dialog(&mut self, ctx: &Context) {
        let labels = match self.posts.dialog() {
            Dialog::Closed => return,
            Dialog::Delete { .. } => None,
            Dialog::Create { .. } => Some(("New post", "Create", Interaction::SubmitCreate)),
            Dialog::Update { .. } => Some(("Edit post", "Save", Interaction::SubmitUpdate)),
        };
        let Some((heading, confirm, submit)) = labels else {
            self.render_delete_dialog(ctx);
            return;
        };
        let submitting = self.posts.is_submitting();
        let error = self.posts.dialog_error().map(str::to_string);

        let mut open = true;
        let mut action = None;
        egui::Window::new(heading)
            .open(&mut open)
            .collapsible(false)
            .default_width(420.0)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                if let Some(err) = &error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                if let Some(form) = self.posts.form_mut() {
                    ui.label("Title");
                    ui.text_edit_singleline(&mut form.title);
                    ui.add_space(6.0);
                    ui.label("Body");
                    ui.add(
                        egui::TextEdit::multiline(&mut form.body)
                            .desired_rows(6)
                            .hint_text("Write the post..."),
                    );
                    ui.add_space(6.0);
                    ui.label("Image URL");
                    ui.add(
                        egui::TextEdit::singleline(&mut form.image).hint_text("https://..."),
                    );
                }
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if submitting {
                        ui.add(egui::Spinner::new());
                    } else if ui.button(confirm).clicked() {
                        action = Some(submit.clone());
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(Interaction::CancelDialog);
                    }
                });
            });

        if !open {
            action = Some(Interaction::CancelDialog);
        }
        if let Some(interaction) = action {
            self.interact(interaction);
        }
    }

    fn render_delete_dialog(&mut self, ctx: &Context) {
        let Dialog::Delete { title, .. } = self.posts.dialog() else {
            return;
        };
        let title = title.clone();
        let submitting = self.posts.is_submitting();
        let error = self.posts.dialog_error().map(str::to_string);

        let mut open = true;
        let mut action = None;
        egui::Window::new("Delete post")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{title}\"? This cannot be undone."));
                if let Some(err) = &error {
                    ui.colored_label(Color32::LIGHT_RED, err);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if submitting {
                        ui.add(egui::Spinner::new());
                    } else if ui.button("Delete").clicked() {
                        action = Some(Interaction::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        action = Some(Interaction::CancelDialog);
                    }
                });
            });

        if !open {
            action = Some(Interaction::CancelDialog);
        }
        if let Some(interaction) = action {
            self.interact(interaction);
        }
    }
}
