use eframe::egui::{self, RichText};

use crate::controller::{Interaction, ListView};

use super::super::PostGridApp;

const CARD_WIDTH: f32 = 260.0;

impl PostGridApp {
    pub(crate) fn render_posts_grid(&mut self, ui: &mut egui::Ui) {
        let posts = self.posts.visible().to_vec();
        if self.posts.is_loading() && posts.is_empty() {
            ui.add(egui::Spinner::new());
        }

        let mut pending: Option<Interaction> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            if posts.is_empty() && !self.posts.is_loading() {
                match self.posts.view() {
                    ListView::Filtered(query) => {
                        ui.label(format!("No post titles contain \"{query}\"."));
                    }
                    _ => {
                        ui.label("No posts yet. Create one to get started.");
                    }
                }
            }

            ui.horizontal_wrapped(|ui| {
                for post in &posts {
                    egui::Frame::group(ui.style())
                        .fill(ui.visuals().extreme_bg_color)
                        .inner_margin(egui::vec2(10.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_width(CARD_WIDTH);
                            ui.vertical(|ui| {
                                self.render_image(ui, &post.image, CARD_WIDTH);
                                let title = if post.title.is_empty() {
                                    "(untitled post)"
                                } else {
                                    post.title.as_str()
                                };
                                ui.label(RichText::new(title).strong().size(16.0));
                                ui.label(&post.body);
                                ui.horizontal(|ui| {
                                    if ui.button("Edit").clicked() {
                                        pending = Some(Interaction::OpenUpdate {
                                            id: post.id.clone(),
                                        });
                                    }
                                    if ui.button("Delete").clicked() {
                                        pending = Some(Interaction::OpenDelete {
                                            id: post.id.clone(),
                                        });
                                    }
                                    ui.label(RichText::new(&post.id).monospace().size(10.0));
                                });
                            });
                        });
                }
            });
        });

        if let Some(interaction) = pending {
            self.interact(interaction);
        }
    }
}
