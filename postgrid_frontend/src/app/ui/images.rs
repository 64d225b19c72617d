use eframe::egui::{self, Color32};

use super::super::PostGridApp;

impl PostGridApp {
    /// Draws the image at `url`, scaled to `max_width`, starting a download
    /// the first time the URL is seen.
    pub(crate) fn render_image(&mut self, ui: &mut egui::Ui, url: &str, max_width: f32) {
        if url.trim().is_empty() {
            ui.weak("(no image)");
            return;
        }

        if let Some(pending) = self.image_pending.remove(url) {
            let color = egui::ColorImage::from_rgba_unmultiplied(pending.size, &pending.pixels);
            let texture = ui
                .ctx()
                .load_texture(url, color, egui::TextureOptions::default());
            self.image_textures.insert(url.to_string(), texture);
        }

        if let Some(texture) = self.image_textures.get(url) {
            ui.add(egui::Image::from_texture(texture).max_width(max_width))
                .on_hover_text(url);
        } else if let Some(err) = self.image_errors.get(url) {
            ui.colored_label(Color32::LIGHT_RED, format!("Image failed: {err}"));
            ui.hyperlink_to("open image", url);
        } else {
            if !self.image_loading.contains(url) {
                self.spawn_download_image(url);
            }
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Loading image");
            });
        }
    }
}
