//! Chart Window
//! A native window showing one rendered chart frame until the user closes it.

use crate::error::{PipelineError, Result};
use egui::{Color32, ColorImage, Key, TextureHandle, TextureOptions, ViewportCommand};
use image::RgbImage;

/// Single-chart viewer. Esc, Enter or Space close the window.
pub struct ChartWindow {
    pending: Option<ColorImage>,
    texture: Option<TextureHandle>,
}

impl ChartWindow {
    pub fn new(frame: &RgbImage) -> Self {
        let size = [frame.width() as usize, frame.height() as usize];
        Self {
            pending: Some(ColorImage::from_rgb(size, frame.as_raw())),
            texture: None,
        }
    }

    /// Open a window for `frame` and block until it is closed.
    pub fn show_blocking(title: &str, frame: &RgbImage) -> Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([frame.width() as f32, frame.height() as f32])
                .with_title(title),
            ..Default::default()
        };

        let app = Self::new(frame);
        eframe::run_native(title, options, Box::new(move |_cc| Ok(Box::new(app))))
            .map_err(|e| PipelineError::Display(e.to_string()))
    }
}

impl eframe::App for ChartWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dismiss = ctx.input(|i| {
            i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter) || i.key_pressed(Key::Space)
        });
        if dismiss {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }

        if let Some(image) = self.pending.take() {
            self.texture = Some(ctx.load_texture("chart", image, TextureOptions::LINEAR));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::WHITE))
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.centered_and_justified(|ui| {
                        ui.add(
                            egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                                .shrink_to_fit(),
                        );
                    });
                }
            });
    }
}
