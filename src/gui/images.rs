//! Texture cache for catalog images
//!
//! Inline images are decoded on first use. Remote starter images are fetched on a
//! background thread and picked up by [`ImageCache::poll`].

use eframe::egui;
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::catalog::{CatalogItem, ItemId};
use crate::export::fetch_image;
use crate::ingest::{DataUrl, ImageSource};

/// Load state of one item's texture
enum ImageSlot {
    Loading(Receiver<Result<Vec<u8>, String>>),
    Ready(egui::TextureHandle),
    Failed(String),
}

pub(super) struct ImageCache {
    slots: HashMap<ItemId, ImageSlot>,
    /// Texture for the upload dialog preview, keyed by the payload it shows
    preview: Option<(DataUrl, Option<egui::TextureHandle>)>,
    fetch_timeout: Duration,
}

impl ImageCache {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            slots: HashMap::new(),
            preview: None,
            fetch_timeout,
        }
    }

    /// Make sure a texture for `item` exists or is on its way
    pub fn request(&mut self, ctx: &egui::Context, item: &CatalogItem) {
        if self.slots.contains_key(&item.id) {
            return;
        }

        let slot = match &item.image {
            ImageSource::Encoded(data) => match data.to_bytes() {
                Ok(bytes) => texture_slot(ctx, &format!("item-{}", item.id), &bytes),
                Err(e) => ImageSlot::Failed(format!("Invalid image payload: {}", e)),
            },
            ImageSource::Remote(url) => {
                let url = url.clone();
                let timeout = self.fetch_timeout;
                let (tx, rx) = mpsc::channel();

                thread::spawn(move || {
                    let result = fetch_image(&url, timeout).map_err(|e| e.to_string());
                    let _ = tx.send(result);
                });
                ImageSlot::Loading(rx)
            }
        };

        self.slots.insert(item.id, slot);
    }

    /// Pick up finished fetches. Returns true while any are still running.
    pub fn poll(&mut self, ctx: &egui::Context) -> bool {
        let mut loading = false;

        for (id, slot) in self.slots.iter_mut() {
            let next = match slot {
                ImageSlot::Loading(receiver) => match receiver.try_recv() {
                    Ok(Ok(bytes)) => Some(texture_slot(ctx, &format!("item-{}", id), &bytes)),
                    Ok(Err(e)) => {
                        log::warn!("Failed to load image for item {}: {}", id, e);
                        Some(ImageSlot::Failed(e))
                    }
                    Err(TryRecvError::Empty) => {
                        loading = true;
                        None
                    }
                    Err(TryRecvError::Disconnected) => {
                        Some(ImageSlot::Failed("Image fetch terminated unexpectedly".to_string()))
                    }
                },
                _ => None,
            };

            if let Some(next) = next {
                *slot = next;
            }
        }

        loading
    }

    pub fn texture(&self, id: ItemId) -> Option<&egui::TextureHandle> {
        match self.slots.get(&id) {
            Some(ImageSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    pub fn is_loading(&self, id: ItemId) -> bool {
        matches!(self.slots.get(&id), Some(ImageSlot::Loading(_)))
    }

    pub fn error(&self, id: ItemId) -> Option<&str> {
        match self.slots.get(&id) {
            Some(ImageSlot::Failed(e)) => Some(e),
            _ => None,
        }
    }

    /// Texture for the draft preview, decoding it when the payload changed
    pub fn preview(
        &mut self,
        ctx: &egui::Context,
        image: Option<&DataUrl>,
    ) -> Option<&egui::TextureHandle> {
        let Some(image) = image else {
            self.preview = None;
            return None;
        };

        let stale = self.preview.as_ref().map_or(true, |(shown, _)| shown != image);
        if stale {
            let texture = image
                .to_bytes()
                .map_err(|e| e.to_string())
                .and_then(|bytes| load_image_from_bytes(&bytes))
                .map(|color_image| {
                    ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR)
                })
                .inspect_err(|e| log::warn!("Cannot preview image: {}", e))
                .ok();
            self.preview = Some((image.clone(), texture));
        }

        self.preview.as_ref().and_then(|(_, texture)| texture.as_ref())
    }
}

fn texture_slot(ctx: &egui::Context, name: &str, bytes: &[u8]) -> ImageSlot {
    match load_image_from_bytes(bytes) {
        Ok(color_image) => {
            ImageSlot::Ready(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
        }
        Err(e) => ImageSlot::Failed(e),
    }
}

/// Load image from bytes into egui ColorImage
fn load_image_from_bytes(bytes: &[u8]) -> Result<egui::ColorImage, String> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let size = [image.width() as usize, image.height() as usize];
    let image_buffer = image.to_rgba8();
    let pixels = image_buffer.as_flat_samples();

    Ok(egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
}
