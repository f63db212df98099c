//! Main application state and UI implementation

use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use super::images::ImageCache;
use crate::catalog::{Genre, GenreFilter, ItemId};
use crate::config::get_config;
use crate::export::{export_item, ExportError, ExportResult};
use crate::ingest::ImageSource;
use crate::session::{CatalogSession, DraftUpdate, SubmitError};

/// Size of an icon card in the library grid (2:3 cover ratio)
const CARD_SIZE: egui::Vec2 = egui::vec2(120.0, 180.0);

/// Size of the cover in the detail window
const DETAIL_SIZE: egui::Vec2 = egui::vec2(240.0, 360.0);

/// Largest size of the upload preview
const PREVIEW_MAX: egui::Vec2 = egui::vec2(160.0, 240.0);

/// How long a notice stays on screen
const NOTICE_DURATION: Duration = Duration::from_secs(4);

/// Lines kept in the log window
const MAX_LOG_LINES: usize = 500;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "ico"];

const INSTALL_STEPS: &[&str] = &[
    "Download the icon",
    "Right-click the game shortcut",
    "Choose \"Properties\" → \"Change Icon\"",
    "Point it at the downloaded icon",
];

/// A user action collected while drawing and applied after the frame
enum Intent {
    SetQuery(String),
    SetGenre(GenreFilter),
    Select(Option<ItemId>),
    OpenUpload,
    CloseUpload,
    EditDraft(DraftUpdate),
    ChooseFile,
    Submit,
    Download(ItemId),
}

/// Short-lived message shown in the corner
struct Notice {
    text: String,
    level: NoticeLevel,
    shown_at: Instant,
}

#[derive(Clone, Copy, PartialEq)]
enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl NoticeLevel {
    fn color(self) -> egui::Color32 {
        match self {
            Self::Info => egui::Color32::LIGHT_GRAY,
            Self::Success => egui::Color32::GREEN,
            Self::Error => egui::Color32::LIGHT_RED,
        }
    }
}

/// Main application state
pub struct App {
    /// Catalog, search criteria, selection and upload workflow
    session: CatalogSession,
    /// Textures for catalog and preview images
    images: ImageCache,
    /// Where downloaded icons are written
    download_dir: PathBuf,
    /// Search box contents
    search_text: String,
    /// Title box contents in the upload dialog
    title_text: String,
    /// Notices currently on screen
    notices: Vec<Notice>,
    /// Lines for the log window
    log_lines: Vec<String>,
    /// Receiver for formatted log records
    log_receiver: Option<Receiver<String>>,
    /// Whether to show the log window
    show_log_window: bool,
    /// Receiver for remote download results
    export_receiver: Option<Receiver<Result<ExportResult, ExportError>>>,
    /// Is a remote download in progress?
    export_in_progress: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(_cc: &eframe::CreationContext<'_>, log_receiver: Option<Receiver<String>>) -> Self {
        let config = get_config();
        let session = CatalogSession::from_config(config);

        Self {
            images: ImageCache::new(session.export_settings().fetch_timeout),
            session,
            download_dir: config.export.download_dir(),
            search_text: String::new(),
            title_text: String::new(),
            notices: Vec::new(),
            log_lines: Vec::new(),
            log_receiver,
            show_log_window: false,
            export_receiver: None,
            export_in_progress: false,
        }
    }

    /// Show a notice
    fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            text: text.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::SetQuery(query) => self.session.set_query(query),
            Intent::SetGenre(genre) => self.session.set_genre_filter(genre),
            Intent::Select(id) => self.session.select_item(id),
            Intent::OpenUpload => {
                self.session.open_add_workflow();
                self.title_text = self.session.draft().map(|d| d.title.clone()).unwrap_or_default();
            }
            Intent::CloseUpload => {
                self.session.close_add_workflow();
                self.title_text.clear();
            }
            Intent::EditDraft(update) => {
                self.session.update_draft(update);
            }
            Intent::ChooseFile => self.open_image_picker(),
            Intent::Submit => match self.session.submit_draft() {
                Ok(_) => {
                    self.title_text.clear();
                    self.notify(NoticeLevel::Success, "Icon added to the library");
                }
                Err(SubmitError::MissingRequiredField(_)) => {
                    self.notify(NoticeLevel::Error, "Fill in all fields and upload an image");
                }
                Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
            },
            Intent::Download(id) => self.start_download(id),
        }
    }

    /// Open file picker dialog for the draft image
    fn open_image_picker(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.session.ingest_file(path);
        }
    }

    /// Download an icon. Inline images are written right away, remote ones in the background.
    fn start_download(&mut self, id: ItemId) {
        let Some(item) = self.session.store().get(id).cloned() else {
            return;
        };
        self.notify(NoticeLevel::Info, format!("Downloading icon \"{}\"", item.title));

        if let ImageSource::Encoded(_) = item.image {
            let result = self.session.download_item(id, &self.download_dir);
            self.finish_download(result);
            return;
        }

        let dir = self.download_dir.clone();
        let settings = self.session.export_settings().clone();
        let (tx, rx) = mpsc::channel();

        self.export_in_progress = true;
        self.export_receiver = Some(rx);

        thread::spawn(move || {
            let result = export_item(&item, &dir, &settings);
            let _ = tx.send(result);
        });
    }

    fn finish_download(&mut self, result: Result<ExportResult, ExportError>) {
        match result {
            Ok(result) => self.notify(
                NoticeLevel::Success,
                format!("Saved to {}", result.output_path.display()),
            ),
            Err(e) => self.notify(NoticeLevel::Error, format!("Download failed: {}", e)),
        }
    }

    /// Poll for remote download results
    fn poll_download(&mut self) {
        if let Some(ref receiver) = self.export_receiver {
            let result = match receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    Err(ExportError::Fetch("Download thread terminated unexpectedly".to_string()))
                }
            };

            self.export_in_progress = false;
            self.export_receiver = None;
            self.finish_download(result);
        }
    }

    /// Poll for the draft image
    fn poll_ingestion(&mut self) {
        if let Some(Err(e)) = self.session.poll_ingestion() {
            self.notify(NoticeLevel::Error, format!("Could not read image: {}", e));
        }
    }

    fn drain_log(&mut self) {
        if let Some(ref receiver) = self.log_receiver {
            self.log_lines.extend(receiver.try_iter());
            if self.log_lines.len() > MAX_LOG_LINES {
                let excess = self.log_lines.len() - MAX_LOG_LINES;
                self.log_lines.drain(..excess);
            }
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("🎮 GameIcons");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                    ui.separator();
                    if ui.button("Log").clicked() {
                        self.show_log_window = !self.show_log_window;
                    }
                    if ui.button("⬆ Upload").clicked() {
                        intents.push(Intent::OpenUpload);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn show_library(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Game icon library");
                ui.label("Replace default shortcuts with great icons for your favourite games");
            });
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.label("🔍");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_text)
                        .hint_text("Search games...")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    intents.push(Intent::SetQuery(self.search_text.clone()));
                }
            });
            ui.add_space(8.0);

            ui.horizontal_wrapped(|ui| {
                let current = self.session.genre_filter();
                for choice in GenreFilter::choices() {
                    if ui.selectable_label(current == choice, choice.display_name()).clicked() {
                        intents.push(Intent::SetGenre(choice));
                    }
                }
            });
            ui.add_space(12.0);

            let visible = self.session.visible_items();
            if visible.is_empty() {
                ui.colored_label(egui::Color32::GRAY, "No icons match your search");
                return;
            }

            for item in &visible {
                self.images.request(ctx, item);
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(12.0, 12.0);
                        for item in &visible {
                            let response = ui
                                .vertical(|ui| {
                                    ui.set_width(CARD_SIZE.x);
                                    show_item_image(ui, &self.images, item.id, CARD_SIZE);
                                    let title = egui::RichText::new(&item.title).strong();
                                    ui.add(egui::Label::new(title).truncate());
                                    ui.small(item.genre.display_name());
                                })
                                .response
                                .interact(egui::Sense::click())
                                .on_hover_cursor(egui::CursorIcon::PointingHand);

                            if response.clicked() {
                                intents.push(Intent::Select(Some(item.id)));
                            }
                        }
                    });
                });
        });
    }

    fn show_upload_window(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        let Some(draft_genre) = self.session.draft().map(|d| d.genre) else {
            return;
        };
        let preview = self
            .images
            .preview(ctx, self.session.preview())
            .map(|texture| (texture.id(), texture.size_vec2()));
        let ingesting = self.session.is_ingesting();
        let mut open = true;

        egui::Window::new("Upload icon")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.colored_label(egui::Color32::GRAY, "Add your own icon to the library");
                ui.add_space(8.0);

                ui.label("Game title");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.title_text)
                        .hint_text("Enter the game title")
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    intents.push(Intent::EditDraft(DraftUpdate::title(self.title_text.clone())));
                }
                ui.add_space(8.0);

                ui.label("Genre");
                let mut genre = draft_genre;
                egui::ComboBox::new("draft_genre_combo", "")
                    .selected_text(genre.display_name())
                    .show_ui(ui, |ui| {
                        for choice in Genre::ALL {
                            ui.selectable_value(&mut genre, choice, choice.display_name());
                        }
                    });
                if genre != draft_genre {
                    intents.push(Intent::EditDraft(DraftUpdate::genre(genre)));
                }
                ui.add_space(8.0);

                ui.label("Image");
                ui.horizontal(|ui| {
                    if ui.button("Choose file...").clicked() {
                        intents.push(Intent::ChooseFile);
                    }
                    if ingesting {
                        ui.spinner();
                        ui.label("Reading...");
                    }
                });

                if let Some((texture_id, size)) = preview {
                    let scale = (PREVIEW_MAX.x / size.x).min(PREVIEW_MAX.y / size.y).min(1.0);
                    ui.add_space(8.0);
                    ui.image((texture_id, size * scale));
                }
                ui.add_space(12.0);

                let add_button = egui::Button::new("➕ Add to library");
                if ui.add_sized([ui.available_width(), 36.0], add_button).clicked() {
                    intents.push(Intent::Submit);
                }
            });

        if !open {
            intents.push(Intent::CloseUpload);
        }
    }

    fn show_detail_window(&mut self, ctx: &egui::Context, intents: &mut Vec<Intent>) {
        let Some(item) = self.session.selection() else {
            return;
        };
        let (id, title, genre) = (item.id, item.title.clone(), item.genre);
        let export_in_progress = self.export_in_progress;
        let mut open = true;

        egui::Window::new(title)
            .id(egui::Id::new("detail_window"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.colored_label(
                    egui::Color32::GRAY,
                    "Download the icon to replace the default shortcut",
                );
                ui.add_space(8.0);

                show_item_image(ui, &self.images, id, DETAIL_SIZE);
                if let Some(error) = self.images.error(id) {
                    ui.colored_label(egui::Color32::LIGHT_RED, error);
                }
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Genre:");
                    ui.strong(genre.display_name());
                });
                ui.add_space(8.0);

                ui.add_enabled_ui(!export_in_progress, |ui| {
                    let text = if export_in_progress {
                        "Downloading..."
                    } else {
                        "⬇ Download icon"
                    };
                    let button = egui::Button::new(text);
                    if ui.add_sized([ui.available_width(), 36.0], button).clicked() {
                        intents.push(Intent::Download(id));
                    }
                });
                ui.add_space(8.0);

                ui.group(|ui| {
                    ui.strong("How to install:");
                    for (i, step) in INSTALL_STEPS.iter().enumerate() {
                        ui.label(format!("{}. {}", i + 1, step));
                    }
                });
            });

        if !open {
            intents.push(Intent::Select(None));
        }
    }

    fn show_log_window(&mut self, ctx: &egui::Context) {
        if !self.show_log_window {
            return;
        }

        egui::Window::new("Log")
            .open(&mut self.show_log_window)
            .default_size([500.0, 300.0])
            .resizable(true)
            .show(ctx, |ui| {
                if ui.button("Clear").clicked() {
                    self.log_lines.clear();
                }
                ui.separator();

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            let color = if line.starts_with("[ERROR]") {
                                egui::Color32::RED
                            } else if line.starts_with("[WARN]") {
                                egui::Color32::YELLOW
                            } else {
                                egui::Color32::GRAY
                            };
                            ui.colored_label(color, line);
                        }
                    });
            });
    }

    fn show_notices(&self, ctx: &egui::Context) {
        if self.notices.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("notices"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
            .show(ctx, |ui| {
                for notice in &self.notices {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(notice.level.color(), &notice.text);
                    });
                }
            });
    }
}

/// Draw an item's cover at a fixed size, with a spinner or placeholder while unavailable
fn show_item_image(ui: &mut egui::Ui, images: &ImageCache, id: ItemId, size: egui::Vec2) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());

    if let Some(texture) = images.texture(id) {
        egui::Image::new((texture.id(), size))
            .rounding(6.0)
            .paint_at(ui, rect);
        return;
    }

    ui.painter().rect_filled(rect, 6.0, egui::Color32::from_gray(32));
    if images.is_loading(id) {
        ui.put(rect, egui::Spinner::new());
    } else {
        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "🎮",
            egui::FontId::proportional(32.0),
            egui::Color32::GRAY,
        );
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_log();
        self.poll_ingestion();
        self.poll_download();
        let images_loading = self.images.poll(ctx);
        self.notices.retain(|n| n.shown_at.elapsed() < NOTICE_DURATION);

        // Request repaint while loading or while notices are on screen
        if images_loading
            || self.session.is_ingesting()
            || self.export_in_progress
            || !self.notices.is_empty()
        {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut intents = Vec::new();
        self.show_top_panel(ctx, &mut intents);
        self.show_library(ctx, &mut intents);
        self.show_upload_window(ctx, &mut intents);
        self.show_detail_window(ctx, &mut intents);
        self.show_log_window(ctx);
        self.show_notices(ctx);

        for intent in intents {
            self.handle(intent);
        }
    }
}
