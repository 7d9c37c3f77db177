use cgmath::{Deg, Rad};
use iced::widget::canvas;
use iced::{Element, Length, Radians, Task, Theme};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod assets;
mod config;
mod error;
mod gesture;
mod state;
mod ui;

use assets::{AssetSource, DirectoryAssets};
use config::Config;
use gesture::{GestureEvent, GestureSettings};
use state::data::{FolderName, FolderSet, ImageName};
use state::session::{DecodeResult, ListingResult, Mode, Session};
use state::transform::ScaleBounds;

/// Main application state
struct Skanda {
    /// Browser/viewer state machine
    session: Session,
    /// Where folders and images are read from
    assets: Arc<dyn AssetSource>,
    /// Rotation of the browsing-screen preview
    preview_rotation: Radians,
    /// Thresholds handed to the full-screen canvas
    gestures: GestureSettings,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User picked a folder from the menu
    FolderSelected(FolderName),
    /// Background listing finished
    FolderListed(ListingResult),
    /// User clicked an image name
    ImageSelected(ImageName),
    /// Background decode finished
    ImageDecoded(DecodeResult),
    /// User clicked the preview
    PreviewTapped,
    /// Gesture recognised on the full-screen canvas
    Gesture(GestureEvent),
}

impl Skanda {
    /// Create a new instance of the application and list the first folder
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();
        let assets = DirectoryAssets::new(config.resolved_asset_root());
        info!("🎨 Skanda reading assets from {}", assets.root().display());

        // Config::load only hands out validated configs, which have folders
        let folders = FolderSet::new(config.folders.clone())
            .expect("validated config always has at least one folder");

        let (session, first_listing) = Session::new(
            folders,
            ScaleBounds {
                min: config.min_scale,
                max: config.max_scale,
            },
            Deg(config.fullscreen_rotation_degrees),
        );

        let preview_rotation: Rad<f32> = Deg(config.preview_rotation_degrees).into();
        let app = Skanda {
            session,
            assets: Arc::new(assets),
            preview_rotation: Radians(preview_rotation.0),
            gestures: GestureSettings::from_config(&config),
        };

        let task = Task::perform(
            first_listing.perform(app.assets.clone()),
            Message::FolderListed,
        );
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::FolderSelected(folder) => {
                if let Some(request) = self.session.select_folder(folder.as_str()) {
                    return Task::perform(
                        request.perform(self.assets.clone()),
                        Message::FolderListed,
                    );
                }
            }
            Message::FolderListed(result) => {
                self.session.apply_listing(result);
            }
            Message::ImageSelected(name) => {
                if let Some(request) = self.session.select_image(&name) {
                    return Task::perform(
                        request.perform(self.assets.clone()),
                        Message::ImageDecoded,
                    );
                }
            }
            Message::ImageDecoded(result) => {
                self.session.apply_decode(result);
            }
            Message::PreviewTapped => {
                if self.session.tap_preview() {
                    info!("🔍 Entered full screen");
                }
            }
            Message::Gesture(_) if *self.session.mode() == Mode::Browsing => {
                // Queued from a canvas that is already gone
            }
            Message::Gesture(GestureEvent::Transform(gesture)) => {
                self.session.transform(&gesture);
            }
            Message::Gesture(GestureEvent::DoubleTap { .. }) => {
                if self.session.double_tap() {
                    info!("↩️  Left full screen");
                }
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        if let (Some(transform), Some(raster)) =
            (self.session.viewer_transform(), self.session.raster())
        {
            return canvas(ui::viewer::FullScreenViewer {
                raster,
                transform,
                gestures: self.gestures,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
        }

        ui::browser::view(&self.session, self.preview_rotation)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skanda=info")),
        )
        .init();

    iced::application("Skanda", Skanda::update, Skanda::view)
        .theme(Skanda::theme)
        .centered()
        .run_with(Skanda::new)
}
