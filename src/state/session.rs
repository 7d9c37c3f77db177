use cgmath::Deg;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::data::{FolderName, FolderSet, ImageName, Raster};
use super::transform::{ScaleBounds, TransformGesture, ViewerTransform};
use crate::assets::{decode, AssetSource};

/// What is on screen
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Folder picker, image list and preview
    Browsing,
    /// One image filling the window, with its own transform
    FullScreen(ViewerTransform),
}

/// Ask for the listing of a folder
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub folder: FolderName,
    ticket: u64,
}

/// Outcome of a listing; empty when the folder is missing or unreadable
#[derive(Debug, Clone, PartialEq)]
pub struct ListingResult {
    pub folder: FolderName,
    pub names: Vec<ImageName>,
    ticket: u64,
}

impl ListingRequest {
    /// List the folder on the calling thread
    pub fn run(self, source: &dyn AssetSource) -> ListingResult {
        let names = source.list(self.folder.as_str()).unwrap_or_else(|e| {
            warn!("Listing {} failed, showing no images: {}", self.folder, e);
            Vec::new()
        });

        ListingResult {
            folder: self.folder,
            names,
            ticket: self.ticket,
        }
    }

    /// List the folder on the blocking pool
    pub fn perform(self, source: Arc<dyn AssetSource>) -> impl Future<Output = ListingResult> {
        let fallback = ListingResult {
            folder: self.folder.clone(),
            names: Vec::new(),
            ticket: self.ticket,
        };

        async move {
            tokio::task::spawn_blocking(move || self.run(source.as_ref()))
                .await
                .unwrap_or_else(|e| {
                    warn!("Listing task failed: {}", e);
                    fallback
                })
        }
    }
}

/// Ask for one image to be decoded
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeRequest {
    pub folder: FolderName,
    pub name: ImageName,
    ticket: u64,
}

/// Outcome of a decode; `None` when the image is missing or corrupt
#[derive(Debug, Clone)]
pub struct DecodeResult {
    pub name: ImageName,
    pub raster: Option<Raster>,
    ticket: u64,
}

impl DecodeRequest {
    /// Read and decode on the calling thread
    pub fn run(self, source: &dyn AssetSource) -> DecodeResult {
        let raster = match decode::load_raster(source, self.folder.as_str(), &self.name) {
            Ok(raster) => Some(raster),
            Err(e) => {
                warn!("No preview for {}/{}: {}", self.folder, self.name, e);
                None
            }
        };

        DecodeResult {
            name: self.name,
            raster,
            ticket: self.ticket,
        }
    }

    /// Read and decode on the blocking pool
    pub fn perform(self, source: Arc<dyn AssetSource>) -> impl Future<Output = DecodeResult> {
        let fallback = DecodeResult {
            name: self.name.clone(),
            raster: None,
            ticket: self.ticket,
        };

        async move {
            tokio::task::spawn_blocking(move || self.run(source.as_ref()))
                .await
                .unwrap_or_else(|e| {
                    warn!("Decode task failed: {}", e);
                    fallback
                })
        }
    }
}

/// Browser and viewer state for one run of the app
///
/// Every transition is synchronous. Transitions that need I/O hand back a
/// request; its result is fed back through `apply_listing`/`apply_decode`.
/// Each request carries a ticket and only the result for the latest ticket
/// is applied, so a slow listing or decode can never overwrite a newer
/// selection.
#[derive(Debug)]
pub struct Session {
    folders: FolderSet,
    selected_folder: FolderName,
    image_names: Vec<ImageName>,
    selected_image: Option<ImageName>,
    raster: Option<Raster>,
    mode: Mode,
    scale_bounds: ScaleBounds,
    initial_rotation: Deg<f32>,
    listing_ticket: u64,
    decode_ticket: u64,
}

impl Session {
    /// Start browsing the first folder. The returned request lists it.
    pub fn new(
        folders: FolderSet,
        scale_bounds: ScaleBounds,
        initial_rotation: Deg<f32>,
    ) -> (Self, ListingRequest) {
        let first = folders.first().clone();
        let mut session = Self {
            selected_folder: first.clone(),
            folders,
            image_names: Vec::new(),
            selected_image: None,
            raster: None,
            mode: Mode::Browsing,
            scale_bounds,
            initial_rotation,
            listing_ticket: 0,
            decode_ticket: 0,
        };
        let request = session.begin_folder(first);
        (session, request)
    }

    /// Switch folder. Ignored unless `name` is one of the fixed folders.
    pub fn select_folder(&mut self, name: &str) -> Option<ListingRequest> {
        let Some(folder) = self.folders.get(name).cloned() else {
            warn!("Ignoring unknown folder {:?}", name);
            return None;
        };
        info!("📁 Selected folder {}", folder);
        Some(self.begin_folder(folder))
    }

    fn begin_folder(&mut self, folder: FolderName) -> ListingRequest {
        // The raster goes away, so the viewer has nothing left to show
        self.mode = Mode::Browsing;
        self.selected_folder = folder.clone();
        self.image_names.clear();
        self.selected_image = None;
        self.raster = None;
        self.listing_ticket += 1;
        // Any decode still in flight belongs to the old folder
        self.decode_ticket += 1;

        ListingRequest {
            folder,
            ticket: self.listing_ticket,
        }
    }

    /// Install a finished listing if it is still current
    pub fn apply_listing(&mut self, result: ListingResult) -> bool {
        if result.ticket != self.listing_ticket {
            debug!("Dropping stale listing of {}", result.folder);
            return false;
        }
        debug!("{} has {} images", result.folder, result.names.len());
        self.image_names = result.names;
        true
    }

    /// Pick an image from the current listing. Ignored for unknown names.
    pub fn select_image(&mut self, name: &str) -> Option<DecodeRequest> {
        if !self.image_names.iter().any(|n| n == name) {
            warn!("Ignoring image {:?} not in {}", name, self.selected_folder);
            return None;
        }

        info!("🖼️  Selected {}/{}", self.selected_folder, name);
        self.selected_image = Some(name.to_string());
        self.raster = None;
        self.mode = Mode::Browsing;
        self.decode_ticket += 1;

        Some(DecodeRequest {
            folder: self.selected_folder.clone(),
            name: name.to_string(),
            ticket: self.decode_ticket,
        })
    }

    /// Install a finished decode if it is still current
    pub fn apply_decode(&mut self, result: DecodeResult) -> bool {
        if result.ticket != self.decode_ticket {
            debug!("Dropping stale decode of {}", result.name);
            return false;
        }
        self.raster = result.raster;
        true
    }

    /// Open the full-screen viewer. Needs a decoded image.
    pub fn tap_preview(&mut self) -> bool {
        if self.raster.is_none() || self.mode != Mode::Browsing {
            return false;
        }
        self.mode = Mode::FullScreen(self.fresh_transform());
        true
    }

    /// Feed one gesture update to the full-screen viewer
    pub fn transform(&mut self, gesture: &TransformGesture) -> bool {
        match &mut self.mode {
            Mode::FullScreen(transform) => {
                transform.apply(gesture);
                true
            }
            Mode::Browsing => false,
        }
    }

    /// Close the full-screen viewer
    pub fn double_tap(&mut self) -> bool {
        match &mut self.mode {
            Mode::FullScreen(transform) => {
                transform.reset_zoom_and_pan();
                self.mode = Mode::Browsing;
                true
            }
            Mode::Browsing => false,
        }
    }

    fn fresh_transform(&self) -> ViewerTransform {
        ViewerTransform::new(self.scale_bounds, self.initial_rotation)
    }

    pub fn folders(&self) -> &FolderSet {
        &self.folders
    }

    pub fn selected_folder(&self) -> &FolderName {
        &self.selected_folder
    }

    pub fn image_names(&self) -> &[ImageName] {
        &self.image_names
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Current viewer transform, only while full-screen
    pub fn viewer_transform(&self) -> Option<&ViewerTransform> {
        match &self.mode {
            Mode::FullScreen(transform) => Some(transform),
            Mode::Browsing => None,
        }
    }
}
