/// Shared data structures for the application state
///
/// These structs are the vocabulary of the browser: which folders exist,
/// what an image is called, and what a decoded image looks like once it
/// reaches the UI.

use iced::widget::image::Handle;
use std::fmt;

/// One member of the fixed folder set
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderName(String);

impl FolderName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The folders a user can pick from, fixed at startup
///
/// A `FolderName` can only be obtained through this set, so holding one
/// proves membership.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSet {
    folders: Vec<FolderName>,
}

impl FolderSet {
    /// Build the set, dropping duplicates while keeping first-seen order.
    /// Returns `None` if nothing is left.
    pub fn new<I, S>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut folders: Vec<FolderName> = Vec::new();
        for name in names {
            let name = FolderName(name.into());
            if !folders.contains(&name) {
                folders.push(name);
            }
        }

        if folders.is_empty() {
            None
        } else {
            Some(Self { folders })
        }
    }

    /// Look up a folder by name
    pub fn get(&self, name: &str) -> Option<&FolderName> {
        self.folders.iter().find(|f| f.as_str() == name)
    }

    /// The folder selected on launch
    pub fn first(&self) -> &FolderName {
        &self.folders[0]
    }

    pub fn as_slice(&self) -> &[FolderName] {
        &self.folders
    }
}

/// Name of an image within a folder, as returned by the listing
pub type ImageName = String;

/// A decoded image ready for display
#[derive(Debug, Clone)]
pub struct Raster {
    /// Image this raster was decoded from
    pub name: ImageName,
    pub width: u32,
    pub height: u32,
    /// RGBA pixels handed to the renderer
    pub handle: Handle,
}
