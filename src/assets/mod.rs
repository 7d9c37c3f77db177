/// Bundled asset access
///
/// This module handles:
/// - Listing the images inside one folder (source.rs)
/// - Reading and decoding a single image (decode.rs)

pub mod decode;
pub mod source;

pub use source::{AssetSource, DirectoryAssets};
