/// Image decoding
///
/// Turns the bytes of an asset into an RGBA raster the renderer can draw.
/// Any format the `image` crate was built with is accepted.

use iced::widget::image::Handle;

use super::AssetSource;
use crate::error::AssetError;
use crate::state::data::Raster;

/// Read `folder/name` and decode it
pub fn load_raster(
    source: &dyn AssetSource,
    folder: &str,
    name: &str,
) -> Result<Raster, AssetError> {
    let bytes = source.read(folder, name)?;
    decode_raster(name, &bytes)
}

/// Decode in-memory image bytes
pub fn decode_raster(name: &str, bytes: &[u8]) -> Result<Raster, AssetError> {
    let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        name: name.to_string(),
        source,
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(Raster {
        name: name.to_string(),
        width,
        height,
        handle: Handle::from_rgba(width, height, rgba.into_raw()),
    })
}
