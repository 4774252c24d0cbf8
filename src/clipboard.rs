//! System clipboard as the shared image buffer.

use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use sheetcast_engine::{BufferError, ImageBuffer};
use std::borrow::Cow;

/// Image buffer backed by the OS clipboard through arboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, BufferError> {
        let clipboard = Clipboard::new().map_err(|e| BufferError::Unavailable(e.to_string()))?;
        Ok(SystemClipboard { clipboard })
    }
}

impl ImageBuffer for SystemClipboard {
    fn clear(&mut self) -> Result<(), BufferError> {
        self.clipboard
            .clear()
            .map_err(|e| BufferError::Rejected(e.to_string()))
    }

    fn store(&mut self, image: RgbaImage) -> Result<(), BufferError> {
        let (width, height) = image.dimensions();
        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(image.into_raw()),
        };
        self.clipboard
            .set_image(data)
            .map_err(|e| BufferError::Rejected(e.to_string()))
    }

    fn load(&mut self) -> Result<Option<RgbaImage>, BufferError> {
        match self.clipboard.get_image() {
            Ok(data) => Ok(to_rgba(data)),
            // Nothing there yet, or something other than an image.
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(BufferError::Unavailable(e.to_string())),
        }
    }
}

/// Convert clipboard image data; `None` when the byte count does not match
/// the dimensions.
fn to_rgba(data: ImageData<'_>) -> Option<RgbaImage> {
    let width = u32::try_from(data.width).ok()?;
    let height = u32::try_from(data.height).ok()?;
    RgbaImage::from_raw(width, height, data.bytes.into_owned())
}
