//! Screenshot capture through the shared image buffer.
//!
//! A capture clears the buffer, selects the sheet's used range, asks the host
//! to copy the selection as a picture and then drains the buffer. Hosts that
//! finish the copy asynchronously are polled on a fixed interval up to a
//! deadline instead of being given a fixed head start.

use crate::error::{CaptureError, HostError};
use crate::host::{AutomationHost, CopyStatus};
use crate::session::Worksheet;
use image::RgbaImage;
use sheetcast_engine::ImageBuffer;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long to wait for a pending copy, and how often to look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        CaptureSettings {
            timeout: Duration::from_millis(5_000),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Turns a worksheet's used range into a raster image.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenshotCapturer {
    settings: CaptureSettings,
}

impl ScreenshotCapturer {
    pub fn new(settings: CaptureSettings) -> Self {
        ScreenshotCapturer { settings }
    }

    pub fn settings(&self) -> CaptureSettings {
        self.settings
    }

    /// Capture the sheet's used range.
    ///
    /// The buffer is left empty afterwards, so no capture can pick up an
    /// image left behind by another.
    pub fn capture<H, B>(
        &self,
        sheet: &mut Worksheet<'_, H, B>,
    ) -> Result<RgbaImage, CaptureError>
    where
        H: AutomationHost,
        B: ImageBuffer,
    {
        let name = sheet.name().to_string();
        let range = sheet
            .used_range()
            .map_err(CaptureError::CopyFailed)?
            .ok_or(CaptureError::BufferEmpty)?;

        let (host, buffer) = sheet.parts().map_err(CaptureError::CopyFailed)?;
        buffer
            .clear()
            .map_err(|e| CaptureError::CopyFailed(HostError::Buffer(e)))?;
        host.select(&name, range).map_err(CaptureError::CopyFailed)?;

        debug!(sheet = %name, range = %range, "Copying selection to image buffer");
        let status = host
            .copy_selection(buffer)
            .map_err(CaptureError::CopyFailed)?;

        let drained = match status {
            CopyStatus::Completed => {
                load(buffer).and_then(|image| image.ok_or(CaptureError::BufferEmpty))
            }
            CopyStatus::Pending => self.wait_for_image(buffer),
        };

        if let Err(e) = buffer.clear() {
            warn!(sheet = %name, error = %e, "Failed to clear image buffer after capture");
        }

        let image = drained?;
        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::BufferEmpty);
        }
        debug!(
            sheet = %name,
            width = image.width(),
            height = image.height(),
            "Captured sheet image"
        );
        Ok(image)
    }

    fn wait_for_image<B: ImageBuffer>(&self, buffer: &mut B) -> Result<RgbaImage, CaptureError> {
        let started = Instant::now();
        let deadline = started + self.settings.timeout;
        loop {
            if let Some(image) = load(buffer)? {
                debug!(waited = ?started.elapsed(), "Image buffer filled");
                return Ok(image);
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(CaptureError::CopyTimeout(self.settings.timeout));
            }
            thread::sleep(self.settings.poll_interval.min(deadline - now));
        }
    }
}

fn load<B: ImageBuffer>(buffer: &mut B) -> Result<Option<RgbaImage>, CaptureError> {
    buffer
        .load()
        .map_err(|e| CaptureError::CopyFailed(HostError::Buffer(e)))
}
