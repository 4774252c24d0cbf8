//! Shared image buffer abstraction.
//!
//! A shared image buffer is a process-wide staging area (the system clipboard
//! in production) that an automation host copies a rendered selection into.
//! Captures go through a trait so tests can substitute an in-memory buffer.

use crate::error::BufferError;
use image::RgbaImage;

/// Trait for shared image buffer operations.
pub trait ImageBuffer {
    /// Discard whatever the buffer currently holds.
    fn clear(&mut self) -> Result<(), BufferError>;

    /// Place an image in the buffer, replacing its contents.
    fn store(&mut self, image: RgbaImage) -> Result<(), BufferError>;

    /// Read the current image, if the buffer holds one.
    fn load(&mut self) -> Result<Option<RgbaImage>, BufferError>;
}

impl<T: ImageBuffer + ?Sized> ImageBuffer for &mut T {
    fn clear(&mut self) -> Result<(), BufferError> {
        (**self).clear()
    }

    fn store(&mut self, image: RgbaImage) -> Result<(), BufferError> {
        (**self).store(image)
    }

    fn load(&mut self) -> Result<Option<RgbaImage>, BufferError> {
        (**self).load()
    }
}

impl<T: ImageBuffer + ?Sized> ImageBuffer for Box<T> {
    fn clear(&mut self) -> Result<(), BufferError> {
        (**self).clear()
    }

    fn store(&mut self, image: RgbaImage) -> Result<(), BufferError> {
        (**self).store(image)
    }

    fn load(&mut self) -> Result<Option<RgbaImage>, BufferError> {
        (**self).load()
    }
}

/// In-process image buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageBuffer {
    image: Option<RgbaImage>,
    stores: usize,
}

impl MemoryImageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of images stored since creation.
    pub fn stores(&self) -> usize {
        self.stores
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

impl ImageBuffer for MemoryImageBuffer {
    fn clear(&mut self) -> Result<(), BufferError> {
        self.image = None;
        Ok(())
    }

    fn store(&mut self, image: RgbaImage) -> Result<(), BufferError> {
        self.image = Some(image);
        self.stores += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<RgbaImage>, BufferError> {
        Ok(self.image.clone())
    }
}
