//! Frame sources feeding the overlay loop.

use overlay_image::Image;

/// Provides the most recent camera frame.
pub trait FrameSource {
    /// Returns the latest frame.
    ///
    /// Sources that cannot produce a frame right now return an error; the frame loop skips that
    /// cycle and tries again on the next one.
    fn latest(&mut self) -> anyhow::Result<Image>;
}

/// A still image acts as a camera that always shows the same picture.
impl FrameSource for Image {
    fn latest(&mut self) -> anyhow::Result<Image> {
        Ok(self.clone())
    }
}

/// Adapts an iterator of frames into a [`FrameSource`].
///
/// Errors yielded by the iterator are passed through. Once the iterator is exhausted, every
/// further call to [`FrameSource::latest`] fails.
#[derive(Debug)]
pub struct FrameIter<I> {
    frames: I,
}

impl<I: Iterator<Item = anyhow::Result<Image>>> FrameIter<I> {
    pub fn new(frames: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl<I: Iterator<Item = anyhow::Result<Image>>> FrameSource for FrameIter<I> {
    fn latest(&mut self) -> anyhow::Result<Image> {
        match self.frames.next() {
            Some(frame) => frame,
            None => anyhow::bail!("frame source is exhausted"),
        }
    }
}
