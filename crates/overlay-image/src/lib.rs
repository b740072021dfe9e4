//! Owned RGBA images and a small immediate-mode drawing API.
//!
//! # Overview
//!
//! [`Image`] is an owned 8-bit sRGBA image stored on the CPU. Overlays are drawn into transparent
//! [`Image`]s and later composited onto a camera frame with [`Image::overlay`].
//!
//! ## Drawing
//!
//! The [`draw`] module contains freestanding functions that return a *guard object*. The guard
//! allows optional customization of the shape and performs the draw operation when dropped.
//! Drawing is meant for quickly visualizing tracking output, not for high-quality vector graphics.

pub mod draw;

mod color;
mod image;
mod rect;
mod resolution;


pub use color::Color;
pub use image::Image;
pub use rect::Rect;
pub use resolution::Resolution;
