// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides the foundational traits and primitive types for the asset system.
//!
//! This module defines the "common language" for asset-related operations. It
//! holds the contracts that the storage and loading crates implement, but it has
//! no knowledge of how assets are decoded or where they are kept.
//!
//! The key components are:
//! - The [`Asset`] trait: A marker for all types that can be treated as assets.
//! - [`AssetHandle`]: A shared, non-owning view of a loaded asset.
//! - [`Bitmap`]: The decoded RGBA8 image every streamed and named asset becomes.
//! - [`NamedAssetSource`]: Read access to assets resolved by name rather than by slot.

mod bitmap;
mod handle;

pub use bitmap::*;
pub use handle::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce the guarantees background loading relies on:
/// - `Send` + `Sync`: The asset is decoded on a worker thread and read on the
///   orchestrating thread.
/// - `'static`: The asset does not borrow anything, so it can outlive the task
///   that produced it.
///
/// # Examples
///
/// ```
/// use mosaic_core::asset::Asset;
///
/// struct Glyph {
///     // ... fields
/// }
///
/// impl Asset for Glyph {}
/// ```
pub trait Asset: Send + Sync + 'static {}

/// Read access to assets registered under a name.
///
/// Named assets hold an ordered list of frames so that multi-frame animations
/// can be looked up frame by frame. Visual elements receive this trait during
/// initialization instead of a concrete store type.
pub trait NamedAssetSource {
    /// Returns the frame `frame_index` registered under `name`.
    ///
    /// Returns `None` if the name is unknown or the frame is out of range.
    fn lookup_named(&self, name: &str, frame_index: usize) -> Option<AssetHandle<Bitmap>>;

    /// Returns the number of frames registered under `name`, or `0` if absent.
    fn count_frames(&self, name: &str) -> usize;
}
