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

use super::{ElementArena, ElementHandle};
use mosaic_core::asset::NamedAssetSource;
use mosaic_core::scene::VisualElement;
use std::collections::HashMap;

/// The set of visual elements currently on screen.
///
/// Owns every element and indexes them by name so that the sequencer can find
/// collaborators it did not create (the background, for instance).
#[derive(Default)]
pub struct Stage {
    elements: ElementArena<Box<dyn VisualElement>>,
    names: HashMap<String, ElementHandle>,
}

impl Stage {
    /// Creates an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes `element` against `assets` and adds it.
    ///
    /// If an element with the same name is already present, the name now points
    /// at the new element; the old one keeps running until removed by handle.
    pub fn add(
        &mut self,
        mut element: Box<dyn VisualElement>,
        assets: &dyn NamedAssetSource,
    ) -> ElementHandle {
        element.initialize(assets);
        let name = element.name().to_string();
        let handle = self.elements.insert(element);
        if self.names.insert(name.clone(), handle).is_some() {
            log::warn!("[Stage] '{}' was already on stage, name rebound", name);
        }
        log::debug!("[Stage] Added '{}' as {}", name, handle);
        handle
    }

    /// Looks up an element handle by name.
    pub fn find_by_name(&self, name: &str) -> Option<ElementHandle> {
        self.names
            .get(name)
            .copied()
            .filter(|handle| self.elements.contains(*handle))
    }

    /// The element behind `handle`.
    pub fn get(&self, handle: ElementHandle) -> Option<&dyn VisualElement> {
        self.elements.get(handle).map(|element| &**element)
    }

    /// Downcasts the element behind `handle` to `T`.
    pub fn get_as<T: 'static>(&self, handle: ElementHandle) -> Option<&T> {
        self.elements
            .get(handle)
            .and_then(|element| element.as_any().downcast_ref::<T>())
    }

    /// Mutably downcasts the element behind `handle` to `T`.
    pub fn get_as_mut<T: 'static>(&mut self, handle: ElementHandle) -> Option<&mut T> {
        self.elements
            .get_mut(handle)
            .and_then(|element| element.as_any_mut().downcast_mut::<T>())
    }

    /// Finds an element by name and downcasts it to `T`.
    pub fn find_as_mut<T: 'static>(&mut self, name: &str) -> Option<&mut T> {
        let handle = self.find_by_name(name)?;
        self.get_as_mut(handle)
    }

    /// Removes the element behind `handle`.
    pub fn remove(&mut self, handle: ElementHandle) -> Option<Box<dyn VisualElement>> {
        let element = self.elements.remove(handle)?;
        if self.names.get(element.name()) == Some(&handle) {
            self.names.remove(element.name());
        }
        log::debug!("[Stage] Removed '{}'", element.name());
        Some(element)
    }

    /// Removes the element registered under `name`.
    pub fn remove_by_name(&mut self, name: &str) -> Option<Box<dyn VisualElement>> {
        let handle = self.find_by_name(name)?;
        self.remove(handle)
    }

    /// Advances every element by `delta_seconds`.
    pub fn update_all(&mut self, delta_seconds: f32) {
        for element in self.elements.iter_mut() {
            element.update(delta_seconds);
        }
    }

    /// Number of elements on stage.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the stage is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Names of the elements on stage, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::asset::{AssetHandle, Bitmap};
    use std::any::Any;

    struct NoAssets;

    impl NamedAssetSource for NoAssets {
        fn lookup_named(&self, _name: &str, _frame: usize) -> Option<AssetHandle<Bitmap>> {
            None
        }

        fn count_frames(&self, _name: &str) -> usize {
            0
        }
    }

    struct Ticker {
        name: String,
        initialized: bool,
        elapsed: f32,
    }

    impl Ticker {
        fn boxed(name: &str) -> Box<Self> {
            Box::new(Self {
                name: name.to_string(),
                initialized: false,
                elapsed: 0.0,
            })
        }
    }

    impl VisualElement for Ticker {
        fn name(&self) -> &str {
            &self.name
        }

        fn initialize(&mut self, _assets: &dyn NamedAssetSource) {
            self.initialized = true;
        }

        fn update(&mut self, delta_seconds: f32) {
            self.elapsed += delta_seconds;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn add_initializes_and_indexes_by_name() {
        let mut stage = Stage::new();
        let handle = stage.add(Ticker::boxed("bg"), &NoAssets);

        assert_eq!(stage.find_by_name("bg"), Some(handle));
        assert!(stage.get_as::<Ticker>(handle).unwrap().initialized);
    }

    #[test]
    fn update_all_advances_every_element() {
        let mut stage = Stage::new();
        let a = stage.add(Ticker::boxed("a"), &NoAssets);
        let b = stage.add(Ticker::boxed("b"), &NoAssets);
        stage.update_all(0.25);
        stage.update_all(0.25);

        assert_eq!(stage.get_as::<Ticker>(a).unwrap().elapsed, 0.5);
        assert_eq!(stage.get_as::<Ticker>(b).unwrap().elapsed, 0.5);
    }

    #[test]
    fn removal_invalidates_name_and_handle() {
        let mut stage = Stage::new();
        let handle = stage.add(Ticker::boxed("caption"), &NoAssets);
        assert!(stage.remove_by_name("caption").is_some());

        assert_eq!(stage.find_by_name("caption"), None);
        assert!(stage.get(handle).is_none());
        assert!(stage.find_as_mut::<Ticker>("caption").is_none());
        assert!(stage.is_empty());
    }

    #[test]
    fn rebinding_a_name_keeps_both_elements() {
        let mut stage = Stage::new();
        let first = stage.add(Ticker::boxed("dup"), &NoAssets);
        let second = stage.add(Ticker::boxed("dup"), &NoAssets);

        assert_eq!(stage.find_by_name("dup"), Some(second));
        stage.remove(first);
        assert_eq!(stage.find_by_name("dup"), Some(second));
        assert_eq!(stage.len(), 1);
    }
}
