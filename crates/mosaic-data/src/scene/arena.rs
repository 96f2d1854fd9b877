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

use std::fmt;

/// A generation-checked reference into an [`ElementArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    index: u32,
    generation: u32,
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// An owning container that hands out [`ElementHandle`]s.
///
/// Freed slots are reused; their generation is bumped on removal so stale
/// handles never alias the new occupant.
#[derive(Debug)]
pub struct ElementArena<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for ElementArena<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> ElementArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `value` into the arena.
    pub fn insert(&mut self, value: T) -> ElementHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.value = Some(value);
            return ElementHandle {
                index,
                generation: entry.generation,
            };
        }
        let index = self.entries.len() as u32;
        self.entries.push(Entry {
            generation: 0,
            value: Some(value),
        });
        ElementHandle {
            index,
            generation: 0,
        }
    }

    fn entry(&self, handle: ElementHandle) -> Option<&Entry<T>> {
        self.entries
            .get(handle.index as usize)
            .filter(|entry| entry.generation == handle.generation)
    }

    /// The value behind `handle`, if it is still live.
    pub fn get(&self, handle: ElementHandle) -> Option<&T> {
        self.entry(handle).and_then(|entry| entry.value.as_ref())
    }

    /// The value behind `handle`, if it is still live.
    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut T> {
        self.entries
            .get_mut(handle.index as usize)
            .filter(|entry| entry.generation == handle.generation)
            .and_then(|entry| entry.value.as_mut())
    }

    /// Whether `handle` still refers to a live value.
    pub fn contains(&self, handle: ElementHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Takes the value out and invalidates `handle`.
    pub fn remove(&mut self, handle: ElementHandle) -> Option<T> {
        let entry = self
            .entries
            .get_mut(handle.index as usize)
            .filter(|entry| entry.generation == handle.generation)?;
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementHandle, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry.value.as_ref().map(|value| {
                (
                    ElementHandle {
                        index: index as u32,
                        generation: entry.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Mutably iterates over live values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries
            .iter_mut()
            .filter_map(|entry| entry.value.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = ElementArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut arena = ElementArena::new();
        let old = arena.insert(1);
        assert_eq!(arena.remove(old), Some(1));

        let new = arena.insert(2);
        assert_ne!(old, new);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&2));
        assert_eq!(arena.remove(old), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn iter_skips_removed() {
        let mut arena = ElementArena::new();
        let a = arena.insert(1);
        arena.insert(2);
        arena.remove(a);
        let values: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![2]);
        for value in arena.iter_mut() {
            *value *= 10;
        }
        assert_eq!(arena.iter().next().map(|(_, v)| *v), Some(20));
    }
}
