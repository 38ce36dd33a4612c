//! World-space content compositor.
//!
//! Content that is positioned in world coordinates but drawn as ordinary
//! overlay elements (edge labels, badges) is registered here and exposed to
//! the UI as one model. Content stays until it is explicitly removed.

use slint::{Model, ModelRc, VecModel};
use std::rc::Rc;

/// Key returned by [`Compositor::add`], used to remove the content again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey(u64);

/// Ordered collection of overlay content backed by a Slint model.
pub struct Compositor<T> {
    model: Rc<VecModel<T>>,
    keys: Vec<ContentKey>,
    next_key: u64,
}

impl<T: Clone + 'static> Default for Compositor<T> {
    fn default() -> Self {
        Self {
            model: Rc::new(VecModel::default()),
            keys: Vec::new(),
            next_key: 0,
        }
    }
}

impl<T: Clone + 'static> Compositor<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content on top of everything added before.
    pub fn add(&mut self, content: T) -> ContentKey {
        let key = ContentKey(self.next_key);
        self.next_key += 1;
        self.keys.push(key);
        self.model.push(content);
        key
    }

    /// Replace content in place. Returns `false` for an unknown key.
    pub fn update(&mut self, key: ContentKey, content: T) -> bool {
        match self.row_of(key) {
            Some(row) => {
                self.model.set_row_data(row, content);
                true
            }
            None => false,
        }
    }

    /// Remove content. Removing an unknown or already removed key is a no-op.
    pub fn remove(&mut self, key: ContentKey) -> bool {
        match self.row_of(key) {
            Some(row) => {
                self.keys.remove(row);
                self.model.remove(row);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: ContentKey) -> Option<T> {
        self.row_of(key).and_then(|row| self.model.row_data(row))
    }

    pub fn contains(&self, key: ContentKey) -> bool {
        self.row_of(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Model for binding to the overlay layer of the UI.
    pub fn model(&self) -> ModelRc<T> {
        ModelRc::from(self.model.clone())
    }

    fn row_of(&self, key: ContentKey) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }
}
