use crate::collection::kit_collection::KitCollection;
use crate::kit::layout::LayoutBounds;
use crate::observe::{Emitter, Property};

/// The kit collections the user scrolls through. There is always at least one.
#[derive(Debug)]
pub struct CollectionList {
    layout: LayoutBounds,
    collections: Vec<KitCollection>,
    /// Index of the collection on screen.
    pub current_collection: Property<usize>,
    /// Index of a collection just appended.
    pub collection_added: Emitter<usize>,
    /// Index a collection had before it was removed.
    pub collection_removed: Emitter<usize>,
}

impl CollectionList {
    pub fn new(first: KitCollection, layout: LayoutBounds) -> Self {
        let mut list = Self {
            layout,
            collections: Vec::new(),
            current_collection: Property::new(0),
            collection_added: Emitter::new(),
            collection_removed: Emitter::new(),
        };
        list.add_collection(first);
        list
    }

    pub fn layout(&self) -> &LayoutBounds {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn collections(&self) -> &[KitCollection] {
        &self.collections
    }

    pub fn current(&self) -> &KitCollection {
        &self.collections[self.current_collection.value()]
    }

    pub fn current_mut(&mut self) -> &mut KitCollection {
        let index = self.current_collection.value();
        &mut self.collections[index]
    }

    /// Append a collection and switch to it.
    pub fn add_collection(&mut self, collection: KitCollection) -> usize {
        self.collections.push(collection);
        let index = self.collections.len() - 1;
        self.collection_added.emit(&index);
        self.current_collection.set(index);
        index
    }

    /// Remove a collection other than the current one.
    pub fn remove_collection(&mut self, index: usize) -> Option<KitCollection> {
        let current = self.current_collection.value();
        if index == current || index >= self.collections.len() {
            return None;
        }
        let removed = self.collections.remove(index);
        if index < current {
            self.current_collection.set(current - 1);
        }
        self.collection_removed.emit(&index);
        Some(removed)
    }

    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.collections.len() {
            return false;
        }
        self.current_collection.set(index);
        true
    }

    pub fn has_previous_collection(&self) -> bool {
        self.current_collection.value() > 0
    }

    pub fn has_next_collection(&self) -> bool {
        self.current_collection.value() + 1 < self.collections.len()
    }

    pub fn switch_to_previous_collection(&mut self) -> bool {
        self.has_previous_collection() && self.switch_to(self.current_collection.value() - 1)
    }

    pub fn switch_to_next_collection(&mut self) -> bool {
        self.has_next_collection() && self.switch_to(self.current_collection.value() + 1)
    }

    /// Back to the first collection, reset, with every other collection dropped.
    pub fn reset(&mut self) {
        self.switch_to(0);
        while self.collections.len() > 1 {
            let last = self.collections.len() - 1;
            self.remove_collection(last);
        }
        if let Some(first) = self.collections.first_mut() {
            first.reset_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bounds::Bounds;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn layout() -> LayoutBounds {
        LayoutBounds::new(
            Bounds::from_rect(0.0, 0.0, 1000.0, 200.0),
            Bounds::from_rect(0.0, 200.0, 1000.0, 800.0),
        )
    }

    #[test]
    fn adding_switches_to_new_collection() {
        let mut list = CollectionList::new(KitCollection::new(), layout());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        list.current_collection.on_change(move |_, new| sink.borrow_mut().push(*new));

        assert_eq!(list.add_collection(KitCollection::new()), 1);
        assert!(list.has_previous_collection());
        assert!(!list.has_next_collection());
        assert!(list.switch_to_previous_collection());
        assert!(!list.switch_to_previous_collection());
        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn current_collection_cannot_be_removed() {
        let mut list = CollectionList::new(KitCollection::new(), layout());
        list.add_collection(KitCollection::new());
        list.add_collection(KitCollection::new());
        assert!(list.remove_collection(2).is_none());
        assert!(list.remove_collection(0).is_some());
        assert_eq!(list.current_collection.value(), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn reset_keeps_only_first() {
        let mut list = CollectionList::new(KitCollection::new(), layout());
        list.add_collection(KitCollection::new());
        list.add_collection(KitCollection::new());
        let removed = Rc::new(RefCell::new(Vec::new()));
        let sink = removed.clone();
        list.collection_removed.subscribe(move |i: &usize| sink.borrow_mut().push(*i));

        list.reset();
        assert_eq!(list.len(), 1);
        assert_eq!(list.current_collection.value(), 0);
        assert_eq!(*removed.borrow(), vec![2, 1]);
    }
}
