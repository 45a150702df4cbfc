//! Synchronous observers: event emitters and observable properties.
//!
//! Listeners run in subscription order on the caller's thread. A listener cannot reach
//! back into the object that owns the emitter; owners that need to mutate themselves in
//! response queue the notification and flush it once their own handler is done.

use std::fmt;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

type Listener<T> = Box<dyn FnMut(&T)>;

pub struct Emitter<T> {
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u32,
}

impl<T> Emitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, value: &T) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(value);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A value that tells listeners `(old, new)` whenever it actually changes.
pub struct Property<T> {
    value: T,
    initial: T,
    changed: Emitter<(T, T)>,
}

impl<T: Clone + PartialEq> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            initial: value.clone(),
            value,
            changed: Emitter::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value`. Listeners only hear about it if it differs from the current one.
    pub fn set(&mut self, value: T) {
        if value == self.value {
            return;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.changed.emit(&(old, self.value.clone()));
    }

    /// Back to the value the property was created with.
    pub fn reset(&mut self) {
        let initial = self.initial.clone();
        self.set(initial);
    }

    pub fn on_change(&mut self, mut listener: impl FnMut(&T, &T) + 'static) -> ListenerId
    where
        T: 'static,
    {
        self.changed.subscribe(move |(old, new)| listener(old, new))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.changed.unsubscribe(id)
    }
}

impl<T: Clone + PartialEq + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy + PartialEq> Property<T> {
    /// Copy out the current value.
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.value)
            .field("listeners", &self.changed.listener_count())
            .finish()
    }
}
