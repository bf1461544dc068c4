//! Observable state for UI consumption
//!
//! Values change only through the crate; UI code reads them, polls the
//! revision counter, or subscribes to change notifications.

use std::fmt;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type ValueCallback<T> = Box<dyn Fn(&T)>;

/// Single observable value
pub struct Reactive<T> {
    value: T,
    revision: u64,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, ValueCallback<T>)>,
}

impl<T> Reactive<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            revision: 0,
            next_subscription: 0,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Bumped on every change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run after every change with the new value
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn set(&mut self, value: T) {
        self.value = value;
        self.revision += 1;
        for (_, callback) in &self.listeners {
            callback(&self.value);
        }
    }
}

impl<T: Default> Default for Reactive<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Reactive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("value", &self.value)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// What happened to a `ReactiveList`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Pushed { index: usize },
    Removed { index: usize },
    Cleared,
}

type ListCallback<T> = Box<dyn Fn(&[T], ListChange)>;

/// Observable ordered list
pub struct ReactiveList<T> {
    items: Vec<T>,
    revision: u64,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, ListCallback<T>)>,
}

impl<T> ReactiveList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            revision: 0,
            next_subscription: 0,
            listeners: Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run after every change with the whole list
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&[T], ListChange) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
        let index = self.items.len() - 1;
        self.notify(ListChange::Pushed { index });
    }

    /// Removes the first item matching `predicate`
    pub(crate) fn remove_first<F>(&mut self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let index = self.items.iter().position(predicate)?;
        let item = self.items.remove(index);
        self.notify(ListChange::Removed { index });
        Some(item)
    }

    /// Empties the list, returning the old items; no-op on an empty list
    pub(crate) fn take_all(&mut self) -> Vec<T> {
        if self.items.is_empty() {
            return Vec::new();
        }
        let items = std::mem::take(&mut self.items);
        self.notify(ListChange::Cleared);
        items
    }

    fn notify(&mut self, change: ListChange) {
        self.revision += 1;
        for (_, callback) in &self.listeners {
            callback(&self.items, change);
        }
    }
}

impl<T> Default for ReactiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a ReactiveList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveList")
            .field("items", &self.items)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_value_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut value = Reactive::new(1);

        let sink = Rc::clone(&seen);
        let id = value.subscribe(move |v| sink.borrow_mut().push(*v));

        value.set(2);
        value.set(3);
        assert_eq!(*value.get(), 3);
        assert_eq!(value.revision(), 2);
        assert_eq!(*seen.borrow(), vec![2, 3]);

        assert!(value.unsubscribe(id));
        value.set(4);
        assert_eq!(*seen.borrow(), vec![2, 3]);
        assert!(!value.unsubscribe(id));
    }

    #[test]
    fn test_list_changes() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let mut list = ReactiveList::new();

        let sink = Rc::clone(&changes);
        list.subscribe(move |items: &[&str], change| sink.borrow_mut().push((items.len(), change)));

        list.push("a");
        list.push("b");
        assert_eq!(list.remove_first(|item| *item == "a"), Some("a"));
        assert_eq!(list.remove_first(|item| *item == "zzz"), None);
        assert_eq!(list.take_all(), vec!["b"]);
        assert!(list.take_all().is_empty());

        assert_eq!(
            *changes.borrow(),
            vec![
                (1, ListChange::Pushed { index: 0 }),
                (2, ListChange::Pushed { index: 1 }),
                (1, ListChange::Removed { index: 0 }),
                (0, ListChange::Cleared),
            ]
        );
        assert_eq!(list.revision(), 4);
    }
}
