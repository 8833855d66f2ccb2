//! Mutable state container with a publish-on-change contract. Every
//! mutation goes through [`Store::update`], which bumps a revision counter
//! and notifies subscribers; the render loop subscribes a redraw flag and
//! only draws when something actually changed.

type Subscriber = Box<dyn FnMut(u64)>;

pub(crate) struct Store<S> {
    state: S,
    revision: u64,
    subscribers: Vec<Subscriber>,
}

impl<S> Store<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    /// Read-only view of the current state.
    pub(crate) fn state(&self) -> &S {
        &self.state
    }

    /// Register a callback invoked with the new revision after every update.
    pub(crate) fn subscribe(&mut self, subscriber: impl FnMut(u64) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Mutate the state and publish the change. Returns whatever the
    /// mutation closure returns, so fallible handlers compose with `?` at
    /// the call site.
    pub(crate) fn update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.state);
        self.revision += 1;
        for subscriber in &mut self.subscribers {
            subscriber(self.revision);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_update_mutates_state() {
        let mut store = Store::new(0_i32);
        store.update(|n| *n += 5);
        assert_eq!(*store.state(), 5);
    }

    #[test]
    fn test_subscribers_notified_on_every_update() {
        let seen = Rc::new(Cell::new(0_u64));
        let seen_by_sub = Rc::clone(&seen);

        let mut store = Store::new(String::new());
        store.subscribe(move |rev| seen_by_sub.set(rev));

        store.update(|s| s.push('a'));
        assert_eq!(seen.get(), 1);
        store.update(|s| s.push('b'));
        assert_eq!(seen.get(), 2);
        assert_eq!(store.state(), "ab");
    }

    #[test]
    fn test_update_returns_closure_result() {
        let mut store = Store::new(vec![1, 2, 3]);
        let len = store.update(|v| {
            v.push(4);
            v.len()
        });
        assert_eq!(len, 4);
    }
}
