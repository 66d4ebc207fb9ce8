//! Effect registry.
//!
//! Effects are the concrete visual mutations (fades, slides, color changes).
//! Their implementations live with the host; the engine only looks them up by
//! name and calls them with `(target, argument)`. The registry is filled at
//! setup time and only read afterwards.

use std::collections::HashMap;
use std::fmt;

/// An effect invocation: `(target, argument text)`.
///
/// Runs synchronously from the engine's point of view; an effect may schedule
/// its own asynchronous visual work.
pub type Effect<T> = Box<dyn Fn(&T, Option<&str>)>;

pub struct EffectRegistry<T> {
    effects: HashMap<String, Effect<T>>,
}

impl<T> EffectRegistry<T> {
    pub fn new() -> Self {
        EffectRegistry { effects: HashMap::new() }
    }

    /// Register `effect` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, effect: impl Fn(&T, Option<&str>) + 'static) -> &mut Self {
        self.effects.insert(name.into(), Box::new(effect));
        self
    }

    pub fn lookup(&self, name: &str) -> Option<&Effect<T>> {
        self.effects.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.effects.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl<T> Default for EffectRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EffectRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry").field("effects", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn register_and_lookup() {
        let seen: Rc<RefCell<Vec<(u32, Option<String>)>>> = Rc::default();
        let log = Rc::clone(&seen);

        let mut registry: EffectRegistry<u32> = EffectRegistry::new();
        registry.register("fall", move |t, arg| log.borrow_mut().push((*t, arg.map(str::to_string))));
        registry.register("rise", |_, _| {});

        assert_eq!(registry.names(), vec!["fall", "rise"]);
        assert!(registry.contains("fall"));
        assert!(registry.lookup("Fall").is_none());

        let fall = registry.lookup("fall").unwrap();
        fall(&7, Some("600ms"));
        assert_eq!(*seen.borrow(), vec![(7, Some("600ms".to_string()))]);
    }
}
