//! Persistent name environment.
//!
//! Binding a name returns a new environment that shares every older entry
//! with its parent. Nothing reachable from an existing `Env` is ever
//! mutated, so a child scope can never leak bindings into its parent.

use std::collections::HashSet;
use std::rc::Rc;

struct Binding<T> {
    name: String,
    value: T,
    next: Option<Rc<Binding<T>>>,
}

/// Immutable name -> `T` mapping (`T` is a `Ty` for checking, a `Value`
/// for evaluation). Cloning is O(1).
pub struct Env<T> {
    head: Option<Rc<Binding<T>>>,
    len: usize,
}

impl<T> Clone for Env<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

/// Unlinks the chain iteratively; the derived drop recurses once per
/// binding and overflows the stack on long programs.
impl<T> Drop for Env<T> {
    fn drop(&mut self) {
        let mut head = self.head.take();
        while let Some(rc) = head {
            match Rc::try_unwrap(rc) {
                Ok(mut binding) => head = binding.next.take(),
                // Still shared by another Env, which will unlink it.
                Err(_) => break,
            }
        }
    }
}

impl<T> Default for Env<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Env<T> {
    pub fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// A new environment with `name` bound to `value`. Shadows any older
    /// binding of the same name; `self` is left untouched.
    #[must_use]
    pub fn bind(&self, name: impl Into<String>, value: T) -> Self {
        Self {
            head: Some(Rc::new(Binding {
                name: name.into(),
                value,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Most recent binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        let mut cur = self.head.as_deref();
        while let Some(b) = cur {
            if b.name == name {
                return Some(&b.value);
            }
            cur = b.next.as_deref();
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether both handles point at the same binding chain.
    pub fn same_as(&self, other: &Env<T>) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Visible names, most recent first, shadowed entries skipped.
    pub fn names(&self) -> Vec<&str> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out: Vec<&str> = Vec::new();
        let mut cur = self.head.as_deref();
        while let Some(b) = cur {
            if seen.insert(&b.name) {
                out.push(&b.name);
            }
            cur = b.next.as_deref();
        }
        out
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Env<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            if let Some(v) = self.lookup(name) {
                map.entry(&name, v);
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_does_not_touch_parent() {
        let root: Env<i32> = Env::new();
        let a = root.bind("x", 1);
        let b = a.bind("y", 2);
        assert!(!root.contains("x"));
        assert!(!a.contains("y"));
        assert_eq!(b.lookup("x"), Some(&1));
        assert_eq!(b.lookup("y"), Some(&2));
    }

    #[test]
    fn test_shadowing_keeps_old_entry_for_ancestors() {
        let a = Env::new().bind("x", 1);
        let b = a.bind("x", 5);
        assert_eq!(a.lookup("x"), Some(&1));
        assert_eq!(b.lookup("x"), Some(&5));
        assert_eq!(b.len(), 2);
        assert_eq!(b.names(), vec!["x"]);
    }

    #[test]
    fn test_same_as() {
        let a: Env<i32> = Env::new().bind("x", 1);
        let c = a.clone();
        assert!(a.same_as(&c));
        assert!(!a.same_as(&a.bind("y", 2)));
        assert!(Env::<i32>::new().same_as(&Env::new()));
    }

    #[test]
    fn test_long_chain_drops_without_recursion() {
        let mut env: Env<u32> = Env::new();
        for k in 0..300_000u32 {
            env = env.bind(format!("a{k}"), k);
        }
        assert_eq!(env.len(), 300_000);
        let parent = env.clone();
        let child = env.bind("z", 0);
        drop(env);
        drop(child);
        assert_eq!(parent.lookup("a0"), Some(&0));
        drop(parent);
    }

    #[test]
    fn test_names_most_recent_first() {
        let e = Env::new().bind("a", 1).bind("b", 2).bind("a", 3);
        assert_eq!(e.names(), vec!["a", "b"]);
        assert_eq!(format!("{:?}", e), "{\"a\": 3, \"b\": 2}");
    }
}
