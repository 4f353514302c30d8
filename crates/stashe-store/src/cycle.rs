//! Back-reference detection for recursive walks over shared composites.
//!
//! Nodes and lists are stored by reference, so a tree can contain itself.
//! Walks that recurse (JSON rendering, `Debug`) keep the addresses of the
//! composites they are currently inside and stop at a repeat.

use std::cell::RefCell;

/// Addresses of the composites on the current walk, outermost first.
#[derive(Default)]
pub(crate) struct Ancestors(Vec<*const ()>);

impl Ancestors {
    /// Push `ptr` unless it is already on the walk. `false` means a cycle.
    pub(crate) fn enter(&mut self, ptr: *const ()) -> bool {
        if self.0.contains(&ptr) {
            return false;
        }
        self.0.push(ptr);
        true
    }

    pub(crate) fn leave(&mut self) {
        self.0.pop();
    }
}

thread_local! {
    static FORMATTING: RefCell<Ancestors> = RefCell::new(Ancestors::default());
}

/// Marks a composite as being `Debug`-formatted until dropped.
pub(crate) struct FormatGuard(());

impl FormatGuard {
    /// `None` if `ptr` is already being formatted further up the stack.
    pub(crate) fn enter(ptr: *const ()) -> Option<Self> {
        FORMATTING
            .with(|walk| walk.borrow_mut().enter(ptr))
            .then_some(Self(()))
    }
}

impl Drop for FormatGuard {
    fn drop(&mut self) {
        FORMATTING.with(|walk| walk.borrow_mut().leave());
    }
}
