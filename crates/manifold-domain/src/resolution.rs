//! Cycle-detection stack
//!
//! Both container flavors guard `get` with a [`ResolutionStack`]: the id is
//! pushed before its definition resolves and popped when resolution
//! finishes, success or failure. Re-entering an id already on the stack is
//! a circular dependency, reported with the full ordered chain from the
//! initially requested id through the repeated one.
//!
//! Stacks are kept per thread. Concurrent resolutions on different threads
//! never see each other's in-flight ids, so parallel work on distinct ids
//! cannot produce spurious cycle reports.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::{Error, Result};

/// Per-thread ordered stacks of in-flight resolution ids
#[derive(Default)]
pub struct ResolutionStack {
    stacks: Mutex<HashMap<ThreadId, Vec<String>>>,
}

impl ResolutionStack {
    /// Create an empty stack set
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an id onto the current thread's stack
    ///
    /// Fails with [`Error::CircularDependency`] when the id is already in
    /// flight on this thread; the error chain contains every id from the
    /// start of resolution through the repeated one, in traversal order.
    /// On success the returned guard pops the id when dropped.
    pub fn enter(&self, id: &str) -> Result<ResolutionGuard<'_>> {
        let thread = thread::current().id();
        let mut stacks = self
            .stacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let stack = stacks.entry(thread).or_default();

        if stack.iter().any(|entry| entry == id) {
            let mut chain = stack.clone();
            chain.push(id.to_string());
            return Err(Error::circular_dependency(chain));
        }

        stack.push(id.to_string());
        Ok(ResolutionGuard {
            stack: self,
            thread,
        })
    }

    /// Whether the id is in flight on the current thread
    pub fn contains(&self, id: &str) -> bool {
        let thread = thread::current().id();
        let stacks = self
            .stacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stacks
            .get(&thread)
            .is_some_and(|stack| stack.iter().any(|entry| entry == id))
    }

    fn pop(&self, thread: ThreadId) {
        let mut stacks = self
            .stacks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(stack) = stacks.get_mut(&thread) {
            stack.pop();
            if stack.is_empty() {
                stacks.remove(&thread);
            }
        }
    }
}

/// RAII guard that pops the entered id, on success and on failure alike
pub struct ResolutionGuard<'a> {
    stack: &'a ResolutionStack,
    thread: ThreadId,
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        self.stack.pop(self.thread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_pops_on_drop() {
        let stack = ResolutionStack::new();
        {
            let _guard = stack.enter("a").expect("first entry");
            assert!(stack.contains("a"));
        }
        assert!(!stack.contains("a"));
    }

    #[test]
    fn test_reentry_reports_full_chain() {
        let stack = ResolutionStack::new();
        let _a = stack.enter("a").expect("a");
        let _b = stack.enter("b").expect("b");
        match stack.enter("a") {
            Err(Error::CircularDependency { chain }) => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("re-entry must fail"),
        }
    }

    #[test]
    fn test_threads_do_not_share_stacks() {
        let stack = std::sync::Arc::new(ResolutionStack::new());
        let _guard = stack.enter("shared").expect("main thread entry");

        let stack2 = std::sync::Arc::clone(&stack);
        let handle = std::thread::spawn(move || stack2.enter("shared").is_ok());
        assert!(handle.join().expect("worker thread"));
    }
}
