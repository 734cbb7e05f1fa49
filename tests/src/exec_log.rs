use keel_core::driver::Operation;
use std::sync::{Arc, Mutex};

/// The operations a [`MemoryDriver`](crate::MemoryDriver) has executed, in
/// order.
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(op))
            .count()
    }

    pub fn count_get_by_key(&self) -> usize {
        self.count(Operation::is_get_by_key)
    }

    pub fn count_load_fields(&self) -> usize {
        self.count(Operation::is_load_fields)
    }

    pub fn has_insert(&self) -> bool {
        self.count(Operation::is_insert) > 0
    }

    pub fn has_update_by_key(&self) -> bool {
        self.count(Operation::is_update_by_key) > 0
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the oldest operation
    pub fn pop(&self) -> Option<Operation> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            Some(ops.remove(0))
        }
    }

    /// Tables touched, in order
    pub fn tables(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .map(|op| op.table().to_string())
            .collect()
    }
}
