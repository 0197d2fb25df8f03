use super::value::Value;
use compact_str::CompactString;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared handle to one scope frame. Cloning the handle aliases the frame, so
/// a frame stays alive while any block, call, or closure still reaches it,
/// and assignments through one handle are visible through all of them.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Arc<Mutex<Frame>>,
}

#[derive(Debug, Default)]
struct Frame {
    values: HashMap<CompactString, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a root (global) frame.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Frame::default())),
        }
    }

    /// Creates a child frame enclosed by `self`.
    pub fn new_scope(&self) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Frame {
                values: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Binds in this frame, shadowing any enclosing binding of the name.
    pub fn define(&self, name: CompactString, value: Value) {
        self.inner.lock().unwrap().values.insert(name, value);
    }

    /// By-name walk up the chain. Only global references take this path.
    pub fn get(&self, name: &str) -> Option<Value> {
        let frame = self.inner.lock().unwrap();
        if let Some(value) = frame.values.get(name) {
            return Some(value.clone());
        }
        frame.parent.as_ref().and_then(|parent| parent.get(name))
    }

    /// By-name walk up the chain; fails if no frame binds the name.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), ()> {
        let mut frame = self.inner.lock().unwrap();
        if let Some(slot) = frame.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match frame.parent {
            Some(ref parent) => parent.assign(name, value),
            None => Err(()),
        }
    }

    /// Walks exactly `distance` parent links, then reads that frame directly.
    pub fn get_at(&self, name: &str, distance: usize) -> Option<Value> {
        let frame = self.ancestor(distance)?;
        let value = frame.inner.lock().unwrap().values.get(name).cloned();
        value
    }

    /// Walks exactly `distance` parent links, then writes that frame directly.
    pub fn assign_at(&self, name: CompactString, value: Value, distance: usize) -> Option<()> {
        let frame = self.ancestor(distance)?;
        frame.inner.lock().unwrap().values.insert(name, value);
        Some(())
    }

    fn ancestor(&self, distance: usize) -> Option<Environment> {
        let mut frame = self.clone();
        for _ in 0..distance {
            let parent = frame.inner.lock().unwrap().parent.clone();
            frame = parent?;
        }
        Some(frame)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
