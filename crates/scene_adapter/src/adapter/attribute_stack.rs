//! Scoped shading and attribute state

use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::NodeHandle;
use crate::scene::value::Value;

/// One scope's shading state
///
/// The attribute mapping has value semantics: child scopes never observe a
/// parent's later edits and vice versa. Values are immutable once stored,
/// so the mapping holds `Arc`s and a push clones the map at handle cost
/// instead of deep-copying every value.
#[derive(Debug, Clone)]
pub struct AttributeState {
    /// Current surface shader; a shared node reference, not geometry data
    surface_shader: NodeHandle,
    attributes: HashMap<String, Arc<Value>>,
}

impl AttributeState {
    /// Create a state with the given surface shader and no attributes
    pub fn new(surface_shader: NodeHandle) -> Self {
        Self {
            surface_shader,
            attributes: HashMap::new(),
        }
    }

    /// The state's surface shader
    pub fn shader(&self) -> NodeHandle {
        self.surface_shader
    }
}

/// Stack of attribute states
///
/// Mirrors the transform stack's guard behavior: never empty, unmatched
/// pops warn and do nothing.
#[derive(Debug, Clone)]
pub struct AttributeStack {
    states: Vec<AttributeState>,
}

impl AttributeStack {
    /// Create a stack whose guard state uses `default_shader`
    pub fn new(default_shader: NodeHandle) -> Self {
        Self {
            states: vec![AttributeState::new(default_shader)],
        }
    }

    /// Create a stack whose guard is a copy of an existing state
    ///
    /// Used when a child session snapshots its parent's current state.
    pub fn with_state(state: AttributeState) -> Self {
        Self { states: vec![state] }
    }

    /// Open a scope by copying the top state
    pub fn push(&mut self) {
        let top = self.top().clone();
        self.states.push(top);
    }

    /// Close a scope, discarding its shader and locally-set attributes
    pub fn pop(&mut self) {
        if self.states.len() <= 1 {
            log::warn!("attribute_end() without matching attribute_begin()");
            return;
        }
        self.states.pop();
    }

    /// Set a named attribute in the current scope, last write wins
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.top_mut().attributes.insert(name.into(), Arc::new(value));
    }

    /// The value visible at the top of the stack, inherited or local
    pub fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.top().attributes.get(name).map(Arc::as_ref)
    }

    /// Replace only the current scope's surface shader
    pub fn set_shader(&mut self, shader: NodeHandle) {
        self.top_mut().surface_shader = shader;
    }

    /// The current scope's surface shader
    pub fn shader(&self) -> NodeHandle {
        self.top().surface_shader
    }

    /// The current (top) state
    pub fn current(&self) -> &AttributeState {
        self.top()
    }

    /// Number of states on the stack, guard included
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    fn top(&self) -> &AttributeState {
        self.states.last().expect("stack is never empty")
    }

    fn top_mut(&mut self) -> &mut AttributeState {
        self.states.last_mut().expect("stack is never empty")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader(id: u64) -> NodeHandle {
        NodeHandle(id)
    }

    #[test]
    fn test_stack_never_empties() {
        let mut stack = AttributeStack::new(shader(1));
        stack.pop();
        stack.pop();

        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.shader(), shader(1));
    }

    #[test]
    fn test_parent_values_visible_in_child() {
        let mut stack = AttributeStack::new(shader(1));
        stack.set_attribute("visibility", Value::Int(255));

        stack.push();
        assert_eq!(stack.get_attribute("visibility"), Some(&Value::Int(255)));
    }

    #[test]
    fn test_child_values_dropped_on_pop() {
        let mut stack = AttributeStack::new(shader(1));
        stack.set_attribute("sides", Value::Int(2));

        stack.push();
        stack.set_attribute("sides", Value::Int(1));
        stack.set_attribute("local_only", Value::Bool(true));
        assert_eq!(stack.get_attribute("sides"), Some(&Value::Int(1)));

        stack.pop();
        assert_eq!(stack.get_attribute("sides"), Some(&Value::Int(2)));
        assert_eq!(stack.get_attribute("local_only"), None);
    }

    #[test]
    fn test_last_write_wins_within_scope() {
        let mut stack = AttributeStack::new(shader(1));
        stack.set_attribute("samples", Value::Int(2));
        stack.set_attribute("samples", Value::Int(8));

        assert_eq!(stack.get_attribute("samples"), Some(&Value::Int(8)));
    }

    #[test]
    fn test_shader_reverts_with_scope() {
        let mut stack = AttributeStack::new(shader(1));

        stack.push();
        stack.set_shader(shader(7));
        assert_eq!(stack.shader(), shader(7));

        stack.pop();
        assert_eq!(stack.shader(), shader(1));
    }

    #[test]
    fn test_never_set_attribute_is_absent() {
        let stack = AttributeStack::new(shader(1));
        assert_eq!(stack.get_attribute("anything"), None);
    }
}
