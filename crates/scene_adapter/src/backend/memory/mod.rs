//! Reference in-memory backend
//!
//! Records the node graph the adapter builds and implements the two
//! finalization paths: a validation-walk "render" and RON scene
//! serialization. Deferred procedurals are expanded on demand by the
//! expansion driver, exactly the way a production backend would call the
//! adapter's procedural hooks at render time.

pub mod registry;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::backend::{
    BackendError, BackendResult, NodeHandle, NodeMask, ProceduralNode, RenderBackend, RenderMode,
};
use crate::scene::value::Value;

/// One node in the recorded graph
struct NodeRecord {
    type_name: &'static str,
    name: String,
    params: BTreeMap<String, Value>,
    procedural: Option<Arc<dyn ProceduralNode>>,
}

struct Inner {
    begun: bool,
    next_id: u64,
    order: Vec<NodeHandle>,
    nodes: HashMap<NodeHandle, NodeRecord>,
    options: NodeHandle,
}

impl Inner {
    fn allocate(&mut self, entry: &'static registry::NodeTypeEntry) -> NodeHandle {
        let handle = NodeHandle(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            handle,
            NodeRecord {
                type_name: entry.name,
                name: format!("{}#{}", entry.name, handle.0),
                params: BTreeMap::new(),
                procedural: None,
            },
        );
        self.order.push(handle);
        handle
    }
}

/// In-memory node-graph backend
///
/// The node store sits behind a mutex because procedural expansion may
/// create nodes from whichever thread drives the expansion; the lock is
/// never held across a generator invocation.
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    /// Create a backend with an empty graph and its options singleton
    pub fn new() -> Self {
        let mut inner = Inner {
            begun: false,
            next_id: 0,
            order: Vec::new(),
            nodes: HashMap::new(),
            options: NodeHandle(0),
        };
        let entry = registry::lookup("options").expect("options type is always registered");
        let options = inner.allocate(entry);
        inner.nodes.get_mut(&options).expect("just allocated").name = "options".to_string();
        inner.options = options;
        Self {
            inner: Mutex::new(inner),
        }
    }

    // A panicking generator must not wedge the rest of the graph.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All nodes of a given type, in creation order
    ///
    /// Inspection helper for tests, tools and external expansion drivers.
    pub fn nodes_of_type(&self, type_name: &str) -> Vec<NodeHandle> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .copied()
            .filter(|handle| {
                inner
                    .nodes
                    .get(handle)
                    .is_some_and(|record| record.type_name == type_name)
            })
            .collect()
    }

    /// The procedural descriptor attached to a node, if still pending
    ///
    /// Returns a second reference without consuming the backend's own; an
    /// external driver expanding through this reference is guarded by the
    /// descriptor's at-most-once contract.
    pub fn procedural(&self, node: NodeHandle) -> Option<Arc<dyn ProceduralNode>> {
        self.lock()
            .nodes
            .get(&node)
            .and_then(|record| record.procedural.clone())
    }

    /// Expand every pending procedural until none remain
    ///
    /// Procedurals may declare further procedurals, so the driver loops to
    /// a fixpoint. The store lock is released while a generator runs: the
    /// child session creates its nodes through this same backend.
    fn expand_procedurals(&self) {
        loop {
            let pending: Vec<(NodeHandle, Arc<dyn ProceduralNode>)> = {
                let mut inner = self.lock();
                let handles: Vec<NodeHandle> = inner.order.clone();
                handles
                    .into_iter()
                    .filter_map(|handle| {
                        inner
                            .nodes
                            .get_mut(&handle)
                            .and_then(|record| record.procedural.take())
                            .map(|descriptor| (handle, descriptor))
                    })
                    .collect()
            };
            if pending.is_empty() {
                return;
            }

            for (placeholder, descriptor) in pending {
                descriptor.expand();
                let count = descriptor.node_count();
                let harvested: Vec<NodeHandle> =
                    (0..count).filter_map(|i| descriptor.node_at(i)).collect();
                log::debug!(
                    "expanded procedural {:?} into {} node(s)",
                    placeholder,
                    harvested.len()
                );
                descriptor.cleanup();
                self.set_param(placeholder, "nodes", Value::NodeArray(harvested));
            }
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for MemoryBackend {
    fn begin(&self, plugin_paths: Option<&str>) -> BackendResult<()> {
        let mut inner = self.lock();
        if inner.begun {
            log::warn!("begin() called on an already-initialized backend");
            return Ok(());
        }
        if let Some(paths) = plugin_paths {
            // The memory backend has no plugins to load; a production
            // backend would scan these paths here.
            log::debug!("plugin search paths: {paths}");
        }
        inner.begun = true;
        Ok(())
    }

    fn end(&self) {
        let mut inner = self.lock();
        if !inner.begun {
            log::warn!("end() called on a backend that was never begun");
        }
        inner.begun = false;
    }

    fn create_node(&self, type_name: &str) -> Option<NodeHandle> {
        let entry = registry::lookup(type_name)?;
        Some(self.lock().allocate(entry))
    }

    fn options(&self) -> NodeHandle {
        self.lock().options
    }

    fn set_param(&self, node: NodeHandle, name: &str, value: Value) {
        let mut inner = self.lock();
        let Some(record) = inner.nodes.get_mut(&node) else {
            log::warn!("set_param on unknown node {node:?}; ignoring");
            return;
        };
        if name == "name" {
            if let Value::String(new_name) = value {
                record.name = new_name;
            } else {
                log::warn!("node name must be a string value; ignoring");
            }
            return;
        }
        record.params.insert(name.to_string(), value);
    }

    fn get_param(&self, node: NodeHandle, name: &str) -> Option<Value> {
        let inner = self.lock();
        let record = inner.nodes.get(&node)?;
        if name == "name" {
            return Some(Value::String(record.name.clone()));
        }
        record.params.get(name).cloned()
    }

    fn declares_parameter(&self, node: NodeHandle, name: &str) -> bool {
        let inner = self.lock();
        inner
            .nodes
            .get(&node)
            .and_then(|record| registry::lookup(record.type_name))
            .is_some_and(|entry| entry.params.contains(&name))
    }

    fn node_name(&self, node: NodeHandle) -> Option<String> {
        self.lock().nodes.get(&node).map(|record| record.name.clone())
    }

    fn set_procedural(&self, node: NodeHandle, descriptor: Arc<dyn ProceduralNode>) {
        let mut inner = self.lock();
        match inner.nodes.get_mut(&node) {
            Some(record) => record.procedural = Some(descriptor),
            None => log::warn!("set_procedural on unknown node {node:?}; ignoring"),
        }
    }

    fn render(&self, mode: RenderMode) -> BackendResult<()> {
        self.expand_procedurals();

        let inner = self.lock();
        let camera = inner
            .nodes
            .get(&inner.options)
            .and_then(|options| options.params.get("camera"))
            .and_then(Value::as_node);
        let Some(camera) = camera else {
            return Err(BackendError::RenderFailed("no active camera set".to_string()));
        };
        if !inner.nodes.contains_key(&camera) {
            return Err(BackendError::RenderFailed(format!(
                "active camera {camera:?} does not exist"
            )));
        }

        let shapes = inner
            .order
            .iter()
            .filter(|&handle| {
                inner.nodes.get(handle).is_some_and(|record| {
                    registry::lookup(record.type_name)
                        .is_some_and(|entry| entry.mask.contains(NodeMask::SHAPE))
                })
            })
            .count();
        match mode {
            RenderMode::Camera => {
                log::info!("camera render: {} node(s), {} shape(s)", inner.order.len(), shapes);
            }
        }
        Ok(())
    }

    fn write_scene(&self, path: &Path, mask: NodeMask) -> BackendResult<()> {
        self.expand_procedurals();

        let document = {
            let inner = self.lock();
            let nodes: Vec<SceneNode> = inner
                .order
                .iter()
                .filter_map(|handle| {
                    let record = inner.nodes.get(handle)?;
                    let entry = registry::lookup(record.type_name)?;
                    if !mask.intersects(entry.mask) {
                        return None;
                    }
                    Some(SceneNode {
                        id: handle.0,
                        node_type: record.type_name.to_string(),
                        name: record.name.clone(),
                        params: record.params.clone(),
                    })
                })
                .collect();
            SceneDocument { nodes }
        };

        let text = ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())
            .map_err(|e| BackendError::SerializationFailed(e.to_string()))?;
        std::fs::write(path, text)?;
        log::info!("wrote {} node(s) to {}", document.nodes.len(), path.display());
        Ok(())
    }
}

/// Serialized form of the recorded graph
#[derive(Serialize)]
struct SceneDocument {
    nodes: Vec<SceneNode>,
}

#[derive(Serialize)]
struct SceneNode {
    id: u64,
    node_type: String,
    name: String,
    params: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let backend = MemoryBackend::new();
        assert!(backend.create_node("metaball").is_none());
        assert!(backend.create_node("sphere").is_some());
    }

    #[test]
    fn test_params_round_trip() {
        let backend = MemoryBackend::new();
        let node = backend.create_node("sphere").unwrap();

        backend.set_param(node, "radius", Value::Float(2.5));
        assert_eq!(backend.get_param(node, "radius"), Some(Value::Float(2.5)));
        assert_eq!(backend.get_param(node, "missing"), None);
    }

    #[test]
    fn test_node_naming() {
        let backend = MemoryBackend::new();
        let node = backend.create_node("gaussian_filter").unwrap();

        // Auto-generated name first, explicit name after
        assert!(backend.node_name(node).unwrap().starts_with("gaussian_filter#"));
        backend.set_param(node, "name", Value::from("defaultFilter"));
        assert_eq!(backend.node_name(node).as_deref(), Some("defaultFilter"));
    }

    #[test]
    fn test_declares_parameter_consults_type() {
        let backend = MemoryBackend::new();
        let options = backend.options();

        assert!(backend.declares_parameter(options, "AA_samples"));
        assert!(!backend.declares_parameter(options, "bogus_knob"));
    }

    #[test]
    fn test_render_requires_camera() {
        let backend = MemoryBackend::new();
        backend.begin(None).unwrap();

        assert!(backend.render(RenderMode::Camera).is_err());

        let camera = backend.create_node("persp_camera").unwrap();
        backend.set_param(backend.options(), "camera", Value::Node(camera));
        assert!(backend.render(RenderMode::Camera).is_ok());
    }

    #[test]
    fn test_write_scene_filters_by_mask() {
        let backend = MemoryBackend::new();
        backend.create_node("sphere").unwrap();
        backend.create_node("persp_camera").unwrap();

        let path = std::env::temp_dir().join("scene_adapter_mask_test.ron");
        backend.write_scene(&path, NodeMask::SHAPE).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("sphere"));
        assert!(!text.contains("persp_camera"));
        std::fs::remove_file(&path).ok();
    }
}
