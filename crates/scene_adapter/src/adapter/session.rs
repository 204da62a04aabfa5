//! Scene session controller
//!
//! One `Session` is one scene-construction context. It accepts the
//! imperative begin/end protocol, maintains the scoped transform and
//! attribute state, realizes primitives through the converter registry and
//! finalizes the scene at world-end according to the session mode.
//!
//! The controller never aborts on a degraded protocol call: unsupported
//! features, scope mismatches and abandoned node creations are warned and
//! skipped so that a partially supported scene description still produces
//! a best-effort result. Only backend-fatal conditions (global
//! initialization, rendering, serialization) surface as errors.

use std::path::PathBuf;
use std::sync::Arc;

use crate::adapter::attribute_stack::AttributeStack;
use crate::adapter::convert::{ConverterRegistry, Primitive};
use crate::adapter::procedural::{Procedural, ProceduralDescriptor};
use crate::adapter::transform_stack::TransformStack;
use crate::backend::{
    BackendError, BackendResult, NodeHandle, NodeMask, RenderBackend, RenderMode,
};
use crate::foundation::math::{mat4_to_rows, Mat4, Vec2};
use crate::scene::value::{ParamMap, Value};
use crate::scene::{CameraDescription, CurvesPrimitive, MeshPrimitive};

/// Environment variable naming the backend plugin search paths
pub const PLUGIN_PATH_ENV: &str = "SCENE_ADAPTER_PLUGIN_PATH";

/// Options with this prefix are routed to the backend's options node
const VENDOR_OPTION_PREFIX: &str = "rb:";
/// Options with this prefix are stored verbatim as user data
const USER_OPTION_PREFIX: &str = "user:";

const DEFAULT_FILTER_NAME: &str = "sceneAdapter:defaultFilter";
const DEFAULT_CAMERA_NAME: &str = "sceneAdapter:defaultCamera";
const DEFAULT_RESOLUTION: (i32, i32) = (640, 480);

/// How a session finalizes at world-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    /// Trigger an interactive camera render
    Interactive,
    /// Serialize the accumulated scene to a file
    SceneExport(PathBuf),
    /// Child context of a procedural; harvested by the parent, never
    /// finalized on its own
    Procedural,
}

/// One scene-construction context
///
/// Top-level sessions perform backend global setup on construction and
/// teardown on drop; procedural children share the already-initialized
/// backend and do neither. Destroying a session with scopes still open is
/// not defined by the protocol beyond the world-begin recovery path: open
/// scopes and undeclared output descriptions are simply discarded.
pub struct Session {
    mode: SessionMode,
    backend: Arc<dyn RenderBackend>,
    converters: Arc<ConverterRegistry>,
    transforms: TransformStack,
    attributes: AttributeStack,
    shapes: Vec<NodeHandle>,
    output_descriptions: Vec<String>,
    default_filter: NodeHandle,
}

impl Session {
    /// Create a session that renders interactively at world-end
    pub fn interactive(backend: Arc<dyn RenderBackend>) -> BackendResult<Self> {
        Self::construct(backend, SessionMode::Interactive)
    }

    /// Create a session that serializes the scene to `path` at world-end
    pub fn scene_export(
        backend: Arc<dyn RenderBackend>,
        path: impl Into<PathBuf>,
    ) -> BackendResult<Self> {
        Self::construct(backend, SessionMode::SceneExport(path.into()))
    }

    fn construct(backend: Arc<dyn RenderBackend>, mode: SessionMode) -> BackendResult<Self> {
        let plugin_paths = std::env::var(PLUGIN_PATH_ENV).ok();
        backend.begin(plugin_paths.as_deref())?;

        // One generic filter shared by all later display declarations.
        let default_filter = backend.create_node("gaussian_filter").ok_or_else(|| {
            BackendError::InitializationFailed(
                "backend lacks the gaussian_filter node type".to_string(),
            )
        })?;
        backend.set_param(default_filter, "name", Value::from(DEFAULT_FILTER_NAME));

        // Neutral shader carried by the guard attribute state until a
        // client sets its own.
        let default_shader = backend.create_node("utility").ok_or_else(|| {
            BackendError::InitializationFailed(
                "backend lacks the utility shader node type".to_string(),
            )
        })?;

        Ok(Self {
            mode,
            converters: Arc::new(ConverterRegistry::with_defaults()),
            transforms: TransformStack::new(),
            attributes: AttributeStack::new(default_shader),
            shapes: Vec::new(),
            output_descriptions: Vec::new(),
            default_filter,
            backend,
        })
    }

    /// Snapshot a child context for a procedural declaration
    fn procedural_child(&self) -> Self {
        Self {
            mode: SessionMode::Procedural,
            backend: Arc::clone(&self.backend),
            converters: Arc::clone(&self.converters),
            transforms: TransformStack::with_frame(self.transforms.current()),
            attributes: AttributeStack::with_state(self.attributes.current().clone()),
            shapes: Vec::new(),
            output_descriptions: Vec::new(),
            default_filter: self.default_filter,
        }
    }

    /// The mode this session was constructed in
    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    /// Replace the converter registry
    ///
    /// Lets embedders extend (or restrict) the set of supported primitive
    /// kinds; a kind without a converter degrades to warn-and-skip.
    pub fn set_converters(&mut self, converters: Arc<ConverterRegistry>) {
        self.converters = converters;
    }

    // ------------------------------------------------------------------
    // options
    // ------------------------------------------------------------------

    /// Set a global option
    ///
    /// `rb:`-prefixed names are forwarded (stripped) to the options node if
    /// the backend declares the parameter; `user:`-prefixed names are
    /// stored verbatim; names namespaced for another renderer are silently
    /// ignored; anything else is warned about.
    pub fn set_option(&mut self, name: &str, value: Value) {
        if let Some(stripped) = name.strip_prefix(VENDOR_OPTION_PREFIX) {
            let options = self.backend.options();
            if self.backend.declares_parameter(options, stripped) {
                self.backend.set_param(options, stripped, value);
                return;
            }
        } else if name.starts_with(USER_OPTION_PREFIX) {
            let options = self.backend.options();
            self.backend.set_param(options, name, value);
            return;
        } else if name.contains(':') {
            // prefixed for some other renderer
            return;
        }

        log::warn!("unknown option \"{name}\"");
    }

    /// Read a global option back
    ///
    /// Follows the same routing as [`set_option`](Self::set_option), plus
    /// a synthetic `"shutter"` option assembled from the active camera.
    pub fn get_option(&self, name: &str) -> Option<Value> {
        let options = self.backend.options();
        if let Some(stripped) = name.strip_prefix(VENDOR_OPTION_PREFIX) {
            return self.backend.get_param(options, stripped);
        }
        if name.starts_with(USER_OPTION_PREFIX) {
            return self.backend.get_param(options, name);
        }
        if name == "shutter" {
            let camera = self
                .backend
                .get_param(options, "camera")
                .and_then(|v| v.as_node())?;
            let start = self
                .backend
                .get_param(camera, "shutter_start")
                .and_then(|v| v.as_float())
                .unwrap_or(0.0);
            let end = self
                .backend
                .get_param(camera, "shutter_end")
                .and_then(|v| v.as_float())
                .unwrap_or(0.0);
            return Some(Value::Vec2(Vec2::new(start, end)));
        }
        None
    }

    // ------------------------------------------------------------------
    // camera and displays
    // ------------------------------------------------------------------

    /// Declare a camera and install it as the backend's active camera
    ///
    /// The backend's output resolution follows the camera's `resolution`
    /// parameter, defaulting to 640x480.
    pub fn camera(&mut self, name: &str, params: ParamMap) {
        let description = CameraDescription::new(name, params);
        let resolution = description.resolution();
        let node = match self
            .converters
            .convert(&Primitive::Camera(description), self.backend.as_ref())
        {
            Ok(node) => node,
            Err(err) => {
                log::error!("unable to create camera \"{name}\": {err}");
                return;
            }
        };

        let options = self.backend.options();
        self.backend.set_param(options, "camera", Value::Node(node));
        self.apply_transform(node);

        let (xres, yres) = resolution.map_or(DEFAULT_RESOLUTION, |r| (r.x, r.y));
        self.backend.set_param(options, "xres", Value::Int(xres));
        self.backend.set_param(options, "yres", Value::Int(yres));
    }

    /// Declare an output destination
    ///
    /// Realizes a driver node named after its ordinal position, forwards
    /// the declared parameters, normalizes the `"rgb"`/`"rgba"` channel
    /// short-hands, and queues a textual output description. Descriptions
    /// accumulate until world-begin installs them all at once.
    pub fn display(&mut self, name: &str, driver_type: &str, data: &str, params: ParamMap) {
        let Some(driver) = self.backend.create_node(driver_type) else {
            log::error!("unable to create display of type \"{driver_type}\"");
            return;
        };

        let node_name = format!("sceneAdapter:display{}", self.output_descriptions.len());
        self.backend.set_param(driver, "name", Value::from(node_name.clone()));

        if self.backend.declares_parameter(driver, "filename") {
            self.backend.set_param(driver, "filename", Value::from(name));
        }
        for (key, value) in params {
            self.backend.set_param(driver, &key, value);
        }

        let data = match data {
            "rgb" => "RGB RGB",
            "rgba" => "RGBA RGBA",
            other => other,
        };
        let filter_name = self
            .backend
            .node_name(self.default_filter)
            .unwrap_or_default();
        self.output_descriptions
            .push(format!("{data} {filter_name} {node_name}"));
    }

    // ------------------------------------------------------------------
    // world
    // ------------------------------------------------------------------

    /// Close scene declaration and finalize global state
    ///
    /// Recovers from scopes left open (warn, unwind to the guard frame),
    /// synthesizes a default camera if none was declared, and installs the
    /// accumulated output descriptions in declaration order.
    pub fn world_begin(&mut self) {
        if self.transforms.depth() > 1 {
            log::warn!("missing transform_end() call detected");
            self.transforms.unwind();
        }

        let options = self.backend.options();
        if self.backend.get_param(options, "camera").is_none() {
            self.camera(DEFAULT_CAMERA_NAME, ParamMap::new());
        }

        self.backend.set_param(
            options,
            "outputs",
            Value::StringArray(self.output_descriptions.clone()),
        );
    }

    /// Finalize the session according to its mode
    ///
    /// Interactive sessions render; export sessions serialize; procedural
    /// children do nothing (their geometry is harvested by the parent).
    pub fn world_end(&mut self) -> BackendResult<()> {
        match &self.mode {
            SessionMode::Interactive => self.backend.render(RenderMode::Camera),
            SessionMode::SceneExport(path) => self.backend.write_scene(path, NodeMask::all()),
            SessionMode::Procedural => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // transforms
    // ------------------------------------------------------------------

    /// Open a transform scope
    pub fn transform_begin(&mut self) {
        self.transforms.push();
    }

    /// Close a transform scope
    pub fn transform_end(&mut self) {
        self.transforms.pop();
    }

    /// Replace the current transform
    pub fn set_transform(&mut self, m: Mat4) {
        self.transforms.set(m);
    }

    /// Set the current transform to a named coordinate system
    ///
    /// Named coordinate systems have no backend equivalent.
    pub fn set_named_transform(&mut self, coordinate_system: &str) {
        log::warn!(
            "named coordinate system \"{coordinate_system}\" not supported; transform unchanged"
        );
    }

    /// The current transform, by value
    pub fn get_transform(&self) -> Mat4 {
        self.transforms.current()
    }

    /// Look up a named coordinate system's transform
    ///
    /// Unsupported; warns and returns identity.
    pub fn named_transform(&self, coordinate_system: &str) -> Mat4 {
        self.transforms.get_named(coordinate_system)
    }

    /// Concatenate onto the current transform: `new = m * existing`
    pub fn concat_transform(&mut self, m: Mat4) {
        self.transforms.concat(m);
    }

    /// Define a named coordinate system from the current transform
    ///
    /// Unsupported; warns and has no effect.
    pub fn coordinate_system(&mut self, name: &str) {
        log::warn!("coordinate_system(\"{name}\") not supported; ignoring");
    }

    // ------------------------------------------------------------------
    // attributes and shading
    // ------------------------------------------------------------------

    /// Open an attribute scope
    ///
    /// Also opens a transform scope, so the pop restores both together.
    pub fn attribute_begin(&mut self) {
        self.transform_begin();
        self.attributes.push();
    }

    /// Close an attribute scope
    pub fn attribute_end(&mut self) {
        self.attributes.pop();
        self.transform_end();
    }

    /// Set a named attribute in the current scope
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.set_attribute(name, value);
    }

    /// The attribute value visible in the current scope, if any
    pub fn get_attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get_attribute(name)
    }

    /// Declare a shader and install it in the current scope
    ///
    /// Only `"surface"` shaders are supported; an unknown shader name
    /// leaves the current shader unchanged.
    pub fn shader(&mut self, shader_type: &str, name: &str, params: ParamMap) {
        if shader_type != "surface" {
            log::warn!("unsupported shader type \"{shader_type}\"");
            return;
        }

        let Some(node) = self.backend.create_node(name) else {
            log::warn!("couldn't load shader \"{name}\"");
            return;
        };
        for (key, value) in params {
            self.backend.set_param(node, &key, value);
        }
        self.attributes.set_shader(node);
    }

    /// Declare a light source; unsupported, warned and ignored
    pub fn light(&mut self, _name: &str, _handle: &str, _params: &ParamMap) {
        log::warn!("light() not supported; ignoring");
    }

    /// Toggle a declared light; unsupported, warned and ignored
    pub fn illuminate(&mut self, _light_handle: &str, _on: bool) {
        log::warn!("illuminate() not supported; ignoring");
    }

    // ------------------------------------------------------------------
    // motion blur
    // ------------------------------------------------------------------

    /// Open a motion block; unsupported, warned and ignored
    pub fn motion_begin(&mut self, _times: &[f32]) {
        log::warn!("motion_begin() not supported; ignoring");
    }

    /// Close a motion block; unsupported, warned and ignored
    pub fn motion_end(&mut self) {
        log::warn!("motion_end() not supported; ignoring");
    }

    // ------------------------------------------------------------------
    // primitives
    // ------------------------------------------------------------------

    /// Emit a polygon mesh
    pub fn mesh(&mut self, mesh: MeshPrimitive) -> Option<NodeHandle> {
        self.emit(Primitive::Mesh(mesh))
    }

    /// Emit a parametric curve group
    pub fn curves(&mut self, curves: CurvesPrimitive) -> Option<NodeHandle> {
        self.emit(Primitive::Curves(curves))
    }

    /// Emit a sphere
    ///
    /// Partial spheres are not supported: non-default `z_min`, `z_max` or
    /// `theta_max` values are warned about and the full sphere is emitted.
    pub fn sphere(
        &mut self,
        radius: f32,
        z_min: f32,
        z_max: f32,
        theta_max: f32,
        _params: &ParamMap,
    ) -> Option<NodeHandle> {
        if z_min != -1.0 {
            log::warn!("sphere z_min not supported");
        }
        if z_max != 1.0 {
            log::warn!("sphere z_max not supported");
        }
        if theta_max != 360.0 {
            log::warn!("sphere theta_max not supported");
        }

        let Some(node) = self.backend.create_node("sphere") else {
            log::error!("unable to create sphere node");
            return None;
        };
        self.backend.set_param(node, "radius", Value::Float(radius));
        Some(self.add_shape(node))
    }

    /// Emit a point cloud; unsupported, warned and ignored
    pub fn points(&mut self, _num_points: usize, _params: &ParamMap) {
        log::warn!("points() not supported; ignoring");
    }

    /// Emit a disk; unsupported, warned and ignored
    pub fn disk(&mut self, _radius: f32, _z: f32, _theta_max: f32, _params: &ParamMap) {
        log::warn!("disk() not supported; ignoring");
    }

    /// Emit typeset text; unsupported, warned and ignored
    pub fn text(&mut self, _font: &str, _text: &str, _kerning: f32, _params: &ParamMap) {
        log::warn!("text() not supported; ignoring");
    }

    /// Emit an image plane; unsupported, warned and ignored
    pub fn image(&mut self, _params: &ParamMap) {
        log::warn!("image() not supported; ignoring");
    }

    /// Emit a NURBS patch; unsupported, warned and ignored
    pub fn nurbs(&mut self, _params: &ParamMap) {
        log::warn!("nurbs() not supported; ignoring");
    }

    /// Emit a cubic patch mesh; unsupported, warned and ignored
    pub fn patch_mesh(&mut self, _params: &ParamMap) {
        log::warn!("patch_mesh() not supported; ignoring");
    }

    /// Emit a named geometry type; unsupported, warned and ignored
    pub fn geometry(&mut self, _type_name: &str, _topology: &ParamMap, _params: &ParamMap) {
        log::warn!("geometry() not supported; ignoring");
    }

    // ------------------------------------------------------------------
    // procedurals
    // ------------------------------------------------------------------

    /// Declare deferred procedural geometry
    ///
    /// Computes the generator's world-space bound under the current
    /// transform, emits a placeholder shape carrying it, and hands the
    /// backend a descriptor owning the generator and an isolated child
    /// session snapshotted from the current transform/attribute state. The
    /// backend expands the descriptor whenever (and from whichever thread)
    /// it chooses.
    pub fn declare_procedural(&mut self, generator: Box<dyn Procedural>) -> Option<NodeHandle> {
        let bound = generator.bound().transformed_by(&self.transforms.current());

        let Some(node) = self.backend.create_node("procedural") else {
            log::error!("unable to create procedural placeholder node");
            return None;
        };
        self.backend.set_param(node, "min", Value::Vec3(bound.min));
        self.backend.set_param(node, "max", Value::Vec3(bound.max));

        let child = self.procedural_child();
        let descriptor = Arc::new(ProceduralDescriptor::new(generator, child));
        self.backend.set_procedural(node, descriptor);

        Some(self.add_shape(node))
    }

    // ------------------------------------------------------------------
    // instancing and commands
    // ------------------------------------------------------------------

    /// Begin an instance definition; unsupported, warned and ignored
    pub fn instance_begin(&mut self, _name: &str, _params: &ParamMap) {
        log::warn!("instance_begin() not supported; ignoring");
    }

    /// End an instance definition; unsupported, warned and ignored
    pub fn instance_end(&mut self) {
        log::warn!("instance_end() not supported; ignoring");
    }

    /// Place an instance; unsupported, warned and ignored
    pub fn instance(&mut self, _name: &str) {
        log::warn!("instance() not supported; ignoring");
    }

    /// Execute a generic renderer command; unsupported, returns nothing
    pub fn command(&mut self, name: &str, _params: &ParamMap) -> Option<Value> {
        log::warn!("command \"{name}\" not supported; ignoring");
        None
    }

    // ------------------------------------------------------------------
    // shape registry
    // ------------------------------------------------------------------

    /// Number of shapes this session has realized
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Realized shape at `index`, in registration order
    pub fn shape_at(&self, index: usize) -> Option<NodeHandle> {
        self.shapes.get(index).copied()
    }

    /// Convert and register a primitive as a shape
    ///
    /// A missing converter or a converter failure skips the primitive with
    /// a warning; one unsupported primitive never aborts the scene.
    fn emit(&mut self, primitive: Primitive) -> Option<NodeHandle> {
        let kind = primitive.kind();
        match self.converters.convert(&primitive, self.backend.as_ref()) {
            Ok(node) => Some(self.add_shape(node)),
            Err(err) => {
                log::warn!("skipping {kind} primitive: {err}");
                None
            }
        }
    }

    /// Stamp a node with the current transform and shader and register it
    fn add_shape(&mut self, node: NodeHandle) -> NodeHandle {
        self.apply_transform(node);
        self.backend
            .set_param(node, "shader", Value::Node(self.attributes.shader()));
        self.shapes.push(node);
        node
    }

    fn apply_transform(&self, node: NodeHandle) {
        let m = self.transforms.current();
        self.backend
            .set_param(node, "matrix", Value::Matrix(mat4_to_rows(&m)));
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Procedural children share the backend's global state with their
        // ancestor and must never tear it down.
        if self.mode != SessionMode::Procedural {
            self.backend.end();
        }
    }
}
