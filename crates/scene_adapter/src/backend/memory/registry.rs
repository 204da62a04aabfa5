//! Node type registry for the memory backend
//!
//! Static table of the node types the backend understands, the category
//! each belongs to, and the parameters each type declares. Parameters not
//! listed here can still be stored on a node (arbitrary user data); the
//! declared list only answers "does this type have a built-in parameter of
//! this name", which option routing and driver filename handling rely on.

use crate::backend::NodeMask;

/// One known node type
#[derive(Debug)]
pub struct NodeTypeEntry {
    /// Type name as used by `create_node`
    pub name: &'static str,
    /// Category the type belongs to
    pub mask: NodeMask,
    /// Built-in parameters the type declares
    pub params: &'static [&'static str],
}

static NODE_TYPES: &[NodeTypeEntry] = &[
    NodeTypeEntry {
        name: "options",
        mask: NodeMask::OPTIONS,
        params: &[
            "camera",
            "xres",
            "yres",
            "outputs",
            "AA_samples",
            "bucket_size",
            "threads",
        ],
    },
    NodeTypeEntry {
        name: "gaussian_filter",
        mask: NodeMask::FILTER,
        params: &["width"],
    },
    NodeTypeEntry {
        name: "utility",
        mask: NodeMask::SHADER,
        params: &["color", "shade_mode"],
    },
    NodeTypeEntry {
        name: "lambert",
        mask: NodeMask::SHADER,
        params: &["Kd", "Kd_color", "opacity"],
    },
    NodeTypeEntry {
        name: "standard_surface",
        mask: NodeMask::SHADER,
        params: &["base", "base_color", "specular", "specular_roughness", "metalness"],
    },
    NodeTypeEntry {
        name: "persp_camera",
        mask: NodeMask::CAMERA,
        params: &["fov", "near_clip", "far_clip", "shutter_start", "shutter_end"],
    },
    NodeTypeEntry {
        name: "polymesh",
        mask: NodeMask::SHAPE,
        params: &["nsides", "vidxs", "vlist", "nlist", "uvlist", "subdiv_type"],
    },
    NodeTypeEntry {
        name: "curves",
        mask: NodeMask::SHAPE,
        params: &["num_points", "points", "radius", "basis", "mode"],
    },
    NodeTypeEntry {
        name: "sphere",
        mask: NodeMask::SHAPE,
        params: &["radius"],
    },
    NodeTypeEntry {
        name: "procedural",
        mask: NodeMask::SHAPE,
        params: &["min", "max", "nodes"],
    },
    NodeTypeEntry {
        name: "driver_exr",
        mask: NodeMask::DRIVER,
        params: &["filename", "compression", "half_precision"],
    },
    NodeTypeEntry {
        name: "driver_png",
        mask: NodeMask::DRIVER,
        params: &["filename", "gamma"],
    },
    // A display driver with no filename parameter; exercises the optional
    // filename branch of display declaration.
    NodeTypeEntry {
        name: "driver_display",
        mask: NodeMask::DRIVER,
        params: &["gamma"],
    },
];

/// Look up a node type by name
pub fn lookup(type_name: &str) -> Option<&'static NodeTypeEntry> {
    NODE_TYPES.iter().find(|entry| entry.name == type_name)
}
