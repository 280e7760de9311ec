//! Static description of the selector's user-facing inputs and outputs.
//!
//! Host pipelines that present the selector as a configurable node need to
//! know its fields, defaults and constraints before running it. That
//! information lives here as plain data, returned by [`descriptor`], instead
//! of being scattered across the selector type.
//!
//! Serialized with serde, the descriptor looks like:
//!
//! ```json
//! {
//!   "name": "LoadMostRecentImage",
//!   "display_name": "Load Most Recent Image",
//!   "category": "image",
//!   "output_node": false,
//!   "inputs": [
//!     { "name": "folder_path", "required": true, "type": "STRING", "default": "", ... },
//!     { "name": "image_extensions", "required": false, "type": "STRING", ... },
//!     { "name": "index", "required": false, "type": "INT", "min": 0, "max": 1000, ... }
//!   ],
//!   "outputs": [ { "name": "image", "type": "IMAGE" }, { "name": "mask", "type": "MASK" } ]
//! }
//! ```

use crate::extensions::DEFAULT_EXTENSIONS;
use serde::Serialize;

/// Registry key of the selector node.
pub const NODE_NAME: &str = "LoadMostRecentImage";

/// Human-readable node title.
pub const DISPLAY_NAME: &str = "Load Most Recent Image";

/// Largest rank the `index` field accepts.
pub const INDEX_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    /// Whether the node is a terminal output of a pipeline.
    pub output_node: bool,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<OutputField>,
}

impl NodeDescriptor {
    /// Look up an input field by name.
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Type tag, default and constraints of an input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum FieldKind {
    String {
        default: &'static str,
        multiline: bool,
        placeholder: &'static str,
    },
    Int {
        default: usize,
        min: usize,
        max: usize,
        step: usize,
        display: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: OutputKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputKind {
    /// `[1, H, W, 3]` float RGB batch.
    Image,
    /// `[1, H, W]` float mask batch.
    Mask,
}

/// The selector's node descriptor.
pub fn descriptor() -> NodeDescriptor {
    NodeDescriptor {
        name: NODE_NAME,
        display_name: DISPLAY_NAME,
        category: "image",
        output_node: false,
        inputs: vec![
            InputField {
                name: "folder_path",
                required: true,
                kind: FieldKind::String {
                    default: "",
                    multiline: false,
                    placeholder: "Enter folder path...",
                },
            },
            InputField {
                name: "image_extensions",
                required: false,
                kind: FieldKind::String {
                    default: DEFAULT_EXTENSIONS,
                    multiline: false,
                    placeholder: "Comma-separated extensions",
                },
            },
            InputField {
                name: "index",
                required: false,
                kind: FieldKind::Int {
                    default: 0,
                    min: 0,
                    max: INDEX_MAX,
                    step: 1,
                    display: "number",
                },
            },
        ],
        outputs: vec![
            OutputField {
                name: "image",
                kind: OutputKind::Image,
            },
            OutputField {
                name: "mask",
                kind: OutputKind::Mask,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_path_is_the_only_required_input() {
        let d = descriptor();
        let required: Vec<&str> = d
            .inputs
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, ["folder_path"]);
    }

    #[test]
    fn extension_default_matches_parser_default() {
        let d = descriptor();
        let field = d.input("image_extensions").unwrap();
        assert!(matches!(
            field.kind,
            FieldKind::String { default, .. } if default == DEFAULT_EXTENSIONS
        ));
    }

    #[test]
    fn index_bounds() {
        let d = descriptor();
        assert_eq!(
            d.input("index").unwrap().kind,
            FieldKind::Int {
                default: 0,
                min: 0,
                max: 1000,
                step: 1,
                display: "number",
            }
        );
    }

    #[test]
    fn outputs_are_image_then_mask() {
        let names: Vec<&str> = descriptor().outputs.iter().map(|o| o.name).collect();
        assert_eq!(names, ["image", "mask"]);
    }

    #[test]
    fn unknown_input_is_none() {
        assert!(descriptor().input("nope").is_none());
    }

    #[test]
    fn serializes_with_type_tags() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(json["name"], "LoadMostRecentImage");
        assert_eq!(json["inputs"][0]["type"], "STRING");
        assert_eq!(json["inputs"][0]["placeholder"], "Enter folder path...");
        assert_eq!(json["inputs"][2]["type"], "INT");
        assert_eq!(json["inputs"][2]["max"], 1000);
        assert_eq!(json["outputs"][1]["type"], "MASK");
    }
}
