use serde::Serialize;

/// Value types exchanged between host and node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    /// UTF-8 string.
    #[serde(rename = "STRING")]
    String,
    /// Integer.
    #[serde(rename = "INT")]
    Int,
    /// Image batch tensor.
    #[serde(rename = "IMAGE")]
    Image,
    /// Alpha mask tensor.
    #[serde(rename = "MASK")]
    Mask,
    /// Host prompt graph, JSON.
    #[serde(rename = "PROMPT")]
    Prompt,
    /// Host extra metadata mapping, JSON.
    #[serde(rename = "EXTRA_PNGINFO")]
    ExtraPngInfo,
}

/// One declared input parameter.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputField {
    /// Parameter name.
    pub name: &'static str,
    /// Parameter type.
    pub kind: ValueKind,
    /// Default value shown by the host UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Lower bound (numeric fields).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    /// Upper bound (numeric fields).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    /// Supplied by the host rather than the user.
    pub hidden: bool,
}

impl InputField {
    /// Required user-facing field without default.
    pub const fn required(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            min: None,
            max: None,
            hidden: false,
        }
    }

    /// Host-supplied field.
    pub const fn hidden(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            default: None,
            min: None,
            max: None,
            hidden: true,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, v: impl Into<serde_json::Value>) -> Self {
        self.default = Some(v.into());
        self
    }

    /// Set inclusive numeric bounds.
    pub fn with_bounds(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// One declared output slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutputSlot {
    /// Slot name.
    pub name: &'static str,
    /// Slot type.
    pub kind: ValueKind,
}

/// Static declaration of a node as presented to the host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSchema {
    /// Registry key.
    pub class_name: &'static str,
    /// Human-readable title.
    pub display_name: &'static str,
    /// UI menu category.
    pub category: &'static str,
    /// Entry-point name invoked by the host.
    pub function: &'static str,
    /// Ordered input parameters.
    pub inputs: Vec<InputField>,
    /// Ordered output slots; empty for sink nodes.
    pub outputs: Vec<OutputSlot>,
    /// Node only produces UI output (side effects).
    pub output_node: bool,
}

impl NodeSchema {
    /// Look up an input by name.
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }
}

/// Implemented by every node type this crate registers.
pub trait Node {
    /// Static schema for the node.
    fn schema() -> NodeSchema;
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/schema.rs"]
mod tests;
