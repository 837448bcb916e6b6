pub mod load;
pub mod save;
pub mod schema;

use schema::{Node, NodeSchema};

/// Schemas of every node this crate provides, in registration order.
pub fn registry() -> Vec<NodeSchema> {
    vec![
        load::LoadImageSequence::<crate::paths::folders::FolderPaths>::schema(),
        save::SaveImageSequence::schema(),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/registry.rs"]
mod tests;
