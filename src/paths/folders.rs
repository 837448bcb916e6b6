use std::path::{Path, PathBuf};

/// Base directory selected by an annotated name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    /// Directory user-provided inputs are read from.
    Input,
    /// Directory node outputs are written to.
    Output,
    /// Scratch directory for previews.
    Temp,
}

/// Split a trailing `[input]`/`[output]`/`[temp]` annotation off `name`.
///
/// A single space before the annotation is stripped as well. Returns `None` for the
/// folder kind when no annotation is present.
pub fn split_annotation(name: &str) -> (&str, Option<FolderKind>) {
    const TAGS: [(&str, FolderKind); 3] = [
        ("[output]", FolderKind::Output),
        ("[input]", FolderKind::Input),
        ("[temp]", FolderKind::Temp),
    ];
    for (tag, kind) in TAGS {
        if let Some(stripped) = name.strip_suffix(tag) {
            let stripped = stripped.strip_suffix(' ').unwrap_or(stripped);
            return (stripped, Some(kind));
        }
    }
    (name, None)
}

/// Host path service mapping logical (possibly annotated) names to filesystem paths.
pub trait AnnotatedPaths {
    /// Resolve `name` into a concrete filesystem path.
    fn annotated_filepath(&self, name: &str) -> PathBuf;

    /// Whether the path `name` resolves to currently exists.
    fn exists_annotated_filepath(&self, name: &str) -> bool {
        self.annotated_filepath(name).exists()
    }
}

/// Host folder layout, injected at node construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderPaths {
    /// Base for unannotated and `[input]` names.
    pub input_dir: PathBuf,
    /// Base for `[output]` names and the saver's output root.
    pub output_dir: PathBuf,
    /// Base for `[temp]` names.
    pub temp_dir: PathBuf,
}

impl FolderPaths {
    /// Conventional layout: `base/input`, `base/output`, `base/temp`.
    pub fn from_base_dir(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            input_dir: base.join("input"),
            output_dir: base.join("output"),
            temp_dir: base.join("temp"),
        }
    }

    /// Directory backing `kind`.
    pub fn dir(&self, kind: FolderKind) -> &Path {
        match kind {
            FolderKind::Input => &self.input_dir,
            FolderKind::Output => &self.output_dir,
            FolderKind::Temp => &self.temp_dir,
        }
    }
}

impl AnnotatedPaths for FolderPaths {
    fn annotated_filepath(&self, name: &str) -> PathBuf {
        let (name, kind) = split_annotation(name);
        self.dir(kind.unwrap_or(FolderKind::Input)).join(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paths/folders.rs"]
mod tests;
