use std::path::{Component, Path, PathBuf};

use ndarray::Axis;

use crate::{
    codec::encode::{PngText, encode_png},
    foundation::{
        core::{FrameIndex, MAX_FRAME_HINT},
        error::{SeqError, SeqResult},
    },
    nodes::schema::{InputField, Node, NodeSchema, ValueKind},
    paths::folders::FolderKind,
    tensor::{ImageBatch, batch_len, frame_to_8bit},
};

/// Prefix offered by the UI before the user edits it.
pub const DEFAULT_FILENAME_PREFIX: &str = "Sequence";

/// Text-chunk keyword holding the serialized prompt graph.
pub const PROMPT_KEY: &str = "prompt";

/// Digits used for the frame number in saved filenames.
pub const FRAME_DIGITS: usize = 5;

/// Host-supplied metadata embedded into the saved file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SaveMetadata {
    /// Prompt graph, stored under [`PROMPT_KEY`].
    pub prompt: Option<serde_json::Value>,
    /// Extra entries, each stored under its own key.
    pub extra_pnginfo: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SaveMetadata {
    /// Serialize every entry to JSON text, prompt first.
    pub fn to_png_text(&self) -> SeqResult<Vec<PngText>> {
        let mut out = Vec::new();
        if let Some(prompt) = &self.prompt {
            out.push(PngText::new(PROMPT_KEY, to_json_text(PROMPT_KEY, prompt)?));
        }
        if let Some(extra) = &self.extra_pnginfo {
            for (key, value) in extra {
                out.push(PngText::new(key.as_str(), to_json_text(key, value)?));
            }
        }
        Ok(out)
    }
}

fn to_json_text(key: &str, value: &serde_json::Value) -> SeqResult<String> {
    serde_json::to_string(value)
        .map_err(|e| SeqError::serde(format!("metadata '{key}': {e}")))
}

/// One written file as reported to the host UI.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SavedImage {
    /// File name inside `subfolder`.
    pub filename: String,
    /// Directory below the output root.
    pub subfolder: String,
    /// Output-type tag.
    #[serde(rename = "type")]
    pub kind: FolderKind,
}

/// UI payload of a save.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SaveUi {
    /// Files written by this invocation.
    pub images: Vec<SavedImage>,
}

/// Display record returned by [`SaveImageSequence::save`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SaveOutcome {
    /// UI payload.
    pub ui: SaveUi,
    /// Full path of the written file.
    #[serde(skip)]
    pub path: PathBuf,
}

/// Saves a single frame into `<output_dir>/<prefix>/<prefix>_<frame:05>.png`.
#[derive(Clone, Debug)]
pub struct SaveImageSequence {
    output_dir: PathBuf,
    kind: FolderKind,
}

impl SaveImageSequence {
    /// Node writing below `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            kind: FolderKind::Output,
        }
    }

    /// Where frame `current_frame` of `filename_prefix` is written.
    pub fn target_path(&self, filename_prefix: &str, current_frame: FrameIndex) -> PathBuf {
        self.output_dir
            .join(filename_prefix)
            .join(frame_file_name(filename_prefix, current_frame))
    }

    /// Encode the single frame of `images` and write it with `metadata` embedded.
    ///
    /// Batches holding anything other than exactly one frame are rejected before the
    /// filesystem is touched.
    #[tracing::instrument(skip(self, images, metadata), fields(batch = batch_len(images)))]
    pub fn save(
        &self,
        images: &ImageBatch,
        filename_prefix: &str,
        current_frame: FrameIndex,
        metadata: &SaveMetadata,
    ) -> SeqResult<SaveOutcome> {
        match batch_len(images) {
            1 => {}
            0 => return Err(SeqError::validation("No image supplied to save")),
            _ => return Err(SeqError::validation("Can only save one image at a time")),
        }
        validate_prefix(filename_prefix)?;

        let frame = frame_to_8bit(images.index_axis(Axis(0), 0))?;
        let text = metadata.to_png_text()?;
        let bytes = encode_png(&frame, &text)?;

        let dir = self.output_dir.join(filename_prefix);
        std::fs::create_dir_all(&dir).map_err(|e| SeqError::io(&dir, e))?;

        let path = self.target_path(filename_prefix, current_frame);
        std::fs::write(&path, &bytes).map_err(|e| SeqError::io(&path, e))?;
        tracing::info!(
            path = %path.display(),
            width = frame.width,
            height = frame.height,
            text_chunks = text.len(),
            "saved frame"
        );

        Ok(SaveOutcome {
            ui: SaveUi {
                images: vec![SavedImage {
                    filename: frame_file_name(filename_prefix, current_frame),
                    subfolder: filename_prefix.to_owned(),
                    kind: self.kind,
                }],
            },
            path,
        })
    }
}

/// `<prefix>_<frame, zero-padded to 5 digits>.png`
pub fn frame_file_name(filename_prefix: &str, current_frame: FrameIndex) -> String {
    format!(
        "{filename_prefix}_{}.png",
        current_frame.zero_padded(FRAME_DIGITS)
    )
}

// The prefix names both a directory and a file stem, so it must be one plain component.
fn validate_prefix(prefix: &str) -> SeqResult<()> {
    let mut components = Path::new(prefix).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c == prefix => Ok(()),
        _ => Err(SeqError::validation(format!(
            "filename_prefix must be a single path component, got '{prefix}'"
        ))),
    }
}

impl Node for SaveImageSequence {
    fn schema() -> NodeSchema {
        NodeSchema {
            class_name: "SaveImageSequence",
            display_name: "Save Image Sequence",
            category: "image",
            function: "save_images",
            inputs: vec![
                InputField::required("images", ValueKind::Image),
                InputField::required("filename_prefix", ValueKind::String)
                    .with_default(DEFAULT_FILENAME_PREFIX),
                InputField::required("current_frame", ValueKind::Int)
                    .with_default(0)
                    .with_bounds(0, MAX_FRAME_HINT as i64),
                InputField::hidden("prompt", ValueKind::Prompt),
                InputField::hidden("extra_pnginfo", ValueKind::ExtraPngInfo),
            ],
            outputs: Vec::new(),
            output_node: true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/save.rs"]
mod tests;
