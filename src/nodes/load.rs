use std::path::PathBuf;

use sha2::Digest as _;

use crate::{
    codec::decode::open_oriented,
    foundation::{
        core::{FrameIndex, MAX_FRAME_HINT},
        error::{SeqError, SeqResult},
    },
    nodes::schema::{InputField, Node, NodeSchema, OutputSlot, ValueKind},
    paths::{
        folders::{AnnotatedPaths, FolderPaths},
        template::resolve_path,
    },
    tensor::{ImageBatch, Mask, alpha_to_mask, empty_mask, rgb8_to_batch},
};

/// Change-detection value reported when the resolved file does not exist.
pub const MISSING_FILE_DIGEST: &str = "NONE";

/// Template offered by the UI before the user edits it.
pub const DEFAULT_PATH_TEMPLATE: &str = "videos/####.png";

/// Outputs of [`LoadImageSequence::load`].
#[derive(Clone, Debug)]
pub struct LoadedFrame {
    /// Batch of one RGB frame, `(1, height, width, 3)`.
    pub image: ImageBatch,
    /// Inverted alpha, or the 64x64 zero placeholder when the source has no alpha.
    pub mask: Mask,
    /// The requested frame, passed through for chaining.
    pub current_frame: FrameIndex,
    /// Whether `mask` came from a real alpha channel.
    pub has_alpha: bool,
    /// Filesystem path that was decoded.
    pub source_path: PathBuf,
}

/// Loads one frame of a numbered image sequence.
#[derive(Clone, Debug)]
pub struct LoadImageSequence<P = FolderPaths> {
    paths: P,
}

impl<P: AnnotatedPaths> LoadImageSequence<P> {
    /// Node resolving names through `paths`.
    pub fn new(paths: P) -> Self {
        Self { paths }
    }

    /// Path service in use.
    pub fn paths(&self) -> &P {
        &self.paths
    }

    /// Filesystem path for `template` at `frame`.
    pub fn locate(&self, template: &str, frame: FrameIndex) -> PathBuf {
        self.paths.annotated_filepath(&resolve_path(template, frame))
    }

    /// Decode the frame `template` resolves to at `current_frame`.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, template: &str, current_frame: FrameIndex) -> SeqResult<LoadedFrame> {
        let source_path = self.locate(template, current_frame);
        tracing::debug!(path = %source_path.display(), "loading frame");

        let decoded = open_oriented(&source_path)?;
        // Palette transparency does not count: only a stored alpha channel yields a mask.
        let has_alpha = decoded.source_has_alpha();
        let image = rgb8_to_batch(&decoded.image.to_rgb8());
        let mask = if has_alpha {
            alpha_to_mask(&decoded.image.to_rgba8())
        } else {
            empty_mask()
        };

        Ok(LoadedFrame {
            image,
            mask,
            current_frame,
            has_alpha,
            source_path,
        })
    }

    /// Hex SHA-256 of the resolved file, or [`MISSING_FILE_DIGEST`] when it does not exist.
    ///
    /// The host re-runs the node only when this value changes.
    #[tracing::instrument(skip(self))]
    pub fn is_changed(&self, template: &str, current_frame: FrameIndex) -> SeqResult<String> {
        let path = self.locate(template, current_frame);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "frame missing");
            return Ok(MISSING_FILE_DIGEST.to_owned());
        }
        let bytes = std::fs::read(&path).map_err(|e| SeqError::io(&path, e))?;
        Ok(sha256_hex(&bytes))
    }

    /// Pre-execution check that the resolved frame exists.
    pub fn validate_inputs(&self, template: &str, current_frame: FrameIndex) -> SeqResult<()> {
        let resolved = resolve_path(template, current_frame);
        if !self.paths.exists_annotated_filepath(&resolved) {
            return Err(SeqError::validation(format!(
                "Invalid image file: {resolved}"
            )));
        }
        Ok(())
    }
}

impl Default for LoadImageSequence<FolderPaths> {
    fn default() -> Self {
        Self::new(FolderPaths::from_base_dir("."))
    }
}

impl<P> Node for LoadImageSequence<P> {
    fn schema() -> NodeSchema {
        NodeSchema {
            class_name: "LoadImageSequence",
            display_name: "Load Image Sequence",
            category: "video",
            function: "load_image",
            inputs: vec![
                InputField::required("path", ValueKind::String).with_default(DEFAULT_PATH_TEMPLATE),
                InputField::required("current_frame", ValueKind::Int)
                    .with_default(0)
                    .with_bounds(0, MAX_FRAME_HINT as i64),
            ],
            outputs: vec![
                OutputSlot {
                    name: "image",
                    kind: ValueKind::Image,
                },
                OutputSlot {
                    name: "mask",
                    kind: ValueKind::Mask,
                },
                OutputSlot {
                    name: "current_frame",
                    kind: ValueKind::Int,
                },
            ],
            output_node: false,
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/nodes/load.rs"]
mod tests;
