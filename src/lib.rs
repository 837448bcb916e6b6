//! frameseq loads and saves single frames of numbered image sequences.
//!
//! It provides two host-pluggable nodes:
//!
//! - [`LoadImageSequence`]: resolves a frame template such as `videos/####.png`, decodes the
//!   file (honouring EXIF orientation) and returns a normalized RGB batch plus an inverted-alpha
//!   mask. [`LoadImageSequence::is_changed`] reports a SHA-256 digest for host-side caching.
//! - [`SaveImageSequence`]: writes exactly one frame to
//!   `<output>/<prefix>/<prefix>_<frame:05>.png`, embedding host metadata as PNG text chunks.
//!
//! # Path templates
//!
//! Every maximal run of `#` is replaced by the frame number, zero-padded to the run's width
//! (see [`resolve_path`]). Resolved names may carry a trailing `[input]`, `[output]` or `[temp]`
//! annotation selecting the base folder (see [`FolderPaths`]).
//!
//! # Tensors
//!
//! Images travel as `(batch, height, width, channels)` `f32` arrays with samples in `[0, 1]`;
//! masks are `(height, width)` arrays where `1.0` means fully transparent.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod codec;
mod foundation;
mod nodes;
mod paths;
mod tensor;

pub use codec::decode::{DecodedImage, open_oriented, read_png_text};
pub use codec::encode::{PNG_COMPRESS_LEVEL, PngText, encode_png};
pub use foundation::core::{FrameIndex, MAX_FRAME_HINT};
pub use foundation::error::{SeqError, SeqResult};
pub use nodes::load::{
    DEFAULT_PATH_TEMPLATE, LoadImageSequence, LoadedFrame, MISSING_FILE_DIGEST, sha256_hex,
};
pub use nodes::registry;
pub use nodes::save::{
    DEFAULT_FILENAME_PREFIX, FRAME_DIGITS, PROMPT_KEY, SaveImageSequence, SaveMetadata,
    SaveOutcome, SaveUi, SavedImage, frame_file_name,
};
pub use nodes::schema::{InputField, Node, NodeSchema, OutputSlot, ValueKind};
pub use paths::folders::{AnnotatedPaths, FolderKind, FolderPaths, split_annotation};
pub use paths::template::{PLACEHOLDER, placeholder_runs, resolve_path};
pub use tensor::{
    EMPTY_MASK_SIZE, Frame8, ImageBatch, Mask, alpha_to_mask, batch_len, denormalize,
    empty_mask, frame_to_8bit, rgb8_to_batch, rgba8_to_batch,
};
