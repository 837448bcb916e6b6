use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use frameseq::{FolderPaths, FrameIndex, LoadImageSequence, SaveImageSequence, SaveMetadata};

#[derive(Parser, Debug)]
#[command(name = "frameseq", version)]
struct Cli {
    #[command(flatten)]
    folders: FolderArgs,

    /// Log at DEBUG level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct FolderArgs {
    /// Host base directory holding `input/`, `output/` and `temp/`.
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// Override the input directory.
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Override the temp directory.
    #[arg(long, global = true)]
    temp_dir: Option<PathBuf>,
}

impl FolderArgs {
    fn folder_paths(&self) -> FolderPaths {
        let mut paths = FolderPaths::from_base_dir(&self.base_dir);
        if let Some(p) = &self.input_dir {
            paths.input_dir = p.clone();
        }
        if let Some(p) = &self.output_dir {
            paths.output_dir = p.clone();
        }
        if let Some(p) = &self.temp_dir {
            paths.temp_dir = p.clone();
        }
        paths
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the name a frame template resolves to.
    Resolve(FrameArgs),
    /// Print the change-detection digest of a frame.
    Hash(FrameArgs),
    /// Load a frame and print what was decoded.
    Load(LoadArgs),
    /// Save an image file as one frame of a sequence.
    Save(SaveArgs),
    /// Print the text chunks of a PNG file.
    Inspect(InspectArgs),
    /// Print the node schemas as JSON.
    Schema,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Frame template; runs of `#` are replaced by the frame number.
    #[arg(long, default_value = frameseq::DEFAULT_PATH_TEMPLATE)]
    path: String,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[command(flatten)]
    frame: FrameArgs,

    /// Write the mask as a grayscale PNG.
    #[arg(long)]
    mask_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SaveArgs {
    /// Source image to store.
    #[arg(long = "from")]
    from: PathBuf,

    /// Sequence name; used for both the subfolder and the file stem.
    #[arg(long, default_value = frameseq::DEFAULT_FILENAME_PREFIX)]
    prefix: String,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// JSON file embedded under the `prompt` key.
    #[arg(long)]
    prompt: Option<PathBuf>,

    /// JSON object file; each entry is embedded under its own key.
    #[arg(long)]
    extra: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// PNG file to inspect.
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let folders = cli.folders.folder_paths();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(&folders, args),
        Command::Hash(args) => cmd_hash(folders, args),
        Command::Load(args) => cmd_load(folders, args),
        Command::Save(args) => cmd_save(&folders, args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Schema => cmd_schema(),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_resolve(folders: &FolderPaths, args: FrameArgs) -> anyhow::Result<()> {
    let resolved = frameseq::resolve_path(&args.path, FrameIndex(args.frame));
    let file = frameseq::AnnotatedPaths::annotated_filepath(folders, &resolved);
    println!("{resolved}");
    eprintln!("file: {}", file.display());
    Ok(())
}

fn cmd_hash(folders: FolderPaths, args: FrameArgs) -> anyhow::Result<()> {
    let node = LoadImageSequence::new(folders);
    println!("{}", node.is_changed(&args.path, FrameIndex(args.frame))?);
    Ok(())
}

fn cmd_load(folders: FolderPaths, args: LoadArgs) -> anyhow::Result<()> {
    let node = LoadImageSequence::new(folders);
    let frame = FrameIndex(args.frame.frame);
    node.validate_inputs(&args.frame.path, frame)?;
    let loaded = node.load(&args.frame.path, frame)?;

    let shape = loaded.image.shape();
    println!("source:  {}", loaded.source_path.display());
    println!("frame:   {}", loaded.current_frame);
    println!("size:    {}x{}", shape[2], shape[1]);
    println!("alpha:   {}", loaded.has_alpha);
    println!(
        "mask:    {}x{}",
        loaded.mask.shape()[1],
        loaded.mask.shape()[0]
    );

    if let Some(out) = &args.mask_out {
        write_mask_png(&loaded.mask, out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn write_mask_png(mask: &frameseq::Mask, out: &Path) -> anyhow::Result<()> {
    let (h, w) = mask.dim();
    let luma: Vec<u8> = mask.iter().copied().map(frameseq::denormalize).collect();
    let img = image::GrayImage::from_raw(w as u32, h as u32, luma)
        .context("mask buffer does not match its dimensions")?;
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save(out)
        .with_context(|| format!("write mask png '{}'", out.display()))?;
    Ok(())
}

fn cmd_save(folders: &FolderPaths, args: SaveArgs) -> anyhow::Result<()> {
    let src = frameseq::open_oriented(&args.from)?.image;
    let images = if src.color().has_alpha() {
        frameseq::rgba8_to_batch(&src.to_rgba8())
    } else {
        frameseq::rgb8_to_batch(&src.to_rgb8())
    };

    let prompt = args.prompt.as_deref().map(read_json).transpose()?;
    let extra_pnginfo = match args.extra.as_deref().map(read_json).transpose()? {
        Some(serde_json::Value::Object(map)) => Some(map),
        Some(_) => anyhow::bail!("--extra must contain a JSON object"),
        None => None,
    };
    let metadata = SaveMetadata {
        prompt,
        extra_pnginfo,
    };

    let node = SaveImageSequence::new(&folders.output_dir);
    let outcome = node.save(&images, &args.prefix, FrameIndex(args.frame), &metadata)?;
    println!("{}", serde_json::to_string(&outcome)?);
    eprintln!("wrote {}", outcome.path.display());
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read json '{}'", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parse json '{}'", path.display()))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    for (key, text) in frameseq::read_png_text(&args.file)? {
        println!("{key}: {text}");
    }
    Ok(())
}

fn cmd_schema() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&frameseq::registry())?);
    Ok(())
}
