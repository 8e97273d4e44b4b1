use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use framecard::{
    AssetId, BackendKind, Compositor, Editor, EditorConfig, ExportFormat, ExportRequest,
    FileStore, FitMode, PaperFormat, Persister, RenderSettings, Rgba8, TaskEvent, Upload,
};

#[derive(Parser, Debug)]
#[command(name = "framecard", version)]
struct Cli {
    /// Editor config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project store directory (overrides the config; defaults to `.framecard`).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect the photo window of a frame image and print it as JSON.
    Detect(DetectArgs),
    /// Add frames or photos to the project.
    Import(ImportArgs),
    /// Change selections, photo fit and caption.
    Compose(ComposeArgs),
    /// Render the card to PNG, JPEG or PDF.
    Export(ExportArgs),
    /// Manage saved cards.
    Saved {
        #[command(subcommand)]
        cmd: SavedCommand,
    },
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Frame image (PNG, JPEG or WebP).
    image: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AssetKind {
    Frame,
    Photo,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Kind of asset.
    #[arg(long, value_enum)]
    kind: AssetKind,

    /// Select the last successfully imported asset.
    #[arg(long, default_value_t = false)]
    select: bool,

    /// Image files.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Frame id to select.
    #[arg(long)]
    frame: Option<String>,

    /// Photo id to select.
    #[arg(long)]
    photo: Option<String>,

    /// Re-apply a fit policy to the selected photo.
    #[arg(long)]
    fit: Option<FitMode>,

    /// Caption text (`\n` for new lines).
    #[arg(long)]
    text: Option<String>,

    /// Caption position `x,y` in canvas units.
    #[arg(long, value_parser = parse_point)]
    text_pos: Option<(f64, f64)>,

    /// Caption font size in canvas units.
    #[arg(long)]
    font_size: Option<f64>,

    /// Caption fill color (`#rrggbb` or `#rrggbbaa`).
    #[arg(long, value_parser = parse_color)]
    fill: Option<Rgba8>,

    /// Caption outline color.
    #[arg(long, value_parser = parse_color)]
    outline: Option<Rgba8>,

    /// Hide the caption.
    #[arg(long, default_value_t = false)]
    hide_text: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Png,
    Jpeg,
    Pdf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Png)]
    format: FormatChoice,

    /// Paper size for PDF output.
    #[arg(long, default_value_t = PaperFormat::A4)]
    paper: PaperFormat,

    /// Resolution multiplier (overrides the config).
    #[arg(long)]
    multiplier: Option<u32>,
}

#[derive(Subcommand, Debug)]
enum SavedCommand {
    /// List saved cards, newest first.
    List,
    /// Render the current card and add it to the saved list.
    Add {
        /// Display name.
        name: String,
    },
    /// Delete a saved card.
    Remove {
        /// Card id.
        id: String,
    },
    /// Write a saved card's PNG to disk.
    Extract {
        /// Card id.
        id: String,
        /// Output path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn parse_color(s: &str) -> Result<Rgba8, String> {
    Rgba8::parse_hex(s)
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got \"{s}\""))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Detect(args) => cmd_detect(args),
        Command::Import(args) => {
            let mut session = Session::open(config, cli.store)?;
            cmd_import(&mut session, args)?;
            session.flush()
        }
        Command::Compose(args) => {
            let mut session = Session::open(config, cli.store)?;
            cmd_compose(&mut session, args)?;
            session.flush()
        }
        Command::Export(args) => {
            let session = Session::open(config, cli.store)?;
            cmd_export(&session, args)
        }
        Command::Saved { cmd } => {
            let mut session = Session::open(config, cli.store)?;
            cmd_saved(&mut session, cmd)?;
            session.flush()
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EditorConfig> {
    let config = match path {
        Some(p) => EditorConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => EditorConfig::default(),
    };
    let config = config.with_env_overrides();
    config.validate().context("invalid config")?;
    Ok(config)
}

struct Session {
    config: EditorConfig,
    editor: Editor,
    persister: Persister,
}

impl Session {
    fn open(config: EditorConfig, store_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let root = store_override
            .or_else(|| config.store_dir.clone())
            .unwrap_or_else(|| PathBuf::from(".framecard"));
        let store =
            FileStore::open(&root).with_context(|| format!("open store '{}'", root.display()))?;
        let editor = Editor::restore(&config, &store);
        let mut persister = Persister::new(
            Box::new(store),
            Duration::from_millis(config.persist_debounce_ms),
        );
        persister.mark_synced(&editor);
        Ok(Self {
            config,
            editor,
            persister,
        })
    }

    fn flush(mut self) -> anyhow::Result<()> {
        let report = self.persister.persist(&self.editor);
        if let Some((key, err)) = report.failed.into_iter().next() {
            anyhow::bail!("failed to save '{key}': {err}");
        }
        Ok(())
    }

    fn render_parts(&self) -> anyhow::Result<(Compositor, Box<dyn framecard::RenderBackend>)> {
        let settings = RenderSettings {
            clear: Some(self.config.background),
        };
        let backend = framecard::create_backend(BackendKind::Cpu, &settings)?;
        Ok((Compositor::new(), backend))
    }
}

fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Upload::new(name, bytes))
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(&args.image).with_context(|| format!("read '{}'", args.image.display()))?;
    let decoded = framecard::decode_image(&bytes)?;
    let detection = framecard::detect_mask(&decoded.to_rgba_image()?);
    println!("{}", serde_json::to_string_pretty(&detection)?);
    Ok(())
}

fn cmd_import(session: &mut Session, args: ImportArgs) -> anyhow::Result<()> {
    let editor = &mut session.editor;
    for path in &args.files {
        let upload = read_upload(path)?;
        match args.kind {
            AssetKind::Frame => editor.begin_frame_upload(upload),
            AssetKind::Photo => editor.begin_photo_upload(upload),
        };
    }

    let mut last = None;
    let mut failures = 0usize;
    for event in editor.wait_for_tasks() {
        match event {
            TaskEvent::FrameAdded {
                id, mask_source, ..
            } => {
                println!("frame {id} (window {mask_source:?})");
                last = Some(id);
            }
            TaskEvent::PhotoAdded { id, .. } => {
                println!("photo {id}");
                last = Some(id);
            }
            TaskEvent::UploadFailed { name, error, .. } => {
                eprintln!("skipped {name}: {error}");
                failures += 1;
            }
            TaskEvent::MaskUpdated { .. } | TaskEvent::Discarded { .. } => {}
        }
    }

    if args.select
        && let Some(id) = last
    {
        match args.kind {
            AssetKind::Frame => editor.select_frame(Some(id))?,
            AssetKind::Photo => editor.select_photo(Some(id))?,
        };
    }
    if failures == args.files.len() {
        anyhow::bail!("no files could be imported");
    }
    Ok(())
}

fn cmd_compose(session: &mut Session, args: ComposeArgs) -> anyhow::Result<()> {
    let editor = &mut session.editor;
    if let Some(id) = args.frame {
        editor.select_frame(Some(AssetId::new(id)))?;
    }
    if let Some(id) = args.photo {
        editor.select_photo(Some(AssetId::new(id)))?;
    }
    if let Some(mode) = args.fit {
        editor.apply_fit(mode)?;
    }

    let mut text = editor.project().text.clone();
    if let Some(content) = args.text {
        text.content = content.replace("\\n", "\n");
    }
    if let Some((x, y)) = args.text_pos {
        text.x = x;
        text.y = y;
    }
    if let Some(size) = args.font_size {
        text.font_size = size;
    }
    if let Some(fill) = args.fill {
        text.fill = fill;
    }
    if let Some(outline) = args.outline {
        text.outline = outline;
    }
    if args.hide_text {
        text.visible = false;
    }
    if text != editor.project().text {
        editor.set_text_properties(text)?;
    }

    let snapshot = editor.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot.project)?);
    Ok(())
}

fn cmd_export(session: &Session, args: ExportArgs) -> anyhow::Result<()> {
    let format = match args.format {
        FormatChoice::Png => ExportFormat::Png,
        FormatChoice::Jpeg => ExportFormat::Jpeg,
        FormatChoice::Pdf => ExportFormat::Pdf(args.paper),
    };
    let mut req = ExportRequest::from_config(format, &session.config);
    if let Some(m) = args.multiplier {
        req.multiplier = m;
    }

    let (mut compositor, mut backend) = session.render_parts()?;
    let card = framecard::export_card(&session.editor, &mut compositor, backend.as_mut(), &req)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &card.bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{} {})",
        args.out.display(),
        card.width,
        card.height,
        format.mime()
    );
    Ok(())
}

fn cmd_saved(session: &mut Session, cmd: SavedCommand) -> anyhow::Result<()> {
    match cmd {
        SavedCommand::List => {
            for card in session.editor.saved_cards().iter() {
                println!(
                    "{}\t{}\t{}\t{} bytes",
                    card.id,
                    card.name,
                    card.created_at_ms,
                    card.image.len()
                );
            }
        }
        SavedCommand::Add { name } => {
            let (mut compositor, mut backend) = session.render_parts()?;
            let card = framecard::save_finished_card(
                &mut session.editor,
                &mut compositor,
                backend.as_mut(),
                name,
            )?;
            println!("{}", card.id);
        }
        SavedCommand::Remove { id } => {
            if session
                .editor
                .remove_saved_card(&AssetId::new(id.clone()))
                .is_none()
            {
                anyhow::bail!("no saved card '{id}'");
            }
        }
        SavedCommand::Extract { id, out } => {
            let card = session
                .editor
                .saved_cards()
                .get(&AssetId::new(id.clone()))
                .with_context(|| format!("no saved card '{id}'"))?;
            std::fs::write(&out, card.image.bytes())
                .with_context(|| format!("write '{}'", out.display()))?;
        }
    }
    Ok(())
}
