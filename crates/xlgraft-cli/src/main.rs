use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use xlgraft_core::sml::{ClientAnchor, PictureType, StyleIdentity};
use xlgraft_core::{copy_workbook, CopySettings, DirectorySink, Drawing, Workbook, Worksheet};

#[derive(Parser)]
#[command(name = "xlgraft")]
#[command(about = "Copy sheets between XLSX workbooks and rework their drawings", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
struct Cli {
    /// Print debug logging to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Io {
    /// Workbook to read.
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the result is written to. Created on first write.
    #[arg(long, default_value = ".output")]
    out_dir: PathBuf,

    /// File name of the result inside the output directory.
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every sheet into a fresh workbook.
    CopyWorkbook {
        #[command(flatten)]
        io: Io,

        /// JSON file with copy settings.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Merge equal source styles into one destination style.
        #[arg(long)]
        structural_styles: bool,

        /// Print the copy report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Append a copy of a sheet to the same workbook.
    CloneSheet {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,
    },
    /// Restack the two-cell anchors of a sheet's drawing by shape name.
    ReorderShapes {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,

        /// Shape names, bottom first.
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<String>,
    },
    /// Reverse the stacking order of a sheet's two-cell anchors.
    ReverseShapes {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,
    },
    HideShape {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,

        #[arg(long)]
        name: String,

        /// Make the shape visible again instead.
        #[arg(long)]
        show: bool,
    },
    RemoveShape {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,

        #[arg(long)]
        name: String,
    },
    /// Replace text inside the runs of a simple shape.
    ReplaceText {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,

        #[arg(long)]
        shape: String,

        #[arg(long)]
        search: String,

        #[arg(long)]
        replacement: String,
    },
    /// Place a picture over a cell block or on top of a named shape.
    AddImage {
        #[command(flatten)]
        io: Io,

        #[arg(long)]
        sheet: String,

        #[arg(long)]
        image: PathBuf,

        /// Anchor cells as col1,row1,col2,row2 (0-based).
        #[arg(long, value_delimiter = ',', conflicts_with = "container")]
        cells: Option<Vec<u32>>,

        /// Name of a shape whose two-cell anchor the picture copies.
        #[arg(long, required_unless_present = "cells")]
        container: Option<String>,

        /// Pixels to pull the picture in from each anchor edge.
        #[arg(long, default_value_t = 0)]
        inset_px: i64,
    },
    /// List sheets and drawing anchors.
    Info {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("xlgraft: {:#}", err);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::CopyWorkbook {
            io,
            settings,
            structural_styles,
            json,
        } => {
            let mut settings = match settings {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("reading settings {}", path.display()))?;
                    serde_json::from_str::<CopySettings>(&text)
                        .with_context(|| format!("parsing settings {}", path.display()))?
                }
                None => CopySettings::new(),
            };
            if structural_styles {
                settings.style_identity = StyleIdentity::Structural;
            }
            let settings = settings.with_log_callback(|message| log::debug!("{}", message));

            let source = load(&io.input)?;
            let outcome = copy_workbook(&source, &settings)?;
            if json {
                println!("{}", outcome.report.to_json());
            } else {
                print!("{}", outcome.report);
            }
            save(&outcome.workbook, &io, "copy")
        }
        Commands::CloneSheet { io, sheet } => {
            let mut workbook = load(&io.input)?;
            let index = sheet_index(&workbook, &sheet)?;
            let name = workbook.clone_sheet(index)?.name().to_string();
            println!("cloned '{}' as '{}'", sheet, name);
            save(&workbook, &io, "clone")
        }
        Commands::ReorderShapes { io, sheet, order } => {
            let mut workbook = load(&io.input)?;
            let names: Vec<&str> = order.iter().map(String::as_str).collect();
            drawing_mut(&mut workbook, &sheet)?.reorder_by_names(&names)?;
            save(&workbook, &io, "reordered")
        }
        Commands::ReverseShapes { io, sheet } => {
            let mut workbook = load(&io.input)?;
            drawing_mut(&mut workbook, &sheet)?.reverse()?;
            save(&workbook, &io, "reversed")
        }
        Commands::HideShape {
            io,
            sheet,
            name,
            show,
        } => {
            let mut workbook = load(&io.input)?;
            if !drawing_mut(&mut workbook, &sheet)?.set_hidden(&name, !show) {
                bail!("no shape named '{}' on sheet '{}'", name, sheet);
            }
            save(&workbook, &io, if show { "shown" } else { "hidden" })
        }
        Commands::RemoveShape { io, sheet, name } => {
            let mut workbook = load(&io.input)?;
            if !drawing_mut(&mut workbook, &sheet)?.remove(&name)? {
                bail!("no shape named '{}' on sheet '{}'", name, sheet);
            }
            save(&workbook, &io, "removed")
        }
        Commands::ReplaceText {
            io,
            sheet,
            shape,
            search,
            replacement,
        } => {
            let mut workbook = load(&io.input)?;
            let count = drawing_mut(&mut workbook, &sheet)?.replace_text(&shape, &search, &replacement);
            println!("{} run(s) changed", count);
            save(&workbook, &io, "text")
        }
        Commands::AddImage {
            io,
            sheet,
            image,
            cells,
            container,
            inset_px,
        } => {
            let mut workbook = load(&io.input)?;
            let bytes = fs::read(&image).with_context(|| format!("reading {}", image.display()))?;
            let picture_type = PictureType::detect(&bytes)
                .or_else(|| {
                    image
                        .extension()
                        .and_then(|e| e.to_str())
                        .and_then(PictureType::from_extension)
                })
                .ok_or_else(|| anyhow!("{} is not a supported image", image.display()))?;

            let anchor = match (cells, container) {
                (Some(c), _) => match c.as_slice() {
                    &[col1, row1, col2, row2] => ClientAnchor::cells(col1, row1, col2, row2),
                    _ => bail!("--cells takes exactly four numbers: col1,row1,col2,row2"),
                },
                (None, Some(shape)) => worksheet(&workbook, &sheet)?
                    .drawing()
                    .and_then(|d| d.anchor_of(&shape))
                    .ok_or_else(|| anyhow!("no two-cell shape named '{}' on sheet '{}'", shape, sheet))?,
                (None, None) => bail!("either --cells or --container is required"),
            }
            .inset_px(inset_px);

            let index = sheet_index(&workbook, &sheet)?;
            let part = workbook.add_picture(bytes, picture_type);
            let drawing = workbook
                .sheet_at_mut(index)
                .ok_or_else(|| anyhow!("sheet '{}' not found", sheet))?
                .create_drawing();
            let name = drawing.create_picture(anchor, &part)?;
            println!("added '{}' ({})", name, part);
            save(&workbook, &io, "image")
        }
        Commands::Info { input, json } => {
            let workbook = load(&input)?;
            let info = WorkbookInfo::of(&workbook);
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                info.print();
            }
            Ok(())
        }
    }
}

fn load(path: &Path) -> Result<Workbook> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Workbook::from_bytes(&bytes).with_context(|| format!("loading {}", path.display()))
}

fn save(workbook: &Workbook, io: &Io, suffix: &str) -> Result<()> {
    let name = match &io.output {
        Some(name) => name.clone(),
        None => {
            let stem = io
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("workbook");
            format!("{}-{}.xlsx", stem, suffix)
        }
    };
    let mut sink = DirectorySink::new(&io.out_dir);
    workbook.write_to(&mut sink, &name)?;
    println!("wrote {}", sink.path_of(&name)?.display());
    Ok(())
}

fn sheet_index(workbook: &Workbook, name: &str) -> Result<usize> {
    workbook.sheet_index(name).ok_or_else(|| {
        anyhow!(
            "sheet '{}' not found (sheets: {})",
            name,
            workbook.sheet_names().join(", ")
        )
    })
}

fn worksheet<'a>(workbook: &'a Workbook, name: &str) -> Result<&'a Worksheet> {
    let index = sheet_index(workbook, name)?;
    workbook
        .sheet_at(index)
        .ok_or_else(|| anyhow!("sheet '{}' not found", name))
}

fn drawing_mut<'a>(workbook: &'a mut Workbook, name: &str) -> Result<&'a mut Drawing> {
    let index = sheet_index(workbook, name)?;
    workbook
        .sheet_at_mut(index)
        .and_then(Worksheet::drawing_mut)
        .ok_or_else(|| anyhow!("sheet '{}' has no drawing", name))
}

#[derive(Debug, Serialize)]
struct WorkbookInfo {
    sheets: Vec<SheetInfo>,
    styles: usize,
    media: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SheetInfo {
    name: String,
    rows: usize,
    cells: usize,
    merged_regions: usize,
    conditional_rules: usize,
    anchors: Vec<AnchorInfo>,
}

#[derive(Debug, Serialize)]
struct AnchorInfo {
    name: Option<String>,
    kind: String,
    placement: String,
    hidden: bool,
}

impl WorkbookInfo {
    fn of(workbook: &Workbook) -> Self {
        let sheets = workbook
            .sheets()
            .iter()
            .map(|sheet| SheetInfo {
                name: sheet.name().to_string(),
                rows: sheet.rows.len(),
                cells: sheet.cell_count(),
                merged_regions: sheet.merged_regions.len(),
                conditional_rules: sheet.conditional_formatting.rule_count(),
                anchors: sheet
                    .drawing()
                    .map(|d| {
                        d.anchors()
                            .iter()
                            .map(|a| AnchorInfo {
                                name: a.name().map(str::to_string),
                                kind: a.content.kind().to_string(),
                                placement: format!("{:?}", a.placement.kind()),
                                hidden: a.content.info().is_some_and(|i| i.hidden),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        Self {
            sheets,
            styles: workbook.styles.len(),
            media: workbook.media.keys().cloned().collect(),
        }
    }

    fn print(&self) {
        println!("{} sheet(s), {} style(s), {} media part(s)", self.sheets.len(), self.styles, self.media.len());
        for sheet in &self.sheets {
            println!(
                "  {}: {} row(s), {} cell(s), {} merged, {} conditional rule(s)",
                sheet.name, sheet.rows, sheet.cells, sheet.merged_regions, sheet.conditional_rules
            );
            for (i, anchor) in sheet.anchors.iter().enumerate() {
                println!(
                    "    [{}] {} {} {}{}",
                    i,
                    anchor.placement,
                    anchor.kind,
                    anchor.name.as_deref().unwrap_or("-"),
                    if anchor.hidden { " (hidden)" } else { "" }
                );
            }
        }
    }
}

mod logger {
    use log::{Level, Log, Metadata, Record};

    struct StderrLogger;

    static LOGGER: StderrLogger = StderrLogger;

    impl Log for StderrLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                eprintln!("[{}] {}", record.level(), record.args());
            }
        }

        fn flush(&self) {}
    }

    pub fn init(verbose: bool) {
        let level = if verbose { Level::Debug } else { Level::Warn };
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level.to_level_filter());
        }
    }
}
