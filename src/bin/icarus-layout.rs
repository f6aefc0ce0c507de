//! A binary to inspect the layout `icarus` computes for a set of contig
//! reports.
//!
//! ```shell
//! cargo run --release --bin=icarus-layout --features=binaries -- \
//!     references.tsv spades.tsv.gz velvet.tsv
//! ```
//!
//! The reference table holds one `<name>\t<length>` line per reference
//! sequence. Each contig report is read as one assembly, named after its file
//! stem. Files ending in `.gz` are decompressed on the fly.
//!
//! The binary prints the assembly rows, the breakpoints of the current view
//! and a walk zooming into the middle of the domain.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use clap_verbosity_flag::Verbosity;
use flate2::read::GzDecoder;
use icarus::browser;
use icarus::config::Config;
use icarus::core::Extent;
use icarus::reference::References;
use icarus::report::Assembly;
use icarus::report::Reader;
use icarus::report::Report;
use icarus::track;
use icarus::viewport::Zoom;
use omics::coordinate::position::Number;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Inputs
////////////////////////////////////////////////////////////////////////////////////////

/// Opens a (possibly gzipped) file for buffered reading.
fn open(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => Ok(Box::new(BufReader::new(GzDecoder::new(file)))),
        _ => Ok(Box::new(BufReader::new(file))),
    }
}

/// Reads a table of reference sequence lengths.
fn read_references(path: &Path) -> Result<References> {
    let mut references = References::default();

    for (i, line) in open(path)?.lines().enumerate() {
        let line = line.context("reading the reference table")?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(length)) = (fields.next(), fields.next()) else {
            bail!("invalid reference line {}: `{line}`", i + 1);
        };

        let length = length
            .parse::<Number>()
            .with_context(|| format!("parsing the length of reference `{name}`"))?;

        references
            .push(name, length)
            .with_context(|| format!("adding reference `{name}`"))?;
    }

    info!(
        "read {} reference sequence(s) totalling {} bp",
        references.len(),
        references.total_length()
    );

    Ok(references)
}

/// Gets the name of the assembly stored at `path`.
fn assembly_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();

    let name = name.strip_suffix(".gz").unwrap_or(&name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Reads a contig report as an assembly.
fn read_assembly(path: &Path) -> Result<Assembly> {
    let mut reader = open(path).map(Reader::new)?;
    Assembly::from_reader(assembly_name(path), &mut reader)
        .with_context(|| format!("reading contig report {}", path.display()))
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// The layout of the browser.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Alignments on the concatenated reference sequences.
    Alignment,

    /// Contigs laid end-to-end by decreasing size.
    ContigSize,
}

impl From<Mode> for browser::Mode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Alignment => browser::Mode::Alignment,
            Mode::ContigSize => browser::Mode::ContigSize,
        }
    }
}

/// Prints the layout of a set of contig reports.
#[derive(Parser)]
struct Args {
    /// The table of reference sequence lengths.
    references: PathBuf,

    /// The contig reports, one per assembly.
    #[arg(required = true)]
    reports: Vec<PathBuf>,

    /// The layout.
    #[arg(short, long, value_enum, default_value_t = Mode::Alignment)]
    mode: Mode,

    /// The width of the tracks in pixels.
    #[arg(short, long, default_value_t = 1000.0)]
    width: f64,

    /// The number of zoom steps to walk through.
    #[arg(short, long, default_value_t = 10)]
    zoom_steps: usize,

    /// The number of contigs shown per assembly in the contig-size layout.
    #[arg(long, default_value_t = icarus::config::DEFAULT_MAX_CONTIGS)]
    max_contigs: usize,

    /// The size below which a contig is short.
    #[arg(long, default_value_t = icarus::config::DEFAULT_MIN_CONTIG)]
    min_contig: Number,

    #[command(flatten)]
    verbose: Verbosity,
}

fn run(args: &Args) -> Result<()> {
    let references = read_references(&args.references)?;

    let mut builder = Report::builder().references(references);
    for path in &args.reports {
        builder = builder.push_assembly(read_assembly(path)?);
    }
    let report = builder.try_build().context("assembling the report")?;

    let config = Config::builder()
        .max_contigs(args.max_contigs)
        .min_contig(args.min_contig)
        .try_build()
        .context("configuring the browser")?;

    let mut browser = browser::Builder::default()
        .mode(args.mode.into())
        .width(args.width)
        .config(config)
        .try_build_from(&report)
        .context("laying out the report")?;

    println!("== rows ==");
    for (i, lane) in browser.lanes().iter().enumerate() {
        let blocks = browser.blocks().iter().filter(|block| block.lane() == i);
        let similar = blocks.clone().filter(|block| block.similar()).count();

        println!(
            "{i}\t{}\t{} block(s)\t{similar} similar\t{} sub-lane(s)",
            lane.assembly(),
            blocks.count(),
            lane.sub_lanes()
        );
    }

    let domain = browser.viewport_state().domain();
    browser.request_go_to(domain, false);

    println!("== breakpoints ==");
    for line in browser.visible_breakpoints() {
        println!("{}\t{}\t{}", line.lane(), line.position(), line.kind());
    }

    println!("== zoom walk ==");
    browser.request_center(domain.center());
    for step in 0..=args.zoom_steps {
        let extent: Extent = browser.viewport_extent();
        let (markers, blocks): (Vec<_>, Vec<_>) = browser
            .visible_blocks(track::Id::Main)
            .into_iter()
            .partition(|block| block.is_marker());

        println!(
            "{step}\t{extent}\t{} block(s)\t{} marker(s)\t{} feature(s)",
            blocks.len(),
            markers.len(),
            browser.visible_features().len()
        );

        if !browser.request_zoom(Zoom::In, 0.5) {
            break;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    }

    run(&args)
}
