//! A binary that throws random reports and random navigation at `icarus`.
//!
//! ```shell
//! cargo run --release --bin=icarus-stress --features=binaries -- -a 5 -c 2000
//! ```
//!
//! It achieves this by carrying out the following:
//!
//! * Generating a random set of reference sequences and `a` assemblies of `c`
//!   contigs each. Contigs land on a reference picked with a probability
//!   proportional to its length, and some of them carry a relocation.
//! * Writing every assembly as a contig report and reading it back.
//! * Applying `n` random navigation requests to the browser, checking after
//!   each one that the visible extent stays within the domain, that every
//!   track shows it, and that the request fit within the frame budget.

use std::fmt::Write as _;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use icarus::Browser;
use icarus::core::Extent;
use icarus::reference::References;
use icarus::report::Assembly;
use icarus::report::Reader;
use icarus::report::Report;
use icarus::track;
use icarus::viewport::Pan;
use icarus::viewport::Zoom;
use omics::coordinate::position::Number;
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;
use weighted_rand::builder::NewBuilder;
use weighted_rand::builder::WalkerTableBuilder;
use weighted_rand::table::WalkerTable;

/// The header line of every generated report.
const HEADER: &str = "S1\tE1\tS2\tE2\tReference\tContig\tIDY\tAmbiguous\tBest_group";

////////////////////////////////////////////////////////////////////////////////////////
// Generating reports
////////////////////////////////////////////////////////////////////////////////////////

/// A generator of random contig reports.
#[derive(Debug)]
struct Generator {
    /// The reference sequences.
    references: Box<[(String, u32)]>,

    /// The weighted distribution of the reference sequences.
    weights: WalkerTable,

    /// The probability that a contig carries a relocation.
    misassembly_rate: f64,

    /// The random number generator.
    rng: ThreadRng,
}

impl Generator {
    /// Creates a new [`Generator`] with `count` random reference sequences.
    fn new(count: usize, misassembly_rate: f64) -> Self {
        let mut rng = ThreadRng::default();

        let references = (0..count)
            .map(|i| (format!("chr{}", i + 1), rng.gen_range(200_000..2_000_000)))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let weights = references
            .iter()
            .map(|(_, length)| *length)
            .collect::<Vec<_>>();

        Self {
            references,
            weights: WalkerTableBuilder::new(&weights).build(),
            misassembly_rate,
            rng,
        }
    }

    /// Gets the reference sequences.
    fn references(&self) -> Result<References> {
        References::try_from_iter(
            self.references
                .iter()
                .map(|(name, length)| (name.as_str(), *length as Number)),
        )
        .context("creating the reference sequences")
    }

    /// Writes one alignment row.
    fn alignment(&mut self, buffer: &mut String, contig: &str, (s2, e2): (u32, u32)) -> Result<()> {
        let index = self.weights.next();
        let (reference, length) = self.references[index].clone();

        let width = e2 - s2;
        let s1 = self.rng.gen_range(1..length.saturating_sub(width).max(2));
        let identity = self.rng.gen_range(95.0..100.0);

        writeln!(
            buffer,
            "{s1}\t{}\t{s2}\t{e2}\t{reference}\t{contig}\t{identity:.2}\tFalse\tTrue",
            s1 + width
        )
        .context("writing an alignment row")
    }

    /// Writes a contig report of `contigs` contigs.
    fn report(&mut self, contigs: usize) -> Result<String> {
        let mut buffer = format!("{HEADER}\n");

        for i in 0..contigs {
            let name = format!("NODE_{}", i + 1);
            let size = self.rng.gen_range(500..50_000u32);

            let kind = if self.rng.gen_bool(self.misassembly_rate) {
                let split = size / 2;
                self.alignment(&mut buffer, &name, (1, split))?;
                writeln!(buffer, "relocation, inconsistency = {}", size * 3)
                    .context("writing a misassembly")?;
                self.alignment(&mut buffer, &name, (split + 1, size))?;
                "misassembled"
            } else {
                self.alignment(&mut buffer, &name, (1, size))?;
                "correct"
            };

            writeln!(buffer, "CONTIG\t{name}\t{size}\t{kind}").context("writing a summary")?;
        }

        Ok(buffer)
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Checks
////////////////////////////////////////////////////////////////////////////////////////

/// The failures found so far.
#[derive(Debug, Default)]
struct Failures {
    /// Requests that broke an invariant.
    invariants: usize,

    /// Requests that took longer than the frame budget.
    slow: usize,

    /// The slowest request.
    slowest: Duration,
}

/// Checks the invariants of the browser after a request.
fn check(browser: &Browser, minimum: f64, request: &str) -> bool {
    let state = browser.viewport_state();
    let (domain, current) = (state.domain(), state.current());
    let mut ok = true;

    if current.start() < domain.start() || current.end() > domain.end() {
        warn!("{request}: {current} escaped the domain {domain}");
        ok = false;
    }

    if domain.width() > minimum && current.width() < minimum {
        warn!("{request}: {current} is narrower than {minimum}");
        ok = false;
    }

    if browser.track(track::Id::Main).space().domain() != current {
        warn!("{request}: the main track does not show {current}");
        ok = false;
    }

    if browser.track(track::Id::Mini).brush() != Some(current) {
        warn!("{request}: the overview brush does not match {current}");
        ok = false;
    }

    let escaped = browser
        .visible_blocks(track::Id::Main)
        .iter()
        .filter(|block| !current.intersects(block.corrected_start(), block.corrected_end()))
        .count();

    if escaped > 0 {
        warn!("{request}: {escaped} visible block(s) outside of {current}");
        ok = false;
    }

    ok
}

////////////////////////////////////////////////////////////////////////////////////////
// Main
////////////////////////////////////////////////////////////////////////////////////////

/// Throws random reports and navigation at `icarus`.
#[derive(Parser)]
struct Args {
    /// The number of assemblies to generate.
    #[arg(short, long, default_value_t = 3)]
    assemblies: usize,

    /// The number of contigs per assembly.
    #[arg(short, long, default_value_t = 1000)]
    contigs: usize,

    /// The number of reference sequences.
    #[arg(short, long, default_value_t = 24)]
    references: usize,

    /// The probability that a contig carries a relocation.
    #[arg(long, default_value_t = 0.1)]
    misassembly_rate: f64,

    /// The number of navigation requests.
    #[arg(short, default_value_t = 10_000)]
    n: usize,

    /// The frame budget of a single request in milliseconds.
    #[arg(short, long, default_value_t = 50)]
    budget: u64,

    #[command(flatten)]
    verbose: Verbosity,
}

fn throw(args: &Args) -> Result<Failures> {
    if !(0.0..=1.0).contains(&args.misassembly_rate) {
        bail!("invalid misassembly rate: {}", args.misassembly_rate);
    }

    let mut generator = Generator::new(args.references, args.misassembly_rate);
    let mut builder = Report::builder().references(generator.references()?);

    for a in 0..args.assemblies {
        let data = generator.report(args.contigs)?;
        let mut reader = Reader::new(data.as_bytes());
        let assembly = Assembly::from_reader(format!("assembly_{}", a + 1), &mut reader)
            .context("reading back a generated report")?;
        builder = builder.push_assembly(assembly);
    }

    let report = builder.try_build().context("assembling the report")?;

    let started = Instant::now();
    let mut browser = Browser::builder()
        .try_build_from(&report)
        .context("laying out the report")?;
    info!(
        "laid out {} block(s) in {:?}",
        browser.blocks().len(),
        started.elapsed()
    );

    let minimum = icarus::viewport::DEFAULT_MINIMUM_EXTENT;
    let budget = Duration::from_millis(args.budget);
    let domain = browser.viewport_state().domain();
    let mut rng = ThreadRng::default();
    let mut failures = Failures::default();

    for _ in 0..args.n {
        let started = Instant::now();

        let request = match rng.gen_range(0..5) {
            0 => {
                let amount = rng.gen_range(0.05..0.9);
                browser.request_zoom(Zoom::In, amount);
                "zoom in"
            }
            1 => {
                let amount = rng.gen_range(0.05..2.0);
                browser.request_zoom(Zoom::Out, amount);
                "zoom out"
            }
            2 => {
                let direction = if rng.gen_bool(0.5) { Pan::Left } else { Pan::Right };
                browser.request_pan(direction, rng.gen_range(0.05..1.0));
                "pan"
            }
            3 => {
                browser.request_center(rng.gen_range(domain.start()..domain.end()));
                "center"
            }
            _ => {
                let a = rng.gen_range(domain.start()..domain.end());
                let b = rng.gen_range(domain.start()..domain.end());
                let animate = rng.gen_bool(0.5);

                if let Some(handle) = browser.request_go_to(Extent::new(a, b), animate) {
                    let frames = rng.gen_range(0..30);
                    for _ in 0..frames {
                        if !browser.tick().is_running() {
                            break;
                        }
                    }

                    if rng.gen_bool(0.5) {
                        handle.cancel();
                    }

                    while browser.tick().is_running() {}
                }

                "go to"
            }
        };

        let elapsed = started.elapsed();
        failures.slowest = failures.slowest.max(elapsed);

        if elapsed > budget {
            warn!("{request} took {elapsed:?}");
            failures.slow += 1;
        }

        if !check(&browser, minimum, request) {
            failures.invariants += 1;
        }
    }

    Ok(failures)
}

fn main() -> Result<()> {
    let args = Args::parse();
    assert!(args.n > 0, "`n` must be greater than 0!");

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    }

    let failures = throw(&args)?;

    println!(
        "{} request(s): {} broke an invariant, {} exceeded the budget (slowest: {:?})",
        args.n, failures.invariants, failures.slow, failures.slowest
    );

    if failures.invariants > 0 || failures.slow > 0 {
        std::process::exit(1);
    }

    Ok(())
}
