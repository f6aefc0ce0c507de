//! Prints the contig records of a contig report as a table, one row per
//! laid-out child block. You can call the program like so:
//!
//! ```
//! cargo run --release --example report_view <REPORT> [CONTIG...]
//! ```
//!
//! When contig names are given, only those contigs are shown. The report may
//! be gzipped.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;

use flate2::read::GzDecoder;
use icarus::block::Ids;
use icarus::reference::References;
use icarus::report::Reader;
use icarus::structure::Context;
use icarus::structure::Resolver;
use tabled::builder::Builder;
use tabled::settings::Alignment;
use tabled::settings::Style;
use tabled::settings::object::Rows;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let src = env::args().nth(1).expect("missing src");
    let contigs = env::args().skip(2).collect::<Vec<_>>();

    let file = File::open(&src)?;
    let inner: Box<dyn Read> = match src.ends_with(".gz") {
        true => Box::new(GzDecoder::new(file)),
        false => Box::new(file),
    };
    let mut reader = Reader::new(BufReader::new(inner));

    let records = reader
        .contigs()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(err) => {
                eprintln!("skipping record: {err}");
                None
            }
        })
        .filter(|record| contigs.is_empty() || contigs.iter().any(|c| c == record.name()))
        .collect::<Vec<_>>();

    // The references are not known from the report alone: every reference
    // named by an alignment is sized to fit its furthest alignment.
    let mut lengths: Vec<(&str, u64)> = Vec::new();
    for alignment in records.iter().flat_map(|record| record.alignments()) {
        let end = alignment.reference_start().max(alignment.reference_end());

        match lengths.iter_mut().find(|(name, _)| *name == alignment.reference()) {
            Some((_, length)) => *length = (*length).max(end),
            None => lengths.push((alignment.reference(), end)),
        }
    }
    let references = References::try_from_iter(lengths)?;

    let mut builder = Builder::default();
    builder.push_record([
        "Contig", "Size", "Type", "Child", "Start", "End", "Type", "Reference", "Strand",
        "Identity", "Side",
    ]);

    let resolver = Resolver::default();
    let mut ids = Ids::default();

    for record in &records {
        let context = Context::new("report", record.name(), record.size())
            .ambiguous(record.is_ambiguous())
            .declared(record.kind());
        let resolution = resolver.resolve(&context, record.segments(), &references, &mut ids);

        for child in &resolution.structure {
            let side = resolution
                .markers
                .iter()
                .filter(|marker| marker.parent() == Some(child.id()))
                .map(|marker| format!("{:?}", marker.misassembled_end_side()))
                .collect::<Vec<_>>()
                .join(",");

            builder.push_record([
                record.name(),
                &record.size().to_string(),
                &resolution.kind.to_string(),
                &child.id().to_string(),
                &child.contig_start().to_string(),
                &child.contig_end().to_string(),
                &child.segment_type().to_string(),
                child
                    .reference()
                    .map(|span| span.name())
                    .unwrap_or("<None>"),
                &child
                    .reference()
                    .map(|span| span.strand().to_string())
                    .unwrap_or(String::from("<None>")),
                &child
                    .identity()
                    .map(|v| format!("{v:.2}"))
                    .unwrap_or(String::from("<None>")),
                &side,
            ]);
        }
    }

    let table = builder
        .build()
        .with(Style::rounded())
        .modify(Rows::new(1..), Alignment::left())
        .to_string();

    println!("{}", table);

    Ok(())
}
