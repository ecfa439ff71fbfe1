use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use matjip::classify::KeywordClassifier;
use matjip::geocode::Geocoder;
use matjip::pipeline::Pipeline;
use matjip::place::{Bounds, RawPlaceRecord};
use matjip::PlaceCache;

/// Matjip — dining place aggregation pipeline.
///
/// Reads a crawl feed (JSON array of raw place records), deduplicates
/// and merges it, fills coordinate gaps through the geocoding chain,
/// and upserts the canonical places into the local store.
///
/// Examples:
///   matjip --input crawl.json --search-terms "이태원 맛집"
///   matjip --input - --bounds "37.51,126.95,37.56,127.02" --cached
///   matjip --geocode 이태원
#[derive(Parser)]
#[command(name = "matjip", version, about, long_about = None)]
struct Cli {
    /// Crawl feed file (JSON array of raw place records); "-" for stdin.
    #[arg(long, short = 'i')]
    input: Option<String>,

    /// Geocoding hint for records that carry no address.
    #[arg(long, default_value = "")]
    search_terms: String,

    /// Viewport filter "swLat,swLng,neLat,neLng".
    #[arg(long)]
    bounds: Option<Bounds>,

    /// Also feed stored rows (within --max-age) into the pass.
    #[arg(long)]
    cached: bool,

    /// Stored row age cutoff in hours.
    #[arg(long, default_value_t = 24)]
    max_age: i64,

    /// Place store file override (default ~/.matjip/places.json).
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Skip the network geocoding stages.
    #[arg(long)]
    offline: bool,

    /// Label place types with the built-in keyword classifier.
    #[arg(long)]
    keyword_classify: bool,

    /// Resolve a single query through the geocoding chain and exit.
    #[arg(long)]
    geocode: Option<String>,
}

fn main() {
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("matjip=info,warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut geocoder = Geocoder::new();
    if cli.offline {
        geocoder.set_offline(true);
    }

    // ── One-shot geocode mode ───────────────────────────────────

    if let Some(ref query) = cli.geocode {
        match geocoder.geocode(query) {
            Some(result) => println!("{}", serde_json::to_string_pretty(&result).unwrap()),
            None => {
                eprintln!("No result for '{}'", query);
                std::process::exit(1);
            }
        }
        return;
    }

    // ── Pipeline mode ───────────────────────────────────────────

    let Some(ref input) = cli.input else {
        eprintln!("Error: no input. Use --input FILE (or '-' for stdin), or --geocode QUERY.");
        std::process::exit(1);
    };

    let mut records: Vec<RawPlaceRecord> =
        serde_json::from_str(&read_input(input)).unwrap_or_else(|e| {
            eprintln!("Error: invalid crawl feed: {}", e);
            std::process::exit(1);
        });

    let mut cache = match cli.cache {
        Some(ref path) => PlaceCache::load_from(path.clone()),
        None => PlaceCache::load(),
    };

    if cli.cached {
        let rows = cache.find(cli.bounds.as_ref(), cli.max_age);
        eprintln!("  {} stored rows joined the batch", rows.len());
        records.extend(rows);
    }

    let classifier = KeywordClassifier;
    let mut pipeline = Pipeline::new(&geocoder);
    if cli.keyword_classify {
        pipeline = pipeline.with_classifier(&classifier);
    }

    let output = pipeline.run(&cli.search_terms, cli.bounds.as_ref(), &records, &mut cache);

    for err in &output.errors {
        eprintln!("  skipped: {}", err);
    }
    eprintln!(
        "  {} raw records \u{2192} {} canonical places",
        records.len(),
        output.places.len()
    );

    println!("{}", serde_json::to_string_pretty(&output.places).unwrap());
}

fn read_input(path: &str) -> String {
    if path == "-" {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("Error: cannot read stdin: {}", e);
            std::process::exit(1);
        }
        buf
    } else {
        std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error: cannot read '{}': {}", path, e);
            std::process::exit(1);
        })
    }
}
