//! Benchmark/demo CLI for the encrypted range-searchable multi-map: builds
//! one of the ten schemes over a chosen dataset, runs a batch of random range
//! queries through it, and prints a plain-text timing summary.

mod dataset;
mod error;

use std::collections::BTreeMap;
use std::time::Instant;

use clap::Parser;
use rand::Rng;

use dataset::DatasetKind;
use error::CliError;

use ers_schemes::{
    setup, DataDependentQuadSrc, DataDependentRangeBrc, Key, Linear, LinearHilbert, QuadBrc, QuadSrc, RangeBrc,
    RangeBrcHilbert, Scheme, TdagSrc, TdagSrcHilbert,
};
use ers_types::{HyperRange, Point};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
#[value(rename_all = "kebab-case")]
enum SchemeArg {
    Linear,
    RangeBrc,
    QuadBrc,
    QuadSrc,
    TdagSrc,
    DataDependentRangeBrc,
    DataDependentQuadSrc,
    LinearHilbert,
    RangeBrcHilbert,
    TdagSrcHilbert,
}

/// Benchmark runner for the encrypted range-searchable multi-map.
#[derive(Parser)]
#[command(name = "ers")]
#[command(about = "Benchmark an encrypted range-searchable multi-map scheme")]
#[command(version)]
struct Cli {
    /// Scheme variant to benchmark.
    #[arg(long, value_enum)]
    scheme: SchemeArg,

    /// Dataset to build the index over.
    #[arg(long, value_enum)]
    dataset: DatasetKind,

    /// Bits per axis of the domain (and of the Hilbert curve, for Hilbert schemes).
    #[arg(long, default_value_t = 8)]
    domain_size: u32,

    /// Maximum number of records to load from the dataset.
    #[arg(long, default_value_t = 200)]
    records_limit: usize,

    /// Number of random range queries to run.
    #[arg(long, default_value_t = 20)]
    queries_count: usize,

    /// Divider fan-out for cover-tree schemes.
    #[arg(long, default_value_t = 4)]
    fan_out: usize,

    /// Gap tolerance when merging Hilbert boundary runs (Hilbert schemes only).
    #[arg(long, default_value_t = 0)]
    merge_tolerance: u128,

    /// Bits to fold away before the Hilbert projection (RangeBrcHilbert/TdagSrcHilbert only).
    #[arg(long, default_value_t = 0)]
    downscale_bits: u32,
}

fn build_scheme(cli: &Cli, domain: &HyperRange, dataset: &[Point]) -> Result<Box<dyn Scheme>, CliError> {
    if cli.downscale_bits > 0 && !matches!(cli.scheme, SchemeArg::RangeBrcHilbert | SchemeArg::TdagSrcHilbert) {
        return Err(CliError::DownscaleWithoutHilbert);
    }

    Ok(match cli.scheme {
        SchemeArg::Linear => Box::new(Linear::new(domain.clone())),
        SchemeArg::RangeBrc => Box::new(RangeBrc::new(domain.clone(), cli.fan_out)?),
        SchemeArg::QuadBrc => Box::new(QuadBrc::new(domain.clone(), cli.fan_out)?),
        SchemeArg::QuadSrc => Box::new(QuadSrc::new(domain.clone(), cli.fan_out)?),
        SchemeArg::TdagSrc => Box::new(TdagSrc::new(domain.clone(), cli.fan_out)?),
        SchemeArg::DataDependentRangeBrc => {
            Box::new(DataDependentRangeBrc::new(domain.clone(), dataset, cli.fan_out)?)
        }
        SchemeArg::DataDependentQuadSrc => {
            Box::new(DataDependentQuadSrc::new(domain.clone(), dataset, cli.fan_out)?)
        }
        SchemeArg::LinearHilbert => {
            Box::new(LinearHilbert::new(domain.clone(), cli.domain_size, cli.merge_tolerance)?)
        }
        SchemeArg::RangeBrcHilbert => Box::new(RangeBrcHilbert::with_downscale(
            domain.clone(),
            cli.domain_size,
            cli.fan_out,
            cli.merge_tolerance,
            cli.downscale_bits,
        )?),
        SchemeArg::TdagSrcHilbert => Box::new(TdagSrcHilbert::with_downscale(
            domain.clone(),
            cli.domain_size,
            cli.fan_out,
            cli.downscale_bits,
        )?),
    })
}

/// Picks a random axis-aligned sub-range of `domain`, roughly a quarter of
/// its width per axis, so queries are neither single points nor the whole
/// domain.
fn random_query(domain: &HyperRange, rng: &mut impl Rng) -> HyperRange {
    let dims = domain.dimensions();
    let mut start = Vec::with_capacity(dims);
    let mut end = Vec::with_capacity(dims);
    for axis in 0..dims {
        let lo = domain.start().get(axis);
        let hi = domain.end().get(axis);
        let width = ((hi - lo) / 4).max(1);
        let s = rng.gen_range(lo..=hi);
        let e = (s + width).min(hi);
        start.push(s);
        end.push(e);
    }
    HyperRange::new(Point::new(start), Point::new(end)).expect("clamped to the domain by construction")
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let dims = cli.dataset.dims();
    let domain = HyperRange::from_bits(&vec![cli.domain_size; dims])?;
    let points = cli.dataset.load(cli.domain_size, cli.records_limit);
    log::info!("loaded {} records over a {}-dimensional domain", points.len(), dims);

    let mut plaintext: BTreeMap<Point, Vec<Vec<u8>>> = BTreeMap::new();
    for (i, point) in points.iter().enumerate() {
        plaintext.entry(point.clone()).or_default().push(i.to_string().into_bytes());
    }

    let mut scheme = build_scheme(&cli, &domain, &points)?;
    let key: Key = setup(256);

    let build_start = Instant::now();
    scheme.build_index(&key, &plaintext)?;
    let build_time = build_start.elapsed();

    let mut rng = rand::thread_rng();
    let queries: Vec<HyperRange> = (0..cli.queries_count).map(|_| random_query(&domain, &mut rng)).collect();

    let mut total_tokens = 0usize;
    let mut total_resolved = 0usize;
    let query_start = Instant::now();
    for query in &queries {
        let tokens = scheme.trapdoor(&key, query)?;
        let ciphertexts = scheme.search(&tokens)?;
        let resolved = scheme.resolve(&key, &ciphertexts)?;
        total_tokens += tokens.len();
        total_resolved += resolved.len();
    }
    let query_time = query_start.elapsed();

    let avg_query_micros = if queries.is_empty() { 0 } else { query_time.as_micros() / queries.len() as u128 };

    println!("scheme              {:?}", cli.scheme);
    println!("dataset              {:?}", cli.dataset);
    println!("records loaded       {}", points.len());
    println!("distinct labels      {}", plaintext.len());
    println!("build time           {:.3} ms", build_time.as_secs_f64() * 1000.0);
    println!("queries run          {}", queries.len());
    println!("total query time     {:.3} ms", query_time.as_secs_f64() * 1000.0);
    println!("avg query time       {:.3} ms", avg_query_micros as f64 / 1000.0);
    println!("total tokens issued  {}", total_tokens);
    println!("total values matched {}", total_resolved);

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
