//! Benchmark dataset loading.
//!
//! The named geo corpora (`cali`, `spitz`, `gowalla`, `nh_64`) are read from
//! `./data/<name>.txt.gz` when present, scaled into a `domain_bits`-per-axis
//! grid the same way the upstream dataset generator does. The programmatic
//! ones (`dense_2d`, `random_2d`, `dense_3d`) and any named corpus whose file
//! is missing fall back to synthetic generation, logged so a benchmark run
//! never silently reports numbers for data that wasn't actually there.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ers_types::Point;
use flate2::read::GzDecoder;
use rand::Rng;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DatasetKind {
    Cali,
    Spitz,
    Gowalla,
    #[value(name = "dense_2d")]
    Dense2d,
    #[value(name = "random_2d")]
    Random2d,
    #[value(name = "dense_3d")]
    Dense3d,
    #[value(name = "nh_64")]
    Nh64,
}

impl DatasetKind {
    pub fn dims(self) -> usize {
        match self {
            DatasetKind::Dense3d | DatasetKind::Nh64 => 3,
            _ => 2,
        }
    }

    fn data_file(self) -> Option<&'static str> {
        match self {
            DatasetKind::Cali => Some("cali.txt.gz"),
            DatasetKind::Spitz => Some("spitz.txt.gz"),
            DatasetKind::Gowalla => Some("gowalla.txt.gz"),
            DatasetKind::Nh64 => Some("nh_64.txt.gz"),
            DatasetKind::Dense2d | DatasetKind::Random2d | DatasetKind::Dense3d => None,
        }
    }

    /// Loads up to `records_limit` points, scaled into a `domain_bits` grid.
    pub fn load(self, domain_bits: u32, records_limit: usize) -> Vec<Point> {
        if let Some(name) = self.data_file() {
            let path = Path::new("data").join(name);
            match read_geo_rows(&path, self.dims()) {
                Ok(rows) if !rows.is_empty() => return scale_to_grid(rows, domain_bits, records_limit),
                Ok(_) => log::warn!("{} is empty, falling back to synthetic data", path.display()),
                Err(e) => log::warn!("could not read {}: {e}, falling back to synthetic data", path.display()),
            }
        }
        synthesize(self, domain_bits, records_limit)
    }
}

/// Each row is `node_id coord_0 coord_1 ... coord_{dims-1}`, space-separated,
/// matching the format the upstream generator writes for every corpus.
fn read_geo_rows(path: &Path, dims: usize) -> std::io::Result<Vec<Vec<f64>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(GzDecoder::new(file));
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() < dims + 1 {
            continue;
        }
        if let Some(coords) = fields[1..=dims].iter().map(|f| f.parse::<f64>().ok()).collect() {
            rows.push(coords);
        }
    }
    Ok(rows)
}

fn scale_to_grid(rows: Vec<Vec<f64>>, domain_bits: u32, records_limit: usize) -> Vec<Point> {
    let dims = rows[0].len();
    let grid_max = ((1u64 << domain_bits) - 1) as f64;
    let mut mins = vec![f64::INFINITY; dims];
    let mut maxs = vec![f64::NEG_INFINITY; dims];
    for row in &rows {
        for (axis, &v) in row.iter().enumerate() {
            mins[axis] = mins[axis].min(v);
            maxs[axis] = maxs[axis].max(v);
        }
    }

    let step = (rows.len() / records_limit.max(1)).max(1);
    rows.iter()
        .step_by(step)
        .take(records_limit)
        .map(|row| {
            let coords = (0..dims)
                .map(|axis| {
                    let span = (maxs[axis] - mins[axis]).max(f64::EPSILON);
                    let normalized = (row[axis] - mins[axis]) / span;
                    (normalized * grid_max).round() as u64
                })
                .collect();
            Point::new(coords)
        })
        .collect()
}

fn synthesize(kind: DatasetKind, domain_bits: u32, records_limit: usize) -> Vec<Point> {
    log::warn!("no on-disk corpus for {kind:?}, generating a synthetic dataset of the same shape");
    let dims = kind.dims();
    let max = (1u64 << domain_bits).saturating_sub(1);

    match kind {
        DatasetKind::Dense2d | DatasetKind::Dense3d => dense_grid(dims, domain_bits, records_limit),
        _ => {
            let mut rng = rand::thread_rng();
            (0..records_limit)
                .map(|_| Point::new((0..dims).map(|_| rng.gen_range(0..=max)).collect()))
                .collect()
        }
    }
}

/// Walks the full `dims`-dimensional grid in row-major order, keeping every
/// `step`-th cell so the sample spreads evenly across the domain instead of
/// clustering in one corner.
fn dense_grid(dims: usize, domain_bits: u32, records_limit: usize) -> Vec<Point> {
    if records_limit == 0 {
        return Vec::new();
    }
    let side = 1u64 << domain_bits;
    let max_possible = side.saturating_pow(dims as u32);
    let step = if records_limit as u64 >= max_possible { 1 } else { max_possible / records_limit as u64 };

    let mut points = Vec::new();
    for (i, coords) in grid_iter(dims, side).enumerate() {
        if (i as u64).is_multiple_of(step) {
            points.push(Point::new(coords));
            if points.len() >= records_limit {
                break;
            }
        }
    }
    points
}

fn grid_iter(dims: usize, side: u64) -> impl Iterator<Item = Vec<u64>> {
    let mut counters = vec![0u64; dims];
    let mut done = side == 0;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let current = counters.clone();
        for axis in (0..dims).rev() {
            counters[axis] += 1;
            if counters[axis] < side {
                break;
            }
            counters[axis] = 0;
            if axis == 0 {
                done = true;
            }
        }
        Some(current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_grid_stays_within_domain_and_is_deduplicated() {
        let points = dense_grid(2, 3, 20);
        assert!(points.len() <= 20);
        let max = (1u64 << 3) - 1;
        for p in &points {
            assert!(p.get(0) <= max && p.get(1) <= max);
        }
        let mut unique = points.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), points.len());
    }

    #[test]
    fn synthetic_random_respects_the_domain() {
        let points = synthesize(DatasetKind::Random2d, 4, 10);
        assert_eq!(points.len(), 10);
        let max = (1u64 << 4) - 1;
        for p in &points {
            assert!(p.get(0) <= max && p.get(1) <= max);
        }
    }

    #[test]
    fn missing_on_disk_corpus_falls_back_to_synthetic() {
        let points = DatasetKind::Cali.load(4, 5);
        assert_eq!(points.len(), 5);
    }
}
