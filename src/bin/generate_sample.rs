use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use housing_dash::data::{OceanProximity, Record};

/// Write a synthetic housing dataset with the same columns as the public file.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; `.csv` or `.parquet`
    #[arg(default_value = "housing_sample.csv")]
    output: PathBuf,

    /// Number of rows
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Region template: category, centre (lat, lon), spread, price premium, weight.
struct Region {
    proximity: &'static str,
    center: (f64, f64),
    spread: f64,
    premium: f64,
    weight: f64,
}

const REGIONS: [Region; 5] = [
    Region { proximity: "<1H OCEAN", center: (34.05, -118.25), spread: 0.6, premium: 60_000.0, weight: 0.44 },
    Region { proximity: "INLAND", center: (36.75, -119.80), spread: 1.2, premium: -60_000.0, weight: 0.32 },
    Region { proximity: "NEAR OCEAN", center: (33.00, -117.20), spread: 0.5, premium: 70_000.0, weight: 0.13 },
    Region { proximity: "NEAR BAY", center: (37.80, -122.27), spread: 0.3, premium: 90_000.0, weight: 0.109 },
    Region { proximity: "ISLAND", center: (33.35, -118.33), spread: 0.05, premium: 150_000.0, weight: 0.001 },
];

fn pick_region(rng: &mut SimpleRng) -> &'static Region {
    let mut roll = rng.next_f64();
    for region in &REGIONS {
        if roll < region.weight {
            return region;
        }
        roll -= region.weight;
    }
    &REGIONS[0]
}

fn generate(rows: usize, seed: u64) -> Vec<Record> {
    let mut rng = SimpleRng::new(seed);

    (0..rows)
        .map(|_| {
            let region = pick_region(&mut rng);
            let latitude = rng.gauss(region.center.0, region.spread);
            let longitude = rng.gauss(region.center.1, region.spread);

            // Income in tens of thousands, right-skewed, capped like the survey data.
            let median_income = rng.gauss(1.25, 0.45).exp().clamp(0.4999, 15.0001);
            let median_house_value = (40_000.0 * median_income
                + 80_000.0
                + region.premium
                + rng.gauss(0.0, 60_000.0))
            .round()
            .clamp(14_999.0, 500_001.0);

            let households = rng.gauss(450.0, 200.0).abs().round().max(1.0);
            let total_rooms = (households * rng.gauss(5.3, 1.0).max(1.0)).round();
            // Roughly 1% of rows have no bedroom count, like the public file.
            let total_bedrooms = (rng.next_f64() > 0.01).then(|| (total_rooms / 5.0).round());

            Record {
                longitude: (longitude * 100.0).round() / 100.0,
                latitude: (latitude * 100.0).round() / 100.0,
                housing_median_age: rng.gauss(28.0, 12.0).clamp(1.0, 52.0).round(),
                total_rooms,
                total_bedrooms,
                population: (households * rng.gauss(2.9, 0.6).max(1.0)).round(),
                households,
                median_income: (median_income * 10_000.0).round() / 10_000.0,
                median_house_value,
                ocean_proximity: OceanProximity::from(region.proximity),
            }
        })
        .collect()
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let floats = |f: fn(&Record) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("longitude", DataType::Float64, false),
        Field::new("latitude", DataType::Float64, false),
        Field::new("housing_median_age", DataType::Float64, false),
        Field::new("total_rooms", DataType::Float64, false),
        Field::new("total_bedrooms", DataType::Float64, true),
        Field::new("population", DataType::Float64, false),
        Field::new("households", DataType::Float64, false),
        Field::new("median_income", DataType::Float64, false),
        Field::new("median_house_value", DataType::Float64, false),
        Field::new("ocean_proximity", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            floats(|r| r.longitude),
            floats(|r| r.latitude),
            floats(|r| r.housing_median_age),
            floats(|r| r.total_rooms),
            Arc::new(Float64Array::from(
                records.iter().map(|r| r.total_bedrooms).collect::<Vec<_>>(),
            )),
            floats(|r| r.population),
            floats(|r| r.households),
            floats(|r| r.median_income),
            floats(|r| r.median_house_value),
            Arc::new(StringArray::from(
                records
                    .iter()
                    .map(|r| r.ocean_proximity.label())
                    .collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let records = generate(args.rows, args.seed);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&args.output, &records)?,
        "parquet" | "pq" => write_parquet(&args.output, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!(
        "Wrote {} synthetic block groups to {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}
