use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::{Serialize, Serializer};

const FIRST_YEAR: i32 = 1950;
const LAST_YEAR: i32 = 2023;
/// Anomalies are relative to the mean over this climatology window.
const CLIMATOLOGY: (i32, i32) = (1951, 1980);
/// Seed behind the bundled `data/annual_temp.json`.
const SEED: u64 = 42;

/// JSON rows carry every value as a numeric string, the way the viewer's
/// source exports do; the Parquet columns stay typed.
#[derive(Debug, Serialize)]
struct Row {
    #[serde(serialize_with = "as_text")]
    year: i32,
    #[serde(rename = "tas_K", serialize_with = "two_decimals")]
    tas_k: f64,
    #[serde(rename = "anomaly_K", serialize_with = "two_decimals")]
    anomaly_k: f64,
}

fn as_text<S: Serializer>(v: &i32, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(v)
}

fn two_decimals<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{v:.2}"))
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

/// Slow warming trend that speeds up after 1980, plus red noise.
fn generate_series(rng: &mut SimpleRng) -> Vec<Row> {
    let mut noise = 0.0;
    let mut rows: Vec<Row> = (FIRST_YEAR..=LAST_YEAR)
        .map(|year| {
            let t = f64::from(year - FIRST_YEAR);
            let late = f64::from((year - 1980).max(0));
            let trend = 287.15 + 0.004 * t + 0.016 * late;
            noise = 0.6 * noise + rng.gauss(0.0, 0.08);
            Row {
                year,
                tas_k: round2(trend + noise),
                anomaly_k: 0.0,
            }
        })
        .collect();

    let window: Vec<f64> = rows
        .iter()
        .filter(|r| (CLIMATOLOGY.0..=CLIMATOLOGY.1).contains(&r.year))
        .map(|r| r.tas_k)
        .collect();
    let climatology = window.iter().sum::<f64>() / window.len() as f64;
    for row in &mut rows {
        row.anomaly_k = round2(row.tas_k - climatology);
    }
    rows
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn write_json(rows: &[Row], path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(rows).context("serialising rows")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("year", DataType::Int32, false),
        Field::new("tas_K", DataType::Float64, false),
        Field::new("anomaly_K", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.tas_k))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.anomaly_k))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(SEED);
    let rows = generate_series(&mut rng);

    let json_path = out_dir.join("annual_temp.json");
    let parquet_path = out_dir.join("annual_temp.parquet");
    write_json(&rows, &json_path)?;
    write_parquet(&rows, &parquet_path)?;

    println!(
        "Wrote {} years ({FIRST_YEAR}–{LAST_YEAR}) to {} and {}",
        rows.len(),
        json_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_rows_are_numeric_strings() {
        let row = Row {
            year: 1950,
            tas_k: 287.1,
            anomaly_k: -0.08,
        };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"year":"1950","tas_K":"287.10","anomaly_K":"-0.08"}"#
        );
    }

    #[test]
    fn seeded_series_matches_bundled_sample() {
        let rows = generate_series(&mut SimpleRng::new(SEED));
        let text = serde_json::to_string_pretty(&rows).unwrap();
        assert_eq!(text, include_str!("../../data/annual_temp.json"));
    }
}
