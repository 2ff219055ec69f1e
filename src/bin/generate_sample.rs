use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

/// One generated record.
struct Row {
    sample_id: String,
    site: &'static str,
    age: i64,
    height: f64,
    weight: f64,
    income: f64,
    commute: f64,
    noise: f64,
}

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let sites = ["North", "South", "East"];
    (0..n)
        .map(|i| {
            let age = rng.gauss(42.0, 12.0).clamp(18.0, 80.0).round() as i64;
            let height = rng.gauss(170.0, 9.0);
            // weight tracks height, income tracks age, commute falls with income
            let weight = 0.9 * (height - 100.0) + rng.gauss(0.0, 7.0);
            let income = 900.0 * age as f64 + rng.gauss(20_000.0, 8_000.0);
            let commute = (60.0 - income / 2_500.0 + rng.gauss(0.0, 6.0)).max(2.0);
            Row {
                sample_id: format!("S{i:04}"),
                site: sites[i % sites.len()],
                age,
                height,
                weight,
                income,
                commute,
                noise: rng.gauss(0.0, 1.0),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "sample_id", "site", "age", "height", "weight", "income", "commute", "noise",
    ])?;
    for (i, r) in rows.iter().enumerate() {
        // Leave a few holes so pairwise-complete handling shows up.
        let weight = if i % 37 == 5 {
            String::new()
        } else {
            format!("{:.2}", r.weight)
        };
        writer.write_record([
            r.sample_id.clone(),
            r.site.to_string(),
            r.age.to_string(),
            format!("{:.2}", r.height),
            weight,
            format!("{:.0}", r.income),
            format!("{:.1}", r.commute),
            format!("{:.4}", r.noise),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sample_id", DataType::Utf8, false),
        Field::new("site", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
        Field::new("height", DataType::Float64, false),
        Field::new("weight", DataType::Float64, false),
        Field::new("income", DataType::Float64, false),
        Field::new("commute", DataType::Float64, false),
        Field::new("noise", DataType::Float64, false),
    ]));

    let floats = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.sample_id.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(rows.iter().map(|r| r.site).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        floats(|r| r.height),
        floats(|r| r.weight),
        floats(|r| r.income),
        floats(|r| r.commute),
        floats(|r| r.noise),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(300, &mut rng);

    write_csv(&rows, "sample_data.csv")?;
    write_parquet(&rows, "sample_data.parquet")?;

    println!(
        "Wrote {} rows to sample_data.csv and sample_data.parquet",
        rows.len()
    );
    Ok(())
}
