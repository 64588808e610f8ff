use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Standard-atmosphere height (m) of a pressure level (hPa).
fn pressure_to_height(p: f64) -> f64 {
    44330.0 * (1.0 - (p / 1013.25).powf(0.1903))
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

/// One radiosonde sample. `None` marks a missing reading.
struct Level {
    time: String,
    pressure: Option<f64>,
    temperature: Option<f64>,
    dew_point: Option<f64>,
    altitude: Option<f64>,
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let surface_t = 30.0;
    let lapse_rate = 6.5 / 1000.0;
    let tropopause_t = -56.0;

    let mut levels: Vec<Level> = Vec::new();
    let mut p = 1005.0;
    let mut second = 0;
    while p >= 200.0 {
        let z = pressure_to_height(p);
        let t = (surface_t - lapse_rate * z).max(tropopause_t) + rng.gauss(0.0, 0.3);
        // Moist boundary layer, drying aloft.
        let spread = 4.0 + 0.003 * z + rng.gauss(0.0, 0.5).abs();

        levels.push(Level {
            time: format!("{:02}:{:02}", second / 60, second % 60),
            pressure: Some(p),
            temperature: Some(t),
            dew_point: Some(t - spread),
            altitude: Some(z),
        });

        p -= 15.0 + rng.next_f64() * 10.0;
        second += 30;
    }

    // A few dropouts, as real sonde files have.
    for idx in [3, 11, 19] {
        if let Some(level) = levels.get_mut(idx) {
            level.dew_point = None;
        }
    }
    if let Some(level) = levels.get_mut(7) {
        level.temperature = None;
    }

    // Write CSV (non-numeric marker for the dropped temperature)
    let csv_path = "sample_sounding.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["Time", "Derived Pressure", "Temperature", "Dew Point", "Altitude"])
        .expect("Failed to write CSV header");
    for level in &levels {
        let temperature = level
            .temperature
            .map(|t| format!("{t:.1}"))
            .unwrap_or_else(|| "--".to_string());
        writer
            .write_record([
                level.time.clone(),
                fmt_opt(level.pressure),
                temperature,
                fmt_opt(level.dew_point),
                fmt_opt(level.altitude),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // Build Arrow arrays
    let time_array = StringArray::from(levels.iter().map(|l| l.time.as_str()).collect::<Vec<_>>());
    let float_column = |get: fn(&Level) -> Option<f64>| {
        Float64Array::from(levels.iter().map(get).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Time", DataType::Utf8, false),
        Field::new("Derived Pressure", DataType::Float64, true),
        Field::new("Temperature", DataType::Float64, true),
        Field::new("Dew Point", DataType::Float64, true),
        Field::new("Altitude", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(time_array),
            Arc::new(float_column(|l| l.pressure)),
            Arc::new(float_column(|l| l.temperature)),
            Arc::new(float_column(|l| l.dew_point)),
            Arc::new(float_column(|l| l.altitude)),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let parquet_path = "sample_sounding.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} levels ({:.0}–{:.0} hPa) to {csv_path} and {parquet_path}",
        levels.len(),
        levels.first().and_then(|l| l.pressure).unwrap_or_default(),
        levels.last().and_then(|l| l.pressure).unwrap_or_default()
    );
}
