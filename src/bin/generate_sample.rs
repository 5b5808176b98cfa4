use std::f64::consts::PI;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One CSV line of the synthetic sensor log.
#[derive(Serialize)]
struct Reading {
    timestamp: String,
    water_level: f64,
    humidity: f64,
    temperature: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct Xoshiro {
    state: [u64; 4],
}

impl Xoshiro {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        Xoshiro { state: s }
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
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

/// Round to two decimals so the CSV stays readable.
fn cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn reading(at: NaiveDateTime, hour: usize, surge: f64, rng: &mut Xoshiro) -> Reading {
    // Daily cycle peaks mid-afternoon; the month-long swell models the wet season.
    let daily = (2.0 * PI * (hour % 24) as f64 / 24.0 - PI / 2.0).sin();
    let seasonal = (2.0 * PI * hour as f64 / (24.0 * 30.0)).sin();

    Reading {
        timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
        water_level: cents((8.0 + 3.0 * seasonal + surge + rng.gauss(0.0, 0.15)).max(0.0)),
        humidity: cents((78.0 - 12.0 * daily + rng.gauss(0.0, 2.0)).clamp(0.0, 100.0)),
        temperature: cents(27.0 + 4.0 * daily + rng.gauss(0.0, 0.5)),
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "waterlevel.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse()?,
        None => 24 * 30,
    };

    let mut rng = Xoshiro::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| anyhow::anyhow!("invalid start date"))?;

    let mut writer = csv::Writer::from_path(&output_path)?;
    let mut surge = 0.0;
    for hour in 0..rows {
        // Occasional storm pulse that drains off over the next day or so.
        if rng.next_f64() < 0.01 {
            surge += rng.gauss(3.0, 1.0).max(0.5);
        }
        surge *= 0.95;

        let at = start + Duration::hours(hour as i64);
        writer.serialize(reading(at, hour, surge, &mut rng))?;
    }
    writer.flush()?;

    println!("Wrote {rows} hourly readings to {output_path}");
    Ok(())
}
