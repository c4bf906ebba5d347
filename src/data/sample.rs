//! Built-in sample cohort.
//!
//! Generates a small, repeatable set of athlete records so the dashboard
//! works out of the box without any external file. The same `(count, seed)`
//! pair always produces byte-identical records.

use chrono::NaiveDate;

use crate::data::model::{AthleteRecord, Gender};

/// Records produced when no count is given.
pub const DEFAULT_COUNT: usize = 20;
/// Seed used by the default sample source.
pub const DEFAULT_SEED: u64 = 42;

const SPORTS: [&str; 10] = [
    "Sprinting",
    "Long Jump",
    "High Jump",
    "Shot Put",
    "Javelin",
    "Discus",
    "Swimming",
    "Cycling",
    "Gymnastics",
    "Wrestling",
];

const STATES: [&str; 20] = [
    "Kerala",
    "Kerala",
    "Kerala",
    "Kerala",
    "Kerala",
    "Karnataka",
    "Maharashtra",
    "Tamil Nadu",
    "Punjab",
    "Uttar Pradesh",
    "Bihar",
    "Rajasthan",
    "Goa",
    "Delhi",
    "Haryana",
    "Gujarat",
    "Madhya Pradesh",
    "Odisha",
    "Assam",
    "West Bengal",
];

const SAMPLE_VIDEO: &str =
    "https://sample-videos.com/video123/mp4/240/big_buck_bunny_240p_1mb.mp4";

// ---------------------------------------------------------------------------
// Deterministic PRNG
// ---------------------------------------------------------------------------

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

    /// Uniform integer in `lo..=hi`.
    fn next_in(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_u64() % u64::from(hi - lo + 1)) as u32
    }

    /// Uniform float in `lo..hi`.
    fn next_f64_in(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Generate `count` sample athletes from `seed`.
///
/// Ids run `A001`, `A002`, ... with sports assigned round-robin and states
/// cycling through a fixed list weighted towards Kerala. Scores are whole
/// numbers in 60..=95, ages in 14..=30, assessments dated across
/// July-September 2025. The first half of the cohort carries a demo video
/// link, the rest leave `video_url` empty.
pub fn generate(count: usize, seed: u64) -> Vec<AthleteRecord> {
    let mut rng = SimpleRng::new(seed);
    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let age = rng.next_in(14, 30) as u8;
        let gender = if rng.next_in(0, 1) == 0 {
            Gender::Male
        } else {
            Gender::Female
        };
        let score = f64::from(rng.next_in(60, 95));
        let lat = round4(rng.next_f64_in(8.5, 30.9));
        let lon = round4(rng.next_f64_in(75.0, 80.5));
        let month = rng.next_in(7, 9);
        let day = rng.next_in(10, 20);
        let verified = rng.next_in(0, 1) == 1;

        let photo_url = if i % 2 == 0 {
            format!("https://randomuser.me/api/portraits/men/{i}.jpg")
        } else {
            format!("https://randomuser.me/api/portraits/women/{i}.jpg")
        };
        let video_url = if i < count / 2 {
            SAMPLE_VIDEO.to_string()
        } else {
            String::new()
        };

        records.push(AthleteRecord {
            athlete_id: format!("A{:03}", i + 1),
            name: format!("Athlete_{}", i + 1),
            age,
            gender,
            sport: SPORTS[i % SPORTS.len()].to_string(),
            state: STATES[i % STATES.len()].to_string(),
            score,
            lat: Some(lat),
            lon: Some(lon),
            date: NaiveDate::from_ymd_opt(2025, month, day).unwrap_or_default(),
            verified,
            video_url,
            photo_url,
        });
    }

    records
}
