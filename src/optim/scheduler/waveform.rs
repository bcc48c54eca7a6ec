//! Waveform shapes for cyclical schedules
//!
//! A waveform maps cycle progress `p` in `[0, 1)` to a value between a start
//! and an end value. It holds no state of its own.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Shape of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    /// Triangle: `start` at p=0, `end` at p=0.5, back toward `start` as p->1
    ///
    /// Formula: `end + (start - end) * |p - 0.5| * 2`
    Linear,
    /// Half cosine from `start` (p=0) toward `end` (p->1), no return
    ///
    /// Formula: `start + (end - start) / 2 * (1 - cos(pi * p))`
    CosineAnnealing,
    /// Full cosine period: `start` -> `end` (p=0.5) -> `start`
    ///
    /// Formula: `start + (end - start) / 2 * (1 - cos(2 * pi * p))`
    Cosine,
}

impl Waveform {
    /// All shapes
    pub const ALL: [Waveform; 3] = [Waveform::Linear, Waveform::CosineAnnealing, Waveform::Cosine];

    /// Value at `progress` for a cycle running from `start` to `end`
    pub fn compute(&self, progress: f64, start: f64, end: f64) -> f64 {
        match self {
            Waveform::Linear => end + (start - end) * (progress - 0.5).abs() * 2.0,
            Waveform::CosineAnnealing => {
                start + ((end - start) / 2.0) * (1.0 - (PI * progress).cos())
            }
            Waveform::Cosine => start + ((end - start) / 2.0) * (1.0 - (2.0 * PI * progress).cos()),
        }
    }

    /// Manifest name of the shape
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Linear => "linear",
            Waveform::CosineAnnealing => "cosine_annealing",
            Waveform::Cosine => "cosine",
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
