//! Weather conditions and the per-station risk roll.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Lower bound of the per-station risk multiplier.
const RISK_JITTER_MIN: f32 = 0.5;
/// Upper bound of the per-station risk multiplier.
const RISK_JITTER_MAX: f32 = 1.0;

/// A weather condition with a fixed base risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherKind {
    Normal,
    HeavyRain,
    Wildfire,
    Lightning,
    Typhoon,
    Snow,
}

impl WeatherKind {
    /// Every condition, in selection order.
    pub const ALL: [WeatherKind; 6] = [
        WeatherKind::Normal,
        WeatherKind::HeavyRain,
        WeatherKind::Wildfire,
        WeatherKind::Lightning,
        WeatherKind::Typhoon,
        WeatherKind::Snow,
    ];

    /// Base risk score in `[0, 5]`.
    pub fn risk_score(self) -> f32 {
        match self {
            WeatherKind::Normal => 0.0,
            WeatherKind::HeavyRain => 3.0,
            WeatherKind::Wildfire => 5.0,
            WeatherKind::Lightning => 4.0,
            WeatherKind::Typhoon => 5.0,
            WeatherKind::Snow => 3.0,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            WeatherKind::Normal => "normal",
            WeatherKind::HeavyRain => "heavy rain",
            WeatherKind::Wildfire => "wildfire",
            WeatherKind::Lightning => "lightning",
            WeatherKind::Typhoon => "typhoon",
            WeatherKind::Snow => "heavy snow",
        }
    }

    /// Returns `true` for anything other than normal conditions.
    pub fn is_severe(self) -> bool {
        self != WeatherKind::Normal
    }
}

/// Picks the next condition uniformly from the full set.
///
/// Memoryless by design: re-selecting the current condition is allowed.
pub fn pick_next(rng: &mut StdRng) -> WeatherKind {
    WeatherKind::ALL[rng.random_range(0..WeatherKind::ALL.len())]
}

/// Rolls the effective risk a station experiences under `kind`.
///
/// `risk_score * uniform(0.5, 1.0)`, so the result stays in `[0, 5]`.
pub fn effective_risk(kind: WeatherKind, rng: &mut StdRng) -> f32 {
    kind.risk_score() * rng.random_range(RISK_JITTER_MIN..RISK_JITTER_MAX)
}
