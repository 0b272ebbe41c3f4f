//! Saaty nine-point judgment scale.
//!
//! Encoding direction is fixed: a ratio greater than 1 stored at `(row, col)`
//! means the row element is MORE important than the column element. A level
//! that prefers the column element encodes to the reciprocal.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Tolerance used when matching a ratio to an exact scale point.
pub const SCALE_MATCH_TOLERANCE: f64 = 1e-9;

/// Intensity of importance on the 1..9 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Intensity {
    Equal = 1,
    EqualToModerate = 2,
    Moderate = 3,
    ModerateToStrong = 4,
    Strong = 5,
    StrongToVeryStrong = 6,
    VeryStrong = 7,
    VeryStrongToExtreme = 8,
    Extreme = 9,
}

impl Intensity {
    /// All intensities in ascending order.
    pub const ALL: [Intensity; 9] = [
        Intensity::Equal,
        Intensity::EqualToModerate,
        Intensity::Moderate,
        Intensity::ModerateToStrong,
        Intensity::Strong,
        Intensity::StrongToVeryStrong,
        Intensity::VeryStrong,
        Intensity::VeryStrongToExtreme,
        Intensity::Extreme,
    ];

    /// Creates an Intensity from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        Intensity::ALL
            .get(usize::from(value).wrapping_sub(1))
            .copied()
            .ok_or_else(|| ValidationError::out_of_range("intensity", 1.0, 9.0, f64::from(value)))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Returns the fixed display label.
    ///
    /// Historical judgments are interpreted against these labels; do not reword.
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Equal => "Equal importance",
            Intensity::EqualToModerate => "Equal to moderate importance",
            Intensity::Moderate => "Moderate importance",
            Intensity::ModerateToStrong => "Moderate to strong importance",
            Intensity::Strong => "Strong importance",
            Intensity::StrongToVeryStrong => "Strong to very strong importance",
            Intensity::VeryStrong => "Very strong importance",
            Intensity::VeryStrongToExtreme => "Very strong to extreme importance",
            Intensity::Extreme => "Extreme importance",
        }
    }
}

/// Which side of the pair a judgment favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Row,
    Column,
}

/// A qualitative point on the scale: an intensity plus the favored side.
///
/// `Equal` is direction-less and always normalized to `Preference::Row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleLevel {
    intensity: Intensity,
    preferred: Preference,
}

impl ScaleLevel {
    pub fn new(intensity: Intensity, preferred: Preference) -> Self {
        let preferred = if intensity == Intensity::Equal {
            Preference::Row
        } else {
            preferred
        };
        Self {
            intensity,
            preferred,
        }
    }

    /// Row element is more important with the given intensity.
    pub fn row(intensity: Intensity) -> Self {
        Self::new(intensity, Preference::Row)
    }

    /// Column element is more important with the given intensity.
    pub fn column(intensity: Intensity) -> Self {
        Self::new(intensity, Preference::Column)
    }

    pub fn equal() -> Self {
        Self::row(Intensity::Equal)
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn preferred(&self) -> Preference {
        self.preferred
    }

    /// The same judgment read from the other side of the pair.
    pub fn swapped(&self) -> Self {
        match self.preferred {
            Preference::Row => Self::column(self.intensity),
            Preference::Column => Self::row(self.intensity),
        }
    }

    /// Human-readable label including the favored side.
    pub fn label(&self) -> String {
        match (self.intensity, self.preferred) {
            (Intensity::Equal, _) => Intensity::Equal.label().to_string(),
            (intensity, Preference::Row) => format!("{} of row over column", intensity.label()),
            (intensity, Preference::Column) => {
                format!("{} of column over row", intensity.label())
            }
        }
    }
}

impl fmt::Display for ScaleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preferred {
            Preference::Row => write!(f, "{}", self.intensity.value()),
            Preference::Column => write!(f, "1/{}", self.intensity.value()),
        }
    }
}

/// One entry of the published scale vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleEntry {
    pub level: ScaleLevel,
    pub ratio: f64,
    pub notation: String,
    pub label: String,
}

/// Codec between qualitative scale levels and numeric ratios.
pub struct SaatyScale;

impl SaatyScale {
    /// Maps a level to the ratio stored at `(row, col)`.
    pub fn encode(level: ScaleLevel) -> f64 {
        let magnitude = f64::from(level.intensity.value());
        match level.preferred {
            Preference::Row => magnitude,
            Preference::Column => 1.0 / magnitude,
        }
    }

    /// Maps a ratio back to an exact scale point.
    ///
    /// Returns `None` for intermediate values (e.g. pooled judgments); those
    /// remain valid judgments, they just have no label.
    pub fn decode(ratio: f64) -> Option<ScaleLevel> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return None;
        }
        let (magnitude, preferred) = if ratio >= 1.0 {
            (ratio, Preference::Row)
        } else {
            (1.0 / ratio, Preference::Column)
        };
        let rounded = magnitude.round();
        if (magnitude - rounded).abs() > SCALE_MATCH_TOLERANCE || !(1.0..=9.0).contains(&rounded) {
            return None;
        }
        let intensity = Intensity::try_from_u8(rounded as u8).ok()?;
        Some(ScaleLevel::new(intensity, preferred))
    }

    /// The published vocabulary: 1/9 .. 1/2, 1, 2 .. 9 in ascending ratio order.
    pub fn vocabulary() -> Vec<ScaleEntry> {
        let columns = Intensity::ALL
            .iter()
            .rev()
            .filter(|i| **i != Intensity::Equal)
            .map(|i| ScaleLevel::column(*i));
        let rows = Intensity::ALL.iter().map(|i| ScaleLevel::row(*i));

        columns
            .chain(rows)
            .map(|level| ScaleEntry {
                level,
                ratio: Self::encode(level),
                notation: level.to_string(),
                label: level.label(),
            })
            .collect()
    }
}
