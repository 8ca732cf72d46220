//! Derived statistics: damage output, hit points and skill training time.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::attributes::{names, ProjectedAttributes};
use crate::classify::{is_ship, is_weapon};
use crate::error::{Error, Result};
use crate::model::Item;

/// Skill points required per level at an experience multiplier of 1000.
pub const SKILL_POINT_THRESHOLDS: [u64; 5] = [250, 1415, 8000, 45255, 256000];

/// Training rate (skill points per minute) used when none is configured.
pub const DEFAULT_TRAINING_RATE: f64 = 30.0;

/// Training rates offered for quick selection.
pub const TRAINING_RATE_PRESETS: [f64; 5] = [30.0, 60.0, 65.0, 70.0, 75.0];

/// Damage per second of a weapon.
///
/// Returns `None` unless the attributes classify as a weapon with a positive
/// cycle duration. Absent damage types count as zero.
pub fn dps(attrs: &ProjectedAttributes<'_>) -> Option<f64> {
    if !is_weapon(attrs) {
        return None;
    }
    let duration_ms = attrs.value(names::DURATION).filter(|ms| *ms > 0.0)?;
    let multiplier = attrs.value(names::DAMAGE_MULTIPLIER)?;
    Some(raw_damage(attrs) * multiplier / (duration_ms / 1000.0))
}

/// Sum of the four raw damage types.
pub fn raw_damage(attrs: &ProjectedAttributes<'_>) -> f64 {
    [
        names::EM_DAMAGE,
        names::KINETIC_DAMAGE,
        names::EXPLOSIVE_DAMAGE,
        names::THERMAL_DAMAGE,
    ]
    .iter()
    .map(|name| attrs.value_or_zero(name))
    .sum()
}

/// Per-volley damage of one type, scaled by the damage multiplier.
pub fn scaled_damage(attrs: &ProjectedAttributes<'_>, damage_type: &str) -> Option<f64> {
    let multiplier = attrs.value(names::DAMAGE_MULTIPLIER)?;
    Some(attrs.value_or_zero(damage_type) * multiplier)
}

/// Nominal effective hit points: shield + armor + structure, no resists.
pub fn effective_hp(attrs: &ProjectedAttributes<'_>) -> Option<f64> {
    if !is_ship(attrs) {
        return None;
    }
    Some(
        attrs.value_or_zero(names::SHIELD_CAPACITY)
            + attrs.value_or_zero(names::ARMOR_HP)
            + attrs.value_or_zero(names::STRUCTURE_HP),
    )
}

/// Resistance percentage from a damage resonance (`1.0` means no resistance).
pub fn resistance_percent(resonance: f64) -> f64 {
    (1.0 - resonance) * 100.0
}

/// Missile flight range in kilometres: velocity (m/s) times flight time (ms).
pub fn missile_range_km(attrs: &ProjectedAttributes<'_>) -> Option<f64> {
    let velocity = attrs.value(names::MAX_VELOCITY).filter(|v| *v != 0.0)?;
    let delay_ms = attrs.value(names::EXPLOSION_DELAY)?;
    Some(velocity * delay_ms / 1_000_000.0)
}

/// A duration in whole seconds, rendered as `D:HH:MM:SS` with unpadded days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timespan(pub u64);

impl Timespan {
    pub fn seconds(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0;
        let days = total / 86_400;
        let hours = (total % 86_400) / 3_600;
        let minutes = (total % 3_600) / 60;
        let seconds = total % 60;
        write!(f, "{days}:{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl Serialize for Timespan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validated training rate in skill points per minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrainingRate(f64);

impl TrainingRate {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidTrainingRate { rate });
        }
        Ok(Self(rate))
    }

    pub fn per_minute(self) -> f64 {
        self.0
    }
}

impl Default for TrainingRate {
    fn default() -> Self {
        Self(DEFAULT_TRAINING_RATE)
    }
}

/// Skill points and training time for one skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillLevelCost {
    /// Level number, 1 through 5.
    pub level: u8,
    pub skill_points: u64,
    pub duration: Timespan,
}

/// Skill points and training time for each level not already granted.
///
/// Levels whose zero-based index is below the item's initial level are
/// omitted. Items without an experience multiplier yield nothing.
pub fn training_schedule(item: &Item, rate: TrainingRate) -> Vec<SkillLevelCost> {
    let Some(exp) = item.exp else {
        return Vec::new();
    };
    let initial = item.init_lv.unwrap_or(0);

    SKILL_POINT_THRESHOLDS
        .iter()
        .enumerate()
        .filter(|(index, _)| (*index as i64) >= initial)
        .map(|(index, threshold)| {
            let skill_points = (exp * *threshold as f64 / 1000.0).round().max(0.0) as u64;
            let seconds = (skill_points as f64 * 60.0 / rate.per_minute()).round() as u64;
            SkillLevelCost {
                level: index as u8 + 1,
                skill_points,
                duration: Timespan(seconds),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_duration_with_unpadded_days() {
        assert_eq!(Timespan(500).to_string(), "0:00:08:20");
        assert_eq!(Timespan(0).to_string(), "0:00:00:00");
        assert_eq!(Timespan(86_400 * 12 + 3_661).to_string(), "12:01:01:01");
    }

    #[test]
    fn rejects_non_positive_rates() {
        assert!(TrainingRate::new(0.0).is_err());
        assert!(TrainingRate::new(-5.0).is_err());
        assert!(TrainingRate::new(f64::NAN).is_err());
        assert_eq!(TrainingRate::new(60.0).expect("valid").per_minute(), 60.0);
    }

    #[test]
    fn resistance_from_resonance() {
        assert_eq!(resistance_percent(1.0), 0.0);
        assert!((resistance_percent(0.75) - 25.0).abs() < 1e-9);
    }
}
