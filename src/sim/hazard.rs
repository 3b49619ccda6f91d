//! Hazard proximity warning
//!
//! While a minigame panel is open the frame around it turns red when the big
//! fish gets close to the actor.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Binary warning shown on the minigame frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Indicator {
    #[default]
    Normal,
    Alert,
}

#[derive(Debug, Clone, Copy)]
pub struct HazardMonitor {
    pub danger_distance: f32,
}

impl HazardMonitor {
    pub fn new(danger_distance: f32) -> Self {
        Self { danger_distance }
    }

    /// Sample the warning for one owner.
    ///
    /// Returns `None` while the owning session is inactive so it cannot hold
    /// the indicator. A missing hazard entity reads as `Normal`.
    pub fn sample(&self, active: bool, actor: Vec2, hazard: Option<Vec2>) -> Option<Indicator> {
        if !active {
            return None;
        }
        let Some(hazard) = hazard else {
            return Some(Indicator::Normal);
        };
        if actor.distance(hazard) <= self.danger_distance {
            Some(Indicator::Alert)
        } else {
            Some(Indicator::Normal)
        }
    }
}

/// Combine samples from every owner; no active owner means `Normal`
pub fn resolve_indicator(samples: impl IntoIterator<Item = Option<Indicator>>) -> Indicator {
    samples.into_iter().flatten().max().unwrap_or_default()
}
