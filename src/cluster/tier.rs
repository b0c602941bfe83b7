//! Cluster size tiers and their visual styles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size class of a multi-member cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterTier {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

impl ClusterTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
        }
    }
}

impl fmt::Display for ClusterTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the renderer should draw a cluster bubble of a given tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub diameter_px: f64,
    pub color: String,
}

/// One row of the tier table: clusters with at most `max_members` members
/// (and more than the previous row's bound) get `tier`. `None` is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierBand {
    pub tier: ClusterTier,
    #[serde(default)]
    pub max_members: Option<usize>,
    pub style: TierStyle,
}

/// Ordered member-count thresholds mapping clusters to tiers.
///
/// # Examples
///
/// ```
/// use geoveil::cluster::{ClusterTier, TierTable};
///
/// let table = TierTable::default();
/// assert_eq!(table.classify(1), None);
/// assert_eq!(table.classify(10), Some(ClusterTier::Small));
/// assert_eq!(table.classify(11), Some(ClusterTier::Medium));
/// assert_eq!(table.classify(101), Some(ClusterTier::ExtraLarge));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierTable {
    bands: Vec<TierBand>,
}

impl TierTable {
    pub fn new(bands: Vec<TierBand>) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    /// Tier for a cluster of `member_count` points.
    ///
    /// A single point is a plain marker and never gets a tier.
    pub fn classify(&self, member_count: usize) -> Option<ClusterTier> {
        if member_count <= 1 {
            return None;
        }

        self.bands
            .iter()
            .find(|band| band.max_members.is_none_or(|max| member_count <= max))
            .or_else(|| self.bands.last())
            .map(|band| band.tier)
    }

    pub fn style(&self, tier: ClusterTier) -> Option<&TierStyle> {
        self.bands
            .iter()
            .find(|band| band.tier == tier)
            .map(|band| &band.style)
    }

    pub fn validate(&self) -> Result<(), String> {
        let Some(last) = self.bands.last() else {
            return Err("Tier table must have at least one band".to_string());
        };

        if last.max_members.is_some() {
            return Err("Last tier band must be unbounded (no max_members)".to_string());
        }

        let mut previous = 1;
        for band in &self.bands[..self.bands.len() - 1] {
            let Some(max) = band.max_members else {
                return Err(format!(
                    "Only the last tier band may be unbounded, found {} earlier",
                    band.tier
                ));
            };
            if max <= previous {
                return Err(format!(
                    "Tier band thresholds must be strictly increasing and above 1, got {} for {}",
                    max, band.tier
                ));
            }
            previous = max;
        }

        for band in &self.bands {
            if !band.style.diameter_px.is_finite() || band.style.diameter_px <= 0.0 {
                return Err(format!(
                    "Tier {} diameter must be positive, got: {}",
                    band.tier, band.style.diameter_px
                ));
            }
        }

        Ok(())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        let band = |tier, max_members, diameter_px, color: &str| TierBand {
            tier,
            max_members,
            style: TierStyle {
                diameter_px,
                color: color.to_string(),
            },
        };

        Self::new(vec![
            band(ClusterTier::Small, Some(10), 30.0, "#4caf50"),
            band(ClusterTier::Medium, Some(50), 40.0, "#2196f3"),
            band(ClusterTier::Large, Some(100), 50.0, "#ff9800"),
            band(ClusterTier::ExtraLarge, None, 60.0, "#f44336"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let table = TierTable::default();
        assert_eq!(table.classify(0), None);
        assert_eq!(table.classify(1), None);
        assert_eq!(table.classify(2), Some(ClusterTier::Small));
        assert_eq!(table.classify(10), Some(ClusterTier::Small));
        assert_eq!(table.classify(11), Some(ClusterTier::Medium));
        assert_eq!(table.classify(50), Some(ClusterTier::Medium));
        assert_eq!(table.classify(51), Some(ClusterTier::Large));
        assert_eq!(table.classify(100), Some(ClusterTier::Large));
        assert_eq!(table.classify(101), Some(ClusterTier::ExtraLarge));
        assert_eq!(table.classify(120), Some(ClusterTier::ExtraLarge));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_each_tier_has_distinct_style() {
        let table = TierTable::default();
        let styles: Vec<_> = [
            ClusterTier::Small,
            ClusterTier::Medium,
            ClusterTier::Large,
            ClusterTier::ExtraLarge,
        ]
        .iter()
        .map(|t| table.style(*t).unwrap().clone())
        .collect();

        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a.color, b.color);
                assert_ne!(a.diameter_px, b.diameter_px);
            }
        }
    }

    #[test]
    fn test_tier_serde_names() {
        let json = serde_json::to_string(&ClusterTier::ExtraLarge).unwrap();
        assert_eq!(json, "\"extra-large\"");
        assert_eq!(ClusterTier::ExtraLarge.to_string(), "extra-large");
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        assert!(TierTable::new(vec![]).validate().is_err());

        let style = TierStyle {
            diameter_px: 30.0,
            color: "#000".to_string(),
        };
        let bounded_last = TierTable::new(vec![TierBand {
            tier: ClusterTier::Small,
            max_members: Some(10),
            style: style.clone(),
        }]);
        assert!(bounded_last.validate().is_err());

        let unordered = TierTable::new(vec![
            TierBand {
                tier: ClusterTier::Small,
                max_members: Some(50),
                style: style.clone(),
            },
            TierBand {
                tier: ClusterTier::Medium,
                max_members: Some(10),
                style: style.clone(),
            },
            TierBand {
                tier: ClusterTier::Large,
                max_members: None,
                style,
            },
        ]);
        assert!(unordered.validate().is_err());
    }
}
