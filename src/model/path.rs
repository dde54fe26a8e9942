//! Traversal results: staged emanation rings and point-to-point paths.

use serde::{Deserialize, Serialize};

use super::{Region, RegionSet};

/// Emanation result: stage `k` holds every pad exactly `k` hops from the origin.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageList {
    /// Stages in ascending hop distance. Members keep search insertion order.
    pub stages: Vec<Vec<Region>>,
}

impl StageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stages (including the origin stage).
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Union of each stage, in stage order.
    pub fn to_steps(&self) -> Vec<RegionSet> {
        self.stages
            .iter()
            .map(|stage| stage.iter().copied().collect())
            .collect()
    }

    /// Every pad reached, across all stages.
    pub fn reached(&self) -> RegionSet {
        self.stages.iter().flatten().copied().collect()
    }
}

/// Traversal result: origin to destination inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathList {
    pub regions: Vec<Region>,
}

impl PathList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pads on the path (not hops).
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn start(&self) -> Option<Region> {
        self.regions.first().copied()
    }

    pub fn end(&self) -> Option<Region> {
        self.regions.last().copied()
    }

    /// One single-pad step per path entry.
    pub fn to_steps(&self) -> Vec<RegionSet> {
        self.regions.iter().map(|r| r.as_set()).collect()
    }
}
