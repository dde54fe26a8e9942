//! # Traversal Engine
//!
//! Two searches over a [`PadTopology`]:
//!
//! - [`TraversalEngine::emanate`]: level-order BFS, one stage per hop.
//!   No revisits, no bouncing off dead ends.
//! - [`TraversalEngine::shortest_path`]: Dijkstra from origin to destination.
//!   Equal-cost ties go to whichever frontier entry was discovered first.
//!
//! Both searches are pure over the shared, immutable topology.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::model::{PathList, Region, RegionSet, StageList};
use crate::topology::PadTopology;
use crate::{Error, Result};

/// Which end of a traversal a region set was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRole {
    Origin,
    Destination,
}

impl std::fmt::Display for RegionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin => f.write_str("origin"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Narrow a region set to the single pad a traversal needs.
///
/// A lone bit that names no pad is an unknown region, not a usage error:
/// it yields `Ok(None)` so the caller can return an empty result.
pub fn require_single(set: RegionSet, role: RegionRole) -> Result<Option<Region>> {
    if !set.is_single() {
        tracing::error!(
            %role,
            areas = set.count(),
            "invalid region set: traversals only support a single pad"
        );
        return Err(Error::InvalidRegionSet { role, count: set.count() });
    }
    let region = set.single();
    if region.is_none() {
        tracing::warn!(%role, mask = set.0, "region bit names no pad");
    }
    Ok(region)
}

/// Breadth-first and shortest-path searches over a shared topology.
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    topology: Arc<PadTopology>,
}

impl TraversalEngine {
    pub fn new(topology: Arc<PadTopology>) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> &Arc<PadTopology> {
        &self.topology
    }

    /// Stages radiating out of `origin`, at most `depth` hops deep.
    ///
    /// Negative depth is clamped to 0 (origin only) with a warning.
    /// An origin missing from the topology yields an empty list.
    pub fn emanate(&self, origin: RegionSet, depth: i32) -> Result<StageList> {
        let origin = require_single(origin, RegionRole::Origin)?;
        let depth = clamp_depth(depth);
        Ok(origin.map_or_else(StageList::new, |origin| self.stages_from(origin, depth)))
    }

    /// Level-order BFS partitioned by hop count.
    pub fn stages_from(&self, origin: Region, depth: usize) -> StageList {
        if let Err(err) = self.topology.node_for(origin) {
            tracing::warn!(%origin, %err, "emanation origin not in topology");
            return StageList::new();
        }

        let mut visited = origin.as_set();
        let mut stages = vec![vec![origin]];

        while stages.len() <= depth {
            let mut next = Vec::new();
            for &region in stages.last().into_iter().flatten() {
                let Ok(node) = self.topology.node_for(region) else { continue };
                for neighbor in &node.neighbors {
                    if !visited.contains(neighbor.region) {
                        visited |= neighbor.region;
                        next.push(neighbor.region);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            stages.push(next);
        }

        tracing::trace!(%origin, depth, stages = stages.len(), "emanation stages computed");
        StageList { stages }
    }

    /// Minimum-cost path from `origin` to `destination`, both inclusive.
    ///
    /// Disconnected or unknown pads yield an empty path, not an error.
    pub fn shortest_path(&self, origin: RegionSet, destination: RegionSet) -> Result<PathList> {
        let origin = require_single(origin, RegionRole::Origin)?;
        let destination = require_single(destination, RegionRole::Destination)?;
        match (origin, destination) {
            (Some(origin), Some(destination)) => Ok(self.path_between(origin, destination)),
            _ => Ok(PathList::new()),
        }
    }

    /// Dijkstra over the topology's edge weights.
    pub fn path_between(&self, origin: Region, destination: Region) -> PathList {
        for region in [origin, destination] {
            if let Err(err) = self.topology.node_for(region) {
                tracing::warn!(%region, %err, "traversal endpoint not in topology");
                return PathList::new();
            }
        }

        let mut dist: HashMap<Region, f64> = HashMap::new();
        let mut prev: HashMap<Region, Region> = HashMap::new();
        let mut settled: HashSet<Region> = HashSet::new();
        let mut frontier = BinaryHeap::new();
        let mut discovered = 0u64;

        dist.insert(origin, 0.0);
        frontier.push(Frontier { cost: 0.0, order: discovered, region: origin });

        while let Some(Frontier { cost, region, .. }) = frontier.pop() {
            if !settled.insert(region) {
                continue;
            }
            if region == destination {
                break;
            }
            let Ok(node) = self.topology.node_for(region) else { continue };
            for neighbor in &node.neighbors {
                if settled.contains(&neighbor.region) {
                    continue;
                }
                let candidate = cost + neighbor.weight;
                let better = dist
                    .get(&neighbor.region)
                    .is_none_or(|&known| candidate < known);
                if better {
                    dist.insert(neighbor.region, candidate);
                    prev.insert(neighbor.region, region);
                    discovered += 1;
                    frontier.push(Frontier { cost: candidate, order: discovered, region: neighbor.region });
                }
            }
        }

        if !settled.contains(&destination) {
            tracing::debug!(%origin, %destination, "no path between pads");
            return PathList::new();
        }

        let mut regions = vec![destination];
        let mut cursor = destination;
        while let Some(&step) = prev.get(&cursor) {
            regions.push(step);
            cursor = step;
        }
        regions.reverse();
        PathList { regions }
    }
}

fn clamp_depth(depth: i32) -> usize {
    if depth < 0 {
        tracing::warn!(depth, "negative emanation depth clamped to 0");
    }
    depth.max(0) as usize
}

/// Min-heap entry: lowest cost first, then earliest discovery.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    order: u64,
    region: Region,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}
