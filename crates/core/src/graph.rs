//! Undirected room connectivity: triangulation edges, the spanning tree,
//! and the extra links layered back on top of it.

use std::collections::{BTreeMap, BTreeSet};
use std::mem;

use crate::error::GenerationError;
use crate::room::{RoomArena, center_distance};
use crate::seed::GenRng;
use crate::triangulate::Triad;
use crate::types::RoomId;

/// Adjacency lists keyed by room. Symmetric by construction: every edge is
/// recorded on both endpoints, duplicates and self-loops are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomGraph {
    adjacency: BTreeMap<RoomId, Vec<RoomId>>,
}

impl RoomGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full link graph from a triangulation. Every room becomes a
    /// node even if no triad touches it; a lone pair of rooms, which cannot
    /// triangulate, is linked directly.
    pub(crate) fn from_triangulation(
        point_ids: &[RoomId],
        triads: &[Triad],
    ) -> Result<Self, GenerationError> {
        let mut graph = Self::new();
        for &id in point_ids {
            graph.add_node(id);
        }
        for (triad_index, triad) in triads.iter().enumerate() {
            let corners = triad.corners();
            let distinct =
                corners[0] != corners[1] && corners[1] != corners[2] && corners[0] != corners[2];
            if !distinct || corners.iter().any(|&corner| corner >= point_ids.len()) {
                return Err(GenerationError::InvalidTriangulation {
                    triad_index,
                    corners,
                    point_count: point_ids.len(),
                });
            }
            graph.add_connection(point_ids[corners[0]], point_ids[corners[1]]);
            graph.add_connection(point_ids[corners[1]], point_ids[corners[2]]);
            graph.add_connection(point_ids[corners[2]], point_ids[corners[0]]);
        }
        if triads.is_empty() && point_ids.len() == 2 {
            graph.add_connection(point_ids[0], point_ids[1]);
        }
        Ok(graph)
    }

    pub fn add_node(&mut self, id: RoomId) {
        self.adjacency.entry(id).or_default();
    }

    pub fn add_connection(&mut self, a: RoomId, b: RoomId) {
        if a == b {
            return;
        }
        self.add_node(b);
        let forward = self.adjacency.entry(a).or_default();
        if forward.contains(&b) {
            return;
        }
        forward.push(b);
        self.adjacency.entry(b).or_default().push(a);
    }

    pub fn contains_connection(&self, a: RoomId, b: RoomId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn neighbors(&self, id: RoomId) -> &[RoomId] {
        self.adjacency.get(&id).map_or(&[], Vec::as_slice)
    }

    pub fn nodes(&self) -> impl Iterator<Item = RoomId> {
        self.adjacency.keys().copied()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }

    /// A uniform node draw followed by a uniform neighbor draw. Rooms with
    /// more links come up more often, which is the intended bias for extra
    /// links: well-connected hubs grow loops first.
    pub(crate) fn random_connection(&self, rng: &mut GenRng) -> Option<(RoomId, RoomId)> {
        if self.adjacency.is_empty() {
            return None;
        }
        let (&node, neighbors) = self
            .adjacency
            .iter()
            .nth(rng.index(self.adjacency.len()))?;
        if neighbors.is_empty() {
            return None;
        }
        Some((node, neighbors[rng.index(neighbors.len())]))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TreeStep {
    /// One room was absorbed into the tree.
    Grew,
    /// Every room is in the tree.
    Complete,
}

/// Stepwise Prim growth over the full graph, weighted by truncated Manhattan
/// center distance. Scanning discovered rooms in discovery order with a
/// strict minimum keeps tie-breaks stable across runs.
#[derive(Clone, Debug)]
pub(crate) struct SpanningTreeBuilder {
    discovered: Vec<RoomId>,
    undiscovered: BTreeSet<RoomId>,
    tree: RoomGraph,
}

impl SpanningTreeBuilder {
    /// Seed the tree with the first node of the full graph.
    pub(crate) fn new(full: &RoomGraph) -> Self {
        let mut discovered = Vec::new();
        let mut undiscovered: BTreeSet<RoomId> = full.nodes().collect();
        let mut tree = RoomGraph::new();
        if let Some(first) = full.nodes().next() {
            undiscovered.remove(&first);
            discovered.push(first);
            tree.add_node(first);
        }
        Self {
            discovered,
            undiscovered,
            tree,
        }
    }

    /// Accept the next tree edge: the shortest crossing from a discovered
    /// room to an undiscovered one, first found winning ties.
    pub(crate) fn step(
        &mut self,
        full: &RoomGraph,
        arena: &RoomArena,
    ) -> Result<TreeStep, GenerationError> {
        if self.undiscovered.is_empty() {
            return Ok(TreeStep::Complete);
        }

        let mut best: Option<(i32, RoomId, RoomId)> = None;
        for &from in &self.discovered {
            for &to in full.neighbors(from) {
                if !self.undiscovered.contains(&to) {
                    continue;
                }
                let distance = center_distance(&arena[from], &arena[to]);
                if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                    best = Some((distance, from, to));
                }
            }
        }

        let Some((_, from, to)) = best else {
            return Err(GenerationError::DisconnectedLayout {
                connected: self.discovered.len(),
                total: self.discovered.len() + self.undiscovered.len(),
            });
        };
        self.tree.add_connection(from, to);
        self.undiscovered.remove(&to);
        self.discovered.push(to);
        Ok(TreeStep::Grew)
    }

    pub(crate) fn take_tree(&mut self) -> RoomGraph {
        mem::take(&mut self.tree)
    }
}

/// Convenience wrapper that drives [`SpanningTreeBuilder`] to completion.
pub fn minimum_spanning_tree(
    full: &RoomGraph,
    arena: &RoomArena,
) -> Result<RoomGraph, GenerationError> {
    let mut builder = SpanningTreeBuilder::new(full);
    while builder.step(full, arena)? == TreeStep::Grew {}
    Ok(builder.take_tree())
}

/// Give up on a single extra link after this many rejected samples.
pub(crate) const MAX_LINK_SAMPLE_ATTEMPTS: u32 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AugmentStep {
    /// One extra link was added.
    Added,
    /// The graph is dense enough; augmentation is over.
    Complete,
}

/// Puts a sampled fraction of the edges the spanning tree dropped back into
/// the graph, one per step. The stop fraction is redrawn before every link,
/// so the final density wanders inside the configured band.
#[derive(Clone, Debug)]
pub(crate) struct LinkAugmenter {
    candidates: usize,
    added: u32,
    min_fraction: f32,
    max_fraction: f32,
}

impl LinkAugmenter {
    pub(crate) fn new(
        full: &RoomGraph,
        tree: &RoomGraph,
        min_fraction: f32,
        max_fraction: f32,
    ) -> Self {
        Self {
            candidates: full.edge_count().saturating_sub(tree.edge_count()),
            added: 0,
            min_fraction,
            max_fraction,
        }
    }

    pub(crate) fn step(
        &mut self,
        full: &RoomGraph,
        tree: &mut RoomGraph,
        rng: &mut GenRng,
    ) -> Result<AugmentStep, GenerationError> {
        let fraction = rng.fraction(self.min_fraction, self.max_fraction);
        let target = (self.candidates as f32 * fraction).ceil() as u32;
        if self.added >= target {
            return Ok(AugmentStep::Complete);
        }

        let mut attempts = 0;
        loop {
            attempts += 1;
            if attempts > MAX_LINK_SAMPLE_ATTEMPTS {
                return Err(GenerationError::LinkSamplingExhausted {
                    attempts: attempts - 1,
                });
            }
            let Some((a, b)) = full.random_connection(rng) else {
                continue;
            };
            if tree.contains_connection(a, b) {
                continue;
            }
            tree.add_connection(a, b);
            self.added += 1;
            return Ok(AugmentStep::Added);
        }
    }
}
