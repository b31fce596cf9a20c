//! Rooted tree of hyperranges built by repeated [`Divider::divide`].
//!
//! Follows the children-preserving construction: every internal node keeps
//! its full child list, so `descend`/`brc`/`src`/`urc` can walk down from
//! the root rather than needing to reconstruct it on every query.

use std::collections::{HashMap, HashSet};

use ers_types::{HyperRange, Point};

use crate::divider::Divider;
use crate::error::CoverError;

struct Node {
    range: HyperRange,
    height: usize,
    children: Vec<Node>,
}

/// A rooted, immutable tree of [`HyperRange`]s: the root is the full
/// domain, leaves are unit ranges (or, for the data-dependent divider,
/// wherever the dataset ran out of density), and every internal node's
/// children are produced by one [`Divider::divide`] call.
pub struct RangeCoverTree {
    root: Node,
    height_index: HashMap<HyperRange, usize>,
}

impl RangeCoverTree {
    pub fn build(domain: HyperRange, divider: &Divider) -> Result<Self, CoverError> {
        let root = build_node(domain, divider)?;
        let mut height_index = HashMap::new();
        index_heights(&root, &mut height_index);
        Ok(Self { root, height_index })
    }

    pub fn domain(&self) -> &HyperRange {
        &self.root.range
    }

    pub fn height(&self) -> usize {
        self.root.height
    }

    fn height_of(&self, range: &HyperRange) -> usize {
        *self
            .height_index
            .get(range)
            .expect("range was produced by this tree")
    }

    /// The insertion cover: every node from the root down to the leaf
    /// containing `point`, root first.
    pub fn descend(&self, point: &Point) -> Vec<HyperRange> {
        let mut path = Vec::new();
        let mut node = &self.root;
        loop {
            path.push(node.range.clone());
            match node.children.iter().find(|c| c.range.contains_point(point)) {
                Some(child) => node = child,
                None => break,
            }
        }
        path
    }

    /// Range cover: the exact minimal set of nodes whose union is
    /// `query ∩ domain`, each fully contained in `query`, tagged with its
    /// own height in the tree.
    pub fn rc(&self, query: &HyperRange) -> Vec<(usize, HyperRange)> {
        let mut out = Vec::new();
        rc_rec(&self.root, query, &mut out);
        out
    }

    /// Best range cover: [`RangeCoverTree::rc`] with the heights stripped.
    pub fn brc(&self, query: &HyperRange) -> Vec<HyperRange> {
        self.rc(query).into_iter().map(|(_, r)| r).collect()
    }

    /// Single range cover: the smallest node fully containing `query` —
    /// descends while a child still fully contains it, stops at the
    /// deepest node that does. May over-cover the query. `None` if `query`
    /// is not a subset of the tree's domain.
    pub fn src(&self, query: &HyperRange) -> Option<HyperRange> {
        if !self.root.range.contains_range(query) {
            return None;
        }
        let mut node = &self.root;
        loop {
            match node
                .children
                .iter()
                .find(|c| c.range.contains_range(query))
            {
                Some(child) => node = child,
                None => return Some(node.range.clone()),
            }
        }
    }

    /// Uniform range cover: the BRC of `query`, padded with the
    /// descendants of its first node so that every height in
    /// `[0, max_height_seen]` appears at least once.
    pub fn urc(&self, query: &HyperRange) -> Vec<HyperRange> {
        let rc = self.rc(query);
        let Some(max_height) = rc.iter().map(|(h, _)| *h).max() else {
            return Vec::new();
        };
        let mut present: HashSet<usize> = rc.iter().map(|(h, _)| *h).collect();
        let mut result: Vec<HyperRange> = rc.into_iter().map(|(_, r)| r).collect();

        let anchor = result[0].start().clone();
        let path = self.descend(&anchor);
        for range in path {
            let h = self.height_of(&range);
            if h <= max_height && !present.contains(&h) {
                present.insert(h);
                result.push(range);
            }
        }
        result
    }
}

fn build_node(range: HyperRange, divider: &Divider) -> Result<Node, CoverError> {
    if range.volume() == 1 {
        return Ok(Node { range, height: 0, children: Vec::new() });
    }
    let children_ranges = divider.divide(&range)?;
    if children_ranges.len() == 1 && children_ranges[0] == range {
        log::debug!("range-cover tree terminating early at a non-unit leaf (no further split available)");
        return Ok(Node { range, height: 0, children: Vec::new() });
    }
    let mut children = Vec::with_capacity(children_ranges.len());
    for child_range in children_ranges {
        children.push(build_node(child_range, divider)?);
    }
    let height = 1 + children.iter().map(|c| c.height).max().unwrap_or(0);
    Ok(Node { range, height, children })
}

fn index_heights(node: &Node, index: &mut HashMap<HyperRange, usize>) {
    index.insert(node.range.clone(), node.height);
    for child in &node.children {
        index_heights(child, index);
    }
}

fn rc_rec(node: &Node, query: &HyperRange, out: &mut Vec<(usize, HyperRange)>) {
    if !ranges_intersect(&node.range, query) {
        return;
    }
    if query.contains_range(&node.range) {
        out.push((node.height, node.range.clone()));
        return;
    }
    if node.children.is_empty() {
        // A unit-volume leaf that intersects a query with integer bounds
        // is always fully contained; this branch only guards overlapping
        // (TDAG) trees being queried with `brc`, which is not a supported
        // combination but should still terminate rather than panic.
        out.push((node.height, node.range.clone()));
        return;
    }
    for child in &node.children {
        rc_rec(child, query, out);
    }
}

fn ranges_intersect(a: &HyperRange, b: &HyperRange) -> bool {
    (0..a.dimensions()).all(|i| a.start().get(i) <= b.end().get(i) && b.start().get(i) <= a.end().get(i))
}
