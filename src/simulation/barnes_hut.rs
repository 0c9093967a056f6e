//! # Barnes–Hut Octree (3D)
//!
//! This module implements a **3D Barnes–Hut octree** for approximating the
//! gravitational acceleration field of an `N`-body system. Instead of summing
//! every pairwise interaction, a distant cluster of bodies is replaced by a
//! single pseudo-body sitting at the cluster's center of mass.
//!
//! ## Core Concepts
//!
//! - The tree covers a fixed cube given by its start (minimum) corner and its
//!   edge length. Every node covers the half-open region
//!   `[start, start + size)` on each axis.
//! - A node is exactly one of:
//!   - **empty**: nothing inserted yet,
//!   - **leaf**: holds exactly one point mass,
//!   - **internal**: owns 8 child octants of half the edge length.
//! - Each node caches its total mass and center of mass. The cache is filled
//!   lazily on first read and cleared along the insertion path, so a node is
//!   *dirty* exactly when an insertion happened since its last read.
//!
//! ## Opening criterion
//!
//! When asked for the acceleration at a point, a node answers with the
//! two-body formula at its center of mass if it is a leaf, or if
//! `size / distance(center_of_mass, point) <= theta`. Otherwise it asks its
//! non-empty children and sums their answers. With `theta = 0` every internal
//! node is opened and the result is the exact direct sum.
//!
//! ## Child layout
//!
//! Child octants are indexed with 3 bits, matching [`octant_offset`]:
//!
//! - Bit 0 (value 1): X axis, upper half when set
//! - Bit 1 (value 2): Y axis, upper half when set
//! - Bit 2 (value 4): Z axis, upper half when set

use std::sync::OnceLock;

use anyhow::{bail, ensure, Result};

use crate::simulation::states::{acceleration_due_to, Body, NVec3};

/// Snapshot of a body's position and mass, as stored in the tree's leaves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub position: NVec3,
    pub mass: f64,
}

impl PointMass {
    pub fn new(position: NVec3, mass: f64) -> Self {
        Self { position, mass }
    }

    /// Two masses at the same position act as one
    fn stacked_with(&self, other: &PointMass) -> PointMass {
        PointMass::new(self.position, self.mass + other.mass)
    }
}

impl From<&Body> for PointMass {
    fn from(b: &Body) -> Self {
        PointMass::new(b.position(), b.mass())
    }
}

/// Aggregate mass information of a subtree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSummary {
    pub total_mass: f64,
    pub center_of_mass: NVec3,
}

impl MassSummary {
    fn empty() -> Self {
        Self {
            total_mass: 0.0,
            center_of_mass: NVec3::zeros(),
        }
    }
}

#[derive(Debug)]
enum Node {
    Empty,
    Leaf(PointMass),
    Internal(Box<[Octree; 8]>),
}

/// A Barnes–Hut octree node together with the subtree below it.
///
/// The root is itself an `Octree`; children are owned by their parent and
/// dropped together with it.
#[derive(Debug)]
pub struct Octree {
    start_corner: NVec3,
    end_corner: NVec3, // exclusive, shared exactly with the parent's bound
    size: f64,
    depth: u32,
    node: Node,
    summary: OnceLock<MassSummary>, // empty while dirty
}

impl Octree {
    /// An empty tree covering the cube `[start_corner, start_corner + size)`
    pub fn empty(start_corner: NVec3, size: f64) -> Self {
        Self::empty_at_depth(start_corner, start_corner.add_scalar(size), size, 0)
    }

    fn empty_at_depth(start_corner: NVec3, end_corner: NVec3, size: f64, depth: u32) -> Self {
        Self {
            start_corner,
            end_corner,
            size,
            depth,
            node: Node::Empty,
            summary: OnceLock::new(),
        }
    }

    /// Build a tree over the given cube and insert every item.
    ///
    /// - no items: the tree is empty
    /// - one item: the root is a leaf holding it
    /// - two or more: the root is internal and every item sits in the unique
    ///   octant that contains it
    ///
    /// # Errors
    /// Fails if any item lies outside the cube, or cannot be routed to
    /// exactly one octant.
    pub fn new<I>(items: I, start_corner: NVec3, size: f64) -> Result<Self>
    where
        I: IntoIterator<Item = PointMass>,
    {
        ensure!(
            size.is_finite() && size > 0.0,
            "octree size must be positive and finite, got {size}"
        );
        let mut tree = Self::empty(start_corner, size);
        tree.add_items(items)?;
        Ok(tree)
    }

    /// Build a tree whose root cube encloses every body.
    ///
    /// The cube is centered on the bodies' bounding box and padded so the
    /// largest coordinates fall strictly inside the half-open region.
    pub fn from_bodies(bodies: &[Body]) -> Result<Self> {
        let (start_corner, size) = bounding_cube(bodies.iter().map(|b| b.position()));
        Self::new(bodies.iter().map(PointMass::from), start_corner, size)
    }

    pub fn add_items<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = PointMass>,
    {
        for item in items {
            self.add_item(item)?;
        }
        Ok(())
    }

    /// Insert a single point mass.
    ///
    /// - empty node: becomes a leaf holding `item`
    /// - leaf at the same position: the two masses are stacked in place
    /// - leaf: splits into 8 octants, re-inserts its former occupant, then
    ///   routes `item`
    /// - internal: routes `item` to the one octant containing it
    ///
    /// Every node on the insertion path is marked dirty.
    ///
    /// # Errors
    /// Besides routing failures, fails when two distinct points share a cell
    /// too small for `f64` to split any further.
    pub fn add_item(&mut self, item: PointMass) -> Result<()> {
        ensure!(
            self.contains(&item.position),
            "point {:?} lies outside octant at {:?} with size {}",
            item.position,
            self.start_corner,
            self.size
        );
        if let Node::Leaf(existing) = &self.node {
            ensure!(
                existing.position == item.position || self.can_split(),
                "points {:?} and {:?} cannot be separated at depth {}",
                existing.position,
                item.position,
                self.depth
            );
        }
        self.summary.take();

        self.node = match std::mem::replace(&mut self.node, Node::Empty) {
            Node::Empty => Node::Leaf(item),
            Node::Leaf(existing) if existing.position == item.position => {
                Node::Leaf(existing.stacked_with(&item))
            }
            Node::Leaf(existing) => {
                let mut children = self.subdivide();
                route_into(&mut children, existing)?;
                route_into(&mut children, item)?;
                Node::Internal(children)
            }
            Node::Internal(mut children) => {
                route_into(&mut children, item)?;
                Node::Internal(children)
            }
        };
        Ok(())
    }

    /// Whether `point` lies inside this node's half-open cube
    pub fn contains(&self, point: &NVec3) -> bool {
        (0..3).all(|axis| {
            point[axis] >= self.start_corner[axis] && point[axis] < self.end_corner[axis]
        })
    }

    pub fn start_corner(&self) -> NVec3 {
        self.start_corner
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.node, Node::Empty)
    }

    /// The point mass held by a leaf node
    pub fn leaf(&self) -> Option<&PointMass> {
        match &self.node {
            Node::Leaf(p) => Some(p),
            _ => None,
        }
    }

    /// The 8 octants of an internal node
    pub fn children(&self) -> Option<&[Octree; 8]> {
        match &self.node {
            Node::Internal(children) => Some(&**children),
            _ => None,
        }
    }

    /// True when an insertion happened since mass information was last read
    pub fn is_dirty(&self) -> bool {
        self.summary.get().is_none()
    }

    /// Total mass of the subtree, recomputed if dirty
    pub fn total_mass(&self) -> f64 {
        self.summary().total_mass
    }

    /// Center of mass of the subtree, recomputed if dirty
    pub fn center_of_mass(&self) -> NVec3 {
        self.summary().center_of_mass
    }

    pub fn summary(&self) -> MassSummary {
        *self.summary.get_or_init(|| self.compute_summary())
    }

    /// Approximate gravitational acceleration at `point` caused by every
    /// mass in this subtree, using opening angle `theta`.
    pub fn acceleration(&self, point: &NVec3, theta: f64) -> NVec3 {
        let mut visits = 0;
        self.traverse(point, theta, &mut visits)
    }

    /// Same as [`Octree::acceleration`], also returning how many nodes were
    /// visited to produce the answer.
    pub fn acceleration_with_visits(&self, point: &NVec3, theta: f64) -> (NVec3, usize) {
        let mut visits = 0;
        let acc = self.traverse(point, theta, &mut visits);
        (acc, visits)
    }

    // helpers ==============================================================================

    /// Whether the midpoint still falls strictly inside the cell on some axis
    fn can_split(&self) -> bool {
        let mid = self.start_corner.add_scalar(self.size / 2.0);
        (0..3).any(|axis| mid[axis] > self.start_corner[axis] && mid[axis] < self.end_corner[axis])
    }

    /// Create the 8 empty child octants of this node.
    /// Lower and upper halves meet at the same midpoint value, and upper
    /// octants reuse this node's end corner, so the children tile it exactly.
    fn subdivide(&self) -> Box<[Octree; 8]> {
        let half = self.size / 2.0;
        let mid = self.start_corner.add_scalar(half);
        Box::new(std::array::from_fn(|idx| {
            let upper = octant_offset(idx);
            let start = NVec3::from_fn(|axis, _| {
                if upper[axis] > 0.0 { mid[axis] } else { self.start_corner[axis] }
            });
            let end = NVec3::from_fn(|axis, _| {
                if upper[axis] > 0.0 { self.end_corner[axis] } else { mid[axis] }
            });
            Octree::empty_at_depth(start, end, half, self.depth + 1)
        }))
    }

    /// Leaf: the held mass. Internal: sum of children, with the center of
    /// mass built as a running mass-weighted average that skips empty
    /// children so a zero total never divides anything.
    fn compute_summary(&self) -> MassSummary {
        match &self.node {
            Node::Empty => MassSummary::empty(),
            Node::Leaf(p) => MassSummary {
                total_mass: p.mass,
                center_of_mass: p.position,
            },
            Node::Internal(children) => {
                let total_mass: f64 = children.iter().map(|c| c.total_mass()).sum();

                let mut mass_so_far = 0.0;
                let mut center_of_mass = NVec3::zeros();
                for child in children.iter() {
                    let child_mass = child.total_mass();
                    if child_mass == 0.0 {
                        continue;
                    }
                    let combined = mass_so_far + child_mass;
                    center_of_mass = center_of_mass * (mass_so_far / combined)
                        + child.center_of_mass() * (child_mass / combined);
                    mass_so_far = combined;
                }

                MassSummary {
                    total_mass,
                    center_of_mass,
                }
            }
        }
    }

    fn traverse(&self, point: &NVec3, theta: f64, visits: &mut usize) -> NVec3 {
        *visits += 1;
        match &self.node {
            Node::Empty => NVec3::zeros(),
            Node::Leaf(_) => self.acceleration_as_point_mass(point),
            Node::Internal(children) => {
                if self.is_far_enough(point, theta) {
                    return self.acceleration_as_point_mass(point);
                }
                let mut acc = NVec3::zeros();
                for child in children.iter().filter(|c| !c.is_empty()) {
                    acc += child.traverse(point, theta, visits);
                }
                acc
            }
        }
    }

    fn acceleration_as_point_mass(&self, point: &NVec3) -> NVec3 {
        let s = self.summary();
        acceleration_due_to(point, &s.center_of_mass, s.total_mass)
    }

    /// Opening criterion: `size / distance <= theta`. A point sitting on the
    /// center of mass gives an infinite ratio and always opens the node.
    fn is_far_enough(&self, point: &NVec3, theta: f64) -> bool {
        let dist = (self.center_of_mass() - point).norm();
        self.size / dist <= theta
    }
}

/// Insert `item` into the single child whose region contains it
fn route_into(children: &mut [Octree; 8], item: PointMass) -> Result<()> {
    let mut target = None;
    for (idx, child) in children.iter().enumerate() {
        if child.contains(&item.position) {
            ensure!(
                target.is_none(),
                "point {:?} was routed to multiple octants",
                item.position
            );
            target = Some(idx);
        }
    }
    match target {
        Some(idx) => children[idx].add_item(item),
        None => bail!("point {:?} does not fit in any octant", item.position),
    }
}

/// Unit offset of child octant `idx` from its parent's start corner
fn octant_offset(idx: usize) -> NVec3 {
    NVec3::new(
        (idx & 1) as f64,
        ((idx >> 1) & 1) as f64,
        ((idx >> 2) & 1) as f64,
    )
}

/// Compute a cube `(start_corner, size)` enclosing every position.
///
/// The axis-aligned bounding box is expanded to a cube around its center
/// using the largest half-extent, then padded so the maximum coordinates are
/// strictly below `start_corner + size`. An empty input yields the unit cube
/// at the origin.
pub fn bounding_cube<I>(positions: I) -> (NVec3, f64)
where
    I: IntoIterator<Item = NVec3>,
{
    let mut min = NVec3::repeat(f64::INFINITY);
    let mut max = NVec3::repeat(f64::NEG_INFINITY);
    let mut any = false;

    for p in positions {
        min = min.inf(&p);
        max = max.sup(&p);
        any = true;
    }

    if !any {
        return (NVec3::zeros(), 1.0);
    }

    let center = (min + max) * 0.5;
    let max_half = ((max - min) * 0.5).amax();
    let scale = center.amax().max(1.0);
    let half = max_half * (1.0 + 1e-9) + scale * 1e-9;

    (center - NVec3::repeat(half), 2.0 * half)
}
