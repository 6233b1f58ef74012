//! Procedural growth of a tree skeleton.
//!
//! Growth runs in passes:
//! 1. [`grow_pass`] extends the tip of every existing branch by one node,
//!    possibly requesting a split via [`grow_branch`].
//! 2. Split requests become new branches appended after the pass, so they
//!    start growing on the next one.
//! 3. [`build`] repeats passes until one adds no node at all, then sets up
//!    branch physics on the final skeleton and hangs leaves with
//!    [`grow_leaves`].

use crate::{
    branch::{Branch, SkeletalNode},
    config::GrowthConfig,
    error::{TreeError, TreeResult},
    leaf::Leaf,
    math::rotated,
    random,
    tree::Tree,
    types::{BranchId, NodeRef},
};
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// A tip keeps growing while its width is above this.
pub const CONTINUATION_WIDTH: f32 = 0.8;

/// A split is considered every this many nodes along a branch.
pub const SPLIT_INTERVAL: usize = 5;

/// Direction of the trunk's first step (y grows downward).
pub const TRUNK_DIRECTION: Vec2 = Vec2::new(0.0, -1.0);

/// A new branch requested while growing a parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitRequest {
    pub node: SkeletalNode,
    pub level: u32,
    pub root: NodeRef,
}

/// Extends `branch` by one node if its tip is still wide enough.
///
/// The new node starts at the tip's end. Its length and width shrink by the
/// configured ratios, and its direction is the tip direction rotated by a
/// random deviation and then pulled toward [`GrowthConfig::attraction`],
/// more strongly when the new step is short.
///
/// When the tip sits on a split interval and the branch is shallower than
/// `max_level`, a child starting at the new node is requested, rotated by
/// the split angle to a random side. If that child would already be too
/// thin to grow, the split is dropped and the new node's width is zeroed,
/// which also ends the parent branch.
///
/// ### Parameters
/// - `branch` - Branch whose tip is extended.
/// - `branch_id` - Index of `branch` in the tree, recorded in the request.
/// - `cfg` - Growth parameters.
/// - `rng` - Random source for deviation, split angle and side.
///
/// ### Returns
/// The requested child branch, if any.
pub fn grow_branch(
    branch: &mut Branch,
    branch_id: BranchId,
    cfg: &GrowthConfig,
    rng: &mut impl Rng,
) -> Option<SplitRequest> {
    let tip = *branch.tip();
    if tip.width <= CONTINUATION_WIDTH {
        return None;
    }

    let start = tip.end();
    let length = tip.length * cfg.branch_length_ratio;
    let width = tip.width * cfg.branch_width_ratio;

    let deviated = rotated(tip.direction, random::symmetric(rng, cfg.branch_deviation));
    let direction = (deviated + cfg.attraction * (1.0 / length))
        .try_normalize()
        .unwrap_or(deviated);

    branch
        .nodes
        .push(SkeletalNode::new(start, direction, length, width, tip.index + 1));
    let node_id = branch.nodes.len() - 1;

    if tip.index == 0 || tip.index % SPLIT_INTERVAL != 0 || branch.level >= cfg.max_level {
        return None;
    }

    let mut split_angle = cfg.branch_split_angle + random::symmetric(rng, cfg.branch_split_var);
    if random::chance(rng, 0.5) {
        split_angle = -split_angle;
    }

    let child = SkeletalNode::new(
        start,
        rotated(direction, split_angle),
        length * cfg.branch_length_ratio,
        width * cfg.split_width_ratio,
        0,
    );

    if child.width < CONTINUATION_WIDTH {
        branch.nodes[node_id].width = 0.0;
        return None;
    }

    Some(SplitRequest {
        node: child,
        level: branch.level + 1,
        root: NodeRef::new(branch_id, node_id),
    })
}

/// Grows every existing branch once and appends the requested children.
///
/// Children are appended after all current branches have grown, in the
/// order of their parents, which keeps every parent index below its
/// children's.
///
/// ### Returns
/// Ids of the branches created in this pass.
pub fn grow_pass(branches: &mut Vec<Branch>, cfg: &GrowthConfig, rng: &mut impl Rng) -> Vec<BranchId> {
    let mut requests = Vec::new();
    for (id, branch) in branches.iter_mut().enumerate() {
        if let Some(request) = grow_branch(branch, id, cfg, rng) {
            requests.push(request);
        }
    }

    let first_new = branches.len();
    branches.extend(
        requests
            .into_iter()
            .map(|r| Branch::new_child(r.node, r.level, r.root)),
    );
    (first_new..branches.len()).collect()
}

/// Hangs up to `cfg.leaves_per_branch` leaves on each branch.
///
/// Starting at the tip, the k-th leaf steps `k` further nodes back, so leaves
/// gather near the tip and thin out toward the base. Each points in a random
/// direction and leaves closer to the tip come out smaller: the tip leaf
/// has size 1 and each step back toward the base adds `0.5 / count`.
pub fn grow_leaves(branches: &[Branch], cfg: &GrowthConfig, rng: &mut impl Rng) -> Vec<Leaf> {
    let count = cfg.leaves_per_branch;
    let mut leaves = Vec::with_capacity(branches.len() * count);

    for (branch_id, branch) in branches.iter().enumerate() {
        let mut node_id = branch.nodes.len() - 1;
        for k in 0..count {
            let Some(id) = node_id.checked_sub(k) else {
                break;
            };
            node_id = id;

            let direction = Vec2::from_angle(random::symmetric(rng, TAU));
            let anchor = branch.nodes[node_id].position;
            let mut leaf = Leaf::new(NodeRef::new(branch_id, node_id), anchor, direction, rng);
            leaf.size = 1.0 + 0.5 * k as f32 / count as f32;
            leaves.push(leaf);
        }
    }

    leaves
}

/// Grows a complete tree rooted at `origin`.
///
/// The trunk starts at `origin` heading up with the configured base length
/// and width. Passes run until the total node count stops changing. Branch
/// physics is initialized from the final skeleton before leaves are added.
///
/// ### Errors
/// - [`TreeError::InvalidConfig`] if `cfg` fails validation.
/// - [`TreeError::GrowthDidNotConverge`] if growth is still adding nodes
///   after `cfg.max_growth_passes` passes.
pub fn build(origin: Vec2, cfg: &GrowthConfig, rng: &mut impl Rng) -> TreeResult<Tree> {
    cfg.validate()?;

    let trunk = SkeletalNode::new(origin, TRUNK_DIRECTION, cfg.branch_length, cfg.branch_width, 0);
    let mut branches = vec![Branch::new_trunk(trunk)];

    let mut node_count = 1;
    let mut passes = 0;
    loop {
        if passes == cfg.max_growth_passes {
            tracing::warn!(passes, node_count, "growth did not reach a fixed point");
            return Err(TreeError::GrowthDidNotConverge { passes });
        }

        let new_branches = grow_pass(&mut branches, cfg, rng);
        passes += 1;

        let count: usize = branches.iter().map(|b| b.nodes.len()).sum();
        tracing::trace!(pass = passes, new_branches = new_branches.len(), nodes = count);
        if count == node_count {
            break;
        }
        node_count = count;
    }

    for branch in &mut branches {
        branch.initialize_physics();
    }
    let leaves = grow_leaves(&branches, cfg, rng);

    tracing::debug!(
        passes,
        branches = branches.len(),
        nodes = node_count,
        leaves = leaves.len(),
        "tree grown"
    );

    Ok(Tree::from_parts(branches, leaves))
}
