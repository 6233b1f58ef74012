use crate::{
    branch::{Branch, SkeletalNode},
    leaf::Leaf,
    types::NodeRef,
    wind::Wind,
};
use glam::Vec2;
use rand::Rng;

/// A grown tree: branches stored parent-first, plus a flat list of leaves.
///
/// Branch `0` is the trunk and anchors the coordinate frame. Every other
/// branch refers to a parent with a smaller index, so a single ascending
/// pass visits parents before children.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    branches: Vec<Branch>,
    leaves: Vec<Leaf>,
}

impl Tree {
    /// Assembles a tree from parts.
    ///
    /// ### Panics
    /// Panics if a branch refers to a parent at or after its own index, or
    /// if any branch or leaf refers to a node that does not exist.
    pub fn from_parts(branches: Vec<Branch>, leaves: Vec<Leaf>) -> Self {
        let tree = Self { branches, leaves };
        tree.check_references();
        tree
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    #[inline]
    pub fn node(&self, r: NodeRef) -> &SkeletalNode {
        &self.branches[r.branch_id].nodes[r.node_id]
    }

    /// Total number of skeletal nodes over all branches.
    pub fn node_count(&self) -> usize {
        self.branches.iter().map(|b| b.nodes.len()).sum()
    }

    /// One simulation step: integrate branches, integrate leaves, then
    /// propagate the resulting motion through the structure.
    pub fn update(&mut self, dt: f32) {
        self.update_branches(dt);
        self.update_leaves(dt);
        self.update_structure();
    }

    pub fn update_branches(&mut self, dt: f32) {
        for branch in &mut self.branches {
            branch.update(dt);
        }
    }

    pub fn update_leaves(&mut self, dt: f32) {
        for leaf in &mut self.leaves {
            leaf.update(dt);
        }
    }

    /// Rotate every branch, then carry children along with their parents,
    /// then re-anchor the leaves.
    ///
    /// Rotation must be finished everywhere before any translation so that
    /// each branch pivots about its own pre-translation base.
    pub fn update_structure(&mut self) {
        self.rotate_branches();
        self.translate_branches();
        self.translate_leaves();
    }

    /// Pushes leaves and branch tips caught in any of the wind bands.
    pub fn apply_wind(&mut self, winds: &[Wind], rng: &mut impl Rng) {
        for wind in winds {
            for leaf in &mut self.leaves {
                wind.apply(&mut leaf.free_particle, rng);
            }
            for branch in &mut self.branches {
                wind.apply(&mut branch.segment.moving_point, rng);
            }
        }
    }

    /// Adds `force` to the tip of every branch segment, e.g. a gust that
    /// covers the whole scene.
    pub fn apply_force(&mut self, force: Vec2) {
        for branch in &mut self.branches {
            branch.segment.moving_point.apply_force(force);
        }
    }

    fn rotate_branches(&mut self) {
        for branch in &mut self.branches {
            branch.rotate();
        }
    }

    fn translate_branches(&mut self) {
        for i in 1..self.branches.len() {
            let Some(root) = self.branches[i].root else {
                continue;
            };
            debug_assert!(root.branch_id < i, "branch {i} hangs from later branch {}", root.branch_id);
            let target = self.node(root).position;
            self.branches[i].translate_to(target);
        }
    }

    fn translate_leaves(&mut self) {
        let branches = &self.branches;
        for leaf in &mut self.leaves {
            let r = leaf.root;
            leaf.move_to(branches[r.branch_id].nodes[r.node_id].position);
        }
    }

    fn check_references(&self) {
        for (i, branch) in self.branches.iter().enumerate() {
            assert!(!branch.nodes.is_empty(), "branch {i} has no nodes");
            if let Some(root) = branch.root {
                assert!(root.branch_id < i, "branch {i} hangs from branch {}", root.branch_id);
                assert!(
                    root.node_id < self.branches[root.branch_id].nodes.len(),
                    "branch {i} hangs from missing node {root:?}"
                );
            }
        }
        for (i, leaf) in self.leaves.iter().enumerate() {
            let r = leaf.root;
            assert!(
                r.branch_id < self.branches.len() && r.node_id < self.branches[r.branch_id].nodes.len(),
                "leaf {i} is anchored to missing node {r:?}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    const UP: Vec2 = Vec2::new(0.0, -1.0);

    fn straight(base: Vec2, dir: Vec2, count: usize) -> Vec<SkeletalNode> {
        (0..count)
            .map(|i| SkeletalNode::new(base + dir * (10.0 * i as f32), dir, 10.0, 5.0, i))
            .collect()
    }

    /// Trunk of four nodes going up, one child leaving node 2 toward +x,
    /// one leaf on the child's tip.
    fn small_tree() -> Tree {
        let mut trunk = Branch::new_trunk(SkeletalNode::new(Vec2::ZERO, UP, 10.0, 5.0, 0));
        trunk.nodes = straight(Vec2::ZERO, UP, 4);

        let fork = trunk.nodes[2].position;
        let mut child = Branch::new_child(
            SkeletalNode::new(fork, Vec2::X, 10.0, 3.0, 0),
            1,
            NodeRef::new(0, 2),
        );
        child.nodes = straight(fork, Vec2::X, 3);

        let mut branches = vec![trunk, child];
        for b in &mut branches {
            b.initialize_physics();
        }

        let mut rng = StdRng::seed_from_u64(2);
        let tip = branches[1].tip().position;
        let leaf = Leaf::new(NodeRef::new(1, 2), tip, UP, &mut rng);
        Tree::from_parts(branches, vec![leaf])
    }

    #[test]
    fn node_count_sums_branches() {
        let tree = small_tree();
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.node(NodeRef::new(1, 1)).position, Vec2::new(10.0, -20.0));
    }

    #[test]
    #[should_panic]
    fn from_parts_rejects_forward_parent() {
        let mut child = Branch::new_trunk(SkeletalNode::new(Vec2::ZERO, UP, 1.0, 1.0, 0));
        child.root = Some(NodeRef::new(1, 0));
        let other = Branch::new_trunk(SkeletalNode::new(Vec2::ZERO, UP, 1.0, 1.0, 0));
        Tree::from_parts(vec![other, child], Vec::new());
    }

    #[test]
    #[should_panic]
    fn from_parts_rejects_dangling_leaf() {
        let trunk = Branch::new_trunk(SkeletalNode::new(Vec2::ZERO, UP, 1.0, 1.0, 0));
        let mut rng = StdRng::seed_from_u64(0);
        let leaf = Leaf::new(NodeRef::new(0, 5), Vec2::ZERO, UP, &mut rng);
        Tree::from_parts(vec![trunk], vec![leaf]);
    }

    #[test]
    fn child_base_tracks_parent_node_every_frame() {
        let mut tree = small_tree();
        let mut rng = StdRng::seed_from_u64(9);
        let winds = [Wind::new(400.0, 20.0, 0.0, Some(0.0))];

        for _ in 0..120 {
            tree.apply_wind(&winds, &mut rng);
            tree.update(0.016);

            let root = tree.branches()[1].root.unwrap();
            let anchor = tree.node(root).position;
            let base = tree.branches()[1].base().position;
            assert_abs_diff_eq!(base.x, anchor.x, epsilon = 1e-3);
            assert_abs_diff_eq!(base.y, anchor.y, epsilon = 1e-3);
            assert_abs_diff_eq!(tree.branches()[1].segment.attach_point.x, anchor.x, epsilon = 1e-3);
        }
    }

    #[test]
    fn leaves_follow_their_node() {
        let mut tree = small_tree();
        tree.apply_force(Vec2::new(500.0, 0.0));
        for _ in 0..30 {
            tree.update(0.016);
            let leaf = &tree.leaves()[0];
            assert_eq!(leaf.position(), tree.node(leaf.root).position);
        }
    }

    #[test]
    fn trunk_base_never_moves() {
        let mut tree = small_tree();
        tree.apply_force(Vec2::new(800.0, 0.0));
        for _ in 0..60 {
            tree.update(0.016);
        }
        assert_eq!(tree.branches()[0].base().position, Vec2::ZERO);
    }

    #[test]
    fn sideways_force_bends_the_trunk() {
        let mut tree = small_tree();
        let tip_before = tree.branches()[0].tip().position;
        tree.apply_force(Vec2::new(2000.0, 0.0));
        tree.update(0.016);
        let tip_after = tree.branches()[0].tip().position;
        assert!(tip_after.x > tip_before.x);
    }

    #[test]
    fn zero_strength_wind_leaves_accelerations_unchanged() {
        let mut tree = small_tree();
        let before: Vec<Vec2> = tree
            .branches()
            .iter()
            .map(|b| b.segment.moving_point.acceleration)
            .chain(tree.leaves().iter().map(|l| l.free_particle.acceleration))
            .collect();

        let mut rng = StdRng::seed_from_u64(4);
        let calm = [Wind::new(10_000.0, 0.0, 0.0, Some(0.0))];
        tree.apply_wind(&calm, &mut rng);

        let after: Vec<Vec2> = tree
            .branches()
            .iter()
            .map(|b| b.segment.moving_point.acceleration)
            .chain(tree.leaves().iter().map(|l| l.free_particle.acceleration))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn wind_outside_band_is_ignored() {
        let mut tree = small_tree();
        let mut rng = StdRng::seed_from_u64(4);
        let far = [Wind::new(10.0, 100.0, 0.0, Some(5_000.0))];
        tree.apply_wind(&far, &mut rng);
        assert!(
            tree.branches()
                .iter()
                .all(|b| b.segment.moving_point.acceleration == Vec2::ZERO)
        );
    }

    #[test]
    fn at_rest_tree_stays_still_without_forces() {
        let mut tree = small_tree();
        let before: Vec<Vec2> = tree.branches()[1].nodes.iter().map(|n| n.position).collect();
        // At rest the restoring push is purely radial: nothing rotates.
        tree.update(0.016);
        for (n, p) in tree.branches()[1].nodes.iter().zip(&before) {
            assert_abs_diff_eq!(n.position.x, p.x, epsilon = 1e-3);
            assert_abs_diff_eq!(n.position.y, p.y, epsilon = 1e-3);
        }
    }
}
