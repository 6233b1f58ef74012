use crate::{
    math::Rotation,
    segment::ConstrainedSegment,
    types::{NodeId, NodeRef},
};
use glam::Vec2;

/// One point of a branch skeleton.
///
/// `direction` and `length` describe the growth step leaving this node; they
/// are only read by the builder and, for `direction`, by renderers that want
/// a ribbon normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletalNode {
    pub position: Vec2,
    pub direction: Vec2,
    pub length: f32,
    pub width: f32,
    pub index: NodeId,
}

impl SkeletalNode {
    pub fn new(position: Vec2, direction: Vec2, length: f32, width: f32, index: NodeId) -> Self {
        Self {
            position,
            direction,
            length,
            width,
            index,
        }
    }

    /// Where the next node along the growth direction would start.
    #[inline]
    pub fn end(&self) -> Vec2 {
        self.position + self.direction * self.length
    }
}

#[derive(Clone, Debug)]
pub struct Branch {
    pub nodes: Vec<SkeletalNode>,
    pub level: u32,
    pub segment: ConstrainedSegment,
    /// Parent node this branch hangs from; `None` for the trunk.
    pub root: Option<NodeRef>,
}

impl Branch {
    pub fn new_trunk(node: SkeletalNode) -> Self {
        Self {
            nodes: vec![node],
            level: 0,
            segment: ConstrainedSegment::default(),
            root: None,
        }
    }

    pub fn new_child(node: SkeletalNode, level: u32, root: NodeRef) -> Self {
        Self {
            nodes: vec![node],
            level,
            segment: ConstrainedSegment::default(),
            root: Some(root),
        }
    }

    /// First node, the pivot of the branch.
    #[inline]
    pub fn base(&self) -> &SkeletalNode {
        &self.nodes[0]
    }

    #[inline]
    pub fn tip(&self) -> &SkeletalNode {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Sets up the sway segment from the final base and tip positions.
    ///
    /// Must run once growth is complete and the branch has at least two
    /// distinct nodes.
    pub fn initialize_physics(&mut self) {
        let (base, tip) = (self.base().position, self.tip().position);
        self.segment = ConstrainedSegment::with_level(base, tip, self.level);
    }

    pub fn update(&mut self, dt: f32) {
        self.segment.update(dt);
    }

    /// Swings every node rigidly about the base by the segment's last
    /// `delta_angle`.
    pub fn rotate(&mut self) {
        let rotation = Rotation::new(self.segment.delta_angle);
        let origin = self.base().position;
        for node in &mut self.nodes {
            node.position = rotation.apply_about(node.position, origin);
        }
    }

    pub fn translate(&mut self, v: Vec2) {
        self.segment.translate(v);
        for node in &mut self.nodes {
            node.position += v;
        }
    }

    /// Moves the branch so that its base lands on `position`.
    pub fn translate_to(&mut self, position: Vec2) {
        let delta = position - self.base().position;
        self.translate(delta);
    }
}
