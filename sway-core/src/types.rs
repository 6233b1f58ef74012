/// Identifier for a branch in a [`crate::tree::Tree`].
///
/// This is an index into the tree's branch list. Branch `0` is always the
/// trunk, and every other branch has a parent with a strictly smaller id.
pub type BranchId = usize;

/// Index of a node along its branch, `0` being the branch base.
pub type NodeId = usize;

/// Non-owning reference to a skeletal node: which branch, which node.
///
/// Only meaningful within the lifetime of a given `Tree` instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub branch_id: BranchId,
    pub node_id: NodeId,
}

impl NodeRef {
    pub fn new(branch_id: BranchId, node_id: NodeId) -> Self {
        Self { branch_id, node_id }
    }
}
