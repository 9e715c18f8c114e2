//! Defines the mutable tree representation used while growing.
use crate::weak_learner::{
    type_and_struct::*,
    split_rule::*,
};

use std::rc::Rc;
use std::cell::RefCell;
use std::fmt;


/// Enumeration of `TrainBranchNode` and `TrainLeafNode`.
pub(super) enum TrainNode {
    /// A node that has two children.
    Branch(TrainBranchNode),


    /// A node that has no child.
    Leaf(TrainLeafNode),
}


/// Represents the branch nodes of the growing tree.
/// Each `TrainBranchNode` must have two children.
pub(super) struct TrainBranchNode {
    // Splitting rule
    pub(super) rule: Splitter,


    // Left child
    pub(super) left: Rc<RefCell<TrainNode>>,


    // Right child
    pub(super) right: Rc<RefCell<TrainNode>>,
}


/// Represents the leaf nodes of the growing tree.
pub(super) struct TrainLeafNode {
    pub(super) prediction: Prediction<f64>,
    pub(super) loss_as_leaf: LossValue,
}


impl TrainNode {
    /// Construct a leaf node from the given arguments.
    #[inline]
    pub(super) fn leaf(
        prediction: Prediction<f64>,
        loss_as_leaf: LossValue,
    ) -> Rc<RefCell<Self>>
    {
        let leaf = TrainLeafNode {
            prediction,
            loss_as_leaf,
        };


        Rc::new(RefCell::new(TrainNode::Leaf(leaf)))
    }


    /// Construct a branch node from the arguments.
    #[inline]
    pub(super) fn branch(
        rule: Splitter,
        left: Rc<RefCell<TrainNode>>,
        right: Rc<RefCell<TrainNode>>,
    ) -> Rc<RefCell<Self>>
    {
        let node = TrainBranchNode {
            rule,
            left,
            right,
        };

        Rc::new(RefCell::new(TrainNode::Branch(node)))
    }
}


impl fmt::Debug for TrainNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainNode::Branch(branch) => {
                f.debug_struct("TrainBranchNode")
                    .field("rule", &branch.rule)
                    .finish()
            },
            TrainNode::Leaf(leaf) => {
                f.debug_struct("TrainLeafNode")
                    .field("prediction", &leaf.prediction.0)
                    .field("r(t)", &leaf.loss_as_leaf.0)
                    .finish()
            },
        }
    }
}
