//! Binary Space Partitioning over the triangles of a strip collection.
//!
//! The tree is built once from the model geometry and walked once per
//! frame against a movable viewpoint:
//!
//! ```ignore
//! use bsp_model::bsp::{traverse_facing, CollectingVisitor, Partitioner};
//! use bsp_model::Tolerance;
//!
//! let partitioner = Partitioner::new(Tolerance::default());
//! let (tree, _stats) = partitioner.build_tree(&mut parts, &refs, refs[0])?;
//!
//! let mut visitor = CollectingVisitor::new();
//! traverse_facing(&tree, &parts, eye, partitioner.tolerance(), &mut visitor)?;
//! let draw_order = visitor.into_triangles();
//! ```
//!
//! # Architecture
//!
//! - [`BspTree`]: generic owning binary tree
//! - [`Partitioner`]: recursive construction with on-demand subdivision
//! - [`SplitterSelector`]: strategy for choosing splitting triangles
//! - [`TriangleVisitor`]: visitor trait for the visibility walk

mod partition;
mod selector;
mod tree;
mod visitor;

pub use partition::{PartitionStats, Partitioner};
pub(crate) use partition::resolve;
pub use selector::{FirstTriangle, SplitterSelector};
pub use tree::{BspTree, PreOrder};
pub use visitor::{
    traverse_facing, CollectingVisitor, FnVisitor, TriangleVisitor, VisibleTriangle,
};
