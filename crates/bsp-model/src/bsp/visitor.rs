//! Visibility-ordered traversal of a built tree.
//!
//! Visitors allow custom processing of the visible triangles without
//! coupling the traversal order to drawing.

use nalgebra::{Point3, Vector3};

use crate::{PolygonStrip, Result, Tolerance, Triangle, TriangleRef};

use super::partition::resolve;
use super::tree::BspTree;

/// A triangle that faces the viewpoint, handed to a [`TriangleVisitor`].
#[derive(Debug, Clone)]
pub struct VisibleTriangle {
    pub triangle: TriangleRef,
    /// Winding-corrected geometry.
    pub shape: Triangle,
    pub normal: Vector3<f64>,
    pub centroid: Point3<f64>,
}

/// Visitor for processing visible triangles in draw order.
pub trait TriangleVisitor {
    fn visit(&mut self, visible: &VisibleTriangle);
}

/// A simple visitor that collects the visited triangle refs.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    collected: Vec<TriangleRef>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_triangles(self) -> Vec<TriangleRef> {
        self.collected
    }

    pub fn triangles(&self) -> &[TriangleRef] {
        &self.collected
    }
}

impl TriangleVisitor for CollectingVisitor {
    fn visit(&mut self, visible: &VisibleTriangle) {
        self.collected.push(visible.triangle);
    }
}

/// A visitor that calls a closure for each visible triangle.
pub struct FnVisitor<F>
where
    F: FnMut(&VisibleTriangle),
{
    func: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(&VisibleTriangle),
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> TriangleVisitor for FnVisitor<F>
where
    F: FnMut(&VisibleTriangle),
{
    fn visit(&mut self, visible: &VisibleTriangle) {
        (self.func)(visible);
    }
}

/// Walks `node` depth-first against `viewpoint`.
///
/// A node whose triangle faces the viewpoint (`dot(viewpoint - mean, normal) > 0`)
/// visits its back (right) subtree, then itself, then its front (left)
/// subtree. A node facing away is not visited; its front subtree is walked
/// before its back subtree.
pub fn traverse_facing<V: TriangleVisitor>(
    node: &BspTree<TriangleRef>,
    parts: &[PolygonStrip],
    viewpoint: Point3<f64>,
    tol: &Tolerance,
    visitor: &mut V,
) -> Result<()> {
    let triangle = *node.data();
    let shape = resolve(parts, triangle)?;
    let normal = shape.unit_normal(tol)?;
    let centroid = shape.centroid();
    let facing = (viewpoint - centroid).dot(&normal);

    if facing > 0.0 {
        log::trace!("{triangle:?} faces the viewpoint ({facing:.4})");
        if let Some(far) = node.right() {
            traverse_facing(far, parts, viewpoint, tol, visitor)?;
        }
        visitor.visit(&VisibleTriangle {
            triangle,
            shape,
            normal,
            centroid,
        });
        if let Some(near) = node.left() {
            traverse_facing(near, parts, viewpoint, tol, visitor)?;
        }
    } else {
        log::trace!("{triangle:?} faces away ({facing:.4})");
        if let Some(far) = node.left() {
            traverse_facing(far, parts, viewpoint, tol, visitor)?;
        }
        if let Some(near) = node.right() {
            traverse_facing(near, parts, viewpoint, tol, visitor)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vertex;

    fn triangle_strip(z: f64) -> PolygonStrip {
        PolygonStrip::new(vec![
            Vertex::new(0.0, 0.0, z),
            Vertex::new(1.0, 0.0, z),
            Vertex::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    /// Three stacked +z facing triangles; root at z = 0.
    fn stack() -> (Vec<PolygonStrip>, BspTree<TriangleRef>) {
        let parts = vec![triangle_strip(0.0), triangle_strip(1.0), triangle_strip(-1.0)];
        let mut tree = BspTree::new(TriangleRef::new(0, 0));
        tree.add_left(TriangleRef::new(1, 0));
        tree.add_right(TriangleRef::new(2, 0));
        (parts, tree)
    }

    fn visit_from(z: f64) -> Vec<TriangleRef> {
        let (parts, tree) = stack();
        let mut visitor = CollectingVisitor::new();
        traverse_facing(
            &tree,
            &parts,
            Point3::new(0.2, 0.2, z),
            &Tolerance::default(),
            &mut visitor,
        )
        .unwrap();
        visitor.into_triangles()
    }

    #[test]
    fn facing_stack_is_drawn_back_to_front() {
        assert_eq!(
            visit_from(10.0),
            vec![TriangleRef::new(2, 0), TriangleRef::new(0, 0), TriangleRef::new(1, 0)]
        );
    }

    #[test]
    fn viewpoint_between_layers_culls_those_facing_away() {
        // Between z = 0 and z = 1: only the two lower triangles face it.
        assert_eq!(
            visit_from(0.5),
            vec![TriangleRef::new(2, 0), TriangleRef::new(0, 0)]
        );
    }

    #[test]
    fn viewpoint_below_sees_nothing() {
        assert!(visit_from(-10.0).is_empty());
    }

    #[test]
    fn fn_visitor_calls_closure() {
        let (parts, tree) = stack();
        let mut count = 0;
        {
            let mut visitor = FnVisitor::new(|visible: &VisibleTriangle| {
                assert!(visible.normal.z > 0.0);
                count += 1;
            });
            traverse_facing(
                &tree,
                &parts,
                Point3::new(0.2, 0.2, 5.0),
                &Tolerance::default(),
                &mut visitor,
            )
            .unwrap();
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn stale_ref_is_reported() {
        let parts = vec![triangle_strip(0.0)];
        let tree = BspTree::new(TriangleRef::new(4, 0));
        let mut visitor = CollectingVisitor::new();
        let err = traverse_facing(
            &tree,
            &parts,
            Point3::origin(),
            &Tolerance::default(),
            &mut visitor,
        )
        .unwrap_err();
        assert!(matches!(err, crate::BspError::IndexOutOfRange { part: 4, .. }));
    }
}
