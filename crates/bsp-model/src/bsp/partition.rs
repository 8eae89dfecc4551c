//! BSP tree construction over the triangles of a strip collection.

use crate::{BspError, Cuttable, PolygonStrip, Result, Tolerance, Triangle, TriangleRef};

use super::selector::{FirstTriangle, SplitterSelector};
use super::tree::BspTree;

/// Counters collected during one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionStats {
    /// Triangles that had to be subdivided.
    pub subdivisions: usize,
    /// Strips appended to the part list.
    pub parts_added: usize,
}

/// Builds BSP trees by recursive plane classification, subdividing
/// triangles that straddle a splitting plane.
///
/// Subdivided triangles are replaced by freshly appended strips, so the
/// part list only ever grows during a build.
#[derive(Debug, Clone, Default)]
pub struct Partitioner<S = FirstTriangle> {
    tolerance: Tolerance,
    selector: S,
}

impl Partitioner<FirstTriangle> {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            selector: FirstTriangle,
        }
    }
}

impl<S: SplitterSelector> Partitioner<S> {
    /// Uses a custom strategy to pick each subtree's splitting triangle.
    pub fn with_selector(tolerance: Tolerance, selector: S) -> Self {
        Self {
            tolerance,
            selector,
        }
    }

    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Builds a tree over `triangles`, splitting first by `root`.
    ///
    /// `root` does not need to be part of `triangles`; every copy of it that
    /// is present is dropped from the working set. Each node of the returned
    /// tree holds its own splitting triangle; the left subtree holds the
    /// front side (`dot(mean - anchor, normal) >= 0`), the right subtree the
    /// back side.
    pub fn build_tree(
        &self,
        parts: &mut Vec<PolygonStrip>,
        triangles: &[TriangleRef],
        root: TriangleRef,
    ) -> Result<(BspTree<TriangleRef>, PartitionStats)> {
        let remaining: Vec<TriangleRef> =
            triangles.iter().copied().filter(|t| *t != root).collect();
        let mut stats = PartitionStats::default();
        let tree = self.build_node(parts, root, remaining, &mut stats)?;
        log::debug!(
            "built BSP tree: {} nodes, depth {}, {} subdivisions",
            tree.node_count(),
            tree.depth(),
            stats.subdivisions
        );
        Ok((tree, stats))
    }

    fn build_node(
        &self,
        parts: &mut Vec<PolygonStrip>,
        splitter: TriangleRef,
        remaining: Vec<TriangleRef>,
        stats: &mut PartitionStats,
    ) -> Result<BspTree<TriangleRef>> {
        let plane = resolve(parts, splitter)?.plane(&self.tolerance)?;

        let mut front = Vec::new();
        let mut back = Vec::new();

        for triangle_ref in remaining {
            let triangle = resolve(parts, triangle_ref)?;

            let pieces = match triangle.cut(&plane, &self.tolerance)? {
                Some(subdivision) => {
                    let color = parts[triangle_ref.part].color();
                    let strip = PolygonStrip::new(
                        subdivision.strip.into_iter().map(Into::into).collect(),
                    )?
                    .with_color(color);
                    let part = parts.len();
                    let count = strip.triangle_count();
                    parts.push(strip);

                    log::debug!(
                        "subdivided {:?} ({:?}) into part {} with {} triangles",
                        triangle_ref,
                        subdivision.kind,
                        part,
                        count
                    );
                    stats.subdivisions += 1;
                    stats.parts_added += 1;
                    (0..count).map(|sub| TriangleRef::new(part, sub)).collect()
                }
                None => vec![triangle_ref],
            };

            for piece in pieces {
                let mean = resolve(parts, piece)?.centroid();
                if plane.signed_distance(mean) >= 0.0 {
                    front.push(piece);
                } else {
                    back.push(piece);
                }
            }
        }

        let mut node = BspTree::new(splitter);
        node.set_left(self.build_child(parts, front, stats)?);
        node.set_right(self.build_child(parts, back, stats)?);
        Ok(node)
    }

    fn build_child(
        &self,
        parts: &mut Vec<PolygonStrip>,
        mut triangles: Vec<TriangleRef>,
        stats: &mut PartitionStats,
    ) -> Result<Option<BspTree<TriangleRef>>> {
        let Some(index) = self.selector.select(&triangles) else {
            return Ok(None);
        };
        let splitter = triangles.remove(index);
        self.build_node(parts, splitter, triangles, stats).map(Some)
    }
}

/// Looks up the oriented triangle a ref points at.
pub(crate) fn resolve(parts: &[PolygonStrip], triangle: TriangleRef) -> Result<Triangle> {
    let strip = parts.get(triangle.part).ok_or(BspError::IndexOutOfRange {
        part: triangle.part,
        sub_index: triangle.sub_index,
        len: parts.len(),
    })?;
    strip.triangle(triangle.sub_index).map_err(|err| match err {
        BspError::IndexOutOfRange { sub_index, len, .. } => BspError::IndexOutOfRange {
            part: triangle.part,
            sub_index,
            len,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Vertex};
    use approx::assert_abs_diff_eq;

    fn triangle_strip(points: [[f64; 3]; 3]) -> PolygonStrip {
        PolygonStrip::new(points.iter().map(|p| Vertex::new(p[0], p[1], p[2])).collect()).unwrap()
    }

    fn all_refs(parts: &[PolygonStrip]) -> Vec<TriangleRef> {
        parts
            .iter()
            .enumerate()
            .flat_map(|(part, strip)| {
                (0..strip.triangle_count()).map(move |sub| TriangleRef::new(part, sub))
            })
            .collect()
    }

    fn build(parts: &mut Vec<PolygonStrip>) -> (BspTree<TriangleRef>, PartitionStats) {
        let refs = all_refs(parts);
        Partitioner::new(Tolerance::default())
            .build_tree(parts, &refs, refs[0])
            .unwrap()
    }

    #[test]
    fn single_triangle_is_a_leaf() {
        let mut parts = vec![triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])];
        let (tree, stats) = build(&mut parts);

        assert!(tree.is_leaf());
        assert_eq!(*tree.data(), TriangleRef::new(0, 0));
        assert_eq!(stats, PartitionStats::default());
    }

    #[test]
    fn parallel_triangles_make_two_nodes() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]),
        ];
        let (tree, stats) = build(&mut parts);

        assert_eq!(tree.node_count(), 2);
        assert_eq!(parts.len(), 2);
        assert_eq!(stats.subdivisions, 0);
        // z = 1 lies in front of the +z facing root.
        assert_eq!(tree.left().map(|n| *n.data()), Some(TriangleRef::new(1, 0)));
        assert!(tree.right().is_none());
    }

    #[test]
    fn back_side_goes_right() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]]),
        ];
        let (tree, _) = build(&mut parts);

        assert!(tree.left().is_none());
        assert_eq!(tree.right().map(|n| *n.data()), Some(TriangleRef::new(1, 0)));
    }

    #[test]
    fn straddling_triangle_is_subdivided() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.2, 0.3, 1.0], [0.2, 0.0, -1.0], [0.2, 1.0, -1.0]]),
        ];
        parts[1].set_color(200, 10, 10);
        let (tree, stats) = build(&mut parts);

        assert_eq!(stats.subdivisions, 1);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 5);
        assert_eq!(parts[2].color(), Color::rgb(200, 10, 10));

        // The original straddling triangle is no longer referenced.
        assert!(tree.iter().all(|t| *t != TriangleRef::new(1, 0)));
        assert_eq!(tree.node_count(), 4);

        // Apex piece above the ground plane, the quad's two triangles below.
        assert_eq!(tree.left().map(|n| *n.data()), Some(TriangleRef::new(2, 0)));
        let right = tree.right().unwrap();
        assert_eq!(*right.data(), TriangleRef::new(2, 1));
        assert_eq!(right.left().map(|n| *n.data()), Some(TriangleRef::new(2, 2)));
    }

    #[test]
    fn subdivision_preserves_area() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.2, 0.8, 0.0], [0.2, 0.0, -1.0], [0.2, 1.0, 2.0]]),
        ];
        let original = parts[1].triangle(0).unwrap().area();
        build(&mut parts);

        assert_eq!(parts.len(), 3);
        let split_area: f64 = (0..parts[2].triangle_count())
            .map(|sub| parts[2].triangle(sub).unwrap().area())
            .sum();
        assert_abs_diff_eq!(split_area, original, epsilon = 1e-12);
    }

    #[test]
    fn classification_respects_splitting_plane() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.2, 0.3, 1.0], [0.2, 0.0, -1.0], [0.2, 1.0, -1.0]]),
            triangle_strip([[3.0, 0.0, 2.0], [4.0, 0.0, 2.0], [3.0, 1.0, 2.5]]),
            triangle_strip([[3.0, 0.0, -2.0], [3.0, 1.0, -2.0], [4.0, 0.0, -2.5]]),
        ];
        let (tree, _) = build(&mut parts);

        let tol = Tolerance::default();
        let plane = resolve(&parts, *tree.data()).unwrap().plane(&tol).unwrap();
        for t in tree.left().unwrap().iter() {
            let mean = resolve(&parts, *t).unwrap().centroid();
            assert!(plane.signed_distance(mean) >= 0.0);
        }
        for t in tree.right().unwrap().iter() {
            let mean = resolve(&parts, *t).unwrap().centroid();
            assert!(plane.signed_distance(mean) < 0.0);
        }
    }

    #[test]
    fn rebuild_is_deterministic() {
        let source = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.2, 0.3, 1.0], [0.2, 0.0, -1.0], [0.2, 1.0, -1.0]]),
            triangle_strip([[-1.0, 0.5, -0.5], [1.0, 0.5, 0.5], [0.0, 0.5, 1.0]]),
        ];
        let mut first = source.clone();
        let mut second = source;
        let (a, _) = build(&mut first);
        let (b, _) = build(&mut second);

        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_splitter_fails() {
        let mut parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]),
            triangle_strip([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]),
        ];
        let refs = all_refs(&parts);
        let err = Partitioner::new(Tolerance::default())
            .build_tree(&mut parts, &refs, refs[0])
            .unwrap_err();
        assert!(matches!(err, BspError::DegenerateGeometry(_)));
    }

    #[test]
    fn unknown_root_is_out_of_range() {
        let mut parts = vec![triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])];
        let err = Partitioner::new(Tolerance::default())
            .build_tree(&mut parts, &[], TriangleRef::new(0, 1))
            .unwrap_err();
        assert_eq!(
            err,
            BspError::IndexOutOfRange {
                part: 0,
                sub_index: 1,
                len: 3
            }
        );
    }

    #[test]
    fn resolve_reports_the_referenced_part() {
        let parts = vec![
            triangle_strip([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
            triangle_strip([[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]]),
        ];
        assert_eq!(
            resolve(&parts, TriangleRef::new(1, 5)).unwrap_err(),
            BspError::IndexOutOfRange {
                part: 1,
                sub_index: 5,
                len: 3
            }
        );
    }
}
