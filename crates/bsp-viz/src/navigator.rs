//! BSP tree navigation utilities for interactive visualization.

use bsp_model::bsp::BspTree;
use bsp_model::{DrawSurface, Model, RenderOptions, RenderStats, Renderer, Result, TriangleRef};
use macroquad::prelude::*;
use nalgebra::{Matrix3, Matrix3x4};

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Interactive navigator restricting the view to one subtree.
#[derive(Debug, Default)]
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl TreeNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Attempts to descend into the left (front) child.
    pub fn go_left(&mut self, tree: &BspTree<TriangleRef>) -> bool {
        self.descend(tree, Direction::Left)
    }

    /// Attempts to descend into the right (back) child.
    pub fn go_right(&mut self, tree: &BspTree<TriangleRef>) -> bool {
        self.descend(tree, Direction::Right)
    }

    fn descend(&mut self, tree: &BspTree<TriangleRef>, direction: Direction) -> bool {
        let has_child = self.current_node(tree).is_some_and(|node| match direction {
            Direction::Left => node.left().is_some(),
            Direction::Right => node.right().is_some(),
        });
        if has_child {
            self.path.push(direction);
        }
        has_child
    }

    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input. Returns true if the selection changed.
    pub fn update(&mut self, tree: &BspTree<TriangleRef>) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::L) {
            changed |= self.go_left(tree);
        }
        if is_key_pressed(KeyCode::K) {
            changed |= self.go_right(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// The selected node; `None` if the path no longer fits the tree.
    pub fn current_node<'a>(
        &self,
        tree: &'a BspTree<TriangleRef>,
    ) -> Option<&'a BspTree<TriangleRef>> {
        let mut current = tree;
        for direction in &self.path {
            current = match direction {
                Direction::Left => current.left()?,
                Direction::Right => current.right()?,
            };
        }
        Some(current)
    }

    /// Draws only the selected subtree of `model`.
    pub fn render<D: DrawSurface>(
        &self,
        model: &Model,
        camera: &Matrix3<f64>,
        external: &Matrix3x4<f64>,
        options: &RenderOptions,
        surface: &mut D,
    ) -> Result<RenderStats> {
        let subtree = model.tree().and_then(|tree| self.current_node(tree));
        let viewpoint = Model::viewpoint(external)?;
        Renderer::new(options)
            .with_tolerance(*model.tolerance())
            .render(subtree, model.parts(), camera, external, viewpoint, surface)
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BspTree<TriangleRef>, y_offset: f32) {
        let Some(node) = self.current_node(tree) else {
            return;
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|d| match d {
                    Direction::Left => "L",
                    Direction::Right => "R",
                })
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!(
                "Node {:?}: subtree of {} triangles",
                node.data(),
                node.node_count()
            ),
            10.0,
            y_offset,
            18.0,
            BLACK,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            DARKBLUE,
        );
        draw_text(
            &format!(
                "Children: {}{}{}",
                if node.left().is_some() { "[L]eft " } else { "" },
                if node.right().is_some() { "right [K] " } else { "" },
                if node.is_leaf() { "(leaf)" } else { "" }
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if node.is_leaf() { ORANGE } else { DARKGREEN },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}
