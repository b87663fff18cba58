//! AABB tree navigation utilities for interactive visualization.

use aabb_tree::{AabbNode, AabbTree};
use macroquad::prelude::*;

use crate::{ScreenMap, depth_color, draw_subtree_boxes, draw_subtree_boxes_3d};

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Interactive AABB tree navigator for exploring tree structure.
pub struct TreeNavigator {
    path: Vec<Direction>,
    /// Number of levels drawn below the current node.
    levels: usize,
}

impl Default for TreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self {
            path: Vec::new(),
            levels: 2,
        }
    }

    /// Returns the current navigation path.
    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Returns how many levels below the current node get drawn.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Attempts to navigate to the left child. Returns true if successful.
    pub fn go_left<const D: usize>(&mut self, tree: &AabbTree<f32, D>) -> bool {
        self.go(tree, Direction::Left)
    }

    /// Attempts to navigate to the right child. Returns true if successful.
    pub fn go_right<const D: usize>(&mut self, tree: &AabbTree<f32, D>) -> bool {
        self.go(tree, Direction::Right)
    }

    fn go<const D: usize>(&mut self, tree: &AabbTree<f32, D>, direction: Direction) -> bool {
        if self.current_node(tree).is_some_and(|node| !node.is_leaf()) {
            self.path.push(direction);
            return true;
        }
        false
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node.
    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Drops a path that no longer exists, e.g. after the tree was rebuilt.
    pub fn reset_if_invalid<const D: usize>(&mut self, tree: &AabbTree<f32, D>) {
        if self.current_node(tree).is_none() {
            self.go_root();
        }
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update<const D: usize>(&mut self, tree: &AabbTree<f32, D>) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::L) {
            changed = self.go_left(tree);
        }
        if is_key_pressed(KeyCode::R) {
            changed = self.go_right(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed = self.go_parent();
        }
        if is_key_pressed(KeyCode::T) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }
        if is_key_pressed(KeyCode::Equal) {
            self.levels += 1;
            changed = true;
        }
        if is_key_pressed(KeyCode::Minus) && self.levels > 0 {
            self.levels -= 1;
            changed = true;
        }

        changed
    }

    /// Returns a reference to the current node, if the tree is non-empty.
    pub fn current_node<'a, const D: usize>(
        &self,
        tree: &'a AabbTree<f32, D>,
    ) -> Option<&'a AabbNode<f32, D>> {
        tree.root().and_then(|root| get_node_at_path(root, &self.path))
    }

    /// Draws the boxes of the current subtree in a 3D scene.
    pub fn render_3d(&self, tree: &AabbTree<f32, 3>) {
        if let Some(node) = self.current_node(tree) {
            draw_subtree_boxes_3d(node, self.levels);
        }
    }

    /// Draws the boxes of the current subtree on a 2D screen map.
    pub fn render_2d(&self, tree: &AabbTree<f32, 2>, map: &ScreenMap) {
        if let Some(node) = self.current_node(tree) {
            draw_subtree_boxes(node, 0, self.levels, &mut |bbox, depth| {
                let thickness = if depth == 0 { 3.0 } else { 1.5 };
                map.draw_box(bbox, thickness, depth_color(depth));
            });
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui<const D: usize>(&self, tree: &AabbTree<f32, D>, y_offset: f32) {
        let (leaves, height, primitive) = match self.current_node(tree) {
            Some(node) => (node.leaf_count(), node.depth(), node.primitive()),
            None => (0, 0, None),
        };

        // Build path string
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
            &format!("Subtree: {} leaves, height {}", leaves, height),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        let (children, color) = match primitive {
            Some(primitive) => (format!("(leaf: primitive {})", primitive), ORANGE),
            None => ("Children: [L]eft [R]ight".to_string(), GREEN),
        };
        draw_text(&children, 10.0, y_offset + 40.0, 18.0, color);
        draw_text(
            &format!("[P]arent | [T]op | +/- levels ({})", self.levels),
            10.0,
            y_offset + 60.0,
            16.0,
            DARKGRAY,
        );
    }
}

/// Navigates to a node following the path, returns None if path is invalid.
fn get_node_at_path<'a, const D: usize>(
    root: &'a AabbNode<f32, D>,
    path: &[Direction],
) -> Option<&'a AabbNode<f32, D>> {
    let mut current = root;
    for dir in path {
        current = match dir {
            Direction::Left => current.left()?,
            Direction::Right => current.right()?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn make_tree(count: usize) -> AabbTree<f32, 2> {
        let points: Vec<Point2<f32>> = (0..count).map(|i| Point2::new(i as f32, 0.0)).collect();
        AabbTree::build_points(&points)
    }

    #[test]
    fn walks_down_and_back_up() {
        let tree = make_tree(4);
        let mut navigator = TreeNavigator::new();

        assert!(navigator.go_left(&tree));
        assert!(navigator.go_right(&tree));
        assert_eq!(navigator.path(), &[Direction::Left, Direction::Right]);
        assert!(navigator.current_node(&tree).is_some_and(|node| node.is_leaf()));

        // Leaves have no children
        assert!(!navigator.go_left(&tree));
        assert_eq!(navigator.depth(), 2);

        assert!(navigator.go_parent());
        assert_eq!(navigator.depth(), 1);
        navigator.go_root();
        assert!(!navigator.go_parent());
    }

    #[test]
    fn stale_path_resets_to_root() {
        let mut navigator = TreeNavigator::new();
        navigator.go_left(&make_tree(8));
        navigator.go_left(&make_tree(8));

        let small = make_tree(2);
        navigator.reset_if_invalid(&small);
        assert_eq!(navigator.depth(), 0);
    }

    #[test]
    fn empty_tree_has_no_current_node() {
        let tree = AabbTree::<f32, 2>::new();
        let mut navigator = TreeNavigator::new();
        assert!(navigator.current_node(&tree).is_none());
        assert!(!navigator.go_right(&tree));
    }
}
