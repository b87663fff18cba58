//! AABB (axis-aligned bounding box) tree implementation.

pub mod aabb;
mod bounding_box;
mod config;
mod error;
mod ray;
mod real;
mod simplex;

pub use aabb::{AabbNode, AabbTree, Nearest, SerializedTree, point_elements};
pub use bounding_box::BoundingBox;
pub use config::{DEFAULT_PARALLEL_THRESHOLD, TreeConfig};
pub use error::TreeError;
pub use ray::{Hit, Ray, TriangleIntersection, ray_box_intersect, ray_triangle_intersect};
pub use real::Real;
pub use simplex::{
    barycentric_coordinates, barycentric_coordinates_rows, point_simplex_squared_distance,
    point_simplex_squared_distance_barycentric, project_to_line_segment, simplex_barycenter,
    tetrahedron_barycentric_coordinates, tetrahedron_volume, triangle_double_area,
};
