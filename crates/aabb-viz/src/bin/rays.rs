use aabb_tree::AabbTree;
use aabb_viz::{
    OrbitCamera, TreeNavigator, append_cube, draw_triangles_3d, generate_height_field, to_vec3,
};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

/// Generates the ray scene: a wavy floor with two cubes standing on it.
fn generate_scene() -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
    let (mut vertices, mut elements) = generate_height_field(24, 6.0, 0.25);
    append_cube(&mut vertices, &mut elements, Point3::new(-1.2, 0.6, 0.4), 0.8);
    append_cube(&mut vertices, &mut elements, Point3::new(1.0, 0.4, -0.8), 0.6);
    (vertices, elements)
}

/// A fan of rays from a point circling above the scene.
fn ray_fan(time: f32, count: usize) -> (Vec<Point3<f32>>, Vec<Vector3<f32>>) {
    let origin = Point3::new(2.0 * time.cos(), 2.5, 2.0 * time.sin());
    let dirs = (0..count)
        .flat_map(|i| {
            (0..count).map(move |j| {
                let x = (i as f32 / (count - 1) as f32 - 0.5) * 5.0;
                let z = (j as f32 / (count - 1) as f32 - 0.5) * 5.0;
                Point3::new(x, 0.0, z) - origin
            })
        })
        .collect::<Vec<_>>();
    (vec![origin; dirs.len()], dirs)
}

#[macroquad::main("AABB Ray Casting")]
async fn main() {
    println!("Generating scene...");
    let (vertices, elements) = generate_scene();
    println!("Created {} triangles (floor + 2 cubes)", elements.len());

    println!("Building AABB tree...");
    let tree = AabbTree::build(&vertices, &elements);
    println!(
        "AABB tree built: {} leaves, height {}",
        tree.leaf_count(),
        tree.height()
    );

    let mut camera = OrbitCamera::new(8.0, 0.4, 0.5).with_zoom(0.5, 2.0, 20.0);
    let mut navigator = TreeNavigator::new();
    let mut paused = false;
    let mut time = 0.0f32;

    loop {
        camera.update();
        navigator.update(&tree);
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if !paused {
            time += get_frame_time() * 0.5;
        }

        let (origins, dirs) = ray_fan(time, 16);
        let hits = tree.ray_first_hits(&vertices, &elements, &origins, &dirs);
        let hit_count = hits.iter().flatten().count();

        // Everything the central ray passes through, front to back
        let center = dirs.len() / 2 + 8;
        let mut pierced = tree.ray_all_hits(&vertices, &elements, &origins[center], &dirs[center]);
        pierced.sort_by(|a, b| a.t.total_cmp(&b.t));

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_triangles_3d(&vertices, &elements);
        navigator.render_3d(&tree);

        for ((origin, dir), hit) in origins.iter().zip(&dirs).zip(&hits) {
            if let Some(hit) = hit {
                let point = origin + dir * hit.t;
                draw_line_3d(to_vec3(origin), to_vec3(&point), Color::from_rgba(255, 255, 255, 60));
                draw_sphere(to_vec3(&point), 0.03, None, RED);
            }
        }
        for hit in &pierced {
            let point = origins[center] + dirs[center] * hit.t;
            draw_sphere(to_vec3(&point), 0.05, None, SKYBLUE);
        }
        draw_sphere(to_vec3(&origins[0]), 0.08, None, YELLOW);

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("AABB Ray Casting - {} triangles", tree.leaf_count()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Rays: {} | hits: {} | central ray pierces {} triangles",
                dirs.len(),
                hit_count,
                pierced.len()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text(
            "Drag mouse to rotate, scroll to zoom, [Space] to pause",
            10.0,
            155.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
