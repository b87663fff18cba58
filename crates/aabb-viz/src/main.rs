use aabb_tree::{AabbTree, BoundingBox};
use aabb_viz::{ScreenMap, TreeNavigator, generate_jittered_grid, primitive_color};
use macroquad::prelude::*;
use nalgebra::Point2;
use ::rand::SeedableRng;
use ::rand::rngs::StdRng;

const COLUMNS: usize = 14;
const ROWS: usize = 9;
const WIDTH: f32 = 14.0;
const HEIGHT: f32 = 9.0;

#[macroquad::main("AABB Tree Explorer")]
async fn main() {
    let mut seed = 1;
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut vertices, mut elements) = generate_jittered_grid(&mut rng, COLUMNS, ROWS, WIDTH, HEIGHT);
    let mut tree = AabbTree::build(&vertices, &elements);
    println!(
        "AABB tree built: {} triangles, height {}",
        tree.leaf_count(),
        tree.height()
    );

    let world = BoundingBox::new(Point2::new(-1.0, -1.0), Point2::new(WIDTH + 1.0, HEIGHT + 1.0));
    let mut navigator = TreeNavigator::new();

    loop {
        if is_key_pressed(KeyCode::N) {
            seed += 1;
            let mut rng = StdRng::seed_from_u64(seed);
            (vertices, elements) = generate_jittered_grid(&mut rng, COLUMNS, ROWS, WIDTH, HEIGHT);
            tree.rebuild(&vertices, &elements);
            navigator.reset_if_invalid(&tree);
        }
        navigator.update(&tree);

        let map = ScreenMap::fit(&world, 40.0);
        let (mx, my) = mouse_position();
        let cursor = map.to_world(vec2(mx, my));

        let containing = tree.find(&vertices, &elements, &cursor, false);
        let nearest = tree.nearest(&vertices, &elements, &cursor);

        clear_background(Color::from_rgba(20, 20, 30, 255));

        for (primitive, [a, b, c]) in elements.iter().enumerate() {
            let corners = [&vertices[*a], &vertices[*b], &vertices[*c]];
            let mut color = primitive_color(primitive);
            color.a = if containing.contains(&primitive) { 1.0 } else { 0.35 };
            map.fill_triangle(corners, color);
            map.outline_triangle(corners, 1.0, Color::from_rgba(0, 0, 0, 120));
        }

        navigator.render_2d(&tree, &map);

        if let Some(nearest) = &nearest {
            let [a, b, c] = elements[nearest.primitive];
            map.outline_triangle([&vertices[a], &vertices[b], &vertices[c]], 3.0, WHITE);
            let from = map.to_screen(&cursor);
            let to = map.to_screen(&nearest.point);
            draw_line(from.x, from.y, to.x, to.y, 2.0, WHITE);
            draw_circle(to.x, to.y, 4.0, RED);
        }

        draw_text(
            &format!(
                "AABB Tree Explorer - {} triangles, height {}",
                tree.leaf_count(),
                tree.height()
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        let nearest_text = match &nearest {
            Some(n) => format!(
                "Nearest: #{} at distance {:.3}",
                n.primitive,
                n.squared_distance.sqrt()
            ),
            None => "Nearest: none".to_string(),
        };
        draw_text(
            &format!("Cursor ({:.2}, {:.2}) in {:?} | {}", cursor.x, cursor.y, containing, nearest_text),
            10.0,
            45.0,
            18.0,
            GRAY,
        );

        navigator.draw_ui(&tree, 70.0);

        draw_text("[N]ew mesh", 10.0, 155.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
