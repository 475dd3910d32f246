use log::{info, warn};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use plane_split::shapes::{comb, square_xy};
use plane_split::{split_polygon, Plane, Polygon, SplitError, SplitResult, DEFAULT_EPSILON};
use split_viz::{draw_cut_plane, draw_outline, draw_split, BucketOffsets, OrbitCamera};

/// Input polygon and cutting plane for one of the demo scenes.
fn scene(name: &str) -> Result<(Vec<Point3<f64>>, Plane), SplitError> {
    let horizontal = |y: f64| Plane::new(Vector3::new(0.0, 1.0, 0.0), -y);
    match name {
        "square" => Ok((square_xy(2.0), horizontal(1.0)?)),
        "sawtooth" => Ok((comb(4), horizontal(1.5)?)),
        "u-shape" => Ok((comb(2), horizontal(1.5)?)),
        other => {
            warn!("unknown scene '{}', falling back to u-shape", other);
            Ok((comb(2), horizontal(1.5)?))
        }
    }
}

fn build(name: &str) -> Result<(Polygon, Plane, SplitResult), SplitError> {
    let (points, cut) = scene(name)?;
    let cut = cut.with_epsilon(DEFAULT_EPSILON);
    let input = Polygon::new(points)?;
    let result = split_polygon(input.clone(), &cut)?;
    info!(
        "split {} vertices into {} fragments",
        input.len(),
        result.len()
    );
    Ok((input, cut, result))
}

#[macroquad::main("Polygon Split")]
async fn main() {
    env_logger::init();

    let name = std::env::var("SPLIT_SCENE").unwrap_or_else(|_| "u-shape".to_string());
    println!("Splitting scene '{}'...", name);
    let (input, cut, result) = match build(&name) {
        Ok(scene) => scene,
        Err(err) => {
            eprintln!("Split failed: {}", err);
            return;
        }
    };
    println!(
        "{} above, {} on, {} below",
        result.above.len(),
        result.on.len(),
        result.below.len()
    );

    let input_offset = vec3(-5.0, 0.0, 0.0);
    let offsets = BucketOffsets::around(input_offset, 0.25);
    let mut camera = OrbitCamera::looking_at(vec3(-3.0, 1.0, -1.0), 14.0);

    loop {
        camera.update();

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_outline(&input, input_offset, SKYBLUE);
        draw_cut_plane(
            &cut,
            input.centroid(),
            2.5,
            Color::from_rgba(200, 40, 40, 90),
        );
        draw_split(&result, &offsets);

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("Scene '{}' - input: {} vertices", name, input.len()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "above: {} | on: {} | below: {}",
                result.above.len(),
                result.on.len(),
                result.below.len()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 65.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 85.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
