use bsp_model::{Color as ModelColor, Model, RenderOptions};
use bsp_viz::{
    add_crossing_strips, add_cube, build_tree, camera_matrix, MacroquadSurface, OrbitCamera,
    TreeNavigator,
};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3};

fn build_scene() -> bsp_model::Result<Model> {
    let mut model = Model::new();
    add_cube(
        &mut model,
        Point3::new(0.0, 0.0, 0.0),
        3.0,
        &Rotation3::from_euler_angles(0.3, 0.5, 0.0),
        ModelColor::DEFAULT_PART,
    )?;
    add_crossing_strips(&mut model)?;
    build_tree(&mut model)?;
    Ok(model)
}

#[macroquad::main("BSP Model")]
async fn main() {
    env_logger::init();

    let model = match build_scene() {
        Ok(model) => model,
        Err(err) => {
            log::error!("failed to build scene: {err}");
            return;
        }
    };
    let Some(tree) = model.tree() else {
        log::error!("scene has no BSP tree");
        return;
    };

    let mut camera = OrbitCamera::new(20.0, 0.4, 0.3).with_zoom(1.0, 5.0, 80.0);
    let mut navigator = TreeNavigator::new();
    let mut surface = MacroquadSurface::new();
    let mut options = RenderOptions {
        light_direction: [-0.3, -0.5, -1.0],
        ..RenderOptions::default()
    };
    let mut wireframe = false;

    loop {
        camera.update();
        navigator.update(tree);
        if is_key_pressed(KeyCode::G) {
            options.show_sub_grid = !options.show_sub_grid;
        }
        if is_key_pressed(KeyCode::W) {
            wireframe = !wireframe;
        }

        clear_background(Color::from_rgba(230, 230, 235, 255));
        options.center_offset = [
            f64::from(screen_width()) / 2.0,
            f64::from(screen_height()) / 2.0,
        ];
        let intrinsics = camera_matrix(f64::from(screen_height()));
        let external = camera.external();

        let drawn = if wireframe {
            model.render_frame_perspective(&intrinsics, &external, &options, &mut surface);
            None
        } else {
            match navigator.render(&model, &intrinsics, &external, &options, &mut surface) {
                Ok(stats) => Some(stats),
                Err(err) => {
                    log::warn!("render failed: {err}");
                    None
                }
            }
        };

        draw_text(
            &format!(
                "BSP Model - {} parts, {} nodes, depth {}",
                model.parts().len(),
                tree.node_count(),
                tree.depth()
            ),
            10.0,
            25.0,
            20.0,
            BLACK,
        );
        if let Some(stats) = drawn {
            draw_text(
                &format!("Drawn: {} | Clipped: {}", stats.drawn, stats.clipped),
                10.0,
                45.0,
                18.0,
                DARKGRAY,
            );
        }

        navigator.draw_ui(tree, 70.0);

        draw_text(
            "Drag mouse to rotate, scroll to zoom | [G] sub-grid | [W] wireframe",
            10.0,
            155.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 175.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
