/*
 * Renderer Module
 *
 * This module draws the flock. The simulation uses window coordinates with
 * the origin in the top-left corner and y pointing down; nannou centers the
 * origin with y pointing up, so every point goes through `to_screen`.
 *
 * Each boid is the four-point arrowhead below, rotated so that its +y axis
 * follows the velocity. Optional overlays show the vision radius, velocity
 * and the acceleration applied during the last tick.
 */

use std::time::Instant;

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::boid::Boid;
use crate::vector::Vec2 as SimVec2;

// Arrowhead in boid-local coordinates, tip at the origin
const BOID_POLYGON: [(f64, f64); 4] = [(0.0, 0.0), (-4.0, -8.0), (0.0, -6.0), (4.0, -8.0)];

// Overlay scale factors
const VELOCITY_VECTOR_SCALE: f64 = 0.1;
const FORCE_VECTOR_SCALE: f64 = 5.0;

// Map a simulation position to nannou's centered, y-up space
#[inline]
fn to_screen(point: SimVec2, width: f64, height: f64) -> Point2 {
    pt2((point.x - width / 2.0) as f32, (height / 2.0 - point.y) as f32)
}

// Boid outline in simulation space
fn boid_outline(boid: &Boid, scale: f64) -> [SimVec2; 4] {
    let (sin, cos) = boid.heading().unwrap_or(0.0).sin_cos();

    BOID_POLYGON.map(|(x, y)| {
        let rotated = SimVec2::new(x * cos - y * sin, x * sin + y * cos);
        boid.position + rotated * scale
    })
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let render_start = Instant::now();
    let draw = app.draw();

    let display = &model.display;
    let params = model.simulation.params();
    let (width, height) = (params.window_width, params.window_height);

    let [r, g, b] = display.background;
    draw.background().color(rgb(r, g, b));

    let [r, g, b] = display.boid_color;
    let boid_color = rgb(r, g, b);

    for boid in model.simulation.boids() {
        let points = boid_outline(boid, <f64 as From<_>>::from(display.boid_scale)).map(|p| to_screen(p, width, height));
        draw.polygon().color(boid_color).points(points);

        let center = to_screen(boid.position, width, height);

        if display.show_vision_radius {
            draw.ellipse()
                .xy(center)
                .radius(params.vision_radius as f32)
                .no_fill()
                .stroke(WHITE)
                .stroke_weight(1.0);
        }

        if display.show_velocity_vectors && boid.velocity.length_squared() > 0.0 {
            let end = to_screen(boid.position + boid.velocity * VELOCITY_VECTOR_SCALE, width, height);
            draw.line().start(center).end(end).weight(2.0).color(GREEN);
        }

        if display.show_force_vectors && boid.last_acceleration.length_squared() > 0.0 {
            let end = to_screen(boid.position + boid.last_acceleration * FORCE_VECTOR_SCALE, width, height);
            draw.line().start(center).end(end).weight(2.0).color(RED);
        }
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "failed to draw frame");
    }

    model.last_render_time.set(Some(render_start.elapsed()));

    // Draw the egui UI
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(?err, "failed to draw control panel");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boid::BoidId;

    #[test]
    fn screen_mapping_centers_and_flips_y() {
        let p = to_screen(SimVec2::new(400.0, 300.0), 800.0, 600.0);
        assert_eq!((p.x, p.y), (0.0, 0.0));

        let p = to_screen(SimVec2::new(0.0, 0.0), 800.0, 600.0);
        assert_eq!((p.x, p.y), (-400.0, 300.0));
    }

    #[test]
    fn outline_tip_leads_along_velocity() {
        let boid = Boid::new(BoidId(0), SimVec2::new(100.0, 100.0), SimVec2::new(10.0, 0.0));
        let outline = boid_outline(&boid, 1.0);

        // Tip stays on the boid, the tail trails behind it in -x
        assert!((outline[0] - boid.position).length() < 1e-12);
        assert!((outline[2] - SimVec2::new(94.0, 100.0)).length() < 1e-9);
    }
}
