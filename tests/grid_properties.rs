//! Randomized sweeps over the grid geometry engine.
//!
//! Each test draws a few thousand configurations from a fixed-seed
//! generator, so failures are reproducible.

use sprite_animator::grid::{
    GridLayout, SpriteConfig, compute_grid, display_to_image, frame_rect, grid_lines, hit_test,
};

const CASES: usize = 2_000;

fn random_config(rng: &mut fastrand::Rng) -> SpriteConfig {
    SpriteConfig::new(rng.u32(0..=48), rng.u32(0..=48))
        .with_spacing(rng.u32(0..=6))
        .with_offset(rng.u32(0..=20), rng.u32(0..=20))
}

#[test]
fn total_is_columns_times_rows() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..CASES {
        let config = random_config(&mut rng);
        let (w, h) = (rng.u32(0..=300), rng.u32(0..=300));
        let layout = compute_grid(w, h, &config);
        assert_eq!(
            layout.total_frames,
            layout.columns * layout.rows,
            "{:?} on {}x{}",
            config,
            w,
            h
        );
        if config.frame_width == 0 || config.frame_height == 0 {
            assert_eq!(layout, GridLayout::EMPTY);
        }
        // Every populated cell lies inside the image.
        if let Some(last) = layout.total_frames.checked_sub(1) {
            let r = frame_rect(last, layout.columns, &config).unwrap();
            assert!(r.x + r.width <= w);
            assert!(r.y + r.height <= h);
        }
    }
}

#[test]
fn frame_centers_hit_their_own_index() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..CASES {
        let config = random_config(&mut rng);
        let (w, h) = (rng.u32(1..=256), rng.u32(1..=256));
        let layout = compute_grid(w, h, &config);
        for i in 0..layout.total_frames {
            let (cx, cy) = frame_rect(i, layout.columns, &config).unwrap().center();
            assert_eq!(hit_test(cx, cy, w, h, &config), Some(i), "{:?} frame {}", config, i);
        }
    }
}

#[test]
fn gutters_and_margins_never_hit() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..CASES {
        let config = random_config(&mut rng).with_spacing(rng.u32(1..=6));
        let (w, h) = (rng.u32(1..=256), rng.u32(1..=256));
        let layout = compute_grid(w, h, &config);
        if layout.is_empty() {
            continue;
        }
        // A point in the horizontal gutter right of column 0.
        let gx = (config.offset_x + config.frame_width) as f32 + 0.5;
        let gy = config.offset_y as f32 + 0.5;
        assert_eq!(hit_test(gx, gy, w, h, &config), None);
        // Left and top margins.
        if config.offset_x > 0 {
            assert_eq!(hit_test(config.offset_x as f32 - 0.5, gy, w, h, &config), None);
        }
        if config.offset_y > 0 {
            assert_eq!(hit_test(gx - 1.0, config.offset_y as f32 - 0.5, w, h, &config), None);
        }
    }
}

#[test]
fn grid_lines_bound_the_populated_area() {
    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..CASES {
        let config = random_config(&mut rng);
        let layout = compute_grid(rng.u32(0..=256), rng.u32(0..=256), &config);
        let lines = grid_lines(&layout, &config);
        if layout.is_empty() {
            assert!(lines.is_empty());
        } else {
            assert_eq!(lines.len(), layout.columns + layout.rows + 2);
        }
    }
}

#[test]
fn display_scaling_is_inverse_of_zoom() {
    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..CASES {
        let (iw, ih) = (rng.u32(1..=512), rng.u32(1..=512));
        let zoom = 0.25 + rng.f32() * 4.0;
        let display = (iw as f32 * zoom, ih as f32 * zoom);
        let (x, y) = (rng.f32() * iw as f32, rng.f32() * ih as f32);
        let (ix, iy) = display_to_image((x * zoom, y * zoom), display, (iw, ih));
        assert!((ix - x).abs() < 1e-2 * iw as f32);
        assert!((iy - y).abs() < 1e-2 * ih as f32);
    }
}
