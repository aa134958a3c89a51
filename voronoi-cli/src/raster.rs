//! Software rendering surface: draws diagram primitives into an RGB image.

use voronoi_core::{RenderSurface, Vertex};

pub const BACKGROUND: image::Rgb<u8> = image::Rgb([0, 0, 0]);
pub const LINE_COLOR: image::Rgb<u8> = image::Rgb([255, 255, 255]);
pub const POINT_COLOR: image::Rgb<u8> = image::Rgb([255, 64, 64]);

/// Image surface with the world origin at its center and y pointing up.
pub struct RasterSurface {
    image: image::RgbImage,
    /// Half-size of the square drawn for each point (0 = single pixel)
    point_radius: i32,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, point_radius: u32) -> Self {
        Self {
            image: image::RgbImage::from_pixel(width, height, BACKGROUND),
            point_radius: point_radius as i32,
        }
    }

    pub fn image(&self) -> &image::RgbImage {
        &self.image
    }

    pub fn into_image(self) -> image::RgbImage {
        self.image
    }

    /// World position to pixel position
    fn to_pixel(&self, v: &Vertex) -> (f64, f64) {
        let cx = self.image.width() as f64 / 2.0;
        let cy = self.image.height() as f64 / 2.0;
        (cx + v[0] as f64, cy - v[1] as f64)
    }

    fn put(&mut self, px: i64, py: i64, color: image::Rgb<u8>) {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        if px >= 0 && px < w && py >= 0 && py < h {
            self.image.put_pixel(px as u32, py as u32, color);
        }
    }

    /// DDA line between two pixel positions
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: image::Rgb<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        if !steps.is_finite() {
            return;
        }
        let steps = steps as i64;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + dx * t;
            let y = from.1 + dy * t;
            self.put(x.floor() as i64, y.floor() as i64, color);
        }
    }
}

impl RenderSurface for RasterSurface {
    fn draw_points(&mut self, points: &[Vertex]) {
        let r = self.point_radius as i64;
        for p in points {
            let (x, y) = self.to_pixel(p);
            let (cx, cy) = (x.floor() as i64, y.floor() as i64);
            for dy in -r..=r {
                for dx in -r..=r {
                    self.put(cx + dx, cy + dy, POINT_COLOR);
                }
            }
        }
    }

    fn draw_lines(&mut self, lines: &[Vertex]) {
        for pair in lines.chunks_exact(2) {
            let from = self.to_pixel(&pair[0]);
            let to = self.to_pixel(&pair[1]);
            self.line(from, to, LINE_COLOR);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_center() {
        let mut surface = RasterSurface::new(10, 10, 0);
        surface.draw_points(&[[0.0, 0.0, 0.0]]);
        assert_eq!(*surface.image().get_pixel(5, 5), POINT_COLOR);
    }

    #[test]
    fn test_y_axis_points_up() {
        let mut surface = RasterSurface::new(10, 10, 0);
        surface.draw_points(&[[0.0, 4.0, 0.0]]);
        assert_eq!(*surface.image().get_pixel(5, 1), POINT_COLOR);
    }

    #[test]
    fn test_horizontal_line() {
        let mut surface = RasterSurface::new(10, 10, 0);
        surface.draw_lines(&[[-5.0, 0.0, 0.0], [4.0, 0.0, 0.0]]);
        for x in 0..10 {
            assert_eq!(*surface.image().get_pixel(x, 5), LINE_COLOR, "x={}", x);
        }
        assert_eq!(*surface.image().get_pixel(0, 4), BACKGROUND);
    }

    #[test]
    fn test_out_of_bounds_is_clipped() {
        let mut surface = RasterSurface::new(4, 4, 2);
        surface.draw_points(&[[100.0, 100.0, 0.0]]);
        surface.draw_lines(&[[-50.0, 0.0, 0.0], [50.0, 0.0, 0.0]]);
        assert_eq!(*surface.image().get_pixel(0, 2), LINE_COLOR);
    }
}
