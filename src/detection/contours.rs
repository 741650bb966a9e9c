use image::{GrayImage, Luma};
use imageproc::region_labelling::{Connectivity, connected_components};
use std::collections::{HashMap, VecDeque};

use crate::config::AnalyzerConfig;
use crate::detection::{moments, preprocessing};
use crate::models::{Frame, Point, RegionBoundary};

/// Blur, binarize and return the outer boundary of every bright region whose
/// enclosed area reaches `config.min_area`.
pub fn extract(frame: &Frame, config: &AnalyzerConfig) -> Vec<RegionBoundary> {
    let blurred =
        preprocessing::apply_blur(&frame.gray, config.blur_radius, config.blur_sigma());
    let mask = preprocessing::binarize(&blurred, config.threshold);

    find_external_boundaries(&mask)
        .into_iter()
        .filter(|boundary| {
            moments::polygon_moments(&boundary.points).area() >= config.min_area
        })
        .collect()
}

/// Trace the outer boundary of every external 8-connected foreground
/// component in a binary mask (non-zero = foreground).
///
/// Components sitting inside a hole of another component are skipped.
/// Boundaries come out in raster order of each component's first pixel.
pub fn find_external_boundaries(mask: &GrayImage) -> Vec<RegionBoundary> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let labeled = connected_components(mask, Connectivity::Eight, Luma([0u8]));
    let outside = outside_background(mask);

    // First pixel of every component in raster order, and whether the
    // component borders the outer background anywhere
    let mut index_of: HashMap<u32, usize> = HashMap::new();
    let mut starts: Vec<(u32, u32)> = Vec::new();
    let mut external: Vec<bool> = Vec::new();

    for (x, y, label) in labeled.enumerate_pixels() {
        let label = label[0];
        if label == 0 {
            continue;
        }

        let idx = *index_of.entry(label).or_insert_with(|| {
            starts.push((x, y));
            external.push(false);
            starts.len() - 1
        });

        if !external[idx] && borders_outside(&outside, x, y, width, height) {
            external[idx] = true;
        }
    }

    starts
        .into_iter()
        .zip(external)
        .filter(|(_, is_external)| *is_external)
        .map(|((x, y), _)| trace_outer_boundary(mask, x, y))
        .collect()
}

/// Background pixels reachable from outside the image through 4-connected
/// background.
fn outside_background(mask: &GrayImage) -> Vec<bool> {
    let (width, height) = mask.dimensions();
    let idx = |x: u32, y: u32| (y * width + x) as usize;

    let mut outside = vec![false; (width * height) as usize];
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            let on_edge = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if on_edge && mask.get_pixel(x, y)[0] == 0 {
                outside[idx(x, y)] = true;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x.wrapping_sub(1), y),
            (x + 1, y),
            (x, y.wrapping_sub(1)),
            (x, y + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= width || ny >= height {
                continue;
            }
            let i = idx(nx, ny);
            if !outside[i] && mask.get_pixel(nx, ny)[0] == 0 {
                outside[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    outside
}

fn borders_outside(outside: &[bool], x: u32, y: u32, width: u32, height: u32) -> bool {
    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        return true;
    }
    let idx = |x: u32, y: u32| (y * width + x) as usize;
    outside[idx(x - 1, y)]
        || outside[idx(x + 1, y)]
        || outside[idx(x, y - 1)]
        || outside[idx(x, y + 1)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::North => (0, -1),
        }
    }

    // Image coordinates: y grows downwards
    fn turn_left(self) -> Self {
        match self {
            Direction::East => Direction::North,
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
        }
    }

    fn turn_right(self) -> Self {
        match self {
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
            Direction::North => Direction::East,
        }
    }
}

fn step(p: Point, dir: Direction) -> Point {
    let (dx, dy) = dir.delta();
    Point::new(p.x + dx, p.y + dy)
}

fn is_foreground(mask: &GrayImage, x: i32, y: i32) -> bool {
    if x < 0 || y < 0 || x >= mask.width() as i32 || y >= mask.height() as i32 {
        return false;
    }
    mask.get_pixel(x as u32, y as u32)[0] != 0
}

/// Pixel touching corner `p` in the quadrant `(qx, qy)`, each component ±1.
fn pixel_in_quadrant(p: Point, qx: i32, qy: i32) -> (i32, i32) {
    let px = if qx > 0 { p.x } else { p.x - 1 };
    let py = if qy > 0 { p.y } else { p.y - 1 };
    (px, py)
}

/// Direction to leave corner `pos` when arriving along `dir` with the
/// region on the right-hand side. Diagonal contact counts as connected.
fn next_direction(mask: &GrayImage, pos: Point, dir: Direction) -> Direction {
    let (dx, dy) = dir.delta();
    let (lx, ly) = dir.turn_left().delta();
    let (rx, ry) = dir.turn_right().delta();

    let (ax, ay) = pixel_in_quadrant(pos, dx + lx, dy + ly);
    let (bx, by) = pixel_in_quadrant(pos, dx + rx, dy + ry);

    if is_foreground(mask, ax, ay) {
        dir.turn_left()
    } else if is_foreground(mask, bx, by) {
        dir
    } else {
        dir.turn_right()
    }
}

/// Follow pixel edges clockwise around the component whose first raster
/// pixel is `(sx, sy)`, recording only the corners where the path turns.
fn trace_outer_boundary(mask: &GrayImage, sx: u32, sy: u32) -> RegionBoundary {
    // The top-left corner of the first pixel always lies on the outer
    // boundary, and the edge leaving it eastwards has the region below it
    let start = Point::new(sx as i32, sy as i32);
    let mut points = vec![start];
    let mut dir = Direction::East;
    let mut pos = step(start, dir);

    loop {
        let next = next_direction(mask, pos, dir);
        if pos == start && next == Direction::East {
            break;
        }
        if next != dir {
            points.push(pos);
        }
        pos = step(pos, next);
        dir = next;
    }

    RegionBoundary::new(points)
}
