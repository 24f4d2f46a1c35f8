use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::manifest::Point;

/// Items spawn this far above the origin they are thrown from.
pub const SPAWN_VERTICAL_OFFSET: f32 = 30.0;
pub const MAX_VELOCITY_Y: i32 = 60;
pub const MAX_ABS_VELOCITY_X: i32 = 10;
/// Draws in `0..COLOR_DRAW_RANGE` at or below this value are yellow.
const YELLOW_DRAW_MAX: u32 = 7;
const COLOR_DRAW_RANGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JewelColor {
    Yellow,
    Red,
}

/// One item to materialize: where it starts, how it is thrown and which
/// variant it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDescriptor {
    pub position: Point,
    pub color: JewelColor,
    pub velocity_x: i32,
    pub velocity_y: i32,
}

/// Randomized spawn batches for jewel boxes. Every descriptor is drawn
/// independently.
#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    rng: StdRng,
}

impl SpawnPolicy {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn spawn_one(&mut self, origin: Point) -> SpawnDescriptor {
        let color = if self.rng.gen_range(0..COLOR_DRAW_RANGE) <= YELLOW_DRAW_MAX {
            JewelColor::Yellow
        } else {
            JewelColor::Red
        };
        SpawnDescriptor {
            position: Point {
                x: origin.x,
                y: origin.y - SPAWN_VERTICAL_OFFSET,
            },
            color,
            velocity_y: self.rng.gen_range(0..=MAX_VELOCITY_Y),
            velocity_x: self.rng.gen_range(-MAX_ABS_VELOCITY_X..=MAX_ABS_VELOCITY_X),
        }
    }
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Point = Point { x: 400.0, y: -120.0 };

    #[test]
    fn descriptor_starts_above_origin() {
        let mut policy = SpawnPolicy::seeded(1);
        let descriptor = policy.spawn_one(ORIGIN);
        assert_eq!(descriptor.position, Point { x: 400.0, y: -150.0 });
    }

    #[test]
    fn descriptors_stay_in_bounds() {
        let mut policy = SpawnPolicy::seeded(42);
        for _ in 0..10_000 {
            let descriptor = policy.spawn_one(ORIGIN);
            assert!((0..=MAX_VELOCITY_Y).contains(&descriptor.velocity_y));
            assert!((-MAX_ABS_VELOCITY_X..=MAX_ABS_VELOCITY_X).contains(&descriptor.velocity_x));
        }
    }

    #[test]
    fn velocity_ranges_are_covered_inclusively() {
        let mut policy = SpawnPolicy::seeded(7);
        let mut seen_y = [false; (MAX_VELOCITY_Y + 1) as usize];
        let mut seen_x = [false; (2 * MAX_ABS_VELOCITY_X + 1) as usize];
        for _ in 0..20_000 {
            let descriptor = policy.spawn_one(ORIGIN);
            seen_y[descriptor.velocity_y as usize] = true;
            seen_x[(descriptor.velocity_x + MAX_ABS_VELOCITY_X) as usize] = true;
        }
        assert!(seen_y.iter().all(|seen| *seen));
        assert!(seen_x.iter().all(|seen| *seen));
    }

    #[test]
    fn colors_are_mostly_yellow() {
        let mut policy = SpawnPolicy::seeded(2024);
        let samples = 50_000;
        let yellow = (0..samples)
            .filter(|_| policy.spawn_one(ORIGIN).color == JewelColor::Yellow)
            .count();
        let ratio = yellow as f64 / samples as f64;
        assert!((0.78..=0.82).contains(&ratio), "yellow ratio {ratio}");
    }

    #[test]
    fn same_seed_gives_same_batch() {
        let mut a = SpawnPolicy::seeded(9);
        let mut b = SpawnPolicy::seeded(9);
        let batch_a: Vec<_> = (0..16).map(|_| a.spawn_one(ORIGIN)).collect();
        let batch_b: Vec<_> = (0..16).map(|_| b.spawn_one(ORIGIN)).collect();
        assert_eq!(batch_a, batch_b);
    }
}
