use scripting::{AudioSink, ItemWorld, JewelColor, Point, SpawnDescriptor};
use tracing::{debug, info};

const GRAVITY_PER_TICK: f32 = 2.0;
const VELOCITY_SCALE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FallingJewel {
    pub(crate) position: Point,
    pub(crate) velocity_x: f32,
    pub(crate) velocity_y: f32,
    pub(crate) color: JewelColor,
    pub(crate) resting: bool,
}

/// Jewels thrown into the demo level. Spawn requests are queued and join
/// the field on the next step; level y grows downward and jewels come to
/// rest on `floor_y`.
#[derive(Debug)]
pub(crate) struct JewelField {
    floor_y: f32,
    jewels: Vec<FallingJewel>,
    pending: Vec<FallingJewel>,
}

impl JewelField {
    pub(crate) fn new(floor_y: f32) -> Self {
        Self {
            floor_y,
            jewels: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(crate) fn jewels(&self) -> &[FallingJewel] {
        &self.jewels
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn count_color(&self, color: JewelColor) -> usize {
        self.jewels
            .iter()
            .filter(|jewel| jewel.color == color)
            .count()
    }

    pub(crate) fn all_resting(&self) -> bool {
        self.pending.is_empty() && self.jewels.iter().all(|jewel| jewel.resting)
    }

    pub(crate) fn step(&mut self) {
        self.jewels.append(&mut self.pending);
        let floor_y = self.floor_y;
        for jewel in self.jewels.iter_mut().filter(|jewel| !jewel.resting) {
            jewel.position.x += jewel.velocity_x * VELOCITY_SCALE;
            jewel.position.y += jewel.velocity_y * VELOCITY_SCALE;
            jewel.velocity_y += GRAVITY_PER_TICK;
            if jewel.position.y >= floor_y {
                jewel.position.y = floor_y;
                jewel.resting = true;
            }
        }
    }
}

impl ItemWorld for JewelField {
    fn spawn_item(&mut self, descriptor: SpawnDescriptor) {
        debug!(
            x = descriptor.position.x,
            y = descriptor.position.y,
            color = ?descriptor.color,
            "jewel_spawn_queued"
        );
        self.pending.push(FallingJewel {
            position: descriptor.position,
            // Thrown upward: negative y is up.
            velocity_x: descriptor.velocity_x as f32,
            velocity_y: -(descriptor.velocity_y as f32),
            color: descriptor.color,
            resting: false,
        });
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoggedAudio {
    played: usize,
}

impl LoggedAudio {
    pub(crate) fn played(&self) -> usize {
        self.played
    }
}

impl AudioSink for LoggedAudio {
    fn play_sound(&mut self, resource_name: &str) {
        self.played += 1;
        info!(sound = resource_name, "play_sound");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(velocity_x: i32, velocity_y: i32, color: JewelColor) -> SpawnDescriptor {
        SpawnDescriptor {
            position: Point { x: 100.0, y: 270.0 },
            color,
            velocity_x,
            velocity_y,
        }
    }

    #[test]
    fn spawns_join_on_next_step() {
        let mut field = JewelField::new(300.0);
        field.spawn_item(descriptor(0, 10, JewelColor::Yellow));
        assert_eq!(field.pending_count(), 1);
        assert!(field.jewels().is_empty());

        field.step();
        assert_eq!(field.pending_count(), 0);
        assert_eq!(field.jewels().len(), 1);
    }

    #[test]
    fn thrown_jewel_rises_then_lands_on_floor() {
        let mut field = JewelField::new(300.0);
        field.spawn_item(descriptor(10, 60, JewelColor::Red));
        field.step();
        assert!(field.jewels()[0].position.y < 270.0);

        for _ in 0..200 {
            field.step();
        }
        let jewel = field.jewels()[0];
        assert!(jewel.resting);
        assert_eq!(jewel.position.y, 300.0);
        assert!(jewel.position.x > 100.0);
        assert!(field.all_resting());
    }

    #[test]
    fn counts_by_color() {
        let mut field = JewelField::new(300.0);
        field.spawn_item(descriptor(0, 0, JewelColor::Yellow));
        field.spawn_item(descriptor(0, 0, JewelColor::Yellow));
        field.spawn_item(descriptor(0, 0, JewelColor::Red));
        field.step();
        assert_eq!(field.count_color(JewelColor::Yellow), 2);
        assert_eq!(field.count_color(JewelColor::Red), 1);
    }

    #[test]
    fn logged_audio_counts_cues() {
        let mut audio = LoggedAudio::default();
        audio.play_sound("item/jewel_2.ogg");
        audio.play_sound("item/jewel_2.ogg");
        assert_eq!(audio.played(), 2);
    }
}
