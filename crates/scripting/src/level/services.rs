use crate::script::SpawnDescriptor;

/// Fire-and-forget sound playback.
pub trait AudioSink {
    fn play_sound(&mut self, resource_name: &str);
}

/// Materializes spawned items. Lifetime and physics of the item belong to
/// the implementor.
pub trait ItemWorld {
    fn spawn_item(&mut self, descriptor: SpawnDescriptor);
}

impl AudioSink for Vec<String> {
    fn play_sound(&mut self, resource_name: &str) {
        self.push(resource_name.to_string());
    }
}

impl ItemWorld for Vec<SpawnDescriptor> {
    fn spawn_item(&mut self, descriptor: SpawnDescriptor) {
        self.push(descriptor);
    }
}
