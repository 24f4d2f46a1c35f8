use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::events::{
    ActivationListener, EventBus, EventSource, ListenerId, LoadListener, SaveListener,
};
use super::savegame::{read_save_game, write_save_game, SaveGame, SaveGameError};
use super::services::{AudioSink, ItemWorld};
use super::store::SaveStore;
use super::uid::{LevelObject, ObjectHandle, ResolutionError, ResolveUid, Uid, UidTable};
use crate::script::{Point, TypeAliases};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level object uid {uid} is already assigned in this level")]
    DuplicateUid { uid: Uid },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// One loaded level: its objects, listener registry and the engine
/// services listeners reach during event delivery.
pub struct Level<A, W> {
    name: String,
    objects: UidTable,
    events: EventBus,
    aliases: TypeAliases,
    audio: A,
    items: W,
}

impl<A: AudioSink, W: ItemWorld> Level<A, W> {
    pub fn new(name: impl Into<String>, audio: A, items: W) -> Self {
        Self {
            name: name.into(),
            objects: UidTable::new(),
            events: EventBus::new(),
            aliases: TypeAliases::with_defaults(),
            audio,
            items,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> &UidTable {
        &self.objects
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn items(&self) -> &W {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut W {
        &mut self.items
    }

    /// Adds `object` to the level under its canonical kind name. UIDs of
    /// removed objects are never handed out again.
    pub fn insert_object(&mut self, mut object: LevelObject) -> Result<ObjectHandle, LevelError> {
        let canonical = self.aliases.resolve(&object.kind).to_string();
        if canonical != object.kind {
            debug!(alias = %object.kind, kind = %canonical, "object_kind_alias_resolved");
            object.kind = canonical;
        }
        let uid = object.uid;
        self.objects
            .insert(object)
            .ok_or(LevelError::DuplicateUid { uid })
    }

    pub fn remove_object(&mut self, uid: Uid) -> Option<LevelObject> {
        self.objects.remove(uid)
    }

    pub fn move_object(&mut self, uid: Uid, position: Point) -> Result<(), LevelError> {
        self.objects.set_position(uid, position)?;
        Ok(())
    }

    /// Fires the activation event of the object `uid`. Returns how many
    /// listeners ran.
    pub fn activate(&mut self, uid: Uid) -> Result<usize, ResolutionError> {
        if !self.objects.contains(uid) {
            return Err(ResolutionError { uid });
        }
        let Self {
            events,
            audio,
            items,
            ..
        } = self;
        let invoked = events.publish_activate(uid, audio, items);
        debug!(uid = %uid, listeners = invoked, "object_activated");
        Ok(invoked)
    }

    /// Runs a save pass: every save listener writes into `store`.
    pub fn save(&mut self, store: &mut SaveStore) -> usize {
        let invoked = self.events.publish_save(store);
        debug!(level = %self.name, listeners = invoked, "save_pass_complete");
        invoked
    }

    /// Runs a load pass: every load listener reads from `store`.
    pub fn load(&mut self, store: &SaveStore) -> usize {
        let invoked = self.events.publish_load(store);
        debug!(level = %self.name, listeners = invoked, "load_pass_complete");
        invoked
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<SaveGame, SaveGameError> {
        let mut store = SaveStore::new();
        self.save(&mut store);
        let save = SaveGame::new(self.name.clone(), store);
        write_save_game(path, &save)?;
        info!(level = %self.name, path = %path.display(), "level_saved");
        Ok(save)
    }

    /// Restores from the save at `path`. Returns `false` without running a
    /// load pass when no save exists yet.
    pub fn load_from_path(&mut self, path: &Path) -> Result<bool, SaveGameError> {
        let Some(save) = read_save_game(path, &self.name)? else {
            info!(level = %self.name, path = %path.display(), "no_save_found");
            return Ok(false);
        };
        self.load(&save.store);
        info!(level = %self.name, path = %path.display(), "level_loaded");
        Ok(true)
    }

    /// Tears the level down: listeners go first, then the objects.
    pub fn clear(&mut self) {
        self.events.clear();
        self.objects.clear();
    }
}

impl<A, W> EventSource for Level<A, W> {
    fn on_activate(&mut self, target: Uid, listener: ActivationListener) -> ListenerId {
        self.events.on_activate(target, listener)
    }

    fn on_save(&mut self, listener: SaveListener) -> ListenerId {
        self.events.on_save(listener)
    }

    fn on_load(&mut self, listener: LoadListener) -> ListenerId {
        self.events.on_load(listener)
    }
}

impl<A, W> ResolveUid for Level<A, W> {
    fn resolve(&self, uid: Uid) -> Result<ObjectHandle, ResolutionError> {
        self.objects.resolve(uid)
    }
}
