mod events;
mod runtime;
mod savegame;
mod services;
mod store;
mod uid;

pub use events::{
    ActivationContext, ActivationListener, EventBus, EventSource, ListenerId, LoadListener,
    SaveListener,
};
pub use runtime::{Level, LevelError};
pub use savegame::{read_save_game, write_save_game, SaveGame, SaveGameError, SAVE_VERSION};
pub use services::{AudioSink, ItemWorld};
pub use store::SaveStore;
pub use uid::{LevelObject, ObjectHandle, ResolutionError, ResolveUid, Uid, UidTable};
