//! Giant jewel box: a box that throws out a batch of jewels the first time
//! it is activated and remembers that across save/load.
//!
//! ```ignore
//! let mut jewel_box = GiantJewelBox::new(14, 10, &level)?;
//! jewel_box.attach(&mut level);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::spawn::SpawnPolicy;
use crate::level::{
    ActivationContext, EventSource, ObjectHandle, ResolutionError, ResolveUid, SaveStore, Uid,
};

pub const JEWEL_SOUND: &str = "item/jewel_2.ogg";
pub const SAVE_NAMESPACE: &str = "_ssl";
pub const SAVE_KIND: &str = "giant_jewel_boxes";

/// Target of a behavior, either a raw UID or an already resolved handle.
#[derive(Debug, Clone)]
pub enum TargetRef {
    Uid(Uid),
    Handle(ObjectHandle),
}

impl TargetRef {
    fn resolve(self, objects: &impl ResolveUid) -> Result<ObjectHandle, ResolutionError> {
        match self {
            Self::Uid(uid) => objects.resolve(uid),
            Self::Handle(handle) if handle.is_alive() => Ok(handle),
            Self::Handle(handle) => Err(ResolutionError { uid: handle.uid() }),
        }
    }
}

impl From<Uid> for TargetRef {
    fn from(uid: Uid) -> Self {
        Self::Uid(uid)
    }
}

impl From<u64> for TargetRef {
    fn from(uid: u64) -> Self {
        Self::Uid(Uid(uid))
    }
}

impl From<ObjectHandle> for TargetRef {
    fn from(handle: ObjectHandle) -> Self {
        Self::Handle(handle)
    }
}

#[derive(Debug)]
struct JewelBoxState {
    count: u32,
    activated: bool,
    policy: SpawnPolicy,
}

impl JewelBoxState {
    fn on_activate(&mut self, target: &ObjectHandle, context: &mut ActivationContext<'_>) {
        if self.activated {
            debug!(uid = %target.uid(), "jewel_box_already_activated");
            return;
        }

        context.audio.play_sound(JEWEL_SOUND);
        match target.position() {
            Some(origin) => {
                for _ in 0..self.count {
                    let descriptor = self.policy.spawn_one(origin);
                    context.items.spawn_item(descriptor);
                }
            }
            None => warn!(uid = %target.uid(), "jewel_box_target_gone"),
        }
        self.activated = true;
        info!(uid = %target.uid(), count = self.count, "jewel_box_activated");
    }

    fn on_save(&self, uid: Uid, store: &mut SaveStore) {
        let key = uid.store_key();
        store.insert_at(
            &[SAVE_NAMESPACE, SAVE_KIND, key.as_str()],
            Value::Bool(self.activated),
        );
    }

    fn on_load(&mut self, uid: Uid, store: &SaveStore) {
        let key = uid.store_key();
        if let Some(activated) = store.get_bool(&[SAVE_NAMESPACE, SAVE_KIND, key.as_str()]) {
            self.activated = activated;
            debug!(uid = %uid, activated, "jewel_box_state_restored");
        }
    }
}

/// One-shot jewel spawner bound to a box in the level.
#[derive(Debug)]
pub struct GiantJewelBox {
    target: ObjectHandle,
    state: Rc<RefCell<JewelBoxState>>,
    attached: bool,
}

impl GiantJewelBox {
    /// Resolves `target` through `objects` and prepares a box holding
    /// `count` jewels.
    pub fn new(
        target: impl Into<TargetRef>,
        count: u32,
        objects: &impl ResolveUid,
    ) -> Result<Self, ResolutionError> {
        Self::with_policy(target, count, objects, SpawnPolicy::from_entropy())
    }

    pub fn with_policy(
        target: impl Into<TargetRef>,
        count: u32,
        objects: &impl ResolveUid,
        policy: SpawnPolicy,
    ) -> Result<Self, ResolutionError> {
        let target = target.into().resolve(objects)?;
        Ok(Self {
            target,
            state: Rc::new(RefCell::new(JewelBoxState {
                count,
                activated: false,
                policy,
            })),
            attached: false,
        })
    }

    /// Registers the activation, save and load listeners. Only the first
    /// call registers anything; later calls return `false`.
    pub fn attach(&mut self, events: &mut impl EventSource) -> bool {
        let uid = self.target.uid();
        if self.attached {
            warn!(uid = %uid, "jewel_box_already_attached");
            return false;
        }

        let state = Rc::clone(&self.state);
        let target = self.target.clone();
        events.on_activate(
            uid,
            Box::new(move |context: &mut ActivationContext<'_>| {
                state.borrow_mut().on_activate(&target, context)
            }),
        );

        let state = Rc::clone(&self.state);
        events.on_save(Box::new(move |store: &mut SaveStore| {
            state.borrow().on_save(uid, store)
        }));

        let state = Rc::clone(&self.state);
        events.on_load(Box::new(move |store: &SaveStore| {
            state.borrow_mut().on_load(uid, store)
        }));

        self.attached = true;
        true
    }

    pub fn target(&self) -> &ObjectHandle {
        &self.target
    }

    pub fn count(&self) -> u32 {
        self.state.borrow().count
    }

    pub fn set_count(&mut self, count: u32) {
        self.state.borrow_mut().count = count;
    }

    pub fn is_activated(&self) -> bool {
        self.state.borrow().activated
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }
}
