use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::script::{Point, Rect};

/// Stable identity the engine assigns to a level object. Unique within a
/// level and never reassigned while the level instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uid(pub u64);

impl Uid {
    /// Key used for this object inside save-store mappings.
    pub fn store_key(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Uid {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no live level object with uid {uid}")]
pub struct ResolutionError {
    pub uid: Uid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelObject {
    pub uid: Uid,
    pub kind: String,
    pub rect: Rect,
}

impl LevelObject {
    pub fn new(uid: impl Into<Uid>, kind: impl Into<String>, rect: Rect) -> Self {
        Self {
            uid: uid.into(),
            kind: kind.into(),
            rect,
        }
    }

    pub fn position(&self) -> Point {
        self.rect.origin()
    }
}

/// Non-owning reference to a level object. The UID is captured at
/// resolution time so it stays readable after the object is torn down.
#[derive(Debug, Clone)]
pub struct ObjectHandle {
    uid: Uid,
    object: Weak<RefCell<LevelObject>>,
}

impl ObjectHandle {
    pub fn uid(&self) -> Uid {
        self.uid
    }

    pub fn is_alive(&self) -> bool {
        self.object.strong_count() > 0
    }

    /// Current position of the object, or `None` once it has been removed.
    pub fn position(&self) -> Option<Point> {
        self.object
            .upgrade()
            .map(|object| object.borrow().position())
    }

    pub fn kind(&self) -> Option<String> {
        self.object
            .upgrade()
            .map(|object| object.borrow().kind.clone())
    }
}

/// Lookup from UID to live object handle.
pub trait ResolveUid {
    fn resolve(&self, uid: Uid) -> Result<ObjectHandle, ResolutionError>;
}

/// Live objects by UID. A removed object's UID stays retired until the
/// table is cleared.
#[derive(Debug, Default)]
pub struct UidTable {
    objects: HashMap<Uid, Rc<RefCell<LevelObject>>>,
    retired: HashSet<Uid>,
}

impl UidTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `object`. Returns `None` when its UID is live or was
    /// retired by an earlier removal.
    pub fn insert(&mut self, object: LevelObject) -> Option<ObjectHandle> {
        let uid = object.uid;
        if self.objects.contains_key(&uid) || self.retired.contains(&uid) {
            return None;
        }
        let object = Rc::new(RefCell::new(object));
        let handle = ObjectHandle {
            uid,
            object: Rc::downgrade(&object),
        };
        self.objects.insert(uid, object);
        Some(handle)
    }

    pub fn remove(&mut self, uid: Uid) -> Option<LevelObject> {
        let object = self.objects.remove(&uid)?;
        self.retired.insert(uid);
        Some(match Rc::try_unwrap(object) {
            Ok(cell) => cell.into_inner(),
            Err(shared) => shared.borrow().clone(),
        })
    }

    pub fn contains(&self, uid: Uid) -> bool {
        self.objects.contains_key(&uid)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn set_position(&mut self, uid: Uid, position: Point) -> Result<(), ResolutionError> {
        let object = self.objects.get(&uid).ok_or(ResolutionError { uid })?;
        let mut object = object.borrow_mut();
        object.rect.x = position.x;
        object.rect.y = position.y;
        Ok(())
    }

    pub fn is_retired(&self, uid: Uid) -> bool {
        self.retired.contains(&uid)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.retired.clear();
    }
}

impl ResolveUid for UidTable {
    fn resolve(&self, uid: Uid) -> Result<ObjectHandle, ResolutionError> {
        self.objects
            .get(&uid)
            .map(|object| ObjectHandle {
                uid,
                object: Rc::downgrade(object),
            })
            .ok_or(ResolutionError { uid })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_at(uid: u64, x: f32, y: f32) -> LevelObject {
        LevelObject::new(
            uid,
            "box",
            Rect {
                x,
                y,
                width: 43.0,
                height: 43.0,
            },
        )
    }

    #[test]
    fn resolve_returns_handle_for_live_object() {
        let mut table = UidTable::new();
        table.insert(box_at(14, 100.0, 200.0)).expect("insert");

        let handle = table.resolve(Uid(14)).expect("resolve");
        assert_eq!(handle.uid(), Uid(14));
        assert_eq!(handle.position(), Some(Point { x: 100.0, y: 200.0 }));
        assert_eq!(handle.kind().as_deref(), Some("box"));
    }

    #[test]
    fn resolve_unknown_uid_fails() {
        let table = UidTable::new();
        let error = table.resolve(Uid(3)).expect_err("unknown uid");
        assert_eq!(error, ResolutionError { uid: Uid(3) });
        assert_eq!(error.to_string(), "no live level object with uid 3");
    }

    #[test]
    fn duplicate_uid_is_rejected() {
        let mut table = UidTable::new();
        assert!(table.insert(box_at(1, 0.0, 0.0)).is_some());
        assert!(table.insert(box_at(1, 5.0, 5.0)).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn handle_observes_removal_but_keeps_uid() {
        let mut table = UidTable::new();
        let handle = table.insert(box_at(7, 1.0, 2.0)).expect("insert");
        assert!(handle.is_alive());

        let removed = table.remove(Uid(7)).expect("removed");
        assert_eq!(removed.uid, Uid(7));
        assert!(!handle.is_alive());
        assert_eq!(handle.position(), None);
        assert_eq!(handle.uid(), Uid(7));
        assert!(table.resolve(Uid(7)).is_err());
    }

    #[test]
    fn reinserting_removed_uid_is_rejected() {
        let mut table = UidTable::new();
        let stale = table.insert(box_at(14, 0.0, 0.0)).expect("insert");
        table.remove(Uid(14)).expect("removed");
        assert!(table.is_retired(Uid(14)));

        assert!(table.insert(box_at(14, 50.0, 50.0)).is_none());
        assert!(!table.contains(Uid(14)));
        assert!(!stale.is_alive());

        table.clear();
        assert!(!table.is_retired(Uid(14)));
        assert!(table.insert(box_at(14, 50.0, 50.0)).is_some());
    }

    #[test]
    fn handle_sees_moved_position() {
        let mut table = UidTable::new();
        let handle = table.insert(box_at(2, 0.0, 0.0)).expect("insert");
        table
            .set_position(Uid(2), Point { x: 32.0, y: -16.0 })
            .expect("move");
        assert_eq!(handle.position(), Some(Point { x: 32.0, y: -16.0 }));
        assert!(table.set_position(Uid(9), Point::default()).is_err());
    }

    #[test]
    fn uid_store_key_is_decimal() {
        assert_eq!(Uid(14).store_key(), "14");
    }
}
