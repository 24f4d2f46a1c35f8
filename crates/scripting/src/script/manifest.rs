//! Types every level script can rely on: level coordinates and the
//! table of alternative names for object kinds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A position in a level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// An axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeAliasError {
    #[error("alias '{alias}' cannot refer to itself")]
    SelfReference { alias: String },
    #[error("alias '{alias}' already refers to '{existing}'")]
    AlreadyDefined { alias: String, existing: String },
}

/// Alternative names for object kinds, so that e.g. both `Army` and
/// `Armadillo` address the same enemy.
#[derive(Debug, Clone, Default)]
pub struct TypeAliases {
    targets_by_alias: HashMap<String, String>,
}

impl TypeAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut aliases = Self::new();
        aliases
            .targets_by_alias
            .insert("Army".to_string(), "Armadillo".to_string());
        aliases
    }

    /// Makes `alias` another name for `target`. Aliases are not chained:
    /// the target is stored as given.
    pub fn register(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<(), TypeAliasError> {
        let alias = alias.into();
        let target = target.into();
        if alias == target {
            return Err(TypeAliasError::SelfReference { alias });
        }
        if let Some(existing) = self.targets_by_alias.get(&alias) {
            if *existing == target {
                return Ok(());
            }
            return Err(TypeAliasError::AlreadyDefined {
                existing: existing.clone(),
                alias,
            });
        }
        self.targets_by_alias.insert(alias, target);
        Ok(())
    }

    /// Canonical name for `name`; names without an alias map to themselves.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.targets_by_alias
            .get(name)
            .map(String::as_str)
            .unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.targets_by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets_by_alias.is_empty()
    }
}
