//! The JSON configuration document.
//!
//! ```json
//! { "version": 1, "units": [{ "x": 0, "y": 0, "color": [255, 0, 0] }] }
//! ```
//!
//! `color` may be omitted, in which case the unit gets
//! [`Color::DEFAULT`]. Units are listed in insertion order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use morph_core::{Color, Pos};
use morph_world::World;

use crate::error::ReplayError;
use crate::CONFIG_VERSION;

/// One unit in a [`ConfigurationFile`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// RGB color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
}

impl UnitEntry {
    /// Cell of this unit.
    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }
}

/// A persisted configuration of units.
///
/// # Examples
///
/// ```
/// use morph_replay::ConfigurationFile;
/// use morph_world::World;
///
/// let file = ConfigurationFile::from_json(
///     r#"{ "version": 1, "units": [{ "x": 0, "y": 0 }, { "x": 1, "y": 0 }] }"#,
/// )
/// .unwrap();
/// let mut world = World::new();
/// file.apply(&mut world).unwrap();
/// assert_eq!(world.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationFile {
    /// Document version; only [`CONFIG_VERSION`] is understood.
    pub version: u32,
    /// The units.
    pub units: Vec<UnitEntry>,
}

impl ConfigurationFile {
    /// Capture every unit of `world`, colors included.
    pub fn capture(world: &World) -> Self {
        Self {
            version: CONFIG_VERSION,
            units: world
                .units()
                .map(|u| UnitEntry {
                    x: u.pos().x,
                    y: u.pos().y,
                    color: Some(u.color().0),
                })
                .collect(),
        }
    }

    /// Parse a document and check its version.
    pub fn from_json(text: &str) -> Result<Self, ReplayError> {
        let file: Self = serde_json::from_str(text)?;
        file.check_version()?;
        Ok(file)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Write the document to disk, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Add every unit to `world`, which must be empty.
    ///
    /// The whole document is checked before the first unit is added, so
    /// `world` is left untouched on error.
    pub fn apply(&self, world: &mut World) -> Result<(), ReplayError> {
        self.check_version()?;
        if !world.is_empty() {
            return Err(ReplayError::WorldNotEmpty { units: world.len() });
        }
        let mut seen = HashSet::with_capacity(self.units.len());
        if let Some(dup) = self.units.iter().map(UnitEntry::pos).find(|p| !seen.insert(*p)) {
            return Err(ReplayError::DuplicatePosition { pos: dup });
        }
        for u in &self.units {
            world.add(u.pos(), u.color.map(Color).unwrap_or_default())?;
        }
        Ok(())
    }

    /// A fresh world holding this configuration.
    pub fn to_world(&self) -> Result<World, ReplayError> {
        let mut world = World::new();
        self.apply(&mut world)?;
        Ok(world)
    }

    fn check_version(&self) -> Result<(), ReplayError> {
        if self.version != CONFIG_VERSION {
            return Err(ReplayError::UnsupportedVersion {
                found: self.version,
            });
        }
        Ok(())
    }
}
