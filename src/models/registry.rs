use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// One building in the registry: its booking-site code and its rooms grouped
/// by floor (room name -> seating capacity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub code: String,
    pub floors: BTreeMap<String, BTreeMap<String, u32>>,
}

/// Static per-building room inventory, loaded once at startup.
///
/// The registry is supplementary, not authoritative: rooms that appear in a
/// reservation snapshot but not here are still reported. Its job is the
/// reverse direction, reporting rooms with zero reservations as fully free.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomRegistry {
    #[serde(flatten)]
    pub buildings: BTreeMap<String, Building>,
}

impl RoomRegistry {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read room registry {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let registry: RoomRegistry =
            serde_json::from_str(raw).context("failed to parse room registry JSON")?;
        registry.validate()?;
        Ok(registry)
    }

    /// Validate once at load time: positive capacities, no duplicate room
    /// name within a building, no duplicate building codes.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut codes = BTreeSet::new();
        for (name, building) in &self.buildings {
            if building.code.is_empty() {
                return Err(EngineError::InvalidConfiguration(format!(
                    "building {name} has an empty code"
                )));
            }
            if !codes.insert(&building.code) {
                return Err(EngineError::InvalidConfiguration(format!(
                    "duplicate building code {}",
                    building.code
                )));
            }
            let mut seen = BTreeSet::new();
            for (floor, rooms) in &building.floors {
                for (room, capacity) in rooms {
                    if *capacity == 0 {
                        return Err(EngineError::InvalidConfiguration(format!(
                            "room {room} on {floor} of {name} has zero capacity"
                        )));
                    }
                    if !seen.insert(room) {
                        return Err(EngineError::InvalidConfiguration(format!(
                            "duplicate room {room} in {name}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Find the building whose name occurs in free text. Longest match wins
    /// so that a building whose name contains another's is not shadowed.
    pub fn match_building<'a>(&'a self, text: &str) -> Option<&'a str> {
        self.buildings
            .keys()
            .filter(|name| text.contains(name.as_str()))
            .max_by_key(|name| name.len())
            .map(|name| name.as_str())
    }

    pub fn code_for(&self, building: &str) -> Result<&str, EngineError> {
        self.buildings
            .get(building)
            .map(|b| b.code.as_str())
            .ok_or_else(|| EngineError::UnknownBuilding(building.to_string()))
    }

    /// All room names of a building, across floors.
    pub fn rooms_for(&self, building: &str) -> Result<Vec<String>, EngineError> {
        let b = self
            .buildings
            .get(building)
            .ok_or_else(|| EngineError::UnknownBuilding(building.to_string()))?;
        Ok(b.floors
            .values()
            .flat_map(|rooms| rooms.keys().cloned())
            .collect())
    }

    /// Floor and capacity of a room, if the registry knows it.
    pub fn room_location(&self, building: &str, room: &str) -> Option<(&str, u32)> {
        let b = self.buildings.get(building)?;
        for (floor, rooms) in &b.floors {
            if let Some(capacity) = rooms.get(room) {
                return Some((floor.as_str(), *capacity));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> &'static str {
        r#"{
            "Riverside": {
                "code": "4",
                "floors": { "15F": { "Room 1501": 20, "Room 1502": 12 } }
            },
            "Riverside East": {
                "code": "6",
                "floors": { "B1": { "Vienna": 8, "London": 20 } }
            }
        }"#
    }

    #[test]
    fn test_load_and_lookup() {
        let registry = RoomRegistry::from_json(sample()).unwrap();
        assert_eq!(registry.code_for("Riverside").unwrap(), "4");
        let mut rooms = registry.rooms_for("Riverside East").unwrap();
        rooms.sort();
        assert_eq!(rooms, vec!["London", "Vienna"]);
        assert_eq!(
            registry.room_location("Riverside", "Room 1502"),
            Some(("15F", 12))
        );
        assert_eq!(registry.room_location("Riverside", "Room 9999"), None);
    }

    #[test]
    fn test_unknown_building() {
        let registry = RoomRegistry::from_json(sample()).unwrap();
        let err = registry.rooms_for("Nowhere").unwrap_err();
        assert!(matches!(err, EngineError::UnknownBuilding(_)));
    }

    #[test]
    fn test_match_building_prefers_longest() {
        let registry = RoomRegistry::from_json(sample()).unwrap();
        assert_eq!(
            registry.match_building("any rooms in Riverside East tomorrow?"),
            Some("Riverside East")
        );
        assert_eq!(
            registry.match_building("2025/07/14 Riverside"),
            Some("Riverside")
        );
        assert_eq!(registry.match_building("somewhere else"), None);
    }

    #[test]
    fn test_validate_zero_capacity() {
        let raw = r#"{ "A": { "code": "1", "floors": { "1F": { "Small": 0 } } } }"#;
        let err = RoomRegistry::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("zero capacity"));
    }

    #[test]
    fn test_validate_duplicate_room_across_floors() {
        let raw = r#"{
            "A": { "code": "1", "floors": {
                "1F": { "Boardroom": 10 },
                "2F": { "Boardroom": 8 }
            } }
        }"#;
        let err = RoomRegistry::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate room"));
    }

    #[test]
    fn test_validate_duplicate_code() {
        let raw = r#"{
            "A": { "code": "1", "floors": { "1F": { "X": 4 } } },
            "B": { "code": "1", "floors": { "1F": { "Y": 4 } } }
        }"#;
        let err = RoomRegistry::from_json(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate building code"));
    }
}
