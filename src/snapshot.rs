//! JSON city snapshot implementing the host interfaces in memory.
//!
//! ```json
//! {
//!   "city_name": "Springwood",
//!   "districts": [{"id": 1, "name": "Hamilton Park",
//!                  "bounds": {"min_x": 0, "min_z": 0, "max_x": 100, "max_z": 100}}],
//!   "stops": [{"id": 1, "position": {"x": 10, "z": 10}, "next": 2, "prev": 2}],
//!   "lines": [{"id": 1, "number": 12, "category": "bus", "stops_head": 1,
//!              "color": "#FFFFFF"}]
//! }
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use crate::engine::{CityView, LineStore};
use crate::error::{LiveryError, Result};
use crate::models::{
    Assignment, Color, DistrictId, LineId, LineView, Position, StopId, StopNode, TransportCategory,
};
use crate::walker::NetworkView;

/// Axis-aligned district area on the ground plane, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl Bounds {
    pub fn contains(&self, p: Position) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_z..=self.max_z).contains(&p.z)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    pub id: DistrictId,
    pub name: String,
    pub bounds: Bounds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: StopId,
    pub position: Position,
    pub next: StopId,
    pub prev: StopId,
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub id: LineId,
    pub number: u16,
    pub category: TransportCategory,
    #[serde(default)]
    pub stops_head: StopId,
    pub color: Color,
    #[serde(default = "yes")]
    pub active: bool,
    #[serde(default)]
    pub custom_color: bool,
    #[serde(default)]
    pub custom_name: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl LineRecord {
    pub fn view(&self) -> LineView {
        LineView {
            id: self.id,
            number: self.number,
            category: self.category,
            stops_head: self.stops_head,
            color: self.color,
            is_active: self.active,
            has_custom_color: self.custom_color,
            has_custom_name: self.custom_name,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CitySnapshot {
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub districts: Vec<DistrictRecord>,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
}

impl CitySnapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| LiveryError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| LiveryError::io(path, e))
    }
}

/// In-memory host: indexed stops and districts, lines behind a mutex.
#[derive(Debug)]
pub struct SnapshotHost {
    city_name: String,
    districts: Vec<DistrictRecord>,
    stops: AHashMap<StopId, StopNode>,
    lines: Mutex<Vec<LineRecord>>,
}

impl SnapshotHost {
    pub fn new(snapshot: CitySnapshot) -> Self {
        let stops = snapshot
            .stops
            .iter()
            .map(|s| {
                let node = StopNode {
                    position: s.position,
                    next: s.next,
                    prev: s.prev,
                };
                (s.id, node)
            })
            .collect();
        Self {
            city_name: snapshot.city_name,
            districts: snapshot.districts,
            stops,
            lines: Mutex::new(snapshot.lines),
        }
    }

    /// Block until the line store is free; held guards make `apply` time out.
    pub fn lock_lines(&self) -> MutexGuard<'_, Vec<LineRecord>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn line(&self, id: LineId) -> Option<LineRecord> {
        self.lock_lines().iter().find(|l| l.id == id).cloned()
    }

    /// Current state, including applied assignments, as a snapshot.
    pub fn to_snapshot(&self) -> CitySnapshot {
        let mut stops: Vec<StopRecord> = self
            .stops
            .iter()
            .map(|(id, n)| StopRecord {
                id: *id,
                position: n.position,
                next: n.next,
                prev: n.prev,
            })
            .collect();
        stops.sort_by_key(|s| s.id);
        CitySnapshot {
            city_name: self.city_name.clone(),
            districts: self.districts.clone(),
            stops,
            lines: self.lock_lines().clone(),
        }
    }

    fn try_lock_within(&self, timeout: Duration) -> Result<MutexGuard<'_, Vec<LineRecord>>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.lines.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(p)) => return Ok(p.into_inner()),
                Err(TryLockError::WouldBlock) if Instant::now() >= deadline => {
                    return Err(LiveryError::LockTimeout(timeout));
                }
                Err(TryLockError::WouldBlock) => std::thread::sleep(Duration::from_millis(1)),
            }
        }
    }
}

impl NetworkView for SnapshotHost {
    fn stop(&self, id: StopId) -> Option<StopNode> {
        self.stops.get(&id).copied()
    }

    fn district_at(&self, position: Position) -> DistrictId {
        self.districts
            .iter()
            .find(|d| d.id != 0 && d.bounds.contains(position))
            .map(|d| d.id)
            .unwrap_or(0)
    }

    fn district_name(&self, id: DistrictId) -> String {
        self.districts
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }
}

impl CityView for SnapshotHost {
    fn lines(&self) -> Vec<LineView> {
        self.lock_lines().iter().map(LineRecord::view).collect()
    }

    fn used_colors(&self) -> Vec<Color> {
        self.lock_lines()
            .iter()
            .filter(|l| l.active)
            .map(|l| l.color)
            .collect()
    }

    fn existing_names(&self) -> Vec<String> {
        self.lock_lines()
            .iter()
            .filter(|l| l.custom_name)
            .filter_map(|l| l.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }

    fn city_name(&self) -> String {
        self.city_name.clone()
    }
}

impl LineStore for SnapshotHost {
    fn apply(&self, assignment: &Assignment, timeout: Duration) -> Result<()> {
        let mut lines = self.try_lock_within(timeout)?;
        let line = lines
            .iter_mut()
            .find(|l| l.id == assignment.line)
            .ok_or(LiveryError::UnknownLine(assignment.line))?;
        line.color = assignment.color;
        line.custom_color = true;
        if let Some(name) = &assignment.name {
            line.name = Some(name.clone());
            line.custom_name = true;
        }
        Ok(())
    }
}
