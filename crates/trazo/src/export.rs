//! The serializable polyline handed to downstream generators.

use serde::{Deserialize, Serialize};
use trazo_draft::{DraftError, MeasureKind, Polyline};

/// A finished polyline in wire form, consumed by the wall/slab/profile
/// generators (which perform their own joinery) or archived by the
/// host.
///
/// Positions are plain arrays to keep the wire format independent of
/// the math backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolylineExport {
    /// What the polyline should be built as.
    pub kind: MeasureKind,
    /// Whether the last point repeats the first.
    pub closed: bool,
    /// Ordered positions, `[x, y, z]` in meters.
    pub points: Vec<[f64; 3]>,
    /// Length of each segment (one fewer than points).
    pub segment_lengths: Vec<f64>,
    /// Sum of segment lengths.
    pub total_length: f64,
    /// Enclosed area for closed coplanar loops, else 0.
    pub area: f64,
}

impl PolylineExport {
    /// Capture a polyline for consumption.
    ///
    /// Valid once the polyline is closed or the user explicitly
    /// finalizes it; an empty polyline has nothing to export.
    pub fn from_polyline(polyline: &Polyline) -> Result<Self, DraftError> {
        if polyline.points().is_empty() {
            return Err(DraftError::EmptyPolyline);
        }
        Ok(Self {
            kind: polyline.kind(),
            closed: polyline.is_closed(),
            points: polyline
                .points()
                .iter()
                .map(|p| [p.position.x, p.position.y, p.position.z])
                .collect(),
            segment_lengths: polyline
                .points()
                .iter()
                .skip(1)
                .map(|p| p.distance_from_previous)
                .collect(),
            total_length: polyline.total_length(),
            area: polyline.area(),
        })
    }

    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
