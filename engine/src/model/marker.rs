use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point annotation on the timeline. Markers are independent of clips and
/// only share the snap-point namespace with them.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Marker {
    pub id: Uuid,
    pub time: f64,
    #[serde(default)]
    pub label: String,
}

impl Marker {
    pub fn new(time: f64, label: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            label: label.to_string(),
        }
    }
}
