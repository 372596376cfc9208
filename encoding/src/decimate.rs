use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use timeline::FrameWindow;

/// Which sample represents a frame when several samples land on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Survivor {
    /// The middle occurrence, `group[len / 2]`.
    #[default]
    Middle,
    First,
    Last,
}

impl Survivor {
    pub fn pick(&self, group: &[usize]) -> usize {
        match self {
            Self::Middle => group[group.len() / 2],
            Self::First => group[0],
            Self::Last => group[group.len() - 1],
        }
    }
}

/// Indices of the samples that survive when every animation frame keeps a single
/// sample, in their original order. `None` when no frame holds more than one
/// sample and the trace can be used as is.
pub fn decimate_indices(time: &[f64], window: &FrameWindow, survivor: Survivor) -> Option<Vec<usize>> {
    let mut groups: HashMap<i64, Vec<usize>> = HashMap::new();
    for (idx, t) in time.iter().enumerate() {
        groups.entry(window.get_frame(*t)).or_default().push(idx);
    }
    if groups.values().all(|group| group.len() <= 1) {
        return None;
    }
    let mut keep: Vec<usize> = groups.values().map(|group| survivor.pick(group)).collect();
    keep.sort_unstable();
    Some(keep)
}
