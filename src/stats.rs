//! Story statistics.

use adv_model::GameDocument;
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for objects with no type.
pub const UNTYPED: &str = "(untyped)";

/// Object counts for a story.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoryStats {
    pub by_type: BTreeMap<String, usize>,
    pub total: usize,
}

impl StoryStats {
    pub fn collect(doc: &GameDocument) -> Self {
        let mut by_type = BTreeMap::new();
        for obj in doc.objects.values() {
            let t = obj.object_type.as_deref().unwrap_or(UNTYPED);
            *by_type.entry(t.to_string()).or_insert(0) += 1;
        }
        Self {
            by_type,
            total: doc.objects.len(),
        }
    }

    /// Human-readable table.
    pub fn to_human(&self) -> String {
        let mut out = String::from("Object count by type:\n");
        for (t, count) in &self.by_type {
            out.push_str(&format!("{:10}: {:3}\n", t, count));
        }
        out.push_str(&format!("Total:    {:5}", self.total));
        out
    }
}
