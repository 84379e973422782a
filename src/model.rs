//! Input rows, steps and per-video jobs.

use std::collections::BTreeMap;

use crate::foundation::error::{ReelError, ReelResult};

/// Column names every input table must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["VideoName", "Step", "ImageFile", "Text"];

/// One raw table row keyed by column name.
pub type InputRow = serde_json::Map<String, serde_json::Value>;

/// One ordered unit of a video: an image shown above a typed caption.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Step {
    pub video_name: String,
    /// Sort key within the video. Rows without a step number sort last.
    pub order: i64,
    /// File name relative to the image directory.
    pub image_reference: String,
    pub caption: String,
}

impl Step {
    pub fn new(
        video_name: impl Into<String>,
        order: i64,
        image_reference: impl Into<String>,
        caption: impl Into<String>,
    ) -> Self {
        Self {
            video_name: video_name.into(),
            order,
            image_reference: image_reference.into(),
            caption: caption.into(),
        }
    }

    /// Build a step from a raw row.
    ///
    /// Returns `Ok(None)` for rows without a video name; those rows belong to no group.
    pub fn from_row(row: &InputRow, row_idx: usize) -> ReelResult<Option<Self>> {
        let Some(video_name) = row.get("VideoName").and_then(coerce_string) else {
            return Ok(None);
        };
        let order = match row.get("Step") {
            None => i64::MAX,
            Some(v) => coerce_order(v, row_idx)?.unwrap_or(i64::MAX),
        };
        let image_reference = row
            .get("ImageFile")
            .and_then(coerce_string)
            .unwrap_or_default();
        let caption = row.get("Text").and_then(coerce_string).unwrap_or_default();

        Ok(Some(Self {
            video_name,
            order,
            image_reference,
            caption,
        }))
    }
}

/// All steps of one output video, sorted by [`Step::order`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoJob {
    pub video_name: String,
    pub steps: Vec<Step>,
}

impl VideoJob {
    /// Create a job, stable-sorting `steps` ascending by order.
    pub fn new(video_name: impl Into<String>, mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.order);
        Self {
            video_name: video_name.into(),
            steps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Check that every required column appears somewhere in the table.
pub fn validate_columns(rows: &[InputRow]) -> ReelResult<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !rows.iter().any(|r| r.contains_key(*col)))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ReelError::validation(format!(
        "input must contain VideoName, Step, ImageFile, and Text columns (missing: {})",
        missing.join(", ")
    )))
}

/// Validate the table and convert every row that names a video into a [`Step`].
pub fn steps_from_rows(rows: &[InputRow]) -> ReelResult<Vec<Step>> {
    validate_columns(rows)?;
    let mut steps = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        match Step::from_row(row, idx)? {
            Some(step) => steps.push(step),
            None => tracing::debug!(row = idx, "row has no VideoName; skipped"),
        }
    }
    Ok(steps)
}

/// Group steps by video name. Groups come out sorted by name; steps keep input order on ties.
pub fn group_jobs(steps: Vec<Step>) -> Vec<VideoJob> {
    let mut groups: BTreeMap<String, Vec<Step>> = BTreeMap::new();
    for step in steps {
        groups.entry(step.video_name.clone()).or_default().push(step);
    }
    groups
        .into_iter()
        .map(|(name, steps)| VideoJob::new(name, steps))
        .collect()
}

fn coerce_string(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce_order(v: &serde_json::Value, row_idx: usize) -> ReelResult<Option<i64>> {
    let invalid = || {
        ReelError::validation(format!(
            "row {row_idx}: Step value {v} is not an integer"
        ))
    };
    match v {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            n.as_f64()
                .and_then(integral_f64)
                .map(Some)
                .ok_or_else(invalid)
        }
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Some(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(integral_f64)
                .map(Some)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;
