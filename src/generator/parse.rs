use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::generator::ContentError;
use crate::model::item::{Category, ItemType, ReturnItem, VisualDefect};

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n\s*```").expect("fenced regex"));
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("bracket regex"));

/// Shape of one entry as the content source sends it. The source's `id`,
/// if any, is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawItem {
    name: String,
    category: Category,
    item_type: ItemType,
    material: String,
    description: String,
    visual_defects: Vec<VisualDefect>,
    is_fraud: bool,
    color: String,
    explanation: String,
}

impl From<RawItem> for ReturnItem {
    fn from(raw: RawItem) -> Self {
        ReturnItem {
            id: ReturnItem::new_id(),
            name: raw.name,
            category: raw.category,
            item_type: raw.item_type,
            material: raw.material,
            description: raw.description,
            visual_defects: raw.visual_defects,
            is_fraud: raw.is_fraud,
            color: raw.color,
            explanation: raw.explanation,
        }
    }
}

/// Locate the JSON array in a model response. Tries the whole text first,
/// then a fenced ```json block, then the outermost `[...]` span.
pub fn extract_array(text: &str) -> Result<Vec<Value>, ContentError> {
    if let Ok(values) = serde_json::from_str::<Vec<Value>>(text.trim()) {
        return Ok(values);
    }

    let fenced = FENCED_JSON
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let bracketed = BRACKETED.find(text).map(|m| m.as_str());

    for candidate in [fenced, bracketed].into_iter().flatten() {
        if let Ok(values) = serde_json::from_str::<Vec<Value>>(candidate.trim()) {
            return Ok(values);
        }
    }

    Err(ContentError::Malformed(preview(text)))
}

/// Decode and sanitize a batch. Entries that don't fit the schema, or that
/// carry a defect their item type can't show, are dropped. Entries whose
/// fraud flag disagrees with their defects are repaired.
pub fn parse_batch(text: &str) -> Result<Vec<ReturnItem>, ContentError> {
    let values = extract_array(text)?;
    let total = values.len();

    let mut items = Vec::with_capacity(total);
    let mut repaired = 0usize;
    for value in values {
        let Ok(raw) = serde_json::from_value::<RawItem>(value) else {
            continue;
        };
        let mut item = ReturnItem::from(raw);
        if item.repair() {
            repaired += 1;
        }
        if !item.fits_type() {
            continue;
        }
        items.push(item);
    }

    if items.len() < total || repaired > 0 {
        tracing::debug!(
            total,
            kept = items.len(),
            repaired,
            "sanitized content batch"
        );
    }

    if items.is_empty() {
        return Err(ContentError::Empty);
    }
    Ok(items)
}

fn preview(text: &str) -> String {
    let mut s: String = text.chars().take(80).collect();
    if text.chars().count() > 80 {
        s.push('…');
    }
    s
}
