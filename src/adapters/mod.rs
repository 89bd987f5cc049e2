// Adapters layer: concrete sources that turn upstream data into RawItems.

pub mod api_source;
pub mod file_source;

use crate::domain::model::RawItem;
use crate::domain::ports::FieldNames;
use crate::utils::error::{GradeError, Result};
use serde_json::Value;

/// Array of post objects → RawItems. Objects without text are dropped with a warning;
/// a missing id falls back to the position in the array.
pub(crate) fn items_from_json(json: Value, fields: &FieldNames) -> Result<Vec<RawItem>> {
    let Value::Array(entries) = json else {
        return Err(GradeError::ProcessingError {
            message: "expected a JSON array of posts".to_string(),
        });
    };

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(obj) = entry else {
            tracing::warn!("Ignoring non-object entry at position {}", index);
            continue;
        };

        let text = fields
            .text
            .iter()
            .find_map(|name| obj.get(name).and_then(Value::as_str));
        let Some(text) = text else {
            tracing::warn!("Ignoring entry at position {}: no text field", index);
            continue;
        };

        let id = fields
            .id
            .iter()
            .find_map(|name| match obj.get(name) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_else(|| index.to_string());

        items.push(RawItem::new(id, text));
    }

    Ok(items)
}
