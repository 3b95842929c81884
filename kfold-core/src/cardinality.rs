//! Class cardinality estimation

use std::collections::HashSet;

use serde_json::Value;

use crate::record::Record;

/// Key holding the label of a record
pub const CLASS_KEY: &str = "class";

/// Count the distinct `class` values across `records`.
///
/// Returns `0` as soon as a record is not a JSON object or lacks `class`, and
/// for an empty input. Labels are compared by their JSON serialization, so
/// `"1"` and `1` count as different classes. Labels that are numerically equal
/// but written differently, such as `1`, `1.0` and `true`, are also counted
/// separately.
pub fn estimate_cardinality<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut classes = HashSet::new();
    for record in records {
        let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(record.as_str()) else {
            return 0;
        };
        match object.remove(CLASS_KEY) {
            Some(label) => {
                classes.insert(label.to_string());
            }
            None => return 0,
        }
    }
    classes.len()
}
