//! Static seed data every repository instance starts from.

use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

use crate::types::Todo;

/// The initial record set. Never mutated; repositories copy it.
pub static TODO_DATA: Lazy<Vec<Todo>> = Lazy::new(|| {
    vec![
        record("1", json!({"title": "buy milk", "completed": false})),
        record("2", json!({"title": "walk the dog", "completed": true})),
        record("3", json!({"title": "file taxes", "completed": false})),
    ]
});

fn record(id: &str, fields: Value) -> Todo {
    let fields = match fields {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Todo::new(id, fields)
}
