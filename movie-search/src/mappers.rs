//! Mappers turning loosely-typed index payloads into [`MoviePayload`].
//!
//! Fields that are missing or have an unexpected type become `None` (or an
//! empty genre list). Nothing here fails: malformed data is absorbed and the
//! consumers decide what an absent field means.

use std::collections::HashMap;

use qdrant_client::qdrant::{PointId, Value as QValue, point_id::PointIdOptions};
use serde_json::{Map, Value};

use crate::record::{MoviePayload, PointKey};

/// Maps a JSON object into a [`MoviePayload`]. Non-objects map to the empty payload.
pub fn map_movie_payload(v: &Value) -> MoviePayload {
    let Some(obj) = v.as_object() else {
        return MoviePayload::default();
    };

    MoviePayload {
        title: pick_str(obj, &["title", "name"]).map(str::to_string),
        genres: pick_genres(obj),
        release_date: pick_str(obj, &["release_date"]).map(str::to_string),
        vote_average: pick_f64(obj, "vote_average"),
        popularity: pick_f64(obj, "popularity"),
        tmdb_id: pick_i64(obj, &["tmdb_id", "tmdbId", "id"]),
    }
}

/// Maps a raw Qdrant payload map into a [`MoviePayload`].
pub fn map_qdrant_payload(p: HashMap<String, QValue>) -> MoviePayload {
    let obj: Map<String, Value> = p.into_iter().map(|(k, v)| (k, v.into_json())).collect();
    map_movie_payload(&Value::Object(obj))
}

/// Converts a Qdrant point id into a [`PointKey`].
pub fn point_key(id: Option<PointId>) -> Option<PointKey> {
    match id?.point_id_options? {
        PointIdOptions::Num(n) => Some(PointKey::Num(n)),
        PointIdOptions::Uuid(s) => Some(PointKey::Uuid(s)),
    }
}

/// Converts a [`PointKey`] back into a Qdrant point id (used as scroll cursor).
pub fn to_point_id(key: &PointKey) -> PointId {
    match key {
        PointKey::Num(n) => PointId::from(*n),
        PointKey::Uuid(s) => PointId::from(s.clone()),
    }
}

// ----- small helpers -----

/// Picks the first non-empty string among the given keys.
fn pick_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .find(|s| !s.trim().is_empty())
}

/// Number, or a string that parses as a finite number.
fn pick_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let n = match obj.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Integer id, or a string holding one.
fn pick_i64(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| match obj.get(*k)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Genre list; a lone string counts as one genre, non-strings and blanks are dropped.
fn pick_genres(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("genres") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(g)) if !g.is_empty() => vec![g.clone()],
        _ => Vec::new(),
    }
}
