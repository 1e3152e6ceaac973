//! Loading static part templates from JSON.
//!
//! The input is a JSON array of [`PartTemplate`] objects. Entries that are
//! not valid templates are skipped with a warning; a template that parses
//! but fails its sanity checks rejects the whole load.

use crate::catalog::PartCatalog;
use crate::part::{PartDescriptor, PartError, PartTemplate};

#[derive(Debug)]
pub enum TemplateError {
    Json(serde_json::Error),
    Part(PartError),
}

impl From<serde_json::Error> for TemplateError {
    fn from(e: serde_json::Error) -> Self {
        TemplateError::Json(e)
    }
}

impl From<PartError> for TemplateError {
    fn from(e: PartError) -> Self {
        TemplateError::Part(e)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::Json(e) => write!(f, "Template JSON error: {}", e),
            TemplateError::Part(e) => write!(f, "Template rejected: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Json(e) => Some(e),
            TemplateError::Part(e) => Some(e),
        }
    }
}

pub fn load_templates(json: &str) -> Result<Vec<PartDescriptor>, TemplateError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut parts = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let template: PartTemplate = match serde_json::from_value(entry) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("skipping part template #{}: {}", i, e);
                continue;
            }
        };
        parts.push(PartDescriptor::try_from(template)?);
    }
    Ok(parts)
}

/// Load templates from `json` into `catalog`. Returns how many were added.
pub fn extend_catalog(catalog: &mut PartCatalog, json: &str) -> Result<usize, TemplateError> {
    let parts = load_templates(json)?;
    let n = parts.len();
    for part in parts {
        catalog.add(part);
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use crate::part::PartClass;
    use serde_json::{json, Value};

    fn corridor() -> Value {
        json!({
            "name": "corridor",
            "width": 3,
            "height": 5,
            "class": "Corridor",
            "weight": 20,
            "connections": [{"x": 1, "y": 0, "z": 0}, {"x": 1, "y": 4, "z": 0}],
            "rows": ["#.#", "#.#", "#.#", "#.#", "#.#"]
        })
    }

    #[test]
    fn test_loads_valid_template() {
        let parts = load_templates(&json!([corridor()]).to_string()).unwrap();
        assert_eq!(parts.len(), 1);
        let p = &parts[0];
        assert_eq!(p.class, PartClass::Corridor);
        assert_eq!(p.depth, 1);
        assert_eq!(p.max_count, None);
        assert_eq!(p.connections()[0].facing, Direction::North);
        assert_eq!(p.connections()[1].facing, Direction::South);
    }

    #[test]
    fn test_skips_malformed_entry() {
        let input = json!([{"name": "broken", "width": "wide"}, corridor()]);
        let parts = load_templates(&input.to_string()).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "corridor");
    }

    #[test]
    fn test_row_width_mismatch_is_fatal() {
        let input = json!([{
            "name": "bad",
            "width": 4,
            "height": 2,
            "class": "Room",
            "weight": 1,
            "connections": [{"x": 1, "y": 1, "z": 0}],
            "rows": ["####", "#.#"]
        }]);
        let err = load_templates(&input.to_string()).unwrap_err();
        assert!(matches!(err, TemplateError::Part(PartError::RowWidth { row: 1, .. })));
    }

    #[test]
    fn test_missing_southern_connection_is_fatal() {
        let input = json!([{
            "name": "dead_end",
            "width": 3,
            "height": 3,
            "class": "Corridor",
            "weight": 1,
            "connections": [{"x": 1, "y": 0, "z": 0}],
            "rows": ["#.#", "#.#", "###"]
        }]);
        let err = load_templates(&input.to_string()).unwrap_err();
        assert!(matches!(err, TemplateError::Part(PartError::NoSouthernConnection { .. })));
    }

    #[test]
    fn test_unknown_tile_is_fatal() {
        let input = json!([{
            "name": "mossy",
            "width": 3,
            "height": 2,
            "class": "Corridor",
            "weight": 1,
            "connections": [{"x": 1, "y": 1, "z": 0}],
            "rows": ["#~#", "#.#"]
        }]);
        let err = load_templates(&input.to_string()).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::Part(PartError::UnknownTile { row: 0, column: 1, tile: b'~', .. })
        ));
    }

    #[test]
    fn test_solid_wall_row_loads() {
        let mut room = corridor();
        room["rows"] = json!(["###", "#.#", "#.#", "#.#", "#.#"]);
        room["connections"] = json!([{"x": 1, "y": 4, "z": 0}]);
        let parts = load_templates(&json!([room]).to_string()).unwrap();
        assert_eq!(parts[0].template().unwrap().tile(crate::geometry::Coords::new(1, 0, 0)), b'#');
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(load_templates("{}"), Err(TemplateError::Json(_))));
    }

    #[test]
    fn test_extend_catalog_adds_weight() {
        let mut catalog = PartCatalog::new();
        let n = extend_catalog(&mut catalog, &json!([corridor()]).to_string()).unwrap();
        assert_eq!(n, 1);
        assert_eq!(catalog.total_weight(), 20);
    }
}
