//! JSON-schema inlining for providers that reject `$ref`/`$defs` (§4.F).
//!
//! [`schemars`] emits tool-input schemas with definitions hoisted into a
//! top-level `$defs` map and referenced via `"$ref": "#/$defs/Name"`, which
//! is how the google-genai `Schema` type (`provider-sdks/google-genai`)
//! represents a ref before conversion, but most provider request formats
//! only accept a fully inlined schema with no `$ref` at all. [`inline_refs`]
//! walks a schema and replaces every `$ref` with a copy of the definition it
//! points at, so the result can be handed to any provider regardless of
//! whether it understands refs.

use serde_json::Map;
use serde_json::Value;

const MAX_DEPTH: usize = 32;

/// Returns a copy of `schema` with every `$ref`/`$defs` pair resolved away.
/// Refs into `#/definitions/...` (the older JSON Schema draft keyword) are
/// also honored. A ref that cannot be resolved, or that recurses past
/// [`MAX_DEPTH`] (self-referential schemas, which a flat tool-input schema
/// should never produce), is left as a `$ref` rather than causing a panic.
pub fn inline_refs(schema: &Value) -> Value {
    let defs = collect_defs(schema);
    inline(schema, &defs, 0)
}

fn collect_defs(schema: &Value) -> Map<String, Value> {
    let mut defs = Map::new();
    if let Some(obj) = schema.as_object() {
        if let Some(Value::Object(d)) = obj.get("$defs") {
            defs.extend(d.clone());
        }
        if let Some(Value::Object(d)) = obj.get("definitions") {
            defs.extend(d.clone());
        }
    }
    defs
}

fn inline(value: &Value, defs: &Map<String, Value>, depth: usize) -> Value {
    match value {
        Value::Object(obj) => {
            if let Some(Value::String(reference)) = obj.get("$ref") {
                if depth < MAX_DEPTH {
                    if let Some(target) = resolve_ref(reference, defs) {
                        return inline(target, defs, depth + 1);
                    }
                }
                return value.clone();
            }
            let mut out = Map::with_capacity(obj.len());
            for (key, v) in obj {
                if key == "$defs" || key == "definitions" {
                    continue;
                }
                out.insert(key.clone(), inline(v, defs, depth));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| inline(v, defs, depth)).collect()),
        other => other.clone(),
    }
}

fn resolve_ref<'a>(reference: &str, defs: &'a Map<String, Value>) -> Option<&'a Value> {
    let name = reference.strip_prefix("#/$defs/").or_else(|| reference.strip_prefix("#/definitions/"))?;
    defs.get(name)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn schema_with_no_refs_is_unchanged_aside_from_defs_removal() {
        let schema = json!({"type": "string"});
        assert_eq!(inline_refs(&schema), schema);
    }

    #[test]
    fn top_level_ref_is_replaced_with_its_definition() {
        let schema = json!({
            "$ref": "#/$defs/Point",
            "$defs": {"Point": {"type": "object", "properties": {"x": {"type": "number"}}}},
        });
        let inlined = inline_refs(&schema);
        assert_eq!(inlined, json!({"type": "object", "properties": {"x": {"type": "number"}}}));
    }

    #[test]
    fn nested_ref_inside_properties_is_replaced() {
        let schema = json!({
            "type": "object",
            "properties": {
                "location": {"$ref": "#/$defs/Point"},
            },
            "$defs": {"Point": {"type": "object", "properties": {"x": {"type": "number"}}}},
        });
        let inlined = inline_refs(&schema);
        assert_eq!(
            inlined,
            json!({
                "type": "object",
                "properties": {
                    "location": {"type": "object", "properties": {"x": {"type": "number"}}},
                },
            })
        );
    }

    #[test]
    fn ref_inside_array_items_is_replaced() {
        let schema = json!({
            "type": "array",
            "items": {"$ref": "#/$defs/Point"},
            "$defs": {"Point": {"type": "string"}},
        });
        let inlined = inline_refs(&schema);
        assert_eq!(inlined, json!({"type": "array", "items": {"type": "string"}}));
    }

    #[test]
    fn unresolvable_ref_is_left_in_place() {
        let schema = json!({"$ref": "#/$defs/Missing", "$defs": {}});
        let inlined = inline_refs(&schema);
        assert_eq!(inlined, json!({"$ref": "#/$defs/Missing"}));
    }

    #[test]
    fn definitions_keyword_is_also_honored() {
        let schema = json!({
            "$ref": "#/definitions/Point",
            "definitions": {"Point": {"type": "number"}},
        });
        assert_eq!(inline_refs(&schema), json!({"type": "number"}));
    }
}
