use cfsub_core::{CoreType, Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read the template for `core` from `dir`. The file is only ever read.
pub fn load_template(dir: &Path, core: CoreType) -> Result<Value> {
    let path = dir.join(core.template_file());
    let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let doc = serde_json::from_str(&text)?;
    debug!(path = %path.display(), core = %core, "loaded template");
    Ok(doc)
}

/// Assign `value` at a JSON pointer. The parent node must exist; a missing final object
/// key is created, a missing array slot is an error.
pub(crate) fn set_at(doc: &mut Value, pointer: &str, value: Value) -> Result<()> {
    let missing = || Error::TemplateField { pointer: pointer.to_string() };
    let (parent, key) = pointer.rsplit_once('/').ok_or_else(missing)?;
    match doc.pointer_mut(parent).ok_or_else(missing)? {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
        }
        Value::Array(items) => {
            let slot = key.parse::<usize>().ok().and_then(|i| items.get_mut(i)).ok_or_else(missing)?;
            *slot = value;
        }
        _ => return Err(missing()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sets_existing_and_new_keys() {
        let mut doc = json!({ "a": { "b": 1 }, "list": [ { "x": 0 } ] });
        set_at(&mut doc, "/a/b", json!(2)).unwrap();
        set_at(&mut doc, "/a/c", json!("new")).unwrap();
        set_at(&mut doc, "/list/0/x", json!(5)).unwrap();
        assert_eq!(doc, json!({ "a": { "b": 2, "c": "new" }, "list": [ { "x": 5 } ] }));
    }

    #[test]
    fn missing_parent_is_an_error() {
        let mut doc = json!({ "a": {} });
        let err = set_at(&mut doc, "/a/b/c", json!(1)).unwrap_err();
        assert!(matches!(err, Error::TemplateField { ref pointer } if pointer == "/a/b/c"));
        assert!(set_at(&mut json!({ "l": [] }), "/l/0", json!(1)).is_err());
        assert!(set_at(&mut json!({ "s": "text" }), "/s/k", json!(1)).is_err());
    }

    #[test]
    fn loads_template_by_core_type() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sing-box.json"), r#"{"outbounds":[]}"#).unwrap();
        let doc = load_template(dir.path(), CoreType::SingBox).unwrap();
        assert_eq!(doc, json!({ "outbounds": [] }));
        assert!(matches!(load_template(dir.path(), CoreType::Xray), Err(Error::Io { .. })));
    }
}
