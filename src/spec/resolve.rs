//! `$ref` resolution for OpenAPI documents.
//!
//! Local pointers (`#/components/schemas/Pet`) are looked up in the document
//! itself. Relative file references (`common.yaml#/components/schemas/Error`)
//! are loaded from disk next to the referencing document; remote sources have
//! no base directory, so their file references stay as written.
//!
//! A reference that points back into one of its own ancestors is left as a
//! `$ref` object, which keeps recursive schemas (trees, linked lists) finite.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Root,
    File(PathBuf),
}

struct RefResolver<'a> {
    root: &'a Value,
    base_dir: Option<PathBuf>,
    files: HashMap<PathBuf, Value>,
}

/// Return a copy of `root` with every resolvable `$ref` inlined.
///
/// `base_dir` is the directory of the document, used for relative file
/// references. Unresolvable references are logged and kept.
pub fn resolve_refs(root: &Value, base_dir: Option<&Path>) -> Value {
    let mut resolver = RefResolver {
        root,
        base_dir: base_dir.map(Path::to_path_buf),
        files: HashMap::new(),
    };
    let mut resolved = root.clone();
    resolver.expand(&mut resolved, &Origin::Root, &mut Vec::new());
    resolved
}

impl RefResolver<'_> {
    fn expand(&mut self, value: &mut Value, origin: &Origin, stack: &mut Vec<String>) {
        match value {
            Value::Object(obj) => {
                if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
                    let reference = reference.to_string();
                    match self.lookup(&reference, origin) {
                        Some((mut target, target_origin, key)) => {
                            if stack.contains(&key) {
                                tracing::debug!(reference = %reference, "recursive $ref kept as reference");
                                return;
                            }
                            stack.push(key);
                            self.expand(&mut target, &target_origin, stack);
                            stack.pop();
                            *value = target;
                        }
                        None => {
                            tracing::warn!(reference = %reference, "⚠️  Unresolved $ref left in place");
                        }
                    }
                    return;
                }
                for v in obj.values_mut() {
                    self.expand(v, origin, stack);
                }
            }
            Value::Array(arr) => {
                for v in arr.iter_mut() {
                    self.expand(v, origin, stack);
                }
            }
            _ => {}
        }
    }

    /// Find the target of `reference`, returning it with the origin its own
    /// nested references are relative to and a key identifying it.
    fn lookup(&mut self, reference: &str, origin: &Origin) -> Option<(Value, Origin, String)> {
        let (file_part, pointer) = reference.split_once('#').unwrap_or((reference, ""));

        let target_origin = if file_part.is_empty() {
            origin.clone()
        } else {
            let base = match origin {
                Origin::Root => self.base_dir.clone()?,
                Origin::File(path) => path.parent()?.to_path_buf(),
            };
            Origin::File(base.join(file_part))
        };

        let target = match &target_origin {
            Origin::Root => lookup_pointer(self.root, pointer)?,
            Origin::File(path) => {
                let doc = self.load_file(path)?;
                lookup_pointer(doc, pointer)?
            }
        };

        let key = match &target_origin {
            Origin::Root => format!("#{pointer}"),
            Origin::File(path) => format!("{}#{pointer}", path.display()),
        };
        Some((target, target_origin, key))
    }

    fn load_file(&mut self, path: &Path) -> Option<&Value> {
        if !self.files.contains_key(path) {
            let content = match std::fs::read_to_string(path) {
                Ok(content) => content,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to read referenced file");
                    return None;
                }
            };
            let parsed: Value = match serde_yaml::from_str(&content) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to parse referenced file");
                    return None;
                }
            };
            self.files.insert(path.to_path_buf(), parsed);
        }
        self.files.get(path)
    }
}

fn lookup_pointer(doc: &Value, pointer: &str) -> Option<Value> {
    if pointer.is_empty() {
        return Some(doc.clone());
    }
    doc.pointer(pointer).cloned()
}
