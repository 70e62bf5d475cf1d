//! Schema-free access to slide content trees.
//!
//! Slide content is an arbitrary JSON value whose shape depends on the
//! layout that produced it. Asset-bearing nodes are found by marker keys,
//! wherever they sit in the tree, and addressed afterwards by owned paths.

use crate::{Error, Result};
use serde_json::Value;
use std::fmt;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

/// An owned path from the root of a content tree to one of its nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ContentPath(pub Vec<PathStep>);

impl ContentPath {
    /// The path of the root node.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path one step deeper.
    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    /// A new path one key deeper.
    pub fn key(&self, key: &str) -> Self {
        self.child(PathStep::Key(key.to_string()))
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathStep::Key(key) => write!(f, ".{}", key)?,
                PathStep::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// Every path of an object node that contains `key`, depth-first, object
/// keys visited in map order. Matches nested below a match are reported too.
pub fn find_key_paths(root: &Value, key: &str) -> Vec<ContentPath> {
    let mut found = Vec::new();
    visit(root, &mut Vec::new(), key, &mut found);
    found
}

fn visit(node: &Value, trail: &mut Vec<PathStep>, key: &str, found: &mut Vec<ContentPath>) {
    match node {
        Value::Object(map) => {
            if map.contains_key(key) {
                found.push(ContentPath(trail.clone()));
            }
            for (k, child) in map {
                trail.push(PathStep::Key(k.clone()));
                visit(child, trail, key, found);
                trail.pop();
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                trail.push(PathStep::Index(idx));
                visit(child, trail, key, found);
                trail.pop();
            }
        }
        _ => {}
    }
}

/// Look up the node at `path`.
pub fn get_at_path<'a>(root: &'a Value, path: &ContentPath) -> Option<&'a Value> {
    path.0.iter().try_fold(root, |node, step| match step {
        PathStep::Key(key) => node.as_object()?.get(key),
        PathStep::Index(idx) => node.as_array()?.get(*idx),
    })
}

/// Look up the node at `path` for modification.
pub fn get_at_path_mut<'a>(root: &'a mut Value, path: &ContentPath) -> Option<&'a mut Value> {
    path.0.iter().try_fold(root, |node, step| match step {
        PathStep::Key(key) => node.as_object_mut()?.get_mut(key),
        PathStep::Index(idx) => node.as_array_mut()?.get_mut(*idx),
    })
}

/// Replace the node at `path`, or insert it when the last step is a new
/// object key. Every intermediate step must already exist.
pub fn set_at_path(root: &mut Value, path: &ContentPath, value: Value) -> Result<()> {
    let Some((last, parents)) = path.0.split_last() else {
        *root = value;
        return Ok(());
    };

    let parent_path = ContentPath(parents.to_vec());
    let parent = get_at_path_mut(root, &parent_path).ok_or_else(|| {
        Error::ContentMapping(format!("no node at '{}'", parent_path))
    })?;

    match (last, parent) {
        (PathStep::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (PathStep::Index(idx), Value::Array(items)) => match items.get_mut(*idx) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::ContentMapping(format!(
                "index {} out of bounds at '{}'",
                idx, parent_path
            ))),
        },
        _ => Err(Error::ContentMapping(format!(
            "'{}' does not match the node type at '{}'",
            path, parent_path
        ))),
    }
}

/// String value of `key` on an object node, if present and non-blank.
pub fn str_field<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Numeric value of `key` on an object node.
pub fn f64_field(node: &Value, key: &str) -> Option<f64> {
    node.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "Roadmap",
            "image": { "__image_prompt__": "city skyline" },
            "items": [
                { "heading": "One", "icon": { "__icon_query__": "rocket" } },
                { "heading": "Two", "icon": { "__icon_query__": "flag", "__icon_url__": "/i/flag.png" } }
            ]
        })
    }

    #[test]
    fn test_find_key_paths_at_any_depth() {
        let content = sample();
        let paths = find_key_paths(&content, "__icon_query__");
        let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["items[0].icon", "items[1].icon"]);

        let images = find_key_paths(&content, "__image_prompt__");
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].to_string(), "image");
    }

    #[test]
    fn test_find_key_paths_root_match() {
        let content = json!({ "__shape__": "rectangle", "inner": { "__shape__": "ellipse" } });
        let paths = find_key_paths(&content, "__shape__");
        assert_eq!(paths.len(), 2);
        assert!(paths[0].is_root());
        assert_eq!(paths[1].to_string(), "inner");
    }

    #[test]
    fn test_find_key_paths_none() {
        assert!(find_key_paths(&json!([1, "a", null]), "x").is_empty());
    }

    #[test]
    fn test_get_at_path() {
        let content = sample();
        let path = ContentPath::root()
            .key("items")
            .child(PathStep::Index(1))
            .key("icon");
        let node = get_at_path(&content, &path).unwrap();
        assert_eq!(str_field(node, "__icon_url__"), Some("/i/flag.png"));

        let bad = ContentPath::root().key("title").child(PathStep::Index(0));
        assert!(get_at_path(&content, &bad).is_none());
    }

    #[test]
    fn test_set_at_path_inserts_and_replaces() {
        let mut content = sample();
        let icon = find_key_paths(&content, "__icon_query__")[0].clone();
        set_at_path(&mut content, &icon.key("__icon_url__"), json!("/i/rocket.png")).unwrap();
        assert_eq!(content["items"][0]["icon"]["__icon_url__"], "/i/rocket.png");

        let first = ContentPath::root().key("items").child(PathStep::Index(0));
        set_at_path(&mut content, &first, json!("gone")).unwrap();
        assert_eq!(content["items"][0], "gone");
    }

    #[test]
    fn test_set_at_path_errors() {
        let mut content = sample();
        let missing = ContentPath::root().key("nope").key("x");
        assert!(matches!(
            set_at_path(&mut content, &missing, json!(1)),
            Err(Error::ContentMapping(_))
        ));

        let oob = ContentPath::root().key("items").child(PathStep::Index(9));
        assert!(set_at_path(&mut content, &oob, json!(1)).is_err());

        let mismatched = ContentPath::root().key("items").key("zero");
        assert!(set_at_path(&mut content, &mismatched, json!(1)).is_err());
    }

    #[test]
    fn test_set_at_root_replaces_tree() {
        let mut content = sample();
        set_at_path(&mut content, &ContentPath::root(), json!({"a": 1})).unwrap();
        assert_eq!(content, json!({"a": 1}));
    }

    #[test]
    fn test_str_field_ignores_blank() {
        let node = json!({ "a": "  ", "b": " x ", "c": 3 });
        assert_eq!(str_field(&node, "a"), None);
        assert_eq!(str_field(&node, "b"), Some("x"));
        assert_eq!(str_field(&node, "c"), None);
        assert_eq!(f64_field(&node, "c"), Some(3.0));
    }
}
