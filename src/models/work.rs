use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 作品在远端的实时快照
///
/// 只对 `authors` 做类型化处理，其余字段原样保留，写回时不做任何改动。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkSnapshot {
    /// 作者条目列表，没有 `authors` 字段时为空
    pub fn author_entries(&self) -> &[Value] {
        self.authors.as_deref().unwrap_or(&[])
    }

    /// 所有可识别的作者 ID（按出现顺序，含重复）
    pub fn author_ids(&self) -> Vec<&str> {
        self.author_entries()
            .iter()
            .filter_map(author_key)
            .collect()
    }

    /// 记录类型，如 `/type/work`、`/type/redirect`
    pub fn type_key(&self) -> Option<&str> {
        self.extra
            .get("type")
            .and_then(|t| t.get("key"))
            .and_then(Value::as_str)
    }

    /// 作品已被合并（重定向）或删除
    pub fn is_gone(&self) -> bool {
        matches!(self.type_key(), Some("/type/redirect") | Some("/type/delete"))
    }
}

/// 从作者条目中取出作者 ID
///
/// 支持两种格式：`{"author": {"key": ...}}` 和 `{"key": ...}`。
pub fn author_key(entry: &Value) -> Option<&str> {
    let key = match entry.get("author") {
        Some(author) => author.get("key"),
        None => entry.get("key"),
    };
    key.and_then(Value::as_str).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_preserves_unknown_fields() {
        let raw = json!({
            "key": "/works/OL1W",
            "title": "Some Title",
            "type": {"key": "/type/work"},
            "authors": [
                {"author": {"key": "/authors/OL1A"}, "type": {"key": "/type/author_role"}}
            ],
            "revision": 7
        });
        let snapshot: WorkSnapshot = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(snapshot.author_ids(), vec!["/authors/OL1A"]);
        assert_eq!(snapshot.type_key(), Some("/type/work"));
        assert!(!snapshot.is_gone());

        let back = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_snapshot_without_authors() {
        let snapshot: WorkSnapshot =
            serde_json::from_value(json!({"key": "/works/OL1W"})).unwrap();
        assert!(snapshot.author_entries().is_empty());
        let back = serde_json::to_value(&snapshot).unwrap();
        assert!(back.get("authors").is_none());
    }

    #[test]
    fn test_redirect_is_gone() {
        let snapshot: WorkSnapshot = serde_json::from_value(json!({
            "key": "/works/OL1W",
            "type": {"key": "/type/redirect"},
            "location": "/works/OL2W"
        }))
        .unwrap();
        assert!(snapshot.is_gone());
    }

    #[test]
    fn test_author_key_formats() {
        assert_eq!(
            author_key(&json!({"author": {"key": "/authors/OL1A"}})),
            Some("/authors/OL1A")
        );
        assert_eq!(author_key(&json!({"key": "/authors/OL2A"})), Some("/authors/OL2A"));
        assert_eq!(author_key(&json!({"author": {}})), None);
        assert_eq!(author_key(&json!("/authors/OL3A")), None);
        assert_eq!(author_key(&json!({"key": ""})), None);
    }
}
