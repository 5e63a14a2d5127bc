use crate::error::LoadError;
use crate::models::candidate::{CandidateRecord, RawCandidate};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载待处理的作品记录
///
/// 文件顶层必须是数组。单条记录缺字段、类型不对或 `work_id` 非法时丢弃并告警，
/// 其余记录照常加载，顺序与文件一致。
pub async fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<CandidateRecord>, LoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.exists() {
        return Err(LoadError::NotFound { path: display });
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::ReadFailed {
            path: display.clone(),
            source,
        })?;

    parse_candidates(&content, &display)
}

/// 解析 JSON 文本（与文件读取分开，便于测试）
pub fn parse_candidates(content: &str, source_name: &str) -> Result<Vec<CandidateRecord>, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::JsonParseFailed {
            path: source_name.to_string(),
            source,
        })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(LoadError::NotAList {
                path: source_name.to_string(),
                found: json_type_name(&other),
            })
        }
    };

    tracing::info!("从 JSON 中读取到 {} 条记录", items.len());

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let raw: RawCandidate = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("⚠️ 第 {} 条记录格式错误，已丢弃: {}", index + 1, e);
                continue;
            }
        };

        match CandidateRecord::try_from(raw) {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::warn!("⚠️ 第 {} 条记录已丢弃: {}", index + 1, reason);
            }
        }
    }

    Ok(records)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_keeps_input_order() {
        let records = parse_candidates(
            r#"[
                {"work_id": "/works/OL2W", "duplicate_author_ids": ["/authors/OL1A"], "all_author_ids": ["/authors/OL1A", "/authors/OL1A"]},
                {"work_id": "/works/OL1W", "duplicate_author_ids": [], "all_author_ids": []}
            ]"#,
            "inline",
        )
        .unwrap();

        let keys: Vec<&str> = records.iter().map(|r| r.work_key.as_str()).collect();
        assert_eq!(keys, vec!["/works/OL2W", "/works/OL1W"]);
        assert_eq!(records[0].duplicate_author_ids, vec!["/authors/OL1A"]);
    }

    #[test]
    fn test_parse_drops_malformed_records() {
        let records = parse_candidates(
            r#"[
                {"duplicate_author_ids": [], "all_author_ids": []},
                {"work_id": "/works/OL1W"},
                {"work_id": 42, "all_author_ids": []},
                {"work_id": "not a work!", "all_author_ids": []},
                "/works/OL9W",
                {"work_id": "/works/OL3W", "all_author_ids": ["/authors/OL1A"]}
            ]"#,
            "inline",
        )
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_key.as_str(), "/works/OL3W");
    }

    #[test]
    fn test_parse_rejects_non_list() {
        let err = parse_candidates(r#"{"work_id": "/works/OL1W"}"#, "inline").unwrap_err();
        assert!(matches!(err, LoadError::NotAList { found: "object", .. }));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_candidates("[{", "inline").unwrap_err();
        assert!(matches!(err, LoadError::JsonParseFailed { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_candidates("/nonexistent/duplicate_authors.json")
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"work_id": "/works/OL26463951W", "all_author_ids": ["/authors/OL3308154A", "/authors/OL3308154A"]}}]"#
        )
        .unwrap();

        let records = load_candidates(file.path()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].work_key.as_str(), "/works/OL26463951W");
    }

    #[test]
    fn test_parse_drops_work_ids_without_works_prefix() {
        let records = parse_candidates(
            r#"[
                {"work_id": "OL1W", "all_author_ids": []},
                {"work_id": "  /works/OL2W\n", "all_author_ids": []},
                {"work_id": "/authors/OL3A", "all_author_ids": []},
                {"work_id": "/works/OL4W", "all_author_ids": []}
            ]"#,
            "inline",
        )
        .unwrap();

        let keys: Vec<&str> = records.iter().map(|r| r.work_key.as_str()).collect();
        assert_eq!(keys, vec!["/works/OL4W"]);
    }
}
