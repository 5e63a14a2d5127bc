//! 去重服务 - 业务能力层
//!
//! 只负责"作者列表去重"能力：纯函数，不访问网络，不关心流程

use serde_json::Value;
use std::collections::HashSet;
use std::hash::Hash;

use crate::models::{author_key, WorkSnapshot};

/// 去重结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduplicated<T> {
    /// 去重后的列表（保留首次出现的顺序）
    pub items: Vec<T>,
    /// 被移除的条目数
    pub removed: usize,
}

/// 保留每个元素的第一次出现，其余删除
pub fn dedup_first_occurrence<T>(items: &[T]) -> Deduplicated<T>
where
    T: Eq + Hash + Clone,
{
    let (items, removed) = dedup_by_key(items.iter().cloned(), |item| Some(item.clone()));
    Deduplicated {
        removed: removed.len(),
        items,
    }
}

/// 按 key 去重，`key` 返回 `None` 的元素原样保留且不参与比较
///
/// 返回去重后的列表和被移除元素的 key（按移除顺序）。
pub fn dedup_by_key<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F) -> (Vec<T>, Vec<K>)
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    let mut removed = Vec::new();

    for item in items {
        match key(&item) {
            Some(k) if !seen.insert(k.clone()) => removed.push(k),
            _ => kept.push(item),
        }
    }

    (kept, removed)
}

/// 一次去重的差异
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDiff {
    pub original_count: usize,
    pub new_count: usize,
    pub removed: usize,
    /// 被移除的作者 ID（可能重复出现，如同一作者出现三次）
    pub removed_ids: Vec<String>,
}

impl AuthorDiff {
    pub fn has_changes(&self) -> bool {
        self.removed > 0
    }
}

/// 对作品快照的作者列表去重
///
/// 返回修正后的快照（其余字段不变）和差异。
pub fn dedup_work_authors(snapshot: &WorkSnapshot) -> (WorkSnapshot, AuthorDiff) {
    let entries = snapshot.author_entries();
    let original_count = entries.len();

    let (kept, removed_ids): (Vec<Value>, Vec<String>) =
        dedup_by_key(entries.iter().cloned(), |entry| author_key(entry).map(str::to_string));

    for id in &removed_ids {
        tracing::debug!("移除重复作者: {}", id);
    }

    let diff = AuthorDiff {
        original_count,
        new_count: kept.len(),
        removed: removed_ids.len(),
        removed_ids,
    };

    let mut cleaned = snapshot.clone();
    if cleaned.authors.is_some() {
        cleaned.authors = Some(kept);
    }

    (cleaned, diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn is_subsequence(sub: &[String], full: &[String]) -> bool {
        let mut it = full.iter();
        sub.iter().all(|x| it.any(|y| y == x))
    }

    #[test]
    fn test_dedup_examples() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            dedup_first_occurrence(&empty),
            Deduplicated {
                items: Vec::new(),
                removed: 0
            }
        );

        let single = dedup_first_occurrence(&ids(&["A"]));
        assert_eq!(single.items, ids(&["A"]));
        assert_eq!(single.removed, 0);

        let pair = dedup_first_occurrence(&ids(&["A", "A"]));
        assert_eq!(pair.items, ids(&["A"]));
        assert_eq!(pair.removed, 1);

        let mixed = dedup_first_occurrence(&ids(&["A", "B", "A", "C", "B"]));
        assert_eq!(mixed.items, ids(&["A", "B", "C"]));
        assert_eq!(mixed.removed, 2);
    }

    #[test]
    fn test_dedup_all_identical() {
        let result = dedup_first_occurrence(&ids(&["X", "X", "X", "X"]));
        assert_eq!(result.items, ids(&["X"]));
        assert_eq!(result.removed, 3);
    }

    #[test]
    fn test_dedup_properties() {
        let cases = vec![
            ids(&[]),
            ids(&["A"]),
            ids(&["A", "B", "C"]),
            ids(&["C", "B", "A", "B", "C"]),
            ids(&["A", "A", "B", "B", "A", "C", "D", "C"]),
        ];

        for input in cases {
            let once = dedup_first_occurrence(&input);
            assert!(once.items.len() <= input.len());
            assert_eq!(once.items.len() + once.removed, input.len());
            assert!(is_subsequence(&once.items, &input));

            let distinct_in: HashSet<&String> = input.iter().collect();
            let distinct_out: HashSet<&String> = once.items.iter().collect();
            assert_eq!(distinct_in, distinct_out);
            assert_eq!(distinct_out.len(), once.items.len());

            let twice = dedup_first_occurrence(&once.items);
            assert_eq!(twice.items, once.items);
            assert_eq!(twice.removed, 0);
        }
    }

    #[test]
    fn test_dedup_work_authors() {
        let snapshot: WorkSnapshot = serde_json::from_value(json!({
            "key": "/works/OL26463951W",
            "title": "Title",
            "authors": [
                {"author": {"key": "/authors/OL3308154A"}, "type": {"key": "/type/author_role"}},
                {"author": {"key": "/authors/OL3308154A"}, "type": {"key": "/type/author_role"}}
            ]
        }))
        .unwrap();

        let (cleaned, diff) = dedup_work_authors(&snapshot);
        assert_eq!(diff.original_count, 2);
        assert_eq!(diff.new_count, 1);
        assert_eq!(diff.removed, 1);
        assert_eq!(diff.removed_ids, ids(&["/authors/OL3308154A"]));
        assert_eq!(cleaned.author_ids(), vec!["/authors/OL3308154A"]);
        assert_eq!(cleaned.extra, snapshot.extra);
    }

    #[test]
    fn test_dedup_work_authors_keeps_unkeyed_entries() {
        let snapshot: WorkSnapshot = serde_json::from_value(json!({
            "authors": [
                {"key": "/authors/OL1A"},
                {"type": {"key": "/type/author_role"}},
                {"type": {"key": "/type/author_role"}},
                {"author": {"key": "/authors/OL1A"}}
            ]
        }))
        .unwrap();

        let (cleaned, diff) = dedup_work_authors(&snapshot);
        assert_eq!(diff.removed, 1);
        assert_eq!(cleaned.author_entries().len(), 3);
    }

    #[test]
    fn test_dedup_work_without_authors() {
        let snapshot: WorkSnapshot =
            serde_json::from_value(json!({"key": "/works/OL1W"})).unwrap();
        let (cleaned, diff) = dedup_work_authors(&snapshot);
        assert!(!diff.has_changes());
        assert_eq!(cleaned, snapshot);
    }
}
