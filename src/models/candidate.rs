use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

fn work_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^/works/[A-Za-z0-9]+$").expect("work key regex is valid")
    })
}

/// 作品标识，形式必须为 `/works/<ID>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkKey(String);

impl WorkKey {
    /// 解析作品标识，不合法时返回 `None`
    pub fn parse(raw: &str) -> Option<Self> {
        work_key_regex()
            .is_match(raw)
            .then(|| Self(raw.to_string()))
    }

    /// 完整 key，如 `/works/OL26463951W`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 去掉前缀的 ID，如 `OL26463951W`
    pub fn id(&self) -> &str {
        self.0.trim_start_matches("/works/")
    }
}

impl fmt::Display for WorkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 输入文件中的一条原始记录
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    #[serde(alias = "work")]
    pub work_id: String,
    #[serde(default, alias = "duplicate_authors")]
    pub duplicate_author_ids: Vec<String>,
    #[serde(alias = "all_authors")]
    pub all_author_ids: Vec<String>,
}

/// 待处理的作品记录（加载后不再修改）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
    pub work_key: WorkKey,
    /// 离线分析得到的重复作者，仅作参考
    pub duplicate_author_ids: Vec<String>,
    /// 离线分析时看到的完整作者列表
    pub all_author_ids: Vec<String>,
}

impl TryFrom<RawCandidate> for CandidateRecord {
    type Error = String;

    fn try_from(raw: RawCandidate) -> Result<Self, Self::Error> {
        let work_key = WorkKey::parse(&raw.work_id)
            .ok_or_else(|| format!("work_id 格式非法: {:?}", raw.work_id))?;
        Ok(Self {
            work_key,
            duplicate_author_ids: raw.duplicate_author_ids,
            all_author_ids: raw.all_author_ids,
        })
    }
}
