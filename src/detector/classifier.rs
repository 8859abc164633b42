//! 职位贴分类器
//! 基于固定指示词表的子串包含启发式，无词边界要求，不做误报抑制

/// 职位贴指示词表（小写）
/// 命中任意一条即判定为职位贴
const JOB_INDICATORS: [&str; 23] = [
    "we're hiring",
    "is hiring",
    "job opening",
    "open position",
    "new role",
    "join our team",
    "apply now",
    "view job",
    "job opportunity",
    "position available",
    "submit your application",
    "apply here",
    "job description",
    "compensation:",
    "responsibilities:",
    "qualifications:",
    "requirements:",
    "full-time",
    "part-time",
    "hybrid",
    "apply by",
    "position summary",
    "career opportunity",
];

/// 职位贴分类器
pub struct JobClassifier;

impl JobClassifier {
    /// 判断文本是否形似职位贴
    /// 小写化全文后做子串包含匹配，大小写不敏感
    pub fn is_job_post(text: &str) -> bool {
        let lower = text.to_lowercase();
        JOB_INDICATORS.iter().any(|indicator| lower.contains(indicator))
    }
}
