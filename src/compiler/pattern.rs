//! 编译后模式模型
//! 正则编译后的结构

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::error::{RsjResult, RsjobfilterError};
use crate::rule::CountryCode;

#[derive(Debug, Clone)]
pub enum PhraseMatcher {
    Contains(String), // 包含匹配（调用方传入已小写文本）
    Regex(Box<Regex>), // 正则匹配（大小写不敏感，传入原始文本）
}

impl PhraseMatcher {
    /// 简单匹配判断
    pub fn is_match(&self, input: &str) -> bool {
        match self {
            PhraseMatcher::Contains(s) => input.contains(s.as_str()),
            PhraseMatcher::Regex(regex) => regex.is_match(input),
        }
    }
}

/// 单个 filter 短语的组合限制模式
/// regex 为该短语的全部限制性模板以 | 连接后的单条正则
#[derive(Debug, Clone)]
pub struct RestrictionPattern {
    pub phrase: String,
    pub matcher: PhraseMatcher,
}

/// 单个国家编译后的规则
#[derive(Debug, Clone)]
pub struct CompiledCountryRule {
    pub country: CountryCode,
    // 小写化的原始短语表
    pub allowed: Vec<String>,
    pub filter: Vec<String>,
    // 远程工作共现匹配器（每个 allowed 短语展开为固定模板组）
    pub remote_matchers: Vec<PhraseMatcher>,
    // 限制性组合正则（每个 filter 短语一条）
    pub restrictions: Vec<RestrictionPattern>,
    // 横幅文案使用的地区标签（allowed 首项）
    pub display_label: String,
}

/// 编译后的规则库
#[derive(Debug, Clone, Default)]
pub struct CompiledRuleLibrary {
    pub rules: FxHashMap<CountryCode, CompiledCountryRule>,
}

impl CompiledRuleLibrary {
    /// 按国家代码取编译后规则
    pub fn get(&self, country: CountryCode) -> RsjResult<&CompiledCountryRule> {
        self.rules
            .get(&country)
            .ok_or_else(|| RsjobfilterError::RuleNotFound(country.to_string()))
    }
}
