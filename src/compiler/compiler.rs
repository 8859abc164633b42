//! 规则编译器：静态规则表 → 预编译规则库
//! 限制性模板与远程共现模板为固定产品数据，占位符 {} 在编译期替换为具体短语

use regex::RegexBuilder;

use super::pattern::{CompiledCountryRule, CompiledRuleLibrary, PhraseMatcher, RestrictionPattern};
use crate::error::{RsjResult, RsjobfilterError};
use crate::rule::{location_rules, LocationRule};

/// 远程工作共现模板
/// 帖子描述远程岗位且与用户自身地区共现时放行
const REMOTE_CO_OCCURRENCE_TEMPLATES: [&str; 6] = [
    "remote from {}",
    "{} remote",
    "remote {}",
    "remote work from {}",
    "remote position in {}",
    "{}-based remote",
];

/// 限制性表述模板
/// 每个 filter 短语展开后以 | 连接为单条大小写不敏感正则
const RESTRICTIVE_TEMPLATES: [&str; 27] = [
    r"\b{}\b",
    "{} only",
    "{}( |-)based",
    "in {}",
    "from {}",
    "within {}",
    "{} region",
    "{} area",
    "{} location",
    "position in {}",
    "remote within {}",
    "role in {}",
    "located in {}",
    "working in {}",
    "based in {}",
    "work in {}",
    "relocate to {}",
    "must be in {}",
    "must live in {}",
    "must reside in {}",
    "{} office",
    "{} timezone",
    "{} working hours",
    "authorized to work in {}",
    "right to work in {}",
    "valid work permit in {}",
    "{} work authorization",
];

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译全部国家规则
    /// 单条正则编译失败时记录日志并跳过该短语，不中断整体编译
    pub fn compile() -> RsjResult<CompiledRuleLibrary> {
        let mut library = CompiledRuleLibrary::default();

        for (&country, rule) in location_rules() {
            let compiled = Self::compile_country(country, rule);
            library.rules.insert(country, compiled);
        }

        if library.rules.is_empty() {
            return Err(RsjobfilterError::RuleCompileError(
                "规则表为空，无可编译条目".to_string(),
            ));
        }

        log::debug!("规则库编译完成，共 {} 个国家", library.rules.len());
        Ok(library)
    }

    /// 编译单个国家的规则
    fn compile_country(
        country: crate::rule::CountryCode,
        rule: &LocationRule,
    ) -> CompiledCountryRule {
        let allowed: Vec<String> = rule.allowed.iter().map(|p| p.to_lowercase()).collect();
        let filter: Vec<String> = rule.filter.iter().map(|p| p.to_lowercase()).collect();

        // 1. 远程共现模板展开（纯子串匹配，无需正则）
        let remote_matchers = allowed
            .iter()
            .flat_map(|phrase| {
                REMOTE_CO_OCCURRENCE_TEMPLATES
                    .iter()
                    .map(move |template| PhraseMatcher::Contains(template.replace("{}", phrase)))
            })
            .collect();

        // 2. 每个 filter 短语编译一条组合限制正则
        let restrictions = filter
            .iter()
            .filter_map(|phrase| match Self::build_restriction_regex(phrase) {
                Ok(matcher) => Some(RestrictionPattern {
                    phrase: phrase.clone(),
                    matcher,
                }),
                Err(e) => {
                    log::warn!("限制正则编译失败，跳过短语 {:?}：{}", phrase, e);
                    None
                }
            })
            .collect();

        CompiledCountryRule {
            country,
            display_label: rule.display_label().to_string(),
            allowed,
            filter,
            remote_matchers,
            restrictions,
        }
    }

    /// 构建单个短语的组合限制正则
    fn build_restriction_regex(phrase: &str) -> RsjResult<PhraseMatcher> {
        let escaped = regex::escape(phrase);
        let combined = RESTRICTIVE_TEMPLATES
            .iter()
            .map(|template| template.replace("{}", &escaped))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&combined)
            .case_insensitive(true)
            .build()?;
        Ok(PhraseMatcher::Regex(Box::new(regex)))
    }
}
