//! 静态地域规则表
//! 各国家代码的 allowed/filter 短语表为既定产品数据，
//! 各代码之间并非完全对称，按原样保留，不做对称性"修正"

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use super::model::{CountryCode, LocationRule};

/// 全局规则表单例
static LOCATION_RULES: Lazy<FxHashMap<CountryCode, LocationRule>> = Lazy::new(build_table);

/// 获取静态规则表
pub fn location_rules() -> &'static FxHashMap<CountryCode, LocationRule> {
    &LOCATION_RULES
}

fn build_table() -> FxHashMap<CountryCode, LocationRule> {
    let mut table = FxHashMap::default();

    table.insert(CountryCode::US, LocationRule {
        allowed: vec!["united states", "usa", "us", "u.s.", "u.s.a.", "american"],
        filter: vec![
            "canada", "canadian", "vancouver", "toronto", "montreal", "calgary", "ottawa",
            "british columbia", "ontario", "quebec", "alberta", "manitoba",
            "uk", "united kingdom", "london", "manchester", "birmingham", "leeds", "glasgow",
            "england", "scotland", "wales", "northern ireland", "british",
            "australia", "australian", "sydney", "melbourne",
            "new zealand", "wellington", "auckland",
            "european union", "eu", "europe",
        ],
    });

    table.insert(CountryCode::CA, LocationRule {
        allowed: vec!["canada", "canadian"],
        filter: vec![
            "united states", "usa", "us", "uk", "united kingdom",
            "australia", "new zealand", "european union",
        ],
    });

    table.insert(CountryCode::UK, LocationRule {
        allowed: vec![
            "uk", "united kingdom", "england", "scotland", "wales",
            "northern ireland", "british",
        ],
        filter: vec![
            "canada", "united states", "usa", "australia",
            "new zealand", "european union",
        ],
    });

    table.insert(CountryCode::AU, LocationRule {
        allowed: vec!["australia", "australian"],
        filter: vec![
            "canada", "united states", "usa", "uk", "united kingdom",
            "new zealand", "european union",
        ],
    });

    table.insert(CountryCode::NZ, LocationRule {
        allowed: vec!["new zealand", "nz"],
        filter: vec![
            "canada", "united states", "usa", "uk", "united kingdom",
            "australia", "european union",
        ],
    });

    table.insert(CountryCode::EU, LocationRule {
        allowed: vec!["european union", "eu", "europe"],
        filter: vec![
            "canada", "united states", "usa", "uk", "united kingdom",
            "australia", "new zealand",
        ],
    });

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_a_rule() {
        // 测试场景：六个国家代码均有规则条目
        let table = location_rules();
        for code in CountryCode::ALL {
            assert!(table.contains_key(&code), "缺失规则：{}", code);
        }
    }

    #[test]
    fn test_filter_sets_are_non_empty() {
        // 测试场景：任何代码的 filter 集都不为空
        for (code, rule) in location_rules() {
            assert!(!rule.filter.is_empty(), "{} 的 filter 为空", code);
            assert!(!rule.allowed.is_empty(), "{} 的 allowed 为空", code);
        }
    }

    #[test]
    fn test_filter_never_contains_own_allowed_phrase() {
        // 测试场景：filter 集不得包含同一代码的任何 allowed 短语
        for (code, rule) in location_rules() {
            for phrase in &rule.allowed {
                assert!(
                    !rule.filter.contains(phrase),
                    "{} 的 filter 包含了自身 allowed 短语 {:?}",
                    code, phrase
                );
            }
        }
    }

    #[test]
    fn test_display_label_is_first_allowed_phrase() {
        // 测试场景：横幅标签取 allowed 首项
        let rule = &location_rules()[&CountryCode::US];
        assert_eq!(rule.display_label(), "united states");
    }
}
