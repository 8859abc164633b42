//! 地域匹配器
//! 三步判定，先到先决：
//! 1. 地域短语邻近检查 - 固定前导短语后的有限窗口内出现 filter 短语则拒绝
//! 2. 远程放行检查 - 远程岗位与用户自身地区共现则放行
//! 3. 通用限制检查 - 任一 filter 短语的组合限制正则命中则拒绝，否则放行

use crate::compiler::CompiledCountryRule;

/// 地域要求前导短语表（小写）
/// 每条短语只取首次出现位置
const LOCATION_PHRASES: [&str; 18] = [
    "based in",
    "located in",
    "position in",
    "role in",
    "working in",
    "work in",
    "position is in",
    "job is in",
    "based out of",
    "relocate to",
    "must be in",
    "must live in",
    "must reside in",
    "position is based",
    "role is based",
    "job based",
    "work from",
    "working from",
];

/// 地域匹配器
pub struct LocationMatcher;

impl LocationMatcher {
    /// 判断帖子对当前用户是否放行
    ///
    /// # 参数
    /// - `text`: 帖子原始大小写全文
    /// - `rule`: 用户国家的编译后规则
    /// - `show_remote`: 用户是否展示远程岗位
    /// - `window_chars`: 前导短语后的向前看窗口宽度（字符数）
    ///
    /// # 返回值
    /// - `true`: 放行（不过滤）
    /// - `false`: 拒绝（应被遮罩）
    pub fn is_allowed(
        text: &str,
        rule: &CompiledCountryRule,
        show_remote: bool,
        window_chars: usize,
    ) -> bool {
        let lower = text.to_lowercase();

        // 1. 地域短语邻近检查（短路拒绝）
        if Self::proximity_rejects(&lower, rule, window_chars) {
            return false;
        }

        // 2. 远程放行检查（短路放行）
        if show_remote
            && lower.contains("remote")
            && rule.remote_matchers.iter().any(|m| m.is_match(&lower))
        {
            return true;
        }

        // 3. 通用限制检查（组合正则对原始大小写文本匹配，正则自身不敏感大小写）
        !rule.restrictions.iter().any(|restriction| {
            let hit = restriction.matcher.is_match(text);
            if hit {
                log::debug!("限制正则命中，短语：{:?}", restriction.phrase);
            }
            hit
        })
    }

    /// 前导短语邻近检查
    /// 对每条前导短语的首次出现位置，截取其后 window_chars 个字符的窗口，
    /// 窗口内出现任一 filter 短语即拒绝
    fn proximity_rejects(lower: &str, rule: &CompiledCountryRule, window_chars: usize) -> bool {
        for phrase in LOCATION_PHRASES {
            let Some(index) = lower.find(phrase) else {
                continue;
            };
            // 前导短语为纯ASCII，index + len 必落在字符边界上
            let following = &lower[index + phrase.len()..];
            let window = Self::char_window(following, window_chars);
            if rule.filter.iter().any(|location| window.contains(location.as_str())) {
                log::debug!("邻近检查拒绝，前导短语：{:?}", phrase);
                return true;
            }
        }
        false
    }

    /// 按字符数截取窗口，宽度不足时取全部
    /// 固定宽度窗口可能截断词中或漏掉边界外的地名，按既定策略保留
    fn char_window(text: &str, window_chars: usize) -> &str {
        match text.char_indices().nth(window_chars) {
            Some((byte_index, _)) => &text[..byte_index],
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RuleCompiler;
    use crate::rule::CountryCode;

    const WINDOW: usize = 50;

    fn us_rule() -> crate::compiler::CompiledCountryRule {
        RuleCompiler::compile()
            .unwrap()
            .get(CountryCode::US)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_proximity_check_rejects_nearby_filter_phrase() {
        // 测试场景：US 用户，"based in" 窗口内出现 canada，第一步拒绝
        let rule = us_rule();
        let text = "This position is based in Toronto, Canada, full remote";
        assert!(!LocationMatcher::is_allowed(text, &rule, true, WINDOW));
    }

    #[test]
    fn test_remote_allowance_accepts_own_region() {
        // 测试场景：US 用户开启远程展示，"remote position in united states" 第二步放行
        let rule = us_rule();
        let text = "Remote position in United States, apply now";
        assert!(LocationMatcher::is_allowed(text, &rule, true, WINDOW));
    }

    #[test]
    fn test_remote_allowance_disabled_falls_through() {
        // 测试场景：关闭远程展示后，同一文本落入第三步；
        // 文本不含 filter 短语限制表述，仍然放行
        let rule = us_rule();
        let text = "Remote position in United States, apply now";
        assert!(LocationMatcher::is_allowed(text, &rule, false, WINDOW));
    }

    #[test]
    fn test_general_restriction_rejects_authorization_wording() {
        // 测试场景：US 用户，"authorized to work in canada" 第三步拒绝
        let rule = us_rule();
        let text = "Applicants must be authorized to work in Canada";
        assert!(!LocationMatcher::is_allowed(text, &rule, true, WINDOW));
    }

    #[test]
    fn test_open_location_post_is_allowed() {
        // 测试场景：不含任何 filter 短语的远程岗位放行
        let rule = us_rule();
        let text = "We are hiring a remote engineer, open to any location";
        assert!(LocationMatcher::is_allowed(text, &rule, true, WINDOW));
    }

    #[test]
    fn test_proximity_rejection_short_circuits_remote_allowance() {
        // 测试场景：第一步拒绝优先于第二步放行（同一文本同时满足两者）
        let rule = us_rule();
        let text = "Must reside in Canada. Remote from united states also mentioned.";
        assert!(!LocationMatcher::is_allowed(text, &rule, true, WINDOW));
    }

    #[test]
    fn test_filter_phrase_outside_window_not_proximity_rejected() {
        // 测试场景：地名在 50 字符窗口之外，第一步不拒绝；
        // 但第三步的 "in {}" 模板仍会命中该表述
        let rule = us_rule();
        let padding = "x".repeat(60);
        let text = format!("based in {} and later we mention canada", padding);
        // 窗口内只有填充字符，邻近检查不触发
        assert!(!LocationMatcher::proximity_rejects(
            &text.to_lowercase(),
            &rule,
            WINDOW
        ));
        // 整体仍被第三步拒绝（\bcanada\b 命中）
        assert!(!LocationMatcher::is_allowed(&text, &rule, true, WINDOW));
    }

    #[test]
    fn test_char_window_is_char_boundary_safe() {
        // 测试场景：多字节字符文本按字符数截取，不得在字节中间截断
        let text = "加拿大温哥华办公室加拿大温哥华办公室";
        let window = LocationMatcher::char_window(text, 5);
        assert_eq!(window.chars().count(), 5);
    }

    #[test]
    fn test_ca_user_rejects_us_posting() {
        // 测试场景：CA 用户被 "based in" 窗口内的 united states 拒绝
        let library = RuleCompiler::compile().unwrap();
        let rule = library.get(CountryCode::CA).unwrap();
        let text = "Exciting role based in United States, hybrid schedule";
        assert!(!LocationMatcher::is_allowed(text, rule, true, WINDOW));
    }
}
