// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 语言按调用显式传入，不修改全局 locale，
// 并发生成的不同语言视图互不干扰
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use one_tracker_qc::i18n::t_in;
/// let msg = t_in("en", "card.pass_rate");
/// ```
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数，占位符格式 `%{name}`）
///
/// # 示例
/// ```no_run
/// use one_tracker_qc::i18n::t_in_with_args;
/// let msg = t_in_with_args("en", "insight.scrap_rate_elevated", &[("rate", "3.0%".to_string())]);
/// ```
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, String)]) -> String {
    let mut result = t_in(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
