use serde_json::Value;

/// 任意JSON标量转文本 (null/对象/数组 视为空串)
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// 宽松解析标识: 数字或数字字符串 -> i64, 其余 -> None
pub fn id_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
        }
        _ => None,
    }
}

/// 宽松小数解析: 只替换第一个逗号, 取最长合法前缀, 非有限 -> 0
/// 千分位分隔符不做处理 ("1.234,56" 解析为 1.234, 遗留行为)
pub fn parse_decimal_lenient(raw: &str) -> f64 {
    let s = raw.trim().replacen(',', ".", 1);
    let mut t = s.as_str();
    while !t.is_empty() {
        if let Ok(v) = t.parse::<f64>() {
            return if v.is_finite() { v } else { 0.0 };
        }
        let cut = t.chars().last().map_or(0, char::len_utf8);
        t = &t[..t.len() - cut];
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_of_scalars() {
        assert_eq!(text_of(&json!("abc")), "abc");
        assert_eq!(text_of(&json!(12)), "12");
        assert_eq!(text_of(&json!(true)), "true");
        assert_eq!(text_of(&Value::Null), "");
        assert_eq!(text_of(&json!({"a": 1})), "");
    }

    #[test]
    fn id_of_coercion() {
        assert_eq!(id_of(&json!(7)), Some(7));
        assert_eq!(id_of(&json!("7")), Some(7));
        assert_eq!(id_of(&json!(" 7 ")), Some(7));
        assert_eq!(id_of(&json!(0)), Some(0));
        assert_eq!(id_of(&json!("abc")), None);
        assert_eq!(id_of(&Value::Null), None);
        assert_eq!(id_of(&json!(true)), None);
    }

    #[test]
    fn lenient_parse_comma_and_dot() {
        assert_eq!(parse_decimal_lenient("10,50"), 10.5);
        assert_eq!(parse_decimal_lenient("10.50"), 10.5);
        assert_eq!(parse_decimal_lenient("  7,25  "), 7.25);
    }

    #[test]
    fn lenient_parse_prefix_semantics() {
        // 第一个逗号换成点之后, 剩余文本按最长合法前缀解析
        assert_eq!(parse_decimal_lenient("12abc"), 12.0);
        assert_eq!(parse_decimal_lenient("1.234,56"), 1.234);
        assert_eq!(parse_decimal_lenient("-5,5x"), -5.5);
    }

    #[test]
    fn lenient_parse_garbage_is_zero() {
        assert_eq!(parse_decimal_lenient(""), 0.0);
        assert_eq!(parse_decimal_lenient("abc"), 0.0);
        assert_eq!(parse_decimal_lenient("Infinity"), 0.0);
        assert_eq!(parse_decimal_lenient("NaN"), 0.0);
    }
}
