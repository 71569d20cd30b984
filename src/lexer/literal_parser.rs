//! リテラルの解析

use super::token::TokenValue;

/// インデント用の空白を展開する
///
/// タブは次の偶数列まで空白で埋める。
pub fn expand_indentation(raw: &str) -> String {
    let mut expanded = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '\t' {
            let width = 2 - expanded.len() % 2;
            expanded.extend(std::iter::repeat(' ').take(width));
        } else {
            expanded.push(ch);
        }
    }
    expanded
}

/// 数値リテラルを正規化する
///
/// 先頭の`$`を取り除き、末尾の`%`は100で割った小数にする。
/// それ以外は検証した上でテキストのまま返す。
pub fn normalize_number(raw: &str) -> Result<TokenValue, String> {
    let text = raw.strip_prefix('$').unwrap_or(raw);

    if let Some(number) = text.strip_suffix('%') {
        let value = parse_number(number)?;
        return Ok(TokenValue::Fraction(value / 100.0));
    }

    parse_number(text)?;
    Ok(TokenValue::text(text))
}

/// 16進・8進・10進（指数表記を含む）を数値として解釈する
fn parse_number(text: &str) -> Result<f64, String> {
    let invalid = || format!("invalid number literal '{}'", text);

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .map_err(|_| invalid());
    }

    let is_octal = text.len() > 1
        && text.starts_with('0')
        && text.bytes().all(|b| (b'0'..=b'7').contains(&b));
    if is_octal {
        return u64::from_str_radix(&text[1..], 8)
            .map(|n| n as f64)
            .map_err(|_| invalid());
    }

    text.parse::<f64>().map_err(|_| invalid())
}
