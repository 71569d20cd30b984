//! 文字列・変数補間モードの字句規則
//!
//! モードごとに規則集合を1つ持つ。デフォルトモードと違い順序依存の
//! 規則がないため、logosの最長一致で切り出す。

use logos::Logos;

/// 文字列モード共通の字句
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// 文字列の内容
    Text,
    /// `\`とその次の1文字
    Escape,
    /// 三重引用符内の1〜2個の引用符
    Quote,
    /// `{{` 変数補間の開始
    Open,
    /// 終端の引用符
    End,
}

/// 変数補間モードの字句
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub enum Interpolation {
    #[token("{{")]
    Open,

    #[token("}}")]
    Close,

    #[regex(r#"((\.?_?[a-zA-Z]+(-[a-zA-Z0-9_]+)?[0-9]*)|(\[('[^']+'|"[^"]+"|[0-9]+)\]))+(\[-?[0-9]+(\.\.-?[0-9]*)?\])?"#)]
    Name,
}

/// `'...'`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum SingleApostrophe {
    #[token("'")]
    End,
    #[token("{{")]
    Open,
    #[regex(r"\\(.|\n)")]
    Escape,
    #[regex(r"([{}]?[^{}'\\\n])+")]
    Text,
}

/// `"..."`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum SingleDouble {
    #[token("\"")]
    End,
    #[token("{{")]
    Open,
    #[regex(r"\\(.|\n)")]
    Escape,
    #[regex(r#"([{}]?[^{}"\\\n])+"#)]
    Text,
}

/// `'''...'''`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum TripleApostrophe {
    #[token("'''")]
    End,
    #[token("{{")]
    Open,
    #[regex(r"\\(.|\n)")]
    Escape,
    #[regex(r"''?")]
    Quote,
    #[regex(r"([{}]?[^{}'\\]|''?[^{}'\\])+")]
    Text,
}

/// `"""..."""`
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum TripleDouble {
    #[token("\"\"\"")]
    End,
    #[token("{{")]
    Open,
    #[regex(r"\\(.|\n)")]
    Escape,
    #[regex(r#"""?"#)]
    Quote,
    #[regex(r#"([{}]?[^{}"\\]|""?[^{}"\\])+"#)]
    Text,
}

macro_rules! into_fragment {
    ($rule:ident { $($variant:ident),* }) => {
        impl From<$rule> for Fragment {
            fn from(rule: $rule) -> Self {
                match rule {
                    $($rule::$variant => Fragment::$variant,)*
                }
            }
        }
    };
}

into_fragment!(SingleApostrophe { End, Open, Escape, Text });
into_fragment!(SingleDouble { End, Open, Escape, Text });
into_fragment!(TripleApostrophe { End, Open, Escape, Quote, Text });
into_fragment!(TripleDouble { End, Open, Escape, Quote, Text });

/// 文字列の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    SingleApostrophe,
    SingleDouble,
    TripleApostrophe,
    TripleDouble,
}

impl StringKind {
    pub fn is_triple(self) -> bool {
        matches!(self, StringKind::TripleApostrophe | StringKind::TripleDouble)
    }
}

/// 先頭の字句1つと、その長さを返す
fn first<'s, T>(input: &'s str) -> Option<(T, usize)>
where
    T: Logos<'s, Source = str> + Into<Fragment>,
    T::Extras: Default,
{
    let mut lexer = T::lexer(input);
    match lexer.next()? {
        Ok(rule) => Some((rule, lexer.span().end)),
        Err(_) => None,
    }
}

/// 文字列モードで先頭の断片を1つ切り出す
pub fn string_fragment(kind: StringKind, input: &str) -> Option<(Fragment, usize)> {
    fn widen<T: Into<Fragment>>((rule, len): (T, usize)) -> (Fragment, usize) {
        (rule.into(), len)
    }

    match kind {
        StringKind::SingleApostrophe => first::<SingleApostrophe>(input).map(widen),
        StringKind::SingleDouble => first::<SingleDouble>(input).map(widen),
        StringKind::TripleApostrophe => first::<TripleApostrophe>(input).map(widen),
        StringKind::TripleDouble => first::<TripleDouble>(input).map(widen),
    }
}

/// 補間モードで先頭の字句を1つ切り出す（空白は読み飛ばす）
///
/// 戻り値は字句、開始オフセット、終了オフセット。
pub fn interpolation_lexeme(input: &str) -> Option<Result<(Interpolation, usize, usize), usize>> {
    let mut lexer = Interpolation::lexer(input);
    let result = lexer.next()?;
    let span = lexer.span();
    Some(match result {
        Ok(rule) => Ok((rule, span.start, span.end)),
        Err(()) => Err(span.start),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StringKind::SingleApostrophe, "abc' rest", Fragment::Text, 3; "single text")]
    #[test_case(StringKind::SingleApostrophe, "' rest", Fragment::End, 1; "single end")]
    #[test_case(StringKind::SingleApostrophe, "\\'x'", Fragment::Escape, 2; "single escaped quote")]
    #[test_case(StringKind::SingleApostrophe, "{{x}}'", Fragment::Open, 2; "single open")]
    #[test_case(StringKind::SingleApostrophe, "a {b} c{{x}}'", Fragment::Text, 7; "single braces")]
    #[test_case(StringKind::SingleDouble, "it's\"", Fragment::Text, 4; "double keeps apostrophe")]
    #[test_case(StringKind::TripleApostrophe, "a''b'''", Fragment::Text, 4; "triple inner quotes")]
    #[test_case(StringKind::TripleApostrophe, "line\nnext'''", Fragment::Text, 9; "triple newline")]
    #[test_case(StringKind::TripleApostrophe, "'''", Fragment::End, 3; "triple end")]
    #[test_case(StringKind::TripleDouble, "\"\"\"", Fragment::End, 3; "triple double end")]
    fn test_string_fragment(kind: StringKind, input: &str, fragment: Fragment, len: usize) {
        assert_eq!(string_fragment(kind, input), Some((fragment, len)));
    }

    #[test]
    fn test_single_quote_stops_at_newline() {
        assert_eq!(
            string_fragment(StringKind::SingleApostrophe, "ab\ncd'"),
            Some((Fragment::Text, 2))
        );
        assert_eq!(string_fragment(StringKind::SingleApostrophe, "\ncd'"), None);
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(
            interpolation_lexeme("  user.name }}"),
            Some(Ok((Interpolation::Name, 2, 11)))
        );
        assert_eq!(interpolation_lexeme(" }}x"), Some(Ok((Interpolation::Close, 1, 3))));
        assert_eq!(interpolation_lexeme("{{"), Some(Ok((Interpolation::Open, 0, 2))));
        assert_eq!(interpolation_lexeme("?"), Some(Err(0)));
        assert_eq!(interpolation_lexeme("   "), None);
    }
}
