//! レキサーテスト
//!
//! Storyscriptのレキサーの統合テスト。キーワード分類、文字列モード、
//! 数値・正規表現リテラル、エラー報告を確認する。

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storyscript::error::LexerError;
    use storyscript::lexer::{tokenize, Lexer, Token, TokenKind, TokenValue};
    use test_case::test_case;

    /// トークンの種類のみを取り出すヘルパー関数
    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    /// 最初のトークンを取得するヘルパー関数
    fn first(source: &str) -> Token {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .next()
            .expect("no tokens")
    }

    fn error(source: &str) -> LexerError {
        tokenize(source).expect_err("expected a lexical error")
    }

    #[test]
    fn test_if_with_phrase_comparison() {
        let tokens = tokenize("if (a is equal to 1)\n\tx = 0\n").unwrap();
        let summary: Vec<(TokenKind, String, usize)> = tokens
            .iter()
            .map(|t| (t.kind, t.value.to_string(), t.line))
            .collect();

        let text = |s: &str| format!("{:?}", s);
        assert_eq!(
            summary,
            vec![
                (TokenKind::If, text("if"), 1),
                (TokenKind::LParen, text("("), 1),
                (TokenKind::Path, text("a"), 1),
                (TokenKind::Eq, text("=="), 1),
                (TokenKind::Digits, text("1"), 1),
                (TokenKind::RParen, text(")"), 1),
                (TokenKind::Newline, String::new(), 1),
                (TokenKind::Indent, String::new(), 2),
                (TokenKind::Path, text("x"), 2),
                (TokenKind::Eq, text("=="), 2),
                (TokenKind::Digits, text("0"), 2),
                (TokenKind::Newline, String::new(), 2),
                (TokenKind::Dedent, String::new(), 2),
                (TokenKind::Eof, String::new(), 2),
            ]
        );

        // 条件行の次の行の最初のトークンはインデント必須
        let flagged: Vec<&str> = tokens
            .iter()
            .filter(|t| t.must_indent)
            .filter_map(Token::text)
            .collect();
        assert_eq!(flagged, vec!["x"]);
    }

    #[test]
    fn test_trailing_newline_is_optional() {
        let sources = ["x = 1", "if a\n  b = 2", "s = 'x'"];
        for source in sources {
            let with_newline = format!("{}\n", source);
            assert_eq!(
                tokenize(source).unwrap(),
                tokenize(&with_newline).unwrap(),
                "source: {:?}",
                source
            );
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(kinds("x = 1\r\ny = 2\r\n"), kinds("x = 1\ny = 2\n"));
    }

    #[test_case("true", TokenKind::Boolean ; "boolean")]
    #[test_case("--force", TokenKind::Kwarg ; "keyword argument")]
    #[test_case("number of", TokenKind::NumberOf ; "number of")]
    #[test_case("is not equal to", TokenKind::Ne ; "not equal phrase")]
    #[test_case("!=", TokenKind::Ne ; "not equal operator")]
    #[test_case("greater than", TokenKind::Gt ; "greater phrase")]
    #[test_case("is less then", TokenKind::Lt ; "less phrase")]
    #[test_case("isnt", TokenKind::Isnt ; "isnt")]
    #[test_case("<=", TokenKind::Operator ; "less or equal")]
    #[test_case("sort by", TokenKind::SortBy ; "sort by")]
    #[test_case("else if", TokenKind::ElseIf ; "else if")]
    #[test_case("unless", TokenKind::If ; "unless")]
    #[test_case("desc", TokenKind::AscDesc ; "descending")]
    #[test_case("from", TokenKind::From ; "from")]
    #[test_case("at", TokenKind::Ni ; "at")]
    #[test_case("daily", TokenKind::Schedule ; "schedule")]
    #[test_case("largest", TokenKind::Largest ; "sorter")]
    #[test_case("Contains", TokenKind::Contains ; "keyword is case insensitive")]
    #[test_case("iffy", TokenKind::Path ; "if prefix stays a name")]
    #[test_case("sort bytes", TokenKind::Path ; "sort prefix stays a name")]
    #[test_case("users.name", TokenKind::Path ; "dotted path")]
    #[test_case("the", TokenKind::Path ; "articles are names")]
    #[test_case("0x1F", TokenKind::Digits ; "hex")]
    #[test_case("/ab+c/i", TokenKind::Regex ; "regex")]
    fn test_first_token_kind(source: &str, expected: TokenKind) {
        assert_eq!(first(source).kind, expected);
    }

    #[test]
    fn test_literal_values() {
        assert_eq!(first("true").value, TokenValue::Boolean(true));
        assert_eq!(first("$12.5").value, TokenValue::text("12.5"));
        assert_eq!(first("50%").value, TokenValue::Fraction(0.5));
        assert_eq!(
            first("/ab+c/i").value,
            TokenValue::Regex {
                pattern: "ab+c".to_string(),
                insensitive: true,
            }
        );
        assert_eq!(first("number of").value, TokenValue::text("count"));
    }

    #[test]
    fn test_string_interpolation() {
        let tokens = tokenize("x = \"hello {{ name }}\"").unwrap();
        let summary: Vec<(TokenKind, TokenValue)> =
            tokens.into_iter().map(|t| (t.kind, t.value)).collect();
        assert_eq!(
            summary,
            vec![
                (TokenKind::Path, TokenValue::text("x")),
                (TokenKind::Eq, TokenValue::text("==")),
                (TokenKind::StringStartSingle, TokenValue::text("\"")),
                (TokenKind::StringContinue, TokenValue::text("hello ")),
                (TokenKind::Path, TokenValue::text("name")),
                (TokenKind::StringEnd, TokenValue::text("\"")),
                (TokenKind::Newline, TokenValue::None),
                (TokenKind::Eof, TokenValue::None),
            ]
        );
    }

    #[test]
    fn test_interpolated_keyword_is_a_path() {
        let tokens = tokenize("'{{ if }}'").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Path);
        assert_eq!(tokens[1].text(), Some("if"));
    }

    #[test]
    fn test_escaped_quote_does_not_end_string() {
        assert_eq!(
            kinds("'it\\'s'"),
            vec![
                TokenKind::StringStartSingle,
                TokenKind::StringContinue,
                TokenKind::StringContinue,
                TokenKind::StringContinue,
                TokenKind::StringEnd,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_triple_quoted_string_spans_lines() {
        let tokens = tokenize("x = '''a\nb''\nc'''\ny = 1\n").unwrap();
        let y = tokens
            .iter()
            .find(|t| t.text() == Some("y"))
            .expect("y not found");
        assert_eq!(y.line, 4);
        assert!(tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StringEnd)
            .all(|t| t.text() == Some("'''")));
    }

    #[test]
    fn test_comments_are_discarded() {
        assert_eq!(
            kinds("x = 1 # note\n"),
            vec![
                TokenKind::Path,
                TokenKind::Eq,
                TokenKind::Digits,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_single_quoted_string() {
        let e = error("x = 'abc\ny = 2\n");
        assert!(matches!(e, LexerError::UnterminatedString(_)));
        let record = e.record();
        assert_eq!(record.message, "EOL while scanning single quoted string");
        assert_eq!(record.text, "x = 'abc");
        assert_eq!(record.lineno, 1);
    }

    #[test]
    fn test_unterminated_triple_quoted_string() {
        let e = error("x = '''abc\ndef");
        assert!(matches!(e, LexerError::UnterminatedString(_)));
        assert_eq!(e.record().message, "EOF while scanning string literal");
        assert_eq!(e.lineno(), 2);
    }

    #[test]
    fn test_newline_inside_interpolation() {
        let e = error("x = '{{ name\n}}'");
        assert!(matches!(e, LexerError::UnrecognizedInput(_)));
        assert_eq!(e.lineno(), 1);
    }

    #[test]
    fn test_unrecognized_character() {
        let e = error("x = 1\ny = ?\n");
        assert!(matches!(e, LexerError::UnrecognizedInput(_)));
        let record = e.record();
        assert_eq!(record.text, "y = ?");
        assert_eq!(record.lineno, 2);
        assert_eq!(record.offset, 5);
    }

    #[test]
    fn test_invalid_regex() {
        let e = error("x = /a(b/");
        assert!(matches!(e, LexerError::InvalidRegex(_)));
    }

    #[test]
    fn test_lookaround_regex_is_rejected() {
        // regexクレートは先読み・後方参照を扱えない
        let e = error("x = /(?=a)b/");
        assert!(matches!(e, LexerError::InvalidRegex(_)));
    }

    #[test]
    fn test_raw_tokens_keep_whitespace() {
        let lexer = Lexer::new("if a\n  b\n");
        let raw: Vec<TokenKind> = lexer.raw_tokens().map(|t| t.unwrap().kind).collect();
        assert_eq!(
            raw,
            vec![
                TokenKind::If,
                TokenKind::Path,
                TokenKind::Newline,
                TokenKind::Ws,
                TokenKind::Path,
                TokenKind::Newline,
            ]
        );
    }
}
