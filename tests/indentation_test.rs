//! インデント処理テスト
//!
//! 行頭の空白からINDENT/DEDENTが正しく合成されること、空行が
//! 無視されること、インデントエラーが報告されることを確認する。

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use storyscript::error::LexerError;
    use storyscript::lexer::{tokenize, Lexer, TokenKind};
    use storyscript::lexer::TokenKind::{
        Dedent, Digits, Elif, Else, Eof, Eq, If, Indent, Newline, Path,
    };

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn count(kinds: &[TokenKind], kind: TokenKind) -> usize {
        kinds.iter().filter(|&&k| k == kind).count()
    }

    #[test]
    fn test_tab_indented_block() {
        assert_eq!(
            kinds("if a\n\tx=0\n\ty=0\nz=0\n"),
            vec![
                If, Path, Newline, Indent, Path, Eq, Digits, Newline, Path, Eq, Digits, Newline,
                Dedent, Path, Eq, Digits, Newline, Eof,
            ]
        );
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            kinds("if a\n  if b\n    c\n  d\ne\n"),
            vec![
                If, Path, Newline, Indent, If, Path, Newline, Indent, Path, Newline, Dedent,
                Path, Newline, Dedent, Path, Newline, Eof,
            ]
        );
    }

    #[test]
    fn test_else_block() {
        assert_eq!(
            kinds("if a\n  b\nelse\n  c\n"),
            vec![
                If, Path, Newline, Indent, Path, Newline, Dedent, Else, Newline, Indent, Path,
                Newline, Dedent, Eof,
            ]
        );
    }

    #[test]
    fn test_tab_and_spaces_are_the_same_depth() {
        assert_eq!(
            kinds("if a\n\tb\n  c\n"),
            vec![If, Path, Newline, Indent, Path, Newline, Path, Newline, Dedent, Eof]
        );
    }

    #[test]
    fn test_indent_and_dedent_balance() {
        let sources = [
            "if a\n  b\n",
            "if a\n  if b\n    if c\n      d\n",
            "x\n  y\n    z\n  w\nv\n",
            "if a\n  b\nelse if c\n  d\nelse\n  e\n",
        ];
        for source in sources {
            let kinds = kinds(source);
            assert_eq!(
                count(&kinds, Indent),
                count(&kinds, Dedent),
                "source: {:?}",
                source
            );
            assert_eq!(kinds.last(), Some(&Eof));
        }
    }

    #[test]
    fn test_open_blocks_close_on_last_line() {
        let tokens = tokenize("if a\n  b").unwrap();
        let tail: Vec<(TokenKind, usize)> = tokens
            .iter()
            .rev()
            .take(2)
            .map(|t| (t.kind, t.line))
            .collect();
        assert_eq!(tail, vec![(Eof, 2), (Dedent, 2)]);
    }

    #[test]
    fn test_blank_lines_do_not_produce_newlines() {
        let expected = vec![Path, Eq, Digits, Newline, Path, Eq, Digits, Newline, Eof];
        assert_eq!(kinds("x = 1\n\n\ny = 2\n"), expected);
        assert_eq!(kinds("x = 1\n   \ny = 2\n"), expected);
        assert_eq!(kinds("\n\nx = 1\ny = 2\n"), expected);
    }

    #[test]
    fn test_blank_line_inside_block() {
        assert_eq!(
            kinds("if a\n  b\n\n  c\n"),
            vec![If, Path, Newline, Indent, Path, Newline, Path, Newline, Dedent, Eof]
        );
    }

    #[test]
    fn test_continuation_does_not_indent() {
        assert_eq!(kinds("x = \\\n  1\n"), vec![Path, Eq, Digits, Newline, Eof]);
    }

    #[test]
    fn test_continuation_after_leading_whitespace() {
        let tokens = tokenize("x\n  \\\n  y\n").unwrap();
        let summary: Vec<(TokenKind, usize)> = tokens.iter().map(|t| (t.kind, t.line)).collect();
        assert_eq!(
            summary,
            vec![
                (Path, 1),
                (Newline, 1),
                (Indent, 3),
                (Path, 3),
                (Newline, 3),
                (Dedent, 3),
                (Eof, 3),
            ]
        );
    }

    #[test]
    fn test_elif_does_not_require_indent() {
        assert_eq!(
            kinds("elif a\nb\n"),
            vec![Elif, Path, Newline, Path, Newline, Eof]
        );
    }

    #[test]
    fn test_expected_indented_block() {
        let e = tokenize("if a\nb\n").unwrap_err();
        assert!(matches!(e, LexerError::Indentation(_)));
        assert_eq!(e.record().message, "Indentation Error: expected an indented block");
        assert_eq!(e.record().text, "b");
        assert_eq!(e.lineno(), 2);
    }

    #[test]
    fn test_unindent_mismatch() {
        let e = tokenize("x\n    y\n  z\n").unwrap_err();
        assert!(matches!(e, LexerError::Indentation(_)));
        assert_eq!(
            e.record().message,
            "Indentation Error: unindent does not match any outer indentation level"
        );
        assert_eq!(e.lineno(), 3);
    }

    #[test]
    fn test_stream_stops_at_first_error() {
        let results: Vec<_> = Lexer::new("if a\nb\nc\n").tokens().collect();
        assert!(results.last().unwrap().is_err());
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .all(|t| t.kind != Eof));
    }
}
