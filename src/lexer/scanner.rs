//! 字句スキャナ
//!
//! モードスタックを持ち、現在のモードの規則で入力を1トークンずつ切り出す。
//! 空白は行頭でのみトークンとして返し、行の途中の空白は捨てる。
//! `{{`と`}}`はモードを切り替えるだけでトークンを出さない。

use super::literal_parser::{expand_indentation, normalize_number};
use super::modes::{interpolation_lexeme, string_fragment, Fragment, Interpolation, StringKind};
use super::position::SourceMap;
use super::rules::{default_rule, Lexeme, Quote};
use super::token::{Token, TokenKind, TokenValue};
use crate::error::LexerError;
use log::trace;

/// 字句解析モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Default,
    /// `{{ ... }}` の内側
    Variable,
    String(StringKind),
}

/// 1ステップの結果
enum Step {
    Emit(Token),
    Continue,
}

/// モード付きスキャナ
pub struct Scanner<'a> {
    source: &'a SourceMap,
    pos: usize,
    line: usize,
    modes: Vec<Mode>,
    at_line_start: bool,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a SourceMap) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            modes: vec![Mode::Default],
            at_line_start: true,
            failed: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Default)
    }

    fn push_mode(&mut self, mode: Mode) {
        trace!("line {}: enter {:?}", self.line, mode);
        self.modes.push(mode);
    }

    fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            let mode = self.modes.pop();
            trace!("line {}: leave {:?}", self.line, mode);
        }
    }

    fn rest(&self) -> &'a str {
        &self.source.text()[self.pos..]
    }

    fn token(&self, kind: TokenKind, value: TokenValue, start: usize) -> Token {
        Token::new(kind, value, self.line, start)
    }

    /// 消費したテキスト中の改行を数えて行番号を進める
    fn advance(&mut self, len: usize) {
        let consumed = &self.source.text()[self.pos..self.pos + len];
        self.line += consumed.matches('\n').count();
        self.pos += len;
    }

    fn step(&mut self) -> Result<Step, LexerError> {
        match self.mode() {
            Mode::Default => self.scan_default(),
            Mode::Variable => self.scan_variable(),
            Mode::String(kind) => self.scan_string(kind),
        }
    }

    fn scan_default(&mut self) -> Result<Step, LexerError> {
        let input = self.rest();
        let start = self.pos;
        let (remaining, lexeme) = default_rule(input).map_err(|_| self.unrecognized())?;
        let len = input.len() - remaining.len();

        let step = match lexeme {
            Lexeme::Token(kind, value) => Step::Emit(self.token(kind, value, start)),
            Lexeme::Name(name) => {
                let kind = TokenKind::keyword(name).unwrap_or(TokenKind::Path);
                Step::Emit(self.token(kind, TokenValue::text(name), start))
            }
            Lexeme::Number(raw) => {
                let value = normalize_number(raw).map_err(|message| {
                    LexerError::InvalidNumber(self.source.record(message, self.line, start))
                })?;
                Step::Emit(self.token(TokenKind::Digits, value, start))
            }
            Lexeme::Regex {
                pattern,
                insensitive,
            } => {
                regex::RegexBuilder::new(pattern)
                    .case_insensitive(insensitive)
                    .build()
                    .map_err(|e| {
                        LexerError::InvalidRegex(self.source.record(
                            format!("invalid regular expression /{}/: {}", pattern, e),
                            self.line,
                            start,
                        ))
                    })?;
                Step::Emit(self.token(
                    TokenKind::Regex,
                    TokenValue::Regex {
                        pattern: pattern.to_string(),
                        insensitive,
                    },
                    start,
                ))
            }
            Lexeme::Whitespace(raw) => {
                if self.at_line_start {
                    let value = TokenValue::text(expand_indentation(raw));
                    Step::Emit(self.token(TokenKind::Ws, value, start))
                } else {
                    Step::Continue
                }
            }
            Lexeme::Newlines(_) => Step::Emit(self.token(TokenKind::Newline, TokenValue::None, start)),
            // 継続行の行頭空白はインデントではない
            Lexeme::Continuation => {
                self.at_line_start = false;
                Step::Continue
            }
            Lexeme::Skip => Step::Continue,
            Lexeme::StringStart { quote, triple } => {
                let (kind, string) = match (quote, triple) {
                    (Quote::Single, false) => (TokenKind::StringStartSingle, StringKind::SingleApostrophe),
                    (Quote::Double, false) => (TokenKind::StringStartSingle, StringKind::SingleDouble),
                    (Quote::Single, true) => (TokenKind::StringStartTriple, StringKind::TripleApostrophe),
                    (Quote::Double, true) => (TokenKind::StringStartTriple, StringKind::TripleDouble),
                };
                let value = TokenValue::text(&input[..len]);
                self.push_mode(Mode::String(string));
                Step::Emit(self.token(kind, value, start))
            }
        };

        self.advance(len);
        Ok(step)
    }

    fn scan_string(&mut self, kind: StringKind) -> Result<Step, LexerError> {
        let input = self.rest();
        let start = self.pos;

        let Some((fragment, len)) = string_fragment(kind, input) else {
            return Err(if input.starts_with('\n') && !kind.is_triple() {
                LexerError::UnterminatedString(self.source.record(
                    "EOL while scanning single quoted string",
                    self.line,
                    start,
                ))
            } else {
                self.unrecognized()
            });
        };

        let text = TokenValue::text(&input[..len]);
        let step = match fragment {
            Fragment::Text | Fragment::Escape | Fragment::Quote => {
                Step::Emit(self.token(TokenKind::StringContinue, text, start))
            }
            Fragment::Open => {
                self.push_mode(Mode::Variable);
                Step::Continue
            }
            Fragment::End => {
                self.pop_mode();
                Step::Emit(self.token(TokenKind::StringEnd, text, start))
            }
        };

        self.advance(len);
        Ok(step)
    }

    fn scan_variable(&mut self) -> Result<Step, LexerError> {
        let input = self.rest();
        let base = self.pos;

        let (lexeme, start, end) = match interpolation_lexeme(input) {
            Some(Ok(found)) => found,
            Some(Err(offset)) => {
                self.advance(offset);
                return Err(self.unrecognized());
            }
            // 空白だけが残っている
            None => {
                self.advance(input.len());
                return Ok(Step::Continue);
            }
        };

        let step = match lexeme {
            Interpolation::Open => {
                self.push_mode(Mode::Variable);
                Step::Continue
            }
            Interpolation::Close => {
                self.pop_mode();
                Step::Continue
            }
            Interpolation::Name => {
                let text = TokenValue::text(&input[start..end]);
                Step::Emit(self.token(TokenKind::Path, text, base + start))
            }
        };

        self.advance(end);
        Ok(step)
    }

    fn unrecognized(&self) -> LexerError {
        LexerError::UnrecognizedInput(self.source.record("Syntax Error", self.line, self.pos))
    }

    /// 入力の終わりに達したときのエラー。位置は最後の改行を指す
    fn unterminated(&self) -> LexerError {
        let message = match self.mode() {
            Mode::Variable => "EOF while scanning string interpolation",
            _ => "EOF while scanning string literal",
        };
        let position = self.pos.min(self.source.text().len() - 1);
        LexerError::UnterminatedString(self.source.record(
            message,
            self.source.line_of(position),
            position,
        ))
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            if self.pos >= self.source.text().len() {
                if self.modes.len() > 1 {
                    self.failed = true;
                    return Some(Err(self.unterminated()));
                }
                return None;
            }

            match self.step() {
                Ok(Step::Emit(token)) => {
                    self.at_line_start = matches!(token.kind, TokenKind::Newline | TokenKind::Ws);
                    return Some(Ok(token));
                }
                Ok(Step::Continue) => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
