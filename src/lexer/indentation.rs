//! インデント処理
//!
//! スキャナのトークン列に3段のイテレータアダプタをかける。
//!
//! 1. `Annotate`: 行頭フラグと「インデント必須」フラグを付ける
//! 2. `Synthesize`: 行頭の空白幅からINDENT/DEDENTを合成し、空行の改行を捨てる
//! 3. `Finish`: 末尾にEOFを1つ付ける
//!
//! どの段もエラーを受け取ったらそれを返して停止する。

use super::position::SourceMap;
use super::token::{Token, TokenKind};
use crate::error::LexerError;
use log::debug;
use std::cmp::Ordering;
use std::collections::VecDeque;

type Item = Result<Token, LexerError>;

/// 行頭フラグとインデント必須フラグを付ける
pub struct Annotate<I> {
    inner: I,
    at_line_start: bool,
    must_indent_next_line: bool,
    next_real_token_must_indent: bool,
}

impl<I> Annotate<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            at_line_start: true,
            must_indent_next_line: false,
            next_real_token_must_indent: false,
        }
    }
}

impl<I: Iterator<Item = Item>> Iterator for Annotate<I> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        let mut token = match self.inner.next()? {
            Ok(token) => token,
            Err(e) => return Some(Err(e)),
        };

        token.at_line_start = self.at_line_start;
        token.must_indent = false;

        match token.kind {
            TokenKind::Newline => {
                self.at_line_start = true;
                if self.must_indent_next_line {
                    self.must_indent_next_line = false;
                    self.next_real_token_must_indent = true;
                }
            }
            TokenKind::Ws => {
                debug_assert!(token.at_line_start, "whitespace token in the middle of a line");
                self.at_line_start = true;
            }
            kind => {
                if kind.opens_block() {
                    self.must_indent_next_line = true;
                }
                if self.next_real_token_must_indent {
                    token.must_indent = true;
                    self.next_real_token_must_indent = false;
                }
                self.at_line_start = false;
            }
        }

        Some(Ok(token))
    }
}

/// INDENT/DEDENTを合成する
pub struct Synthesize<'a, I> {
    inner: I,
    source: &'a SourceMap,
    levels: Vec<usize>,
    depth: usize,
    prev_was_ws: bool,
    pending: VecDeque<Token>,
    last_line: Option<usize>,
    done: bool,
}

impl<'a, I> Synthesize<'a, I> {
    pub fn new(inner: I, source: &'a SourceMap) -> Self {
        Self {
            inner,
            source,
            levels: vec![0],
            depth: 0,
            prev_was_ws: false,
            pending: VecDeque::new(),
            last_line: None,
            done: false,
        }
    }

    fn top(&self) -> usize {
        self.levels.last().copied().unwrap_or(0)
    }

    fn indentation_error(&self, message: &str, token: &Token) -> LexerError {
        let position = token
            .position
            .unwrap_or_else(|| self.source.line_start(token.line));
        LexerError::Indentation(self.source.record(
            format!("Indentation Error: {}", message),
            token.line,
            position,
        ))
    }

    fn indent(&mut self, line: usize) {
        debug!("line {}: indent to {}", line, self.depth);
        self.levels.push(self.depth);
        self.pending.push_back(Token::synthetic(TokenKind::Indent, line));
    }

    /// 1トークンを処理し、出力を`pending`に積む
    fn process(&mut self, token: Token) -> Result<(), LexerError> {
        match token.kind {
            TokenKind::Ws => {
                debug_assert_eq!(self.depth, 0);
                self.depth = token.text().map_or(0, str::len);
                self.prev_was_ws = true;
                return Ok(());
            }
            TokenKind::Newline => {
                self.depth = 0;
                // 空行
                if !(self.prev_was_ws || token.at_line_start) {
                    self.pending.push_back(token);
                }
                return Ok(());
            }
            _ => {}
        }

        self.prev_was_ws = false;

        if token.must_indent {
            if self.depth <= self.top() {
                return Err(self.indentation_error("expected an indented block", &token));
            }
            self.indent(token.line);
        } else if token.at_line_start {
            match self.depth.cmp(&self.top()) {
                Ordering::Equal => {}
                Ordering::Greater => self.indent(token.line),
                Ordering::Less => {
                    let Some(index) = self.levels.iter().position(|&level| level == self.depth)
                    else {
                        return Err(self.indentation_error(
                            "unindent does not match any outer indentation level",
                            &token,
                        ));
                    };
                    debug!("line {}: dedent to {}", token.line, self.depth);
                    for _ in index + 1..self.levels.len() {
                        self.pending
                            .push_back(Token::synthetic(TokenKind::Dedent, token.line));
                    }
                    self.levels.truncate(index + 1);
                }
            }
        }

        self.pending.push_back(token);
        Ok(())
    }

    /// 入力の終わりで開いているレベルをすべて閉じる
    fn close_levels(&mut self) {
        if self.levels.len() > 1 {
            let line = self.last_line.unwrap_or(1);
            for _ in 1..self.levels.len() {
                self.pending
                    .push_back(Token::synthetic(TokenKind::Dedent, line));
            }
            self.levels.truncate(1);
        }
    }
}

impl<'a, I: Iterator<Item = Item>> Iterator for Synthesize<'a, I> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }

            match self.inner.next() {
                None => {
                    self.done = true;
                    self.close_levels();
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(token)) => {
                    self.last_line = Some(token.line);
                    if let Err(e) = self.process(token) {
                        self.done = true;
                        self.pending.clear();
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

/// 末尾にEOFを付ける
pub struct Finish<I> {
    inner: I,
    last_line: Option<usize>,
    finished: bool,
}

impl<I> Finish<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            last_line: None,
            finished: false,
        }
    }
}

impl<I: Iterator<Item = Item>> Iterator for Finish<I> {
    type Item = Item;

    fn next(&mut self) -> Option<Item> {
        if self.finished {
            return None;
        }

        match self.inner.next() {
            Some(Ok(token)) => {
                self.last_line = Some(token.line);
                Some(Ok(token))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                Some(Ok(Token::synthetic(
                    TokenKind::Eof,
                    self.last_line.unwrap_or(1),
                )))
            }
        }
    }
}
