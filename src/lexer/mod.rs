//! Storyscriptの字句解析モジュール
//!
//! ソースをモード付きスキャナで切り出し、インデント処理の3段を通して
//! INDENT/DEDENT/EOFを含むトークン列にする。列は遅延評価で、
//! `Lexer::tokens`を呼ぶたびに先頭からやり直せる。

pub mod indentation;
pub mod literal_parser;
pub mod modes;
pub mod position;
pub mod rules;
pub mod scanner;
pub mod token;

pub use indentation::{Annotate, Finish, Synthesize};
pub use position::SourceMap;
pub use scanner::{Mode, Scanner};
pub use token::{Token, TokenKind, TokenValue};

use crate::error::LexerError;

/// パーサーに渡すトークン列
pub type TokenStream<'a> = Finish<Synthesize<'a, Annotate<Scanner<'a>>>>;

/// Storyscriptのレキサー
#[derive(Debug, Clone)]
pub struct Lexer {
    source: SourceMap,
}

impl Lexer {
    /// 新しいレキサーを作成（末尾に改行がなければ補う）
    pub fn new(source: &str) -> Self {
        Self {
            source: SourceMap::new(source),
        }
    }

    /// インデント処理前の生のトークン列
    pub fn raw_tokens(&self) -> Scanner<'_> {
        Scanner::new(&self.source)
    }

    /// 先頭から新しいトークン列を作る
    pub fn tokens(&self) -> TokenStream<'_> {
        Finish::new(Synthesize::new(
            Annotate::new(self.raw_tokens()),
            &self.source,
        ))
    }
}

/// ソースコードをトークン化
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
    Lexer::new(source).tokens().collect()
}
