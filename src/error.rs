//! 統一的なエラーハンドリングモジュール
//!
//! 字句解析エラーは位置情報を持つ`ErrorRecord`を1つ抱え、
//! codespan-reportingの`Diagnostic`に変換できる。

use codespan_reporting::diagnostic::{Diagnostic, Label};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// エラー発生位置の生データ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub message: String,
    /// 問題のある行のテキスト（改行は含まない）
    pub text: String,
    /// 行内の列（1始まり）
    pub offset: usize,
    /// 行番号（1始まり）
    pub lineno: usize,
    /// ソース先頭からのバイトオフセット
    pub position: usize,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.lineno, self.offset
        )
    }
}

/// Storyscriptの統一エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoryError {
    /// レキサーエラー
    #[error("lexical error: {0}")]
    Lexer(#[from] LexerError),

    /// ファイルI/Oエラー
    #[error("file error: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

/// レキサーエラーの詳細
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("{0}")]
    UnrecognizedInput(ErrorRecord),

    #[error("{0}")]
    UnterminatedString(ErrorRecord),

    #[error("{0}")]
    Indentation(ErrorRecord),

    #[error("{0}")]
    InvalidNumber(ErrorRecord),

    #[error("{0}")]
    InvalidRegex(ErrorRecord),
}

impl LexerError {
    pub fn record(&self) -> &ErrorRecord {
        match self {
            LexerError::UnrecognizedInput(record)
            | LexerError::UnterminatedString(record)
            | LexerError::Indentation(record)
            | LexerError::InvalidNumber(record)
            | LexerError::InvalidRegex(record) => record,
        }
    }

    pub fn lineno(&self) -> usize {
        self.record().lineno
    }

    fn label_message(&self) -> &'static str {
        match self {
            LexerError::UnrecognizedInput(_) => "unexpected input here",
            LexerError::UnterminatedString(_) => "string is never closed",
            LexerError::Indentation(_) => "indentation does not line up",
            LexerError::InvalidNumber(_) => "malformed number",
            LexerError::InvalidRegex(_) => "regular expression does not compile",
        }
    }
}

/// エラー情報とソースコードの位置情報を含むエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: StoryError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: StoryError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// codespan-reportingのDiagnosticに変換
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        match &self.error {
            StoryError::Lexer(e) => {
                let record = e.record();
                Diagnostic::error()
                    .with_message(record.message.clone())
                    .with_labels(vec![Label::primary(
                        self.file_id,
                        record.position..record.position + 1,
                    )
                    .with_message(e.label_message())])
            }
            StoryError::Io(message) => {
                Diagnostic::error().with_message(format!("file error: {}", message))
            }
            StoryError::Other(message) => Diagnostic::error().with_message(message.clone()),
        }
    }
}

/// 複数のエラーを蓄積するためのコレクター
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: StoryError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }
}

/// Result型のエイリアス
pub type StoryResult<T> = Result<T, StoryError>;

impl From<std::io::Error> for StoryError {
    fn from(e: std::io::Error) -> Self {
        StoryError::Io(e.to_string())
    }
}
