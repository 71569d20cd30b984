//! ソース単位の処理状態
//!
//! 1つのソースファイルに対してテキスト、診断用のファイルDB、
//! 蓄積したエラーをまとめて保持する。

use crate::error::{ErrorCollector, StoryError, StoryResult};
use crate::lexer::{Lexer, SourceMap, Token};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use log::debug;
use std::fs;
use std::path::Path;

/// コンパイル状態を管理する構造体
pub struct CompilationState {
    pub source_file: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl CompilationState {
    /// ファイルから作成
    pub fn new<P: AsRef<Path>>(source_file: P) -> StoryResult<Self> {
        let source_file_str = source_file.as_ref().display().to_string();
        let source = fs::read_to_string(source_file.as_ref())
            .map_err(|e| StoryError::Io(format!("Failed to read source file: {}", e)))?;

        Ok(Self::with_source(source_file_str, source))
    }

    /// 文字列から作成（テスト用）
    pub fn new_from_string(filename: &str, source: String) -> StoryResult<Self> {
        Ok(Self::with_source(filename.to_string(), source))
    }

    fn with_source(source_file: String, source: String) -> Self {
        // エラー位置はレキサーが見るテキスト（末尾改行付き）上のオフセット
        let mut files = SimpleFiles::new();
        let file_id = files.add(
            source_file.clone(),
            SourceMap::new(&source).text().to_string(),
        );

        Self {
            source_file,
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    /// エラーを追加
    pub fn add_error(&mut self, error: StoryError) {
        self.error_collector.add_error(error, self.file_id);
    }

    /// インデント処理済みのトークン列。エラーがあれば記録してNone
    pub fn tokenize(&mut self) -> Option<Vec<Token>> {
        debug!("Starting lexical analysis of {}", self.source_file);
        let lexer = Lexer::new(&self.source);
        let result: Result<Vec<Token>, _> = lexer.tokens().collect();
        self.finish_lexing(result)
    }

    /// インデント処理前の生のトークン列
    pub fn scan(&mut self) -> Option<Vec<Token>> {
        debug!("Scanning {} without indentation processing", self.source_file);
        let lexer = Lexer::new(&self.source);
        let result: Result<Vec<Token>, _> = lexer.raw_tokens().collect();
        self.finish_lexing(result)
    }

    fn finish_lexing<E: Into<StoryError>>(
        &mut self,
        result: Result<Vec<Token>, E>,
    ) -> Option<Vec<Token>> {
        match result {
            Ok(tokens) => {
                debug!("{} tokens", tokens.len());
                Some(tokens)
            }
            Err(e) => {
                self.add_error(e.into());
                None
            }
        }
    }

    /// 診断情報を標準エラーに報告
    pub fn report_diagnostics(&self) -> StoryResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let mut lock = writer.lock();
        self.emit_diagnostics(&mut lock)
    }

    /// 診断情報を色なしの文字列にする
    pub fn render_diagnostics(&self) -> StoryResult<String> {
        let mut buffer = NoColor::new(Vec::new());
        self.emit_diagnostics(&mut buffer)?;
        String::from_utf8(buffer.into_inner())
            .map_err(|e| StoryError::Other(format!("diagnostic output is not UTF-8: {}", e)))
    }

    fn emit_diagnostics(&self, writer: &mut dyn WriteColor) -> StoryResult<()> {
        let config = codespan_reporting::term::Config::default();
        for error in self.error_collector.errors() {
            let diagnostic = error.to_diagnostic();
            codespan_reporting::term::emit(writer, &config, &self.files, &diagnostic)
                .map_err(|e| StoryError::Io(format!("Failed to emit diagnostic: {}", e)))?;
        }
        Ok(())
    }

    /// エラーがあるかチェック
    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    /// エラー数を取得
    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }
}
