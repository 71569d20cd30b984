//! 行位置の管理
//!
//! 入力全体の行頭オフセット表を一度だけ作り、エラーレコードの
//! 行テキストと列を引く。

use crate::error::ErrorRecord;

/// 改行で終わることが保証されたソースと行頭オフセット表
#[derive(Debug, Clone)]
pub struct SourceMap {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// 末尾に改行がなければ補う
    pub fn new(source: &str) -> Self {
        let mut text = source.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|&(_, ch)| ch == '\n')
                .map(|(index, _)| index + 1),
        );

        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn line_index(&self, lineno: usize) -> usize {
        lineno.saturating_sub(1).min(self.line_starts.len() - 1)
    }

    /// 指定行の先頭バイトオフセット（範囲外は末尾行に丸める）
    pub fn line_start(&self, lineno: usize) -> usize {
        self.line_starts[self.line_index(lineno)]
    }

    /// 指定行のテキスト（改行を含まない）
    pub fn line_text(&self, lineno: usize) -> &str {
        let index = self.line_index(lineno);
        let start = self.line_starts[index];
        let end = match self.line_starts.get(index + 1) {
            Some(&next) => next - 1,
            None => self.text.len(),
        };
        self.text[start..end].trim_end_matches('\r')
    }

    /// バイトオフセットを含む行の番号
    pub fn line_of(&self, position: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= position).max(1)
    }

    /// エラーレコードを作成
    pub fn record(&self, message: impl Into<String>, lineno: usize, position: usize) -> ErrorRecord {
        let start = self.line_start(lineno);
        ErrorRecord {
            message: message.into(),
            text: self.line_text(lineno).to_string(),
            offset: position.saturating_sub(start) + 1,
            lineno,
            position,
        }
    }
}
