//! トークン定義

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storyscriptのトークン種別
///
/// `Indent`・`Dedent`・`Eof`はソース上のテキストを持たない。
/// `Ws`はインデント処理で消費され、パーサーには届かない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // 名前とリテラル
    Path,
    Kwarg,
    Digits,
    Boolean,
    Regex,

    // 文字列
    StringStartSingle,
    StringStartTriple,
    StringContinue,
    StringEnd,

    // 演算子
    Operator,
    Eq,
    Ne,
    Gt,
    Lt,
    Isnt,
    LParen,
    RParen,
    Comma,

    // 複数語・専用規則のキーワード
    NumberOf,
    SortBy,
    AscDesc,
    Schedule,
    Ni,
    From,
    If,
    ElseIf,
    Set,

    // ソート系
    Largest,
    Newest,
    Top,
    First,
    Highest,
    Most,
    Lowest,
    Last,
    Bottom,
    Smallest,
    Oldest,
    Least,

    // 集計系
    Length,
    Average,
    Avg,
    Max,
    Sum,
    Min,

    // 補助語
    With,
    When,
    Has,
    Of,
    To,
    As,
    Where,
    Random,
    Unique,

    // 式
    And,
    Is,
    Like,
    Or,
    Contains,

    // 制御
    Else,
    Elif,
    After,
    Try,
    Catch,
    Into,
    While,
    Unset,
    Push,

    // レイアウト
    Ws,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl TokenKind {
    /// キーワード表を引く（大文字小文字は区別しない）
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "largest" => TokenKind::Largest,
            "newest" => TokenKind::Newest,
            "top" => TokenKind::Top,
            "first" => TokenKind::First,
            "highest" => TokenKind::Highest,
            "most" => TokenKind::Most,
            "lowest" => TokenKind::Lowest,
            "last" => TokenKind::Last,
            "bottom" => TokenKind::Bottom,
            "smallest" => TokenKind::Smallest,
            "oldest" => TokenKind::Oldest,
            "least" => TokenKind::Least,
            "length" => TokenKind::Length,
            "average" => TokenKind::Average,
            "avg" => TokenKind::Avg,
            "max" => TokenKind::Max,
            "sum" => TokenKind::Sum,
            "min" => TokenKind::Min,
            "with" => TokenKind::With,
            "when" => TokenKind::When,
            "has" => TokenKind::Has,
            "of" => TokenKind::Of,
            "to" => TokenKind::To,
            "as" => TokenKind::As,
            "where" => TokenKind::Where,
            "random" => TokenKind::Random,
            "unique" => TokenKind::Unique,
            "and" => TokenKind::And,
            "is" => TokenKind::Is,
            "like" => TokenKind::Like,
            "or" => TokenKind::Or,
            "contains" => TokenKind::Contains,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "after" => TokenKind::After,
            "try" => TokenKind::Try,
            "catch" => TokenKind::Catch,
            "into" => TokenKind::Into,
            "while" => TokenKind::While,
            "from" => TokenKind::From,
            "elif" => TokenKind::Elif,
            "set" => TokenKind::Set,
            "unset" => TokenKind::Unset,
            "push" => TokenKind::Push,
            _ => return None,
        };
        Some(kind)
    }

    /// 次の論理行のインデントを要求するトークンか
    pub fn opens_block(self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::ElseIf | TokenKind::Else
        )
    }

    /// ダンプ出力用の名前
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Path => "PATH",
            TokenKind::Kwarg => "KWARG",
            TokenKind::Digits => "DIGITS",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Regex => "REGEX",
            TokenKind::StringStartSingle => "STRING_START_SINGLE",
            TokenKind::StringStartTriple => "STRING_START_TRIPLE",
            TokenKind::StringContinue => "STRING_CONTINUE",
            TokenKind::StringEnd => "STRING_END",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::Gt => "GT",
            TokenKind::Lt => "LT",
            TokenKind::Isnt => "ISNT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::NumberOf => "NUMBEROF",
            TokenKind::SortBy => "SORTBY",
            TokenKind::AscDesc => "ASCDESC",
            TokenKind::Schedule => "SCHEDULE",
            TokenKind::Ni => "NI",
            TokenKind::From => "FROM",
            TokenKind::If => "IF",
            TokenKind::ElseIf => "ELSEIF",
            TokenKind::Set => "SET",
            TokenKind::Largest => "LARGEST",
            TokenKind::Newest => "NEWEST",
            TokenKind::Top => "TOP",
            TokenKind::First => "FIRST",
            TokenKind::Highest => "HIGHEST",
            TokenKind::Most => "MOST",
            TokenKind::Lowest => "LOWEST",
            TokenKind::Last => "LAST",
            TokenKind::Bottom => "BOTTOM",
            TokenKind::Smallest => "SMALLEST",
            TokenKind::Oldest => "OLDEST",
            TokenKind::Least => "LEAST",
            TokenKind::Length => "LENGTH",
            TokenKind::Average => "AVERAGE",
            TokenKind::Avg => "AVG",
            TokenKind::Max => "MAX",
            TokenKind::Sum => "SUM",
            TokenKind::Min => "MIN",
            TokenKind::With => "WITH",
            TokenKind::When => "WHEN",
            TokenKind::Has => "HAS",
            TokenKind::Of => "OF",
            TokenKind::To => "TO",
            TokenKind::As => "AS",
            TokenKind::Where => "WHERE",
            TokenKind::Random => "RANDOM",
            TokenKind::Unique => "UNIQUE",
            TokenKind::And => "AND",
            TokenKind::Is => "IS",
            TokenKind::Like => "LIKE",
            TokenKind::Or => "OR",
            TokenKind::Contains => "CONTAINS",
            TokenKind::Else => "ELSE",
            TokenKind::Elif => "ELIF",
            TokenKind::After => "AFTER",
            TokenKind::Try => "TRY",
            TokenKind::Catch => "CATCH",
            TokenKind::Into => "INTO",
            TokenKind::While => "WHILE",
            TokenKind::Unset => "UNSET",
            TokenKind::Push => "PUSH",
            TokenKind::Ws => "WS",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// トークンの値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    /// 合成トークンと改行は値を持たない
    None,
    Text(String),
    Boolean(bool),
    /// パーセントリテラル（100で割った値）
    Fraction(f64),
    Regex { pattern: String, insensitive: bool },
}

impl TokenValue {
    pub fn text(value: impl Into<String>) -> Self {
        TokenValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::None => Ok(()),
            TokenValue::Text(text) => write!(f, "{:?}", text),
            TokenValue::Boolean(value) => write!(f, "{}", value),
            TokenValue::Fraction(value) => write!(f, "{}", value),
            TokenValue::Regex {
                pattern,
                insensitive,
            } => {
                write!(f, "/{}/", pattern)?;
                if *insensitive {
                    f.write_str("i")?;
                }
                Ok(())
            }
        }
    }
}

/// 位置情報とレイアウト注釈付きのトークン
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    /// 行番号（1始まり）
    pub line: usize,
    /// ソース中のバイトオフセット。合成トークンは`None`
    pub position: Option<usize>,
    pub at_line_start: bool,
    pub must_indent: bool,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, line: usize, position: usize) -> Self {
        Self {
            kind,
            value,
            line,
            position: Some(position),
            at_line_start: false,
            must_indent: false,
        }
    }

    /// 合成トークンを作成
    pub fn synthetic(kind: TokenKind, line: usize) -> Self {
        Self {
            kind,
            value: TokenValue::None,
            line,
            position: None,
            at_line_start: false,
            must_indent: false,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.value.as_text()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TokenValue::None => write!(f, "{}@{}", self.kind, self.line),
            _ => write!(f, "{}({})@{}", self.kind, self.value, self.line),
        }
    }
}
