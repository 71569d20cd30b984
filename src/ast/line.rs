//! 行識別子
//!
//! 元のソース行は`"12"`、変換で挿入した行は`"12.1"`のように
//! ドット区切りの番号を持つ。比較は各要素の数値で行う。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid line identifier '{0}'")]
pub struct LineIdError(pub String);

/// ドット区切りの行識別子
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LineId(Vec<u32>);

impl LineId {
    /// ソース上の行
    pub fn new(line: u32) -> Self {
        Self(vec![line])
    }

    /// 挿入された行か（要素が2つ以上）
    pub fn is_synthetic(&self) -> bool {
        self.0.len() > 1
    }

    /// 最後の要素を除いた識別子（要素が1つならそのまま）
    pub fn parent_prefix(&self) -> LineId {
        match self.0.split_last() {
            Some((_, prefix)) if !prefix.is_empty() => LineId(prefix.to_vec()),
            _ => self.clone(),
        }
    }

    /// `.k`を付けた子の識別子
    pub fn child(&self, k: u32) -> LineId {
        let mut components = self.0.clone();
        components.push(k);
        LineId(components)
    }
}

impl From<usize> for LineId {
    fn from(line: usize) -> Self {
        LineId::new(line as u32)
    }
}

impl FromStr for LineId {
    type Err = LineIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let components = s
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| LineIdError(s.to_string()))?;
        Ok(LineId(components))
    }
}

impl TryFrom<String> for LineId {
    type Error = LineIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LineId> for String {
    fn from(line: LineId) -> Self {
        line.to_string()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for component in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        Ok(())
    }
}
