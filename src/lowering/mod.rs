//! 合成ノードの挿入
//!
//! ブロック内の式をその場から取り出し、`__p-<行>`という名前への代入として
//! 使用箇所の直前に挿入する。挿入した代入には元の行から派生した
//! `行.k`の識別子を振るので、ブロック内の定義順が保たれる。

use crate::ast::{Child, Leaf, LineId, NodeKind, Tree};
use crate::lexer::TokenKind;
use indexmap::IndexSet;
use log::debug;

/// 合成した名前の接頭辞
pub const SYNTHETIC_PREFIX: &str = "__p-";

/// 1つのブロックに対する変換状態
pub struct BlockLowering<'a> {
    block: &'a mut Tree,
    original_line: LineId,
    /// 割り当て済みの合成行（既存の合成ノードを含む）
    allocated: IndexSet<LineId>,
}

impl<'a> BlockLowering<'a> {
    pub fn new(block: &'a mut Tree) -> Self {
        let original_line = block.line().cloned().unwrap_or_else(|| LineId::new(0));
        let allocated = existing_synthetic_lines(block);
        if !allocated.is_empty() {
            debug!(
                "block {}: {} synthetic lines already present",
                original_line,
                allocated.len()
            );
        }

        Self {
            block,
            original_line,
            allocated,
        }
    }

    pub fn original_line(&self) -> &LineId {
        &self.original_line
    }

    pub fn is_allocated(&self, line: &LineId) -> bool {
        self.allocated.contains(line)
    }

    /// 新しい合成行を割り当てる
    pub fn allocate_line(&mut self) -> LineId {
        let base = self.original_line.parent_prefix();
        let mut suffix = self.allocated.len() as u32 + 1;
        let mut line = base.child(suffix);
        while self.allocated.contains(&line) {
            suffix += 1;
            line = base.child(suffix);
        }

        debug!("block {}: allocated line {}", self.original_line, line);
        self.allocated.insert(line.clone());
        line
    }

    /// 名前1つだけのパスノードを作る
    ///
    /// 行を省略すると新しく割り当て、名前を省略すると`__p-<行>`になる。
    pub fn path_for(&mut self, name: Option<&str>, line: Option<LineId>) -> Tree {
        let line = line.unwrap_or_else(|| self.allocate_line());
        let name = match name {
            Some(name) => name.to_string(),
            None => synthetic_name(&line),
        };
        Tree::new(
            NodeKind::Path,
            vec![Leaf::new(TokenKind::Path, name, line).into()],
        )
    }

    /// 部分木のすべてのトークンの行を書き換える
    pub fn stamp(node: &mut Tree, line: &LineId) {
        node.for_each_token_mut(&mut |leaf: &mut Leaf| leaf.line = line.clone());
    }

    /// 値の行が既に合成行ならそれを使い、そうでなければ割り当てる
    fn line_for(&mut self, value: &Tree) -> LineId {
        match value.line() {
            Some(line) if self.allocated.contains(line) => line.clone(),
            _ => self.allocate_line(),
        }
    }

    /// `__p-<行> = value` の代入ノードを作る
    pub fn build_assignment(&mut self, mut value: Tree) -> Tree {
        let line = self.line_for(&value);
        Self::stamp(&mut value, &line);

        let path = self.path_for(None, Some(line.clone()));
        let expression = if value.kind == NodeKind::BaseExpression {
            value
        } else {
            Tree::new(NodeKind::BaseExpression, vec![value.into()])
        };
        let fragment = Tree::new(
            NodeKind::AssignmentFragment,
            vec![
                Leaf::new(TokenKind::Eq, "=", line).into(),
                expression.into(),
            ],
        );

        Tree::new(NodeKind::Assignment, vec![path.into(), fragment.into()])
    }

    /// 挿入位置。行が一致する子がなければ最後の子の直前
    pub fn insert_position(&self, anchor: &LineId) -> usize {
        self.block
            .children
            .iter()
            .position(|child| child.line() == Some(anchor))
            .unwrap_or_else(|| self.block.children.len().saturating_sub(1))
    }

    /// 代入を作ってブロックに挿入し、その名前を指すパスを返す
    ///
    /// 返すパスの行は`anchor`（呼び出し元の行）になる。
    pub fn insert(&mut self, value: Tree, anchor: &LineId) -> Tree {
        assert!(
            !self.block.children.is_empty(),
            "cannot insert a synthetic assignment into an empty block"
        );

        let position = self.insert_position(anchor);
        let assignment = self.build_assignment(value);
        let name = assignment
            .path()
            .and_then(Tree::find_first_token)
            .map(|leaf| leaf.value.clone())
            .unwrap_or_default();

        debug!(
            "block {}: inserting {} at position {} (anchor {})",
            self.original_line, name, position, anchor
        );
        self.block.children.insert(position, assignment.into());

        Tree::new(
            NodeKind::Path,
            vec![Leaf::new(TokenKind::Path, name, anchor.clone()).into()],
        )
    }
}

/// `__p-<行>`
pub fn synthetic_name(line: &LineId) -> String {
    format!("{}{}", SYNTHETIC_PREFIX, line)
}

/// 合成名から行を取り出す
pub fn parse_synthetic_name(name: &str) -> Option<LineId> {
    name.strip_prefix(SYNTHETIC_PREFIX)?.parse().ok()
}

/// 直下の子のうち、合成名のパスを持つものの行を集める
fn existing_synthetic_lines(block: &Tree) -> IndexSet<LineId> {
    block
        .children
        .iter()
        .filter_map(Child::as_node)
        .filter_map(Tree::path)
        .filter_map(Tree::find_first_token)
        .filter_map(|leaf| parse_synthetic_name(&leaf.value))
        .collect()
}
