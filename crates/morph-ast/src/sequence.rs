//! Depth-first traversal of an expression and everything nested in it.

use crate::expr::Expression;

/// Pre-order iterator over an expression tree, starting with the root.
///
/// Block bodies are entered only when `inspect_blocks` is set; the block
/// expression itself is always yielded.
pub struct ExpressionSequence<'a> {
    stack: Vec<&'a Expression>,
    inspect_blocks: bool,
}

impl<'a> ExpressionSequence<'a> {
    pub fn new(root: &'a Expression, inspect_blocks: bool) -> Self {
        Self {
            stack: vec![root],
            inspect_blocks,
        }
    }
}

impl<'a> Iterator for ExpressionSequence<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<Self::Item> {
        let exp = self.stack.pop()?;
        // reversed so the leftmost child is visited first
        self.stack
            .extend(exp.sub_expressions(self.inspect_blocks).into_iter().rev());
        Some(exp)
    }
}
