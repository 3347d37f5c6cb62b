use crate::tree::Node;

/// Depth-first iterator over nodes, driven by an explicit stack.
///
/// Nodes come out in stack-pop order: the last child pushed is visited first.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(stack: Vec<&'a Node>) -> Self {
        Self { stack }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter());
        }
        Some(node)
    }
}
