//! Composite view over backlog items and their activities.

/// A node in the backlog item / activity tree.
///
/// Leaves report their own completion; containers aggregate their children
/// for display, while their own `is_done` follows their lifecycle state.
pub trait WorkItem {
    /// Returns whether this node counts as complete.
    fn is_done(&self) -> bool;

    /// Returns the one-line label shown when rendering.
    fn label(&self) -> String;

    /// Returns the child nodes, in order.
    fn children(&self) -> Vec<&dyn WorkItem> {
        Vec::new()
    }

    /// Renders this node and its descendants as an indented outline.
    fn render(&self, depth: usize) -> String {
        let marker = if self.is_done() { "x" } else { " " };
        let mut out = format!("{}- [{marker}] {}\n", "  ".repeat(depth), self.label());
        for child in self.children() {
            out.push_str(&child.render(depth + 1));
        }
        out
    }
}
