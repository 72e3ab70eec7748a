use crate::arena::Entry;

/// A struct representing an internal node of an avl tree.
///
/// `left` and `right` are the owning links of the tree. `parent` is only a navigational back
/// link and is rewritten whenever the node is relinked.
#[derive(Clone)]
pub struct Node<T> {
    pub value: T,
    pub height: i32,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
    pub parent: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Node {
            value,
            height: 0,
            left: None,
            right: None,
            parent: None,
        }
    }
}
