/// A node in the configuration tree.
///
/// Leaf values are carried as element text. Multi-valued leaves are repeated
/// sibling elements sharing one tag. XML attributes carry no configuration
/// and are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNode {
    /// Element tag name.
    pub tag: String,
    /// Child elements in document order.
    pub children: Vec<ConfigNode>,
    /// Optional text content.
    pub text: Option<String>,
}

impl ConfigNode {
    /// Create a new node with no children or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Create a leaf node carrying `value` as its text.
    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(value.into());
        node
    }

    /// Append `child` and return `self`, for building trees inline.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Return the first child with the provided tag.
    pub fn get_child(&self, tag: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Return all children with the provided tag.
    pub fn get_children(&self, tag: &str) -> Vec<&ConfigNode> {
        self.children
            .iter()
            .filter(|child| child.tag == tag)
            .collect()
    }

    /// Walk a nested child path and return the node it ends on.
    ///
    /// An empty path resolves to `self`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigNode> {
        let mut current = self;
        for segment in path {
            current = current.get_child(segment)?;
        }
        Some(current)
    }

    /// Walk a nested child path and return terminal node text if found.
    pub fn get_text<'a>(&'a self, path: &[&str]) -> Option<&'a str> {
        self.get_path(path)?.text.as_deref()
    }

    /// Return the text of every node matching the final path segment, in
    /// document order.
    ///
    /// Intermediate segments follow the first matching child. Nodes without
    /// text are skipped.
    pub fn get_texts<'a>(&'a self, path: &[&str]) -> Vec<&'a str> {
        let Some((last, parents)) = path.split_last() else {
            return self.text.as_deref().into_iter().collect();
        };
        let Some(parent) = self.get_path(parents) else {
            return Vec::new();
        };
        parent
            .get_children(last)
            .into_iter()
            .filter_map(|node| node.text.as_deref())
            .collect()
    }
}
