use trellis_introspect::FieldName;

/// A parsed field selection: which parts of a base structure a client
/// wants.
///
/// The tree mirrors the shape of the base structure's selected branches.
/// An empty node is the wildcard - "this entire subtree" - so the empty
/// spec selects the whole base structure.
///
/// A selection is only a request: names that do not exist in the base are
/// tolerated and reported as warnings when the selection is applied, not
/// here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSpec {
    root: SelectionNode,
}

/// One node of a [`SelectionSpec`]: an ordered set of selected sub-fields,
/// plus any `[name=value]` option annotations from the request text.
///
/// Options are carried for the processing layer above (filter plugins);
/// the mapping engine itself ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionNode {
    fields: Vec<(FieldName, SelectionNode)>,
    options: Vec<(String, String)>,
}

impl SelectionSpec {
    /// The wildcard spec: select the entire base structure.
    pub fn wildcard() -> Self {
        Self::default()
    }

    /// A spec from an explicit selection tree.
    pub fn from_root(root: SelectionNode) -> Self {
        Self { root }
    }

    /// A spec selecting the given dotted field paths, e.g.
    /// `["value", "alarm.severity"]`.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut root = SelectionNode::new();
        for path in paths {
            let segments: Vec<FieldName> = path.split('.').map(FieldName::from).collect();
            root.add_path(&segments, SelectionNode::new());
        }
        Self { root }
    }

    /// The root selection node.
    pub fn root(&self) -> &SelectionNode {
        &self.root
    }

    /// `true` iff this spec selects the entire base structure.
    pub fn is_wildcard(&self) -> bool {
        self.root.is_wildcard()
    }
}

impl SelectionNode {
    /// An empty node: selects the entire subtree it is applied to.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff this node selects its entire subtree.
    pub fn is_wildcard(&self) -> bool {
        self.fields.is_empty()
    }

    /// The selected sub-fields, in selection order.
    pub fn fields(&self) -> &[(FieldName, SelectionNode)] {
        &self.fields
    }

    /// The option annotations attached to this node.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// The sub-selection for `name`, if selected here.
    pub fn field(&self, name: &str) -> Option<&SelectionNode> {
        self.fields
            .iter()
            .find(|(n, _)| n.as_ref() == name)
            .map(|(_, node)| node)
    }

    /// Attach an option annotation to this node.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.push((name.into(), value.into()));
    }

    /// Select `name` with the sub-selection `node`, merging into an
    /// existing selection of the same name: `a` followed by `a.b` selects
    /// `a{b}`.
    pub fn add_field(&mut self, name: impl Into<FieldName>, node: SelectionNode) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.merge(node),
            None => self.fields.push((name, node)),
        }
    }

    /// Select the dotted path `path`, with `node` as the sub-selection of
    /// its final segment.
    pub fn add_path(&mut self, path: &[FieldName], node: SelectionNode) {
        match path {
            [] => self.merge(node),
            [last] => self.add_field(last.clone(), node),
            [first, rest @ ..] => {
                if self.field(first).is_none() {
                    self.fields.push((first.clone(), SelectionNode::new()));
                }
                if let Some((_, child)) = self.fields.iter_mut().find(|(n, _)| n == first) {
                    child.add_path(rest, node);
                }
            }
        }
    }

    fn merge(&mut self, other: SelectionNode) {
        for (name, node) in other.fields {
            self.add_field(name, node);
        }
        self.options.extend(other.options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard() {
        assert!(SelectionSpec::wildcard().is_wildcard());
        assert!(SelectionNode::new().is_wildcard());
    }

    #[test]
    fn paths_build_nested_nodes() {
        let spec = SelectionSpec::from_paths(["value", "alarm.severity", "alarm.status"]);
        let root = spec.root();
        assert!(!root.is_wildcard());
        assert!(root.field("value").unwrap().is_wildcard());

        let alarm = root.field("alarm").unwrap();
        assert_eq!(alarm.fields().len(), 2);
        assert!(alarm.field("severity").is_some());
        assert!(alarm.field("status").is_some());
        assert!(alarm.field("message").is_none());
    }

    #[test]
    fn merge_widens_existing_selection() {
        // "a" then "a.b": the earlier bare selection gains a named child
        let spec = SelectionSpec::from_paths(["a", "a.b"]);
        let a = spec.root().field("a").unwrap();
        assert!(!a.is_wildcard());
        assert!(a.field("b").is_some());
    }
}
