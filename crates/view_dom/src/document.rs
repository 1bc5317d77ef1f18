//! Element arena and the mutations page controllers perform on it.

use std::collections::{BTreeMap, BTreeSet};

use crate::escape::escape_html;
use crate::selector::Selector;

/// Class toggled to hide an element.
pub const HIDDEN_CLASS: &str = "hidden";

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];
const FIELD_TAGS: &[&str] = &["input", "select", "textarea"];

/// Handle to an element stored in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

/// A single element and its form state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    value: String,
    text: String,
    markup: String,
    disabled: bool,
    checked: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl Element {
    /// Create an element with the given tag name
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Shorthand for the `data-*` attribute named `key`
    pub fn data(&self, key: &str) -> Option<&str> {
        self.attr(&format!("data-{}", key))
    }

    /// Form field name (`name` attribute)
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn is_hidden(&self) -> bool {
        self.has_class(HIDDEN_CLASS)
    }

    /// Whether this element is a submittable form field
    pub fn is_field(&self) -> bool {
        FIELD_TAGS.contains(&self.tag.as_str())
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }
}

/// Element tree used to build fragments before they are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    element: Element,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            element: Element::new(tag),
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.element.id = Some(id.into());
        self
    }

    /// Add one or more space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.element.add_class(class);
        }
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.element.set_attr(name, value);
        self
    }

    /// Set a `data-*` attribute
    pub fn data(self, key: &str, value: impl Into<String>) -> Self {
        let name = format!("data-{}", key);
        self.attr(&name, value)
    }

    pub fn name(self, name: impl Into<String>) -> Self {
        self.attr("name", name)
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.element.value = value.into();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.element.text = text.into();
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.element.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.element.disabled = disabled;
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

/// In-memory document: an arena of elements rooted at `<body>`.
///
/// Keys stay valid for the lifetime of the document. Elements removed by
/// [`Document::set_inner_html`] or [`Document::replace_children`] are
/// detached from the tree and no longer match any query.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with a `<body>` root
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("body")],
        }
    }

    pub fn root(&self) -> NodeKey {
        NodeKey(0)
    }

    pub fn get(&self, key: NodeKey) -> &Element {
        &self.nodes[key.0]
    }

    pub fn get_mut(&mut self, key: NodeKey) -> &mut Element {
        &mut self.nodes[key.0]
    }

    /// Attach a fragment as the last child of `parent`, returning its key
    pub fn append(&mut self, parent: NodeKey, node: Node) -> NodeKey {
        let Node {
            mut element,
            children,
        } = node;
        let key = NodeKey(self.nodes.len());
        element.parent = Some(parent);
        element.children.clear();
        self.nodes.push(element);
        self.nodes[parent.0].markup.clear();
        self.nodes[parent.0].children.push(key);

        for child in children {
            self.append(key, child);
        }
        key
    }

    /// Whether `key` is still reachable from the root
    pub fn is_attached(&self, key: NodeKey) -> bool {
        let mut current = key;
        loop {
            if current == self.root() {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn detach_children(&mut self, key: NodeKey) {
        let children = std::mem::take(&mut self.nodes[key.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Replace the children of `key` with new fragments
    pub fn replace_children(
        &mut self,
        key: NodeKey,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Vec<NodeKey> {
        self.detach_children(key);
        self.nodes[key.0].markup.clear();
        nodes
            .into_iter()
            .map(|node| self.append(key, node))
            .collect()
    }

    /// Replace the content of `key` with raw markup
    pub fn set_inner_html(&mut self, key: NodeKey, html: impl Into<String>) {
        self.detach_children(key);
        let element = &mut self.nodes[key.0];
        element.text.clear();
        element.markup = html.into();
    }

    /// Serialised content of `key`
    pub fn inner_html(&self, key: NodeKey) -> String {
        let element = self.get(key);
        if !element.markup.is_empty() {
            return element.markup.clone();
        }
        let mut out = escape_html(&element.text);
        for child in &element.children {
            self.write_outer_html(*child, &mut out);
        }
        out
    }

    /// Serialised element including its own tag
    pub fn outer_html(&self, key: NodeKey) -> String {
        let mut out = String::new();
        self.write_outer_html(key, &mut out);
        out
    }

    fn write_outer_html(&self, key: NodeKey, out: &mut String) {
        let element = self.get(key);
        out.push('<');
        out.push_str(&element.tag);
        if let Some(id) = &element.id {
            out.push_str(&format!(" id=\"{}\"", escape_html(id)));
        }
        if !element.classes.is_empty() {
            let classes: Vec<&str> = element.classes().collect();
            out.push_str(&format!(" class=\"{}\"", escape_html(&classes.join(" "))));
        }
        for (name, value) in &element.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        if element.tag == "input" && !element.value.is_empty() {
            out.push_str(&format!(" value=\"{}\"", escape_html(&element.value)));
        }
        if element.checked {
            out.push_str(" checked");
        }
        if element.disabled {
            out.push_str(" disabled");
        }
        out.push('>');
        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }
        out.push_str(&self.inner_html(key));
        out.push_str(&format!("</{}>", element.tag));
    }

    fn descendants(&self, scope: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.get(scope).children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.get(key).children.iter().rev().copied());
        }
        out
    }

    /// First attached element with the given id
    pub fn get_by_id(&self, id: &str) -> Option<NodeKey> {
        self.descendants(self.root())
            .into_iter()
            .find(|key| self.get(*key).id() == Some(id))
    }

    /// Every attached element matching `selector`, in document order
    pub fn query_all(&self, selector: &Selector) -> Vec<NodeKey> {
        self.query_within(self.root(), selector)
    }

    /// First attached element matching `selector`
    pub fn query(&self, selector: &Selector) -> Option<NodeKey> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `scope` matching `selector`, in document order
    pub fn query_within(&self, scope: NodeKey, selector: &Selector) -> Vec<NodeKey> {
        self.descendants(scope)
            .into_iter()
            .filter(|key| selector.matches(self, *key))
            .collect()
    }

    /// Apply `f` to every element matching `selector`
    pub fn update_all<F>(&mut self, selector: &Selector, mut f: F) -> usize
    where
        F: FnMut(&mut Element),
    {
        let keys = self.query_all(selector);
        for key in &keys {
            f(self.get_mut(*key));
        }
        keys.len()
    }

    pub fn add_class(&mut self, key: NodeKey, class: &str) {
        self.get_mut(key).add_class(class);
    }

    pub fn remove_class(&mut self, key: NodeKey, class: &str) {
        self.get_mut(key).remove_class(class);
    }

    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.get(key).has_class(class)
    }

    pub fn hide(&mut self, key: NodeKey) {
        self.add_class(key, HIDDEN_CLASS);
    }

    pub fn show(&mut self, key: NodeKey) {
        self.remove_class(key, HIDDEN_CLASS);
    }

    pub fn is_hidden(&self, key: NodeKey) -> bool {
        self.get(key).is_hidden()
    }

    pub fn value(&self, key: NodeKey) -> &str {
        self.get(key).value()
    }

    pub fn set_value(&mut self, key: NodeKey, value: impl Into<String>) {
        self.get_mut(key).set_value(value);
    }

    pub fn set_disabled(&mut self, key: NodeKey, disabled: bool) {
        self.get_mut(key).set_disabled(disabled);
    }

    pub fn set_checked(&mut self, key: NodeKey, checked: bool) {
        self.get_mut(key).set_checked(checked);
    }

    /// Name/value pairs a browser would submit for the form at `form`.
    ///
    /// Disabled and unnamed fields are skipped, as are unchecked checkboxes
    /// and radio buttons.
    pub fn form_data(&self, form: NodeKey) -> Vec<(String, String)> {
        self.descendants(form)
            .into_iter()
            .map(|key| self.get(key))
            .filter(|el| el.is_field() && !el.is_disabled())
            .filter(|el| match el.attr("type") {
                Some("checkbox") | Some("radio") => el.is_checked(),
                Some("submit") | Some("button") => false,
                _ => true,
            })
            .filter_map(|el| el.name().map(|name| (name.to_string(), el.value().to_string())))
            .collect()
    }
}
