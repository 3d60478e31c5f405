use super::node::{Attribute, ElementData, Node, NodeId, NodeKind, NodeType, TextData};
use super::serialize;
use super::style::Style;
use super::DomError;
use crate::parser::HtmlParser;
use once_cell::unsync::OnceCell;
use url::Url;

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
pub(crate) struct Checkpoint {
    nodes: usize,
    errors: usize,
    title: Option<String>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    document_element: Option<NodeId>,
}

/// An HTML document backed by a node arena.
///
/// Cloning a document copies the whole arena; ids taken from the original
/// address the same nodes in the clone.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    document_uri: Option<String>,
    base_uri: OnceCell<Option<String>>,
    title: Option<String>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    document_element: Option<NodeId>,
    errors: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            document_uri: None,
            base_uri: OnceCell::new(),
            title: None,
            head: None,
            body: None,
            document_element: None,
            errors: Vec::new(),
        }
    }

    /// Parse `html` with the bundled permissive parser.
    pub fn parse(html: &str) -> Self {
        HtmlParser::new(html).parse()
    }

    /// Parse `html`, recording `url` as the document URI used for base URI
    /// resolution.
    pub fn parse_with_url(html: &str, url: &str) -> Self {
        HtmlParser::new(html).with_url(url).parse()
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    // ---- document level ----

    /// The document node.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The root `<html>` element, or the first element child of the
    /// document when no `<html>` was seen.
    pub fn document_element(&self) -> Option<NodeId> {
        self.document_element
            .filter(|&id| self.is_attached(id))
            .or_else(|| self.first_element_child(ROOT))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
            .filter(|&id| self.is_attached(id))
            .or_else(|| self.find_top_level("head"))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
            .filter(|&id| self.is_attached(id))
            .or_else(|| self.find_top_level("body"))
    }

    fn find_top_level(&self, local_name: &str) -> Option<NodeId> {
        let root_element = self.document_element()?;
        if self.local_name(root_element) == local_name {
            return Some(root_element);
        }
        self.element_children(root_element)
            .iter()
            .copied()
            .find(|&child| self.local_name(child) == local_name)
    }

    pub(crate) fn set_body(&mut self, body: NodeId) {
        self.body = Some(body);
    }

    /// Trimmed text of the first `<title>` seen by the parser.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Cache `id` as the document's title, head, body or root element if it
    /// is the first of its kind.
    pub(crate) fn record_landmark(&mut self, id: NodeId) {
        let local_name = self.local_name(id).to_string();
        match local_name.as_str() {
            "title" if self.title.is_none() => {
                self.title = Some(self.text_content(id).trim().to_string());
            }
            "head" if self.head.is_none() => self.head = Some(id),
            "body" if self.body.is_none() => self.body = Some(id),
            "html" if self.document_element.is_none() => self.document_element = Some(id),
            _ => {}
        }
    }

    /// The `<html>` element recorded by the parser, if any.
    pub(crate) fn parsed_root_element(&self) -> Option<NodeId> {
        self.document_element
    }

    pub fn document_uri(&self) -> Option<&str> {
        self.document_uri.as_deref()
    }

    pub(crate) fn set_document_uri(&mut self, uri: &str) {
        self.document_uri = Some(uri.to_string());
        self.base_uri = OnceCell::new();
    }

    /// The URI relative links resolve against: the first `<base href>`
    /// resolved against the document URI, or the document URI itself.
    ///
    /// Computed once and cached.
    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri
            .get_or_init(|| self.resolve_base_uri())
            .as_deref()
    }

    fn resolve_base_uri(&self) -> Option<String> {
        let href = self
            .get_elements_by_tag_name(ROOT, "base")
            .into_iter()
            .find_map(|base| self.get_attribute(base, "href"))
            .map(str::trim);
        let Some(href) = href else {
            return self.document_uri.clone();
        };

        let resolved = match self.document_uri.as_deref().map(Url::parse) {
            Some(Ok(document_url)) => document_url.join(href),
            _ => Url::parse(href),
        };
        resolved
            .map(String::from)
            .ok()
            .or_else(|| self.document_uri.clone())
    }

    /// Diagnostics accumulated while parsing. Never fatal.
    pub fn parse_errors(&self) -> &[String] {
        &self.errors
    }

    pub(crate) fn push_parse_error(&mut self, message: String) {
        self.errors.push(message);
    }

    /// Snapshot of the arena size and parser bookkeeping, for undoing a
    /// speculative read.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            nodes: self.nodes.len(),
            errors: self.errors.len(),
            title: self.title.clone(),
            head: self.head,
            body: self.body,
            document_element: self.document_element,
        }
    }

    /// Undo everything allocated since `checkpoint`. Nodes created after it
    /// may only hang below `container`, whose children are dropped.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint, container: NodeId) {
        self.take_children(container);
        self.nodes.truncate(checkpoint.nodes.max(1));
        self.errors.truncate(checkpoint.errors);
        self.title = checkpoint.title;
        self.head = checkpoint.head;
        self.body = checkpoint.body;
        self.document_element = checkpoint.document_element;
    }

    // ---- node creation ----

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(tag)))
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(TextData::from_text(text.to_string())))
    }

    /// A text node whose content is given as (encoded) markup text.
    pub(crate) fn create_text_from_html(&mut self, html: &str) -> NodeId {
        self.alloc(NodeKind::Text(TextData::from_html(html.to_string())))
    }

    /// Extend a text node with more markup text.
    pub(crate) fn append_text_html(&mut self, id: NodeId, html: &str) {
        if let NodeKind::Text(text) = &mut self.node_mut(id).kind {
            text.push_html(html);
        }
    }

    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()))
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::DocumentFragment)
    }

    /// Deep-copy `id` from `other` into this arena. The copy is detached.
    pub fn import_node(&mut self, other: &Document, id: NodeId) -> NodeId {
        let copy = self.alloc(other.node(id).kind.clone());
        let mut pending: Vec<(NodeId, NodeId)> = other
            .children(id)
            .iter()
            .rev()
            .map(|&child| (child, copy))
            .collect();

        while let Some((source, parent)) = pending.pop() {
            let imported = self.alloc(other.node(source).kind.clone());
            self.push_child(parent, imported);
            pending.extend(
                other
                    .children(source)
                    .iter()
                    .rev()
                    .map(|&child| (child, imported)),
            );
        }
        copy
    }

    // ---- node inspection ----

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).kind.node_type()
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_element()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Text(_))
    }

    /// Upper-case tag name, or `""` for non-elements.
    pub fn tag_name(&self, id: NodeId) -> &str {
        self.node(id)
            .element()
            .map_or("", |el| el.tag_name.as_str())
    }

    /// Lower-case tag name, or `""` for non-elements.
    pub fn local_name(&self, id: NodeId) -> &str {
        self.node(id)
            .element()
            .map_or("", |el| el.local_name.as_str())
    }

    /// Rename an element in place, keeping its attributes and children.
    pub fn set_tag_name(&mut self, id: NodeId, tag: &str) {
        if let Some(el) = self.node_mut(id).element_mut() {
            let renamed = ElementData::new(tag);
            el.tag_name = renamed.tag_name;
            el.local_name = renamed.local_name;
        }
    }

    pub(crate) fn set_self_closing(&mut self, id: NodeId, self_closing: bool) {
        if let Some(el) = self.node_mut(id).element_mut() {
            el.self_closing = self_closing;
        }
    }

    // ---- tree navigation ----

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn element_children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).element_children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).element_children.first().copied()
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).element_children.last().copied()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_element_sibling
    }

    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_element_sibling
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Whether `id` is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.contains(ROOT, id)
    }

    /// Descendant elements of `id` named `name` (or every element for
    /// `"*"`), in document order.
    ///
    /// The result is a snapshot; later mutations are not reflected.
    pub fn get_elements_by_tag_name(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        if name == "*" {
            self.collect_elements(id, |_| true)
        } else {
            self.collect_elements(id, |el| el.local_name.eq_ignore_ascii_case(name))
        }
    }

    /// Descendant elements whose local name is any of `names`, in document
    /// order.
    pub fn get_elements_by_tag_names(&self, id: NodeId, names: &[&str]) -> Vec<NodeId> {
        self.collect_elements(id, |el| {
            names
                .iter()
                .any(|name| el.local_name.eq_ignore_ascii_case(name))
        })
    }

    fn collect_elements(&self, id: NodeId, keep: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).element_children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let node = self.node(current);
            if node.element().is_some_and(&keep) {
                found.push(current);
            }
            stack.extend(node.element_children.iter().rev().copied());
        }
        found
    }

    /// First element in document order whose `id` attribute equals
    /// `element_id`.
    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.node(ROOT).element_children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.get_attribute(current, "id") == Some(element_id) {
                return Some(current);
            }
            stack.extend(self.node(current).element_children.iter().rev().copied());
        }
        None
    }

    // ---- attributes ----

    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.node(id)
            .element()
            .map_or(&[][..], |el| el.attributes.as_slice())
    }

    /// Decoded value of attribute `name`.
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .element()
            .and_then(|el| el.attribute(name))
            .map(Attribute::value)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.node(id)
            .element()
            .is_some_and(|el| el.attribute(name).is_some())
    }

    /// Set attribute `name` to the plain `value`. Existing attributes keep
    /// their position.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.node_mut(id).element_mut() {
            el.set_attribute(name, value);
        }
    }

    pub(crate) fn set_raw_attribute(&mut self, id: NodeId, name: &str, encoded_value: String) {
        if let Some(el) = self.node_mut(id).element_mut() {
            el.set_raw_attribute(name, encoded_value);
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.node_mut(id)
            .element_mut()
            .is_some_and(|el| el.remove_attribute(name))
    }

    /// The `class` attribute, or `""`.
    pub fn class_name(&self, id: NodeId) -> &str {
        self.get_attribute(id, "class").unwrap_or("")
    }

    /// The `id` attribute, or `""`.
    pub fn element_id(&self, id: NodeId) -> &str {
        self.get_attribute(id, "id").unwrap_or("")
    }

    pub fn style(&self, id: NodeId) -> Style {
        Style::new(self.get_attribute(id, "style").unwrap_or(""))
    }

    /// Set one CSS declaration inside the `style` attribute.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut style = self.style(id);
        style.set(property, value);
        self.set_attribute(id, "style", style.as_str());
    }

    // ---- text ----

    /// Concatenated text of all descendant text nodes (decoded). For text
    /// and comment nodes, their own data.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.node(id).kind {
            NodeKind::Text(text) => text.text().to_string(),
            NodeKind::Comment(data) => data.clone(),
            _ => {
                let mut out = String::new();
                let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
                while let Some(current) = stack.pop() {
                    let node = self.node(current);
                    match &node.kind {
                        NodeKind::Text(text) => out.push_str(text.text()),
                        NodeKind::Comment(_) => {}
                        _ => stack.extend(node.children.iter().rev().copied()),
                    }
                }
                out
            }
        }
    }

    /// Replace the children of a container with a single text node, or
    /// overwrite the data of a text or comment node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        match &mut self.node_mut(id).kind {
            NodeKind::Text(data) => data.set_text(text.to_string()),
            NodeKind::Comment(data) => *data = text.to_string(),
            _ => {
                self.clear_children(id);
                if !text.is_empty() {
                    let child = self.create_text_node(text);
                    self.push_child(id, child);
                }
            }
        }
    }

    // ---- serialization ----

    pub fn inner_html(&self, id: NodeId) -> String {
        serialize::inner_html(self, id)
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::outer_html(self, id)
    }

    /// Parse `html` with a fresh parser and replace the children of `id`
    /// with the result.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        if !self.node(id).kind.is_container() {
            return;
        }
        let fragment = HtmlParser::new(html).parse();
        self.clear_children(id);
        for &child in fragment.children(fragment.root()) {
            let imported = self.import_node(&fragment, child);
            self.push_child(id, imported);
        }
    }

    // ---- mutation ----

    /// Append `child` to `parent`, detaching it from its old parent first.
    /// A fragment is emptied into `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.check_insert(parent, child)?;
        if self.node_type(child) == NodeType::DocumentFragment {
            for moved in self.take_children(child) {
                self.push_child(parent, moved);
            }
        } else {
            self.detach(child);
            self.push_child(parent, child);
        }
        Ok(child)
    }

    /// Insert `node` before `reference` in `parent`, or at the end when
    /// `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let Some(reference) = reference else {
            return self.append_child(parent, node);
        };
        self.check_insert(parent, node)?;
        if self.node(reference).parent != Some(parent) {
            return Err(DomError::NotAChild(reference, parent));
        }
        if reference == node {
            return Ok(node);
        }

        let moved = self.take_for_insert(node);
        let index = self.child_index(parent, reference);
        let children = &mut self.node_mut(parent).children;
        children.splice(index..index, moved);
        self.rebuild_links(parent);
        Ok(node)
    }

    /// Put `new_child` where `old_child` was. Returns the detached
    /// `old_child`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<NodeId, DomError> {
        self.check_insert(parent, new_child)?;
        if self.node(old_child).parent != Some(parent) {
            return Err(DomError::NotAChild(old_child, parent));
        }
        if new_child == old_child {
            return Ok(old_child);
        }

        let moved = self.take_for_insert(new_child);
        let index = self.child_index(parent, old_child);
        let children = &mut self.node_mut(parent).children;
        children.splice(index..=index, moved);
        self.rebuild_links(parent);
        self.node_mut(old_child).clear_links();
        Ok(old_child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        if self.node(child).parent != Some(parent) {
            return Err(DomError::NotAChild(child, parent));
        }
        self.detach(child);
        Ok(child)
    }

    /// Detach `id` from its parent, if it has one.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    fn check_insert(&self, parent: NodeId, node: NodeId) -> Result<(), DomError> {
        if !self.node(parent).kind.is_container() {
            return Err(DomError::NotAContainer(parent));
        }
        if self.node_type(node) == NodeType::Document || self.contains(node, parent) {
            return Err(DomError::HierarchyRequest(node, parent));
        }
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> usize {
        let children = &self.node(parent).children;
        children
            .iter()
            .position(|&c| c == child)
            .unwrap_or(children.len())
    }

    /// The nodes `node` stands for when inserted: a fragment's children, or
    /// the node itself after detaching it.
    fn take_for_insert(&mut self, node: NodeId) -> Vec<NodeId> {
        if self.node_type(node) == NodeType::DocumentFragment {
            self.take_children(node)
        } else {
            self.detach(node);
            vec![node]
        }
    }

    fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let node = self.node_mut(id);
        node.element_children.clear();
        let children = std::mem::take(&mut node.children);
        for &child in &children {
            self.node_mut(child).clear_links();
        }
        children
    }

    fn clear_children(&mut self, id: NodeId) {
        self.take_children(id);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            let index = self.child_index(parent, id);
            let children = &mut self.node_mut(parent).children;
            if index < children.len() {
                children.remove(index);
            }
            self.rebuild_links(parent);
        }
        self.node_mut(id).clear_links();
    }

    /// Append without the hierarchy checks. `child` must be detached.
    pub(crate) fn push_child(&mut self, parent: NodeId, child: NodeId) {
        let prev = self.node(parent).children.last().copied();
        let prev_element = self.node(parent).element_children.last().copied();
        let is_element = self.node(child).is_element();

        let node = self.node_mut(child);
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = None;
        node.prev_element_sibling = prev_element;
        node.next_element_sibling = None;

        if let Some(prev) = prev {
            self.node_mut(prev).next_sibling = Some(child);
        }
        if is_element {
            // Every trailing child back to (and including) the previous
            // element now sees `child` as its next element sibling.
            for index in (0..self.node(parent).children.len()).rev() {
                let sibling = self.node(parent).children[index];
                self.node_mut(sibling).next_element_sibling = Some(child);
                if self.node(sibling).is_element() {
                    break;
                }
            }
            self.node_mut(parent).element_children.push(child);
        }
        self.node_mut(parent).children.push(child);
    }

    /// Recompute sibling links and the element-child list of `parent` from
    /// its child list.
    fn rebuild_links(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.node_mut(parent).children);
        let mut elements = Vec::new();
        let mut prev_element = None;

        for (index, &child) in children.iter().enumerate() {
            let is_element = self.node(child).is_element();
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = index.checked_sub(1).map(|i| children[i]);
            node.next_sibling = children.get(index + 1).copied();
            node.prev_element_sibling = prev_element;
            if is_element {
                prev_element = Some(child);
                elements.push(child);
            }
        }

        let mut next_element = None;
        for &child in children.iter().rev() {
            self.node_mut(child).next_element_sibling = next_element;
            if self.node(child).is_element() {
                next_element = Some(child);
            }
        }

        let node = self.node_mut(parent);
        node.children = children;
        node.element_children = elements;
    }
}
