use std::fmt::Write;

const VOID_ELEMENTS: [&str; 18] = [
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: [&str; 7] = [
    "iframe", "noembed", "noframes", "plaintext", "script", "style", "xmp",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Always escaped when serialized.
    Text(String),
    Comment(String),
    /// Everything between `<!DOCTYPE ` and `>`.
    Doctype(String),
    /// Trusted markup. Only compile-time fragments can end up here, never
    /// anything read at runtime.
    Static(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attribute("class", class)
    }

    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.append_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn children(&self) -> &[Node] {
        self.children.as_slice()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|it| match it {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn append_node(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Appends `text` as a text node. Markup in `text` is never interpreted.
    pub fn append_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
    }

    pub fn append_static(&mut self, markup: &'static str) {
        self.children.push(Node::Static(markup));
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn replace_children(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children.clear();
        self.children.extend(children);
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth-first lookup of the first descendant (or self) with the given id.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|it| match it {
            Node::Element(element) => element.find_by_id_mut(id),
            _ => None,
        })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|it| it.find_by_id(id))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(element) => element.collect_text(out),
                Node::Text(text) => out.push_str(text),
                Node::Comment(_) | Node::Doctype(_) | Node::Static(_) => {}
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    pub fn inner_html(&self) -> String {
        let mut html = String::new();
        let raw = RAW_TEXT_ELEMENTS.contains(&self.name.as_str());
        for child in &self.children {
            child.write_html(&mut html, raw);
        }
        html
    }

    pub(crate) fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.name);
        for (name, value) in &self.attributes {
            let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.name.as_str()) {
            return;
        }
        let raw = RAW_TEXT_ELEMENTS.contains(&self.name.as_str());
        for child in &self.children {
            child.write_html(out, raw);
        }
        let _ = write!(out, "</{}>", self.name);
    }
}

impl Node {
    pub(crate) fn write_html(&self, out: &mut String, raw: bool) {
        match self {
            Node::Element(element) => element.write_html(out),
            // script and style content comes from the shell only
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Comment(comment) => {
                let _ = write!(out, "<!--{comment}-->");
            }
            Node::Doctype(declaration) => {
                let _ = write!(out, "<!DOCTYPE {declaration}>");
            }
            Node::Static(markup) => out.push_str(markup),
        }
    }
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\u{a0}', "&nbsp;")
}

pub fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\u{a0}', "&nbsp;")
}
