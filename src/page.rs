use crate::dom::{Element, Node};
use reqwest::Url;
use scraper::node::Doctype;
use scraper::{ElementRef, Html};
use std::fmt::Write;
use std::path::PathBuf;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Id of the element receiving the project cards.
pub const PROJECT_GRID_ID: &str = "project-grid";
/// Id of the element receiving the skill categories.
pub const SKILLS_CONTAINER_ID: &str = "skills-container";

/// A parsed HTML shell and the URL it was loaded from.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    /// Document-level nodes: the doctype, comments around `<html>` and the
    /// root element itself.
    nodes: Vec<Node>,
}

impl Page {
    pub fn parse(html: &str, url: Url) -> Self {
        let document = Html::parse_document(html);
        let nodes = document
            .tree
            .root()
            .children()
            .filter_map(|child| match ElementRef::wrap(child) {
                Some(element) => Some(Node::Element(convert(element))),
                None => leaf(child.value()),
            })
            .collect();
        Self { url, nodes }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn container(&self, id: &str) -> Option<&Element> {
        self.nodes.iter().find_map(|it| match it {
            Node::Element(element) => element.find_by_id(id),
            _ => None,
        })
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(|it| match it {
            Node::Element(element) => element.find_by_id_mut(id),
            _ => None,
        })
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for node in &self.nodes {
            node.write_html(&mut html, false);
        }
        html
    }
}

fn convert(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());
    for (name, attribute) in value.attrs.iter() {
        // xlink:href, xmlns:xlink and friends keep their prefix
        let name = match name.prefix {
            Some(ref prefix) => format!("{prefix}:{}", name.local),
            None => name.local.to_string(),
        };
        converted.set_attribute(&name, attribute.to_string());
    }
    for child in element.children() {
        let node = match ElementRef::wrap(child) {
            Some(child) => Some(Node::Element(convert(child))),
            None => leaf(child.value()),
        };
        if let Some(node) = node {
            converted.append_node(node);
        }
    }
    converted
}

fn leaf(node: &scraper::Node) -> Option<Node> {
    match node {
        scraper::Node::Text(text) => Some(Node::Text(text.to_string())),
        scraper::Node::Comment(comment) => Some(Node::Comment(comment.to_string())),
        scraper::Node::Doctype(doctype) => Some(Node::Doctype(declaration(doctype))),
        _ => None,
    }
}

fn declaration(doctype: &Doctype) -> String {
    let mut declaration = doctype.name().to_string();
    match (doctype.public_id(), doctype.system_id()) {
        ("", "") => {}
        ("", system) => {
            let _ = write!(declaration, " SYSTEM \"{system}\"");
        }
        (public, "") => {
            let _ = write!(declaration, " PUBLIC \"{public}\"");
        }
        (public, system) => {
            let _ = write!(declaration, " PUBLIC \"{public}\" \"{system}\"");
        }
    }
    declaration
}

/// Where the page is in its parsing. A loading page hands itself over exactly
/// once through the receiver when its structure is complete.
pub enum ReadyState {
    Loading(oneshot::Receiver<Page>),
    Parsed(Page),
}

/// Sending half of a loading page.
pub struct ParseSignal(oneshot::Sender<Page>);

impl ParseSignal {
    pub fn parsed(self, page: Page) {
        if self.0.send(page).is_err() {
            debug!("nobody is waiting for the page anymore");
        }
    }
}

impl ReadyState {
    pub fn loading() -> (ParseSignal, Self) {
        let (sender, receiver) = oneshot::channel();
        (ParseSignal(sender), Self::Loading(receiver))
    }

    /// Starts reading and parsing the shell at `path` in the background.
    pub fn open(path: PathBuf, url: Url) -> Self {
        let (signal, state) = Self::loading();
        tokio::spawn(async move {
            match tokio::fs::read_to_string(&path).await {
                Ok(html) => {
                    debug!("parsing {}", path.display());
                    signal.parsed(Page::parse(&html, url));
                }
                Err(err) => {
                    error!("failed to read page {}: {err}", path.display());
                }
            }
        });
        state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }

    /// Resolves once the page structure is available, or `None` if parsing was
    /// abandoned.
    pub async fn parsed(self) -> Option<Page> {
        match self {
            Self::Parsed(page) => Some(page),
            Self::Loading(receiver) => receiver.await.ok(),
        }
    }
}
