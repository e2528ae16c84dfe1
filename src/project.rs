use crate::dom::Element;
use crate::loader::{kind, label};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::{debug, warn};

const CARD_CLASS: &str =
    "rounded-2xl border border-zinc-200 p-5 hover:border-zinc-300 hover:bg-zinc-50 transition-colors";
const HEADER_CLASS: &str = "flex items-center justify-between gap-4";
const TITLE_CLASS: &str = "font-medium tracking-tight text-zinc-900";
const DATE_BADGE_CLASS: &str = "inline-flex items-center rounded-full border border-zinc-200 bg-white px-2 py-0.5 text-xs font-medium text-zinc-600";
const DESCRIPTION_CLASS: &str = "mt-2 text-sm leading-relaxed text-zinc-600";
const TAGS_CLASS: &str = "mt-4 flex flex-wrap gap-2";
const TAG_CLASS: &str = "rounded-full border border-zinc-200 bg-white px-2 py-1 text-xs text-zinc-600";
const LINKS_CLASS: &str = "mt-5 flex gap-4";
const LINK_CLASS: &str = "inline-flex items-center gap-1 text-sm text-zinc-700 hover:text-zinc-900 underline underline-offset-4 transition-colors";

const EXTERNAL_LINK_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20" fill="currentColor" class="h-3.5 w-3.5" aria-hidden="true"><path fill-rule="evenodd" d="M4.25 5.5a.75.75 0 0 0-.75.75v8.5c0 .414.336.75.75.75h8.5a.75.75 0 0 0 .75-.75v-4a.75.75 0 0 1 1.5 0v4A2.25 2.25 0 0 1 12.75 17h-8.5A2.25 2.25 0 0 1 2 14.75v-8.5A2.25 2.25 0 0 1 4.25 4h5a.75.75 0 0 1 0 1.5h-5Zm7.25-.75a.75.75 0 0 1 .75-.75h3.5a.75.75 0 0 1 .75.75v3.5a.75.75 0 0 1-1.5 0V6.56l-5.22 5.22a.75.75 0 1 1-1.06-1.06l5.22-5.22h-1.69a.75.75 0 0 1-.75-.75Z" clip-rule="evenodd"/></svg>"#;

/// Stands in for the page url when checking where a relative link leads.
const RELATIVE_LINK_BASE: &str = "https://localhost/";

#[derive(Deserialize, Default)]
#[serde(default)]
struct Project {
    name: Value,
    description: Value,
    date: Value,
    technologies: Value,
    github: Value,
    url: Value,
}

/// Replaces the content of `container` with one card per project, in order.
pub fn render_projects(container: Option<&mut Element>, projects: &[Value]) {
    let Some(container) = container else {
        warn!("project grid container not found");
        return;
    };
    container.clear();
    for (i, project) in projects.iter().enumerate() {
        match project_card(project) {
            Some(card) => container.append(card),
            None => debug!("skipping project #{i}: expected an object, found {}", kind(project)),
        }
    }
    debug!("rendered {} project(s)", container.children().len());
}

fn project_card(value: &Value) -> Option<Element> {
    if !value.is_object() {
        return None;
    }
    let project = Project::deserialize(value).ok()?;

    let mut header = Element::new("div").with_class(HEADER_CLASS).with_child(
        Element::new("h3")
            .with_class(TITLE_CLASS)
            .with_text(label(&project.name).unwrap_or_default()),
    );
    if let Some(date) = date_label(&project.date) {
        header.append(
            Element::new("span")
                .with_class(DATE_BADGE_CLASS)
                .with_text(date),
        );
    }

    let mut tags = Element::new("div").with_class(TAGS_CLASS);
    match &project.technologies {
        Value::Array(technologies) => {
            for technology in technologies.iter().filter_map(label) {
                tags.append(Element::new("span").with_class(TAG_CLASS).with_text(technology));
            }
        }
        Value::Null => {}
        other => debug!("ignoring technologies of unexpected type: {}", kind(other)),
    }

    let mut links = Element::new("div").with_class(LINKS_CLASS);
    if let Some(href) = link_target(&project.github) {
        links.append(external_link(href).with_text("GitHub"));
    }
    if let Some(href) = link_target(&project.url) {
        let mut link = external_link(href).with_text("Live Demo");
        link.append_static(EXTERNAL_LINK_ICON);
        links.append(link);
    }

    let mut card = Element::new("article")
        .with_class(CARD_CLASS)
        .with_child(header)
        .with_child(
            Element::new("p")
                .with_class(DESCRIPTION_CLASS)
                .with_text(label(&project.description).unwrap_or_default()),
        )
        .with_child(tags);
    if links.has_children() {
        card.append(links);
    }
    Some(card)
}

fn external_link(href: &str) -> Element {
    Element::new("a")
        .with_attribute("href", href)
        .with_attribute("target", "_blank")
        .with_attribute("rel", "noopener noreferrer")
        .with_class(LINK_CLASS)
}

/// `false`, `0` and the empty string count as no date.
fn date_label(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => label(other).filter(|it| !it.is_empty()),
    }
}

/// Relative references and absolute http(s) urls make it into an href.
fn link_target(value: &Value) -> Option<&str> {
    let href = value.as_str()?.trim();
    if href.is_empty() {
        return None;
    }
    let resolved = Url::parse(href)
        .or_else(|_| Url::parse(RELATIVE_LINK_BASE).and_then(|base| base.join(href)));
    match resolved {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(href),
        Ok(url) => {
            debug!("ignoring link with scheme {}", url.scheme());
            None
        }
        Err(err) => {
            debug!("ignoring invalid link {href:?}: {err}");
            None
        }
    }
}
