use crate::dom::Element;
use crate::loader::{kind, label};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const SECTION_CLASS: &str = "mb-10 last:mb-0";
const HEADING_CLASS: &str = "text-sm font-semibold tracking-tight uppercase text-zinc-900 mb-4";
const LIST_CLASS: &str = "flex flex-wrap gap-2.5";
const BADGE_CLASS: &str = "inline-flex items-center rounded-lg border border-zinc-800 bg-zinc-900 px-3 py-1.5 text-sm font-medium text-zinc-100 hover:bg-zinc-800 hover:border-zinc-700 transition-all duration-200";

/// Replaces the content of `container` with a heading and badge list per
/// non-empty category, in the order the categories appear in the document.
pub fn render_skills(container: Option<&mut Element>, skills: &Map<String, Value>) {
    let Some(container) = container else {
        warn!("skills container not found");
        return;
    };
    container.clear();
    for (category, value) in skills {
        let entries = match value {
            Value::Array(entries) if !entries.is_empty() => entries,
            Value::Array(_) => {
                debug!("skipping empty skill category {category:?}");
                continue;
            }
            other => {
                debug!(
                    "skipping skill category {category:?} of unexpected type: {}",
                    kind(other)
                );
                continue;
            }
        };
        let mut list = Element::new("div").with_class(LIST_CLASS);
        for skill in entries.iter().filter_map(label) {
            list.append(Element::new("span").with_class(BADGE_CLASS).with_text(skill));
        }
        container.append(
            Element::new("div")
                .with_class(SECTION_CLASS)
                .with_child(
                    Element::new("h3")
                        .with_class(HEADING_CLASS)
                        .with_text(category.as_str()),
                )
                .with_child(list),
        );
    }
}
