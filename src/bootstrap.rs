use crate::dom::{Element, Node};
use crate::http_client::Transport;
use crate::loader::{PortfolioDocument, load};
use crate::page::{PROJECT_GRID_ID, Page, ReadyState, SKILLS_CONTAINER_ID};
use crate::project::render_projects;
use crate::skills::render_skills;
use tracing::{debug, error, info};

pub const PROJECTS_FALLBACK: &str = "Unable to load projects. Please try again later.";
pub const SKILLS_FALLBACK: &str = "Unable to load skills. Please try again later.";
const FALLBACK_CLASS: &str = "text-sm text-zinc-500";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document was loaded and each section attempted its own render.
    Rendered,
    /// Fetching or parsing failed, both sections show their fallback.
    Degraded,
}

/// Runs load-and-render once for the page. Waits for the page structure if it
/// is still loading, otherwise starts right away. Returns `None` if the page
/// never finished parsing.
pub async fn bootstrap<T: Transport>(
    state: ReadyState,
    transport: &T,
    source_path: &str,
) -> Option<(Page, Outcome)> {
    if state.is_loading() {
        debug!("waiting for the page structure");
    }
    let Some(mut page) = state.parsed().await else {
        error!("page structure never became available");
        return None;
    };
    let base = page.url().clone();
    info!("loading {source_path} for {base}");
    let outcome = match load(transport, &base, source_path).await {
        Ok(document) => {
            render(&mut page, &document);
            Outcome::Rendered
        }
        Err(err) => {
            error!("error loading portfolio data: {err}");
            degrade(&mut page);
            Outcome::Degraded
        }
    };
    info!("{outcome:?}");
    Some((page, outcome))
}

/// Renders each section the document has a usable value for. A section without
/// one is left as it is.
pub fn render(page: &mut Page, document: &PortfolioDocument) {
    match document.projects() {
        Some(projects) => render_projects(page.container_mut(PROJECT_GRID_ID), projects),
        None => debug!("no projects to render"),
    }
    match document.skills() {
        Some(skills) => render_skills(page.container_mut(SKILLS_CONTAINER_ID), skills),
        None => debug!("no skills to render"),
    }
}

pub fn degrade(page: &mut Page) {
    for (id, message) in [
        (PROJECT_GRID_ID, PROJECTS_FALLBACK),
        (SKILLS_CONTAINER_ID, SKILLS_FALLBACK),
    ] {
        if let Some(container) = page.container_mut(id) {
            container.replace_children([Node::Element(
                Element::new("p").with_class(FALLBACK_CLASS).with_text(message),
            )]);
        }
    }
}
