#[cfg(test)]
#[path = "smooth_scroll_test.rs"]
mod smooth_scroll_test;

use std::rc::Rc;

use log::{debug, info};

use crate::config::SiteConfig;
use crate::dom::web::WebDom;
use crate::dom::Dom;
use crate::error::BehaviorError;
use crate::listener::Listener;

/// Element id an in-page `href` points at. Bare `#` has none.
pub fn fragment_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub struct SmoothScroll<D: Dom> {
    links: Vec<D::Node>,
}

impl<D: Dom> SmoothScroll<D> {
    pub fn new(dom: &D, config: &SiteConfig) -> Self {
        Self {
            links: dom.query_all(&config.anchor_selector),
        }
    }

    pub fn links(&self) -> &[D::Node] {
        &self.links
    }

    /// Scrolls to the link's fragment target. Returns whether a target was
    /// found; the caller suppresses navigation either way.
    pub fn handle_click(&self, dom: &D, link: &D::Node) -> bool {
        let href = dom.attribute(link, "href").unwrap_or_default();
        let Some(target) = fragment_target(&href).and_then(|id| dom.element_by_id(id)) else {
            debug!("No scroll target for {}", href);
            return false;
        };
        dom.scroll_into_view(&target);
        true
    }
}

impl SmoothScroll<WebDom> {
    pub fn attach(dom: &WebDom, config: &SiteConfig) -> Result<Vec<Listener>, BehaviorError> {
        let scroll = Rc::new(Self::new(dom, config));
        let mut listeners = Vec::with_capacity(scroll.links().len());
        for link in scroll.links().to_vec() {
            let scroll = Rc::clone(&scroll);
            let dom = dom.clone();
            let target = link.clone();
            listeners.push(Listener::new(&link, "click", move |event| {
                event.prevent_default();
                scroll.handle_click(&dom, &target);
            })?);
        }
        info!("Smooth scroll attached to {} links", listeners.len());
        Ok(listeners)
    }
}
