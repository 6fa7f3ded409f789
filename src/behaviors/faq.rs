//! Single-open FAQ accordion.
//!
//! Each trigger button is paired once, at setup, with the element right after
//! it when that element carries the answer class. Other triggers are left
//! alone, so ordinary buttons in the same section keep their neighbours visible.

#[cfg(test)]
#[path = "faq_test.rs"]
mod faq_test;

use std::rc::Rc;

use log::{debug, info};

use crate::config::SiteConfig;
use crate::dom::web::WebDom;
use crate::dom::Dom;
use crate::error::BehaviorError;
use crate::listener::Listener;

const SHOWN: &str = "block";
const HIDDEN: &str = "none";
const ICON_OPEN: &str = "rotate(45deg)";
const ICON_CLOSED: &str = "rotate(0deg)";

pub struct FaqItem<D: Dom> {
    pub trigger: D::Node,
    pub panel: D::Node,
    pub icon: Option<D::Node>,
}

pub struct FaqAccordion<D: Dom> {
    items: Vec<FaqItem<D>>,
}

impl<D: Dom> FaqAccordion<D> {
    /// Pairs triggers with their answers and hides every answer.
    pub fn new(dom: &D, config: &SiteConfig) -> Self {
        let items: Vec<FaqItem<D>> = dom
            .query_all(&config.faq_trigger_selector)
            .into_iter()
            .filter_map(|trigger| {
                let panel = dom.next_element_sibling(&trigger).filter(|panel| {
                    config.faq_answer_class.is_empty() || dom.has_class(panel, &config.faq_answer_class)
                });
                let Some(panel) = panel else {
                    debug!("FAQ trigger without an answer panel");
                    return None;
                };
                let icon = dom.query_in(&trigger, "svg");
                Some(FaqItem { trigger, panel, icon })
            })
            .collect();
        for item in &items {
            dom.set_style(&item.panel, "display", HIDDEN);
        }
        Self { items }
    }

    pub fn items(&self) -> &[FaqItem<D>] {
        &self.items
    }

    pub fn is_open(&self, dom: &D, index: usize) -> bool {
        self.items
            .get(index)
            .map_or(false, |item| dom.style(&item.panel, "display") == SHOWN)
    }

    pub fn open_index(&self, dom: &D) -> Option<usize> {
        (0..self.items.len()).find(|i| self.is_open(dom, *i))
    }

    /// Opens item `index` and closes the rest, or closes it if it was open.
    pub fn toggle(&self, dom: &D, index: usize) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let was_open = self.is_open(dom, index);

        for (i, other) in self.items.iter().enumerate() {
            if i != index {
                set_item(dom, other, false);
            }
        }
        set_item(dom, item, !was_open);
        debug!("FAQ item {} {}", index, if was_open { "closed" } else { "opened" });
    }
}

fn set_item<D: Dom>(dom: &D, item: &FaqItem<D>, open: bool) {
    dom.set_style(&item.panel, "display", if open { SHOWN } else { HIDDEN });
    if let Some(icon) = &item.icon {
        dom.set_style(icon, "transform", if open { ICON_OPEN } else { ICON_CLOSED });
    }
}

impl FaqAccordion<WebDom> {
    pub fn attach(dom: &WebDom, config: &SiteConfig) -> Result<Vec<Listener>, BehaviorError> {
        let accordion = Rc::new(Self::new(dom, config));
        if accordion.items().is_empty() {
            debug!("No FAQ items on this page");
            return Ok(Vec::new());
        }
        let triggers: Vec<_> = accordion.items().iter().map(|item| item.trigger.clone()).collect();
        let mut listeners = Vec::with_capacity(triggers.len());
        for (index, trigger) in triggers.iter().enumerate() {
            let accordion = Rc::clone(&accordion);
            let dom = dom.clone();
            listeners.push(Listener::new(trigger, "click", move |_| accordion.toggle(&dom, index))?);
        }
        info!("FAQ accordion attached with {} items", listeners.len());
        Ok(listeners)
    }
}
