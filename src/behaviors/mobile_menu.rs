//! Slide-down navigation panel for narrow screens.
//!
//! The panel is built once from [`SiteConfig::menu_links`] and appended to the
//! nav container. Open state lives in the panel's `block`/`hidden` classes and
//! is mirrored into the toggle button's `aria-expanded` and icon.

#[cfg(test)]
#[path = "mobile_menu_test.rs"]
mod mobile_menu_test;

use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent};

use crate::config::{MenuLink, SiteConfig};
use crate::dom::web::WebDom;
use crate::dom::Dom;
use crate::error::BehaviorError;
use crate::listener::Listener;

pub const OPEN_CLASS: &str = "block";
pub const CLOSED_CLASS: &str = "hidden";

const PANEL_CLASS: &str = "hidden md:hidden bg-white border-t border-gray-200 shadow-lg";
const LIST_CLASS: &str = "px-4 py-6 space-y-3";
const LINK_CLASS: &str =
    "block text-gray-600 hover:text-primary transition-colors font-medium py-2 border-b border-gray-100 last:border-b-0";
const CTA_WRAPPER_CLASS: &str = "pt-4 mt-4 border-t border-gray-200";
const CTA_CLASS: &str =
    "block bg-primary hover:bg-primary-dark text-white px-4 py-3 rounded-lg font-medium text-center transition-colors";

pub const HAMBURGER_ICON: &str =
    r#"<path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16" />"#;
pub const CLOSE_ICON: &str =
    r#"<path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M6 18L18 6M6 6l12 12" />"#;

const HAMBURGER_PATH: &str = "M4 6h16M4 12h16M4 18h16";
const CLOSE_PATH: &str = "M6 18L18 6M6 6l12 12";

/// The exact markup [`MobileMenu::build`] produces for `config`.
#[cfg(test)]
pub(crate) fn menu_markup(config: &SiteConfig) -> String {
    use crate::dom::escape_html;

    let anchor = |link: &MenuLink, class: &str| {
        format!(
            "<a href=\"{}\" class=\"{}\">{}</a>",
            escape_html(&link.href),
            class,
            escape_html(&link.label)
        )
    };
    let links: String = config
        .menu_links
        .iter()
        .map(|link| anchor(link, LINK_CLASS))
        .collect();
    format!(
        "<div class=\"{}\"><div class=\"{}\">{}<div class=\"{}\">{}</div></div></div>",
        PANEL_CLASS,
        LIST_CLASS,
        links,
        CTA_WRAPPER_CLASS,
        anchor(&config.menu_cta, CTA_CLASS)
    )
}

pub struct MobileMenu<D: Dom> {
    button: D::Node,
    icon: Option<D::Node>,
    icon_path: Option<D::Node>,
    panel: D::Node,
    links: Vec<D::Node>,
}

impl<D: Dom> MobileMenu<D> {
    /// Builds the panel into the nav container. `None` when the page has no
    /// toggle button or no container to host the panel.
    pub fn build(dom: &D, config: &SiteConfig) -> Result<Option<Self>, BehaviorError> {
        let Some(button) = dom.query(&config.menu_toggle_selector) else {
            debug!("No mobile menu toggle on this page");
            return Ok(None);
        };
        let Some(container) = dom
            .query(&config.nav_selector)
            .and_then(|nav| dom.query_in(&nav, &config.nav_container_selector))
        else {
            debug!("No nav container for the mobile menu");
            return Ok(None);
        };
        let icon = dom.query_in(&button, "svg");
        let icon_path = icon.as_ref().and_then(|svg| dom.query_in(svg, "path"));

        let panel = dom.create_element("div")?;
        dom.set_class_name(&panel, PANEL_CLASS);
        let list = dom.create_element("div")?;
        dom.set_class_name(&list, LIST_CLASS);
        dom.append_child(&panel, &list)?;

        let mut links = Vec::with_capacity(config.menu_links.len() + 1);
        for link in &config.menu_links {
            links.push(append_anchor(dom, &list, link, LINK_CLASS)?);
        }
        let cta_wrapper = dom.create_element("div")?;
        dom.set_class_name(&cta_wrapper, CTA_WRAPPER_CLASS);
        dom.append_child(&list, &cta_wrapper)?;
        links.push(append_anchor(dom, &cta_wrapper, &config.menu_cta, CTA_CLASS)?);

        dom.append_child(&container, &panel)?;
        info!("Mobile menu built with {} links", links.len());

        Ok(Some(Self {
            button,
            icon,
            icon_path,
            panel,
            links,
        }))
    }

    pub fn button(&self) -> &D::Node {
        &self.button
    }

    #[cfg(test)]
    pub(crate) fn panel(&self) -> &D::Node {
        &self.panel
    }

    /// Panel anchors in order, call-to-action last.
    pub fn links(&self) -> &[D::Node] {
        &self.links
    }

    pub fn is_open(&self, dom: &D) -> bool {
        dom.has_class(&self.panel, OPEN_CLASS)
    }

    pub fn toggle(&self, dom: &D) {
        if self.is_open(dom) {
            self.close(dom);
        } else {
            self.open(dom);
        }
    }

    pub fn open(&self, dom: &D) {
        dom.remove_class(&self.panel, CLOSED_CLASS);
        dom.add_class(&self.panel, OPEN_CLASS);
        dom.set_attribute(&self.button, "aria-expanded", "true");
        self.set_icon(dom, CLOSE_PATH, CLOSE_ICON);
        debug!("Mobile menu opened");
    }

    pub fn close(&self, dom: &D) {
        dom.remove_class(&self.panel, OPEN_CLASS);
        dom.add_class(&self.panel, CLOSED_CLASS);
        dom.set_attribute(&self.button, "aria-expanded", "false");
        self.set_icon(dom, HAMBURGER_PATH, HAMBURGER_ICON);
        debug!("Mobile menu closed");
    }

    /// Reshapes the existing glyph path in place so a click target inside the
    /// icon stays attached to the button. Icons without a path get the full
    /// glyph markup.
    fn set_icon(&self, dom: &D, path_data: &str, markup: &str) {
        match (&self.icon_path, &self.icon) {
            (Some(path), _) => dom.set_attribute(path, "d", path_data),
            (None, Some(icon)) => dom.set_inner_html(icon, markup),
            (None, None) => {}
        }
    }

    /// Closes on clicks landing outside both the panel and the toggle button.
    pub fn handle_document_click(&self, dom: &D, target: Option<&D::Node>) {
        let inside = target.map_or(false, |target| {
            dom.contains(&self.panel, target) || dom.contains(&self.button, target)
        });
        if !inside {
            self.close(dom);
        }
    }

    pub fn handle_key(&self, dom: &D, key: &str) {
        if key == "Escape" && self.is_open(dom) {
            self.close(dom);
        }
    }

    pub fn handle_link_click(&self, dom: &D) {
        self.close(dom);
    }
}

fn append_anchor<D: Dom>(dom: &D, parent: &D::Node, link: &MenuLink, class: &str) -> Result<D::Node, BehaviorError> {
    let anchor = dom.create_element("a")?;
    dom.set_attribute(&anchor, "href", &link.href);
    dom.set_class_name(&anchor, class);
    dom.set_text(&anchor, &link.label);
    dom.append_child(parent, &anchor)?;
    Ok(anchor)
}

impl MobileMenu<WebDom> {
    pub fn attach(dom: &WebDom, config: &SiteConfig) -> Result<Vec<Listener>, BehaviorError> {
        let Some(menu) = Self::build(dom, config)? else {
            return Ok(Vec::new());
        };
        let menu = Rc::new(menu);
        let mut listeners = Vec::new();

        let button = menu.button().clone();
        {
            let menu = Rc::clone(&menu);
            let dom = dom.clone();
            listeners.push(Listener::new(&button, "click", move |_| menu.toggle(&dom))?);
        }
        {
            let menu = Rc::clone(&menu);
            let dom_clone = dom.clone();
            // Capture phase: decide before the button handler touches the icon.
            listeners.push(Listener::capture(dom.document(), "click", move |event: Event| {
                let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
                menu.handle_document_click(&dom_clone, target.as_ref());
            })?);
        }
        {
            let menu = Rc::clone(&menu);
            let dom_clone = dom.clone();
            listeners.push(Listener::new(dom.document(), "keydown", move |event: Event| {
                if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                    menu.handle_key(&dom_clone, &event.key());
                }
            })?);
        }
        for link in menu.links().to_vec() {
            let menu = Rc::clone(&menu);
            let dom = dom.clone();
            listeners.push(Listener::new(&link, "click", move |_| menu.handle_link_click(&dom))?);
        }

        info!("Mobile menu attached");
        Ok(listeners)
    }
}
