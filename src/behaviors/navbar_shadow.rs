#[cfg(test)]
#[path = "navbar_shadow_test.rs"]
mod navbar_shadow_test;

use log::{debug, info};

use crate::config::SiteConfig;
use crate::dom::web::WebDom;
use crate::dom::Dom;
use crate::error::BehaviorError;
use crate::listener::Listener;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowVariant {
    Default,
    Elevated,
}

impl ShadowVariant {
    pub fn class(self) -> &'static str {
        match self {
            ShadowVariant::Default => "shadow-lg",
            ShadowVariant::Elevated => "shadow-xl",
        }
    }

    fn other(self) -> Self {
        match self {
            ShadowVariant::Default => ShadowVariant::Elevated,
            ShadowVariant::Elevated => ShadowVariant::Default,
        }
    }
}

/// Strictly past the threshold elevates; the threshold itself does not.
pub fn shadow_variant(offset: f64, threshold: f64) -> ShadowVariant {
    if offset > threshold {
        ShadowVariant::Elevated
    } else {
        ShadowVariant::Default
    }
}

pub struct NavbarShadow<D: Dom> {
    nav: D::Node,
    threshold: f64,
}

impl<D: Dom> NavbarShadow<D> {
    pub fn new(dom: &D, config: &SiteConfig) -> Option<Self> {
        let nav = dom.query(&config.nav_selector)?;
        Some(Self {
            nav,
            threshold: config.scroll_threshold,
        })
    }

    pub fn apply(&self, dom: &D, offset: f64) -> ShadowVariant {
        let variant = shadow_variant(offset, self.threshold);
        dom.add_class(&self.nav, variant.class());
        dom.remove_class(&self.nav, variant.other().class());
        variant
    }
}

impl NavbarShadow<WebDom> {
    pub fn attach(dom: &WebDom, config: &SiteConfig) -> Result<Vec<Listener>, BehaviorError> {
        let Some(shadow) = Self::new(dom, config) else {
            debug!("No navbar on this page");
            return Ok(Vec::new());
        };
        let dom_clone = dom.clone();
        let listener = Listener::new(dom.window(), "scroll", move |_| {
            shadow.apply(&dom_clone, dom_clone.scroll_y());
        })?;
        info!("Navbar shadow attached");
        Ok(vec![listener])
    }
}
