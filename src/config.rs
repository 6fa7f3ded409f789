use log::{debug, warn, Level};
use serde::Deserialize;

use crate::dom::Dom;
use crate::error::BehaviorError;

/// Id of the optional inline JSON block that overrides [`SiteConfig`] fields.
pub const CONFIG_ELEMENT_ID: &str = "site-behaviors-config";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MenuLink {
    pub label: String,
    pub href: String,
}

impl MenuLink {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub menu_toggle_selector: String,
    pub nav_selector: String,
    pub nav_container_selector: String,
    pub menu_links: Vec<MenuLink>,
    pub menu_cta: MenuLink,
    pub anchor_selector: String,
    pub scroll_threshold: f64,
    pub faq_trigger_selector: String,
    /// Class an answer panel must carry to pair with its trigger; empty accepts any sibling.
    pub faq_answer_class: String,
    pub counter_selector: String,
    pub counter_attribute: String,
    pub counter_duration_ms: f64,
    pub counter_visibility_threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            menu_toggle_selector: ".md\\:hidden button".to_string(),
            nav_selector: "nav".to_string(),
            nav_container_selector: ".max-w-7xl".to_string(),
            menu_links: vec![
                MenuLink::new("Home", "index.html"),
                MenuLink::new("About", "about.html"),
                MenuLink::new("Programs", "programs.html"),
                MenuLink::new("Impact", "impact.html"),
                MenuLink::new("Donate", "donate.html"),
                MenuLink::new("Volunteer", "volunteer.html"),
                MenuLink::new("Partner", "partner.html"),
                MenuLink::new("Stories", "stories.html"),
                MenuLink::new("Contact", "contact.html"),
            ],
            menu_cta: MenuLink::new("Donate Now", "donate.html"),
            anchor_selector: "a[href^=\"#\"]".to_string(),
            scroll_threshold: 100.0,
            faq_trigger_selector: ".bg-gray-50 button".to_string(),
            faq_answer_class: "px-6".to_string(),
            counter_selector: "[data-count]".to_string(),
            counter_attribute: "data-count".to_string(),
            counter_duration_ms: 2000.0,
            counter_visibility_threshold: 0.5,
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self, BehaviorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads overrides from the page, falling back to defaults when the
    /// block is absent or malformed.
    pub fn from_page<D: Dom>(dom: &D) -> Self {
        let Some(block) = dom.element_by_id(CONFIG_ELEMENT_ID) else {
            debug!("No page config block, using defaults");
            return Self::default();
        };
        match Self::from_json(&dom.text(&block)) {
            Ok(config) => {
                debug!("Loaded page config overrides");
                config
            }
            Err(e) => {
                warn!("Ignoring page config: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
