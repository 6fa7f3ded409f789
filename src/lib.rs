use log::{info, warn};

pub mod config;
pub mod dom;
pub mod error;
pub mod listener;

pub mod behaviors {
    pub mod counter;
    pub mod faq;
    pub mod mobile_menu;
    pub mod navbar_shadow;
    pub mod smooth_scroll;
}

use behaviors::{
    counter::{CounterAnimator, CounterObserver},
    faq::FaqAccordion,
    mobile_menu::MobileMenu,
    navbar_shadow::NavbarShadow,
    smooth_scroll::SmoothScroll,
};
use config::SiteConfig;
use dom::web::WebDom;
use error::BehaviorError;
use listener::Listener;

/// Everything attached to the current document. Dropping it detaches all
/// listeners and disconnects the counter observer.
#[derive(Default)]
pub struct Page {
    listeners: Vec<Listener>,
    counters: Option<CounterObserver>,
}

impl Page {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn observes_counters(&self) -> bool {
        self.counters.is_some()
    }

    fn add(&mut self, name: &str, attached: Result<Vec<Listener>, BehaviorError>) {
        match attached {
            Ok(listeners) => self.listeners.extend(listeners),
            Err(e) => warn!("Skipping {}: {}", name, e),
        }
    }
}

/// Attaches every behavior to the loaded document.
pub fn start() -> Result<Page, BehaviorError> {
    let dom = WebDom::new()?;
    let config = SiteConfig::from_page(&dom);

    let mut page = Page::default();
    page.add("mobile menu", MobileMenu::attach(&dom, &config));
    page.add("smooth scroll", SmoothScroll::attach(&dom, &config));
    page.add("navbar shadow", NavbarShadow::attach(&dom, &config));
    page.add("faq accordion", FaqAccordion::attach(&dom, &config));
    match CounterAnimator::attach(&dom, &config) {
        Ok(observer) => page.counters = observer,
        Err(e) => warn!("Skipping counters: {}", e),
    }

    info!(
        "Page behaviors ready: {} listeners, counters {}",
        page.listener_count(),
        if page.observes_counters() { "observed" } else { "absent" }
    );
    Ok(page)
}
