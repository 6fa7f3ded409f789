//! Count-up animation for `[data-count]` stats.
//!
//! The per-frame math is [`CounterAnimation::step`]; the browser side only
//! feeds it elapsed time from `requestAnimationFrame`.

#[cfg(test)]
#[path = "counter_test.rs"]
mod counter_test;

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SiteConfig;
use crate::dom::web::WebDom;
use crate::dom::Dom;
use crate::error::BehaviorError;

/// Marks a counter that has already started.
pub const ANIMATED_CLASS: &str = "animated";

/// Quartic ease-out: fast start, slow finish.
pub fn ease_out_quart(progress: f64) -> f64 {
    let p = progress.max(0.0).min(1.0);
    1.0 - (1.0 - p).powi(4)
}

/// Integer prefix of `raw`: leading whitespace, optional sign, digits.
/// Zero counts as absent.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let value: i64 = rest[..digits_end].parse().ok()?;
    let value = if negative { -value } else { value };
    (value != 0).then_some(value)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CounterFormat {
    pub grouped: bool,
    pub plus: bool,
}

impl CounterFormat {
    /// Reads the formatting hints from the counter's original text.
    pub fn from_text(text: &str) -> Self {
        Self {
            grouped: text.contains(','),
            plus: text.contains('+'),
        }
    }
}

pub fn format_count(value: i64, format: CounterFormat) -> String {
    let mut out = if format.grouped && value >= 1000 {
        group_thousands(value)
    } else {
        value.to_string()
    };
    if format.plus {
        out.push('+');
    }
    out
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: i64,
    pub text: String,
    pub done: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterAnimation {
    start: i64,
    end: i64,
    duration_ms: f64,
    format: CounterFormat,
}

impl CounterAnimation {
    pub fn new(start: i64, end: i64, duration_ms: f64, format: CounterFormat) -> Self {
        Self {
            start,
            end,
            duration_ms,
            format,
        }
    }

    pub fn step(&self, elapsed_ms: f64) -> CounterFrame {
        let progress = if self.duration_ms > 0.0 {
            (elapsed_ms / self.duration_ms).max(0.0).min(1.0)
        } else {
            1.0
        };
        let eased = ease_out_quart(progress);
        let span = (self.end - self.start) as f64;
        let value = (self.start as f64 + span * eased).floor() as i64;
        CounterFrame {
            value,
            text: format_count(value, self.format),
            done: progress >= 1.0,
        }
    }
}

pub struct CounterAnimator<D: Dom> {
    counters: Vec<D::Node>,
    attribute: String,
    duration_ms: f64,
}

impl<D: Dom> CounterAnimator<D> {
    pub fn new(dom: &D, config: &SiteConfig) -> Self {
        Self {
            counters: dom.query_all(&config.counter_selector),
            attribute: config.counter_attribute.clone(),
            duration_ms: config.counter_duration_ms,
        }
    }

    pub fn counters(&self) -> &[D::Node] {
        &self.counters
    }

    /// Called when `node` becomes visible. Marks it animated and returns its
    /// animation the first time only.
    pub fn begin(&self, dom: &D, node: &D::Node) -> Option<CounterAnimation> {
        let target = dom.attribute(node, &self.attribute).as_deref().and_then(parse_count)?;
        if dom.has_class(node, ANIMATED_CLASS) {
            return None;
        }
        dom.add_class(node, ANIMATED_CLASS);
        let format = CounterFormat::from_text(&dom.text(node));
        debug!("Counter animating to {}", target);
        Some(CounterAnimation::new(0, target, self.duration_ms, format))
    }
}

/// Keeps the intersection observer alive; dropping disconnects it.
pub struct CounterObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for CounterObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl CounterAnimator<WebDom> {
    pub fn attach(dom: &WebDom, config: &SiteConfig) -> Result<Option<CounterObserver>, BehaviorError> {
        let animator = Self::new(dom, config);
        if animator.counters().is_empty() {
            debug!("No counters on this page");
            return Ok(None);
        }
        let counters = animator.counters().to_vec();
        let dom = dom.clone();
        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(animation) = animator.begin(&dom, &target) {
                    run_frames(dom.clone(), target, animation);
                }
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.counter_visibility_threshold));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        for counter in &counters {
            observer.observe(counter);
        }
        info!("Counter animator observing {} counters", counters.len());
        Ok(Some(CounterObserver {
            observer,
            _callback: callback,
        }))
    }
}

/// Drives `animation` on `node` once per frame until it reports done.
fn run_frames(dom: WebDom, node: Element, animation: CounterAnimation) {
    let started = dom.now();
    let fallback_node = node.clone();
    let fallback_text = animation.step(f64::INFINITY).text;
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let dom_for_cb = dom.clone();

    let cb = Closure::wrap(Box::new(move |timestamp: f64| {
        let frame = animation.step(timestamp - started);
        dom_for_cb.set_text(&node, &frame.text);
        if frame.done {
            holder_for_cb.borrow_mut().take();
            return;
        }
        let requested = holder_for_cb
            .borrow()
            .as_ref()
            .map(|next| dom_for_cb.request_frame(next));
        if let Some(Err(e)) = requested {
            warn!("Counter frame request failed: {}", e);
            dom_for_cb.set_text(&node, &animation.step(f64::INFINITY).text);
            holder_for_cb.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>);

    match dom.request_frame(&cb) {
        Ok(_) => *holder.borrow_mut() = Some(cb),
        Err(e) => {
            warn!("Counter frame request failed: {}", e);
            dom.set_text(&fallback_node, &fallback_text);
        }
    }
}
