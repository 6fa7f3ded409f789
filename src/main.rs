use log::{error, info};

use site_behaviors::config;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site behaviors");
    match site_behaviors::start() {
        // Listeners stay registered for the life of the document.
        Ok(page) => std::mem::forget(page),
        Err(e) => error!("Failed to start site behaviors: {}", e),
    }
}
