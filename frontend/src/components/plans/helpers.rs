//! Browser glue for the plan editor: clock, blocking prompts, number
//! formatting and file downloads.

use std::time::Duration;

use gloo_file::{Blob, ObjectUrl};
use gloo_timers::callback::Timeout;
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use common::view::display_round;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Wall-clock time for the save queue.
pub fn now() -> Duration {
    Duration::from_millis(js_sys::Date::now() as u64)
}

/// Blocking notification used for failed writes.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Rounded quantity with thousands separators, as shown in the grid.
pub fn format_quantity(value: f64) -> String {
    (display_round(value) as i64).to_formatted_string(&Locale::en)
}

pub fn input_value(event: &Event) -> String {
    event.target_unchecked_into::<HtmlInputElement>().value()
}

pub fn select_value(event: &Event) -> String {
    event.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Text typed into a number input; anything unparsable counts as zero.
pub fn number_value(event: &Event) -> f64 {
    input_value(event).trim().parse::<f64>().unwrap_or(0.0)
}

/// Hands `bytes` to the browser as a spreadsheet download named `file_name`.
pub fn download_workbook(bytes: &[u8], file_name: &str) -> Result<(), String> {
    let url = ObjectUrl::from(Blob::new_with_options(bytes, Some(XLSX_MIME)));
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "no document available".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "cannot create a download link".to_string())?
        .dyn_into()
        .map_err(|_| "cannot create a download link".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    // Revoking the URL right away can cancel the download in some browsers.
    Timeout::new(1_000, move || drop(url)).forget();
    Ok(())
}
