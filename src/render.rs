//! HTML rendering for the web interface.
//!
//! The page uses htmx: mutating requests return only the `#contact-list`
//! fragment, which the browser swaps in place. Search returns a results
//! fragment for `#search-results`.
//!
//! All user-supplied text goes through [`escape`].

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;

use crate::models::Contact;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Bytes escaped in a `/contacts/{name}` segment. `+` and `.` are escaped
/// too: the server reads `+` as a space, and clients collapse `.`/`..`
/// segments before sending.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Percent-encode a contact name for use as a `/contacts/{name}` segment.
pub fn encode_path_segment(s: &str) -> String {
    utf8_percent_encode(s, PATH_SEGMENT).to_string()
}

/// Full page: add form, search box and the contact list.
pub fn index_page(contacts: &[Contact]) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Contact Directory</title>
  <script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body>
  <h1>Contact Directory</h1>
  <form hx-post="/contacts" hx-target="#contact-list" hx-swap="outerHTML">
    <input name="name" placeholder="Name" required>
    <input name="phone" placeholder="Phone" required>
    <button type="submit">Add</button>
  </form>
  <input type="search" name="q" placeholder="Search"
         hx-get="/search" hx-trigger="keyup changed delay:300ms" hx-target="#search-results">
  <div id="search-results"></div>
  {}
</body>
</html>
"##,
        contact_list(contacts)
    )
}

/// The `#contact-list` fragment returned by every mutating route.
pub fn contact_list(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return r#"<ul id="contact-list"><li class="empty">No contacts found</li></ul>"#
            .to_string();
    }

    let mut html = String::from(r#"<ul id="contact-list">"#);
    for contact in contacts {
        let name = escape(&contact.name);
        let phone = escape(&contact.phone);
        let url = format!("/contacts/{}", encode_path_segment(&contact.name));
        let _ = write!(
            html,
            concat!(
                r##"<li><span class="name">{name}</span> <span class="phone">{phone}</span>"##,
                r##"<form hx-put="{url}" hx-target="#contact-list" hx-swap="outerHTML">"##,
                r##"<input name="phone" value="{phone}" required><button type="submit">Save</button></form>"##,
                r##"<button hx-delete="{url}" hx-target="#contact-list" hx-swap="outerHTML">Delete</button></li>"##,
            ),
            name = name,
            phone = phone,
            url = url,
        );
    }
    html.push_str("</ul>");
    html
}

/// Fragment listing the matches for `query`.
pub fn search_results(matches: &[&Contact], query: &str) -> String {
    let query = escape(query);
    if matches.is_empty() {
        return format!(r#"<p class="no-results">No contacts matching "{}"</p>"#, query);
    }

    let mut html = format!(
        r#"<p>{} result(s) for "{}"</p><ul class="search-results">"#,
        matches.len(),
        query
    );
    for contact in matches {
        let _ = write!(
            html,
            r#"<li><span class="name">{}</span> <span class="phone">{}</span></li>"#,
            escape(&contact.name),
            escape(&contact.phone)
        );
    }
    html.push_str("</ul>");
    html
}
