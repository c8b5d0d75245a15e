use crate::application::render::types::DocumentHeading;

use super::escape_html;

struct TocEntry<'h> {
    heading: &'h DocumentHeading,
    children: Vec<TocEntry<'h>>,
}

/// Render headings as `<div class="toc">` holding nested `<ul>` lists. A
/// heading nests under the closest preceding heading of a lower level.
pub(crate) fn render_toc(headings: &[DocumentHeading]) -> String {
    let mut roots = Vec::new();
    for heading in headings {
        insert_entry(&mut roots, heading);
    }

    let mut html = String::from("<div class=\"toc\">\n");
    if !roots.is_empty() {
        render_entries(&roots, &mut html);
    }
    html.push_str("</div>\n");
    html
}

fn insert_entry<'h>(siblings: &mut Vec<TocEntry<'h>>, heading: &'h DocumentHeading) {
    match siblings.last_mut() {
        Some(last) if last.heading.level < heading.level => {
            insert_entry(&mut last.children, heading)
        }
        _ => siblings.push(TocEntry {
            heading,
            children: Vec::new(),
        }),
    }
}

fn render_entries(entries: &[TocEntry<'_>], html: &mut String) {
    html.push_str("<ul>\n");
    for entry in entries {
        html.push_str("<li><a href=\"#");
        html.push_str(&escape_html(&entry.heading.slug));
        html.push_str("\">");
        html.push_str(&escape_html(&entry.heading.text));
        html.push_str("</a>");
        if !entry.children.is_empty() {
            render_entries(&entry.children, html);
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n");
}
