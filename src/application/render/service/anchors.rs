use std::{cell::RefCell, rc::Rc};

use lol_html::{RewriteStrSettings, element, rewrite_str};

use crate::application::render::types::{DocumentHeading, RenderError};

const SOURCEPOS_ATTRIBUTE: &str = "data-sourcepos";

/// Give every parsed heading its anchor `id` and drop the `data-sourcepos`
/// markers. Headings written as raw HTML carry no marker and are left as is.
pub(crate) fn apply_heading_ids(
    html: &str,
    headings: &[DocumentHeading],
) -> Result<String, RenderError> {
    let headings_shared = Rc::new(headings.to_vec());
    let index = Rc::new(RefCell::new(0usize));
    let error_slot = Rc::new(RefCell::new(None));

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("[data-sourcepos]", {
                let headings_shared = Rc::clone(&headings_shared);
                let index = Rc::clone(&index);
                let error_slot = Rc::clone(&error_slot);
                move |el| {
                    el.remove_attribute(SOURCEPOS_ATTRIBUTE);

                    let tag_name = el.tag_name();
                    let Some(level) = heading_tag_level(&tag_name) else {
                        return Ok(());
                    };

                    let mut idx = index.borrow_mut();
                    let Some(info) = headings_shared.get(*idx) else {
                        *error_slot.borrow_mut() = Some(RenderError::Document {
                            message: "unexpected extra heading".to_string(),
                        });
                        return Ok(());
                    };
                    *idx += 1;

                    if level != info.level {
                        *error_slot.borrow_mut() = Some(RenderError::Document {
                            message: format!(
                                "heading level mismatch: expected h{}, found {}",
                                info.level, tag_name
                            ),
                        });
                        return Ok(());
                    }

                    el.set_attribute("id", &info.slug)?;
                    Ok(())
                }
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RenderError::Document {
        message: err.to_string(),
    })?;

    if let Some(err) = error_slot.borrow_mut().take() {
        return Err(err);
    }

    Ok(rewritten)
}

fn heading_tag_level(tag_name: &str) -> Option<u8> {
    let level = tag_name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}
