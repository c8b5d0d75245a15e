use comrak::options::Options;

/// CommonMark with fenced code blocks; highlighting and the table of contents
/// are applied by the rewrite stage on top of the parsed tree.
pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();
    configure_render(&mut options);
    options
}

fn configure_render(options: &mut Options<'static>) {
    let render = &mut options.render;
    // Sources are trusted; raw HTML passes through.
    render.r#unsafe = true;
    // Parser-produced elements carry `data-sourcepos` until the anchor stage
    // strips it, which is how raw HTML headings are told apart.
    render.sourcepos = true;
}
