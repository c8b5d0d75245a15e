//! Code highlighting that emits the short token classes (`k`, `s2`, `c1`, …)
//! styled by the page stylesheet.

use syntect::{
    easy::ScopeRegionIterator,
    parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet},
    util::LinesWithEndings,
};

use crate::application::render::types::RenderError;

use super::escape_html;

/// Scope prefixes mapped to token classes. Earlier entries win, so more
/// specific prefixes come first.
const TOKEN_CLASSES: &[(&str, &str)] = &[
    ("invalid", "err"),
    ("comment.line.shebang", "ch"),
    ("comment.block.documentation", "cs"),
    ("comment.block", "cm"),
    ("comment.line", "c1"),
    ("comment", "c"),
    ("meta.preprocessor.include", "cpf"),
    ("meta.preprocessor", "cp"),
    ("keyword.control.import", "kn"),
    ("keyword.control.directive", "cp"),
    ("keyword.operator.word", "ow"),
    ("keyword.operator.logical.python", "ow"),
    ("keyword.operator", "o"),
    ("keyword.declaration", "kd"),
    ("keyword.other.unit", "kt"),
    ("keyword", "k"),
    ("storage.type.function", "kd"),
    ("storage.type.class", "kd"),
    ("storage.type", "kt"),
    ("storage.modifier", "kr"),
    ("storage", "k"),
    ("constant.numeric.integer.hexadecimal", "mh"),
    ("constant.numeric.hex", "mh"),
    ("constant.numeric.integer.binary", "mb"),
    ("constant.numeric.binary", "mb"),
    ("constant.numeric.integer.octal", "mo"),
    ("constant.numeric.octal", "mo"),
    ("constant.numeric.float", "mf"),
    ("constant.numeric.integer.long", "il"),
    ("constant.numeric.integer", "mi"),
    ("constant.numeric", "m"),
    ("constant.character.escape", "se"),
    ("constant.character.entity", "ni"),
    ("constant.character", "sc"),
    ("constant.language", "kc"),
    ("constant.other.symbol", "ss"),
    ("constant", "no"),
    ("punctuation.definition.string", "dl"),
    ("punctuation.section.interpolation", "si"),
    ("meta.interpolation", "si"),
    ("string.quoted.docstring", "sd"),
    ("string.quoted.double", "s2"),
    ("string.quoted.single", "s1"),
    ("string.quoted.other", "sa"),
    ("string.interpolated", "sb"),
    ("string.unquoted.heredoc", "sh"),
    ("string.regexp", "sr"),
    ("string.other", "sx"),
    ("string", "s"),
    ("support.type.exception", "ne"),
    ("support.function.magic", "fm"),
    ("support.function.builtin", "nb"),
    ("support.function", "nb"),
    ("support.type", "kt"),
    ("support.class", "nc"),
    ("support.constant", "no"),
    ("support.variable", "vg"),
    ("support", "nb"),
    ("entity.name.function.decorator", "nd"),
    ("meta.annotation", "nd"),
    ("entity.name.function", "nf"),
    ("entity.name.exception", "ne"),
    ("entity.name.class", "nc"),
    ("entity.name.struct", "nc"),
    ("entity.name.enum", "nc"),
    ("entity.name.trait", "nc"),
    ("entity.name.type", "nc"),
    ("entity.other.inherited-class", "nc"),
    ("entity.name.namespace", "nn"),
    ("entity.name.module", "nn"),
    ("entity.name.tag", "nt"),
    ("entity.name.label", "nl"),
    ("entity.name.constant", "no"),
    ("entity.other.attribute-name", "na"),
    ("entity.name", "nv"),
    ("variable.language", "bp"),
    ("variable.function", "nf"),
    ("variable.parameter", "nv"),
    ("variable.other.member", "vi"),
    ("variable.other.property", "vi"),
    ("variable.other.constant", "no"),
    ("variable.other.readwrite.global", "vg"),
    ("variable.other.readwrite.class", "vc"),
    ("variable", "nv"),
    ("markup.heading", "gh"),
    ("markup.inserted", "gi"),
    ("markup.deleted", "gd"),
    ("markup.italic", "ge"),
    ("markup.bold", "gs"),
    ("markup.output", "go"),
];

/// Render a code block as `<div class="codehilite"><pre>…</pre></div>`.
pub(crate) fn highlight_code(
    language: Option<&str>,
    code: &str,
    syntax_set: &SyntaxSet,
) -> Result<String, RenderError> {
    let lang_token = language.unwrap_or("text");
    let syntax =
        find_syntax(syntax_set, lang_token).unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    let mut code_with_newline = code.to_string();
    if !code_with_newline.ends_with('\n') {
        code_with_newline.push('\n');
    }

    let highlight_error = |message: String| RenderError::Highlighting {
        language: lang_token.to_string(),
        message,
    };

    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut writer = TokenWriter::with_capacity(code_with_newline.len() * 2);

    for line in LinesWithEndings::from(code_with_newline.as_str()) {
        let ops = state
            .parse_line(line, syntax_set)
            .map_err(|err| highlight_error(err.to_string()))?;

        for (region, op) in ScopeRegionIterator::new(&ops, line) {
            stack
                .apply(op)
                .map_err(|err| highlight_error(format!("{err:?}")))?;
            if region.is_empty() {
                continue;
            }
            writer.push(token_class(&stack), region);
        }
    }

    Ok(format!(
        "<div class=\"codehilite\"><pre><span></span><code>{}</code></pre></div>\n",
        writer.finish()
    ))
}

/// Class of the innermost scope that maps to a token category.
pub(crate) fn token_class(stack: &ScopeStack) -> Option<&'static str> {
    stack
        .as_slice()
        .iter()
        .rev()
        .find_map(|scope| class_for_scope(*scope))
}

fn class_for_scope(scope: Scope) -> Option<&'static str> {
    let name = scope.build_string();
    TOKEN_CLASSES
        .iter()
        .find(|(prefix, _)| scope_has_prefix(&name, prefix))
        .map(|(_, class)| *class)
}

/// Prefix match on whole dotted atoms: `string` matches `string.quoted` but
/// not `stringly`.
fn scope_has_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

fn find_syntax<'a>(syntax_set: &'a SyntaxSet, token: &str) -> Option<&'a SyntaxReference> {
    let lowercase = token.to_ascii_lowercase();
    syntax_set
        .find_syntax_by_token(&lowercase)
        .or_else(|| syntax_set.find_syntax_by_name(token))
        .or_else(|| syntax_set.find_syntax_by_extension(&lowercase))
}

/// Accumulates escaped text, merging adjacent regions that share a class.
struct TokenWriter {
    html: String,
    pending_class: Option<&'static str>,
    pending_text: String,
}

impl TokenWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            html: String::with_capacity(capacity),
            pending_class: None,
            pending_text: String::new(),
        }
    }

    fn push(&mut self, class: Option<&'static str>, text: &str) {
        if class != self.pending_class {
            self.flush();
            self.pending_class = class;
        }
        self.pending_text.push_str(text);
    }

    fn flush(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let escaped = escape_html(&self.pending_text);
        match self.pending_class {
            Some(class) => {
                self.html.push_str("<span class=\"");
                self.html.push_str(class);
                self.html.push_str("\">");
                self.html.push_str(&escaped);
                self.html.push_str("</span>");
            }
            None => self.html.push_str(&escaped),
        }
        self.pending_text.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::application::template::PREAMBLE;

    #[test]
    fn prefix_matches_whole_atoms() {
        assert!(scope_has_prefix("string.quoted.double.rust", "string"));
        assert!(scope_has_prefix("string", "string"));
        assert!(!scope_has_prefix("stringly.typed", "string"));
    }

    #[test]
    fn specific_scopes_beat_generic_ones() {
        let scope = Scope::new("constant.numeric.integer.hexadecimal.rust").expect("scope");
        assert_eq!(class_for_scope(scope), Some("mh"));

        let scope = Scope::new("keyword.operator.arithmetic.rust").expect("scope");
        assert_eq!(class_for_scope(scope), Some("o"));

        let scope = Scope::new("source.rust").expect("scope");
        assert_eq!(class_for_scope(scope), None);
    }

    #[test]
    fn innermost_mapped_scope_wins() {
        let mut stack = ScopeStack::new();
        for name in [
            "source.python",
            "string.quoted.double.python",
            "constant.character.escape.python",
        ] {
            stack.push(Scope::new(name).expect("scope"));
        }
        assert_eq!(token_class(&stack), Some("se"));

        let mut stack = ScopeStack::new();
        for name in [
            "source.rust",
            "comment.line.double-slash.rust",
            "punctuation.definition.comment.rust",
        ] {
            stack.push(Scope::new(name).expect("scope"));
        }
        assert_eq!(token_class(&stack), Some("c1"));
    }

    #[test]
    fn every_token_class_is_styled() {
        for (prefix, class) in TOKEN_CLASSES {
            assert!(
                PREAMBLE.contains(&format!(".codehilite .{class} {{")),
                "class `{class}` for `{prefix}` has no stylesheet rule"
            );
        }
    }

    #[test]
    fn writer_merges_adjacent_regions() {
        let mut writer = TokenWriter::with_capacity(64);
        writer.push(Some("k"), "fn");
        writer.push(None, " ");
        writer.push(Some("s2"), "\"a");
        writer.push(Some("s2"), "<b>\"");
        writer.push(None, "\n");

        assert_eq!(
            writer.finish(),
            "<span class=\"k\">fn</span> <span class=\"s2\">&quot;a&lt;b&gt;&quot;</span>\n"
        );
    }
}
