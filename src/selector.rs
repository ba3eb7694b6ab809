//! Environment selector
//!
//! Resolves environment-conditional blocks of an index page:
//!
//! ```html
//! <!--(if target dev || e2e)>
//! <script src="shared/mocks.js"></script>
//! <!(endif)-->
//! ```
//!
//! Blocks naming the requested target are kept without their markers,
//! every other block is dropped. The `<!-->` / `<!--` guards some pages use
//! to keep a block visible when opened raw are accepted and dropped too.

use crate::domain::TARGET_TAGS;
use crate::error::{BuildError, BuildResult};

const OPEN: &str = "<!--(if target ";
const OPEN_END: &str = ")>";
const CLOSE: &str = "<!(endif)-->";
const VISIBLE_OPEN_GUARD: &str = "<!-->";
const VISIBLE_CLOSE_GUARD: &str = "<!--";

/// Keep only the blocks of `html` that apply to `target`.
///
/// `page` names the page in errors.
pub fn select(page: &str, html: &str, target: &str) -> BuildResult<String> {
    if !TARGET_TAGS.contains(&target) {
        return Err(BuildError::UnresolvedTag {
            tag: target.to_string(),
            page: page.to_string(),
        });
    }

    let malformed = |message: String| BuildError::InvalidIndexPage {
        page: page.to_string(),
        message,
    };

    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    loop {
        let open = rest.find(OPEN);
        let close = rest.find(CLOSE);

        let start = match (open, close) {
            (None, None) => {
                out.push_str(rest);
                return Ok(out);
            }
            (Some(open), Some(close)) if open < close => open,
            (Some(open), None) => open,
            (_, Some(_)) => {
                return Err(malformed(format!("'{CLOSE}' without a matching block")));
            }
        };

        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];

        let expr_end = after_open
            .find(OPEN_END)
            .ok_or_else(|| malformed("unterminated '(if target' marker".to_string()))?;
        let tags = parse_tags(page, &after_open[..expr_end])?;

        let body_start = &after_open[expr_end + OPEN_END.len()..];
        let body_start = body_start
            .strip_prefix(VISIBLE_OPEN_GUARD)
            .unwrap_or(body_start);

        let body_end = body_start.find(CLOSE).ok_or_else(|| {
            malformed(format!("block for '{}' is never closed", tags.join(" || ")))
        })?;
        let body = &body_start[..body_end];
        if body.contains(OPEN) {
            return Err(malformed("nested environment blocks".to_string()));
        }

        if tags.iter().any(|t| *t == target) {
            out.push_str(body.strip_suffix(VISIBLE_CLOSE_GUARD).unwrap_or(body));
        }

        rest = &body_start[body_end + CLOSE.len()..];
    }
}

fn parse_tags<'a>(page: &str, expr: &'a str) -> BuildResult<Vec<&'a str>> {
    let tags: Vec<&str> = expr.split("||").map(str::trim).collect();
    for tag in &tags {
        if !TARGET_TAGS.contains(tag) {
            return Err(BuildError::UnresolvedTag {
                tag: tag.to_string(),
                page: page.to_string(),
            });
        }
    }
    Ok(tags)
}
