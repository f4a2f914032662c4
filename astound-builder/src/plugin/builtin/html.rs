use crate::plugin::{Plugin, TransformFuture, TransformInput, TransformOutput, ready};

/// Uses the raw source of `.html` routes as the page HTML when no earlier
/// plugin produced any.
pub struct HtmlPlugin;

impl HtmlPlugin {
    pub const NAME: &'static str = "html";
}

impl Plugin for HtmlPlugin {
    fn name(&self) -> Option<&str> {
        Some(Self::NAME)
    }

    fn transform<'a>(&'a self, input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
        let is_html = matches!(input.ext, "html" | "htm");
        let output = (is_html && input.accumulator.html.is_empty())
            .then(|| TransformOutput::Html(input.source.to_string()));
        Some(ready(output))
    }
}
