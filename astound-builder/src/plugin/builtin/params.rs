use crate::{
    plugin::{Plugin, TransformFuture, TransformInput, TransformOutput, ready},
    routes::Route,
};

/// Exposes dynamic route segments (`blog/[slug].html`) to the page as
/// `window.astound.params`, appended to the JS produced so far.
pub struct ParamsPlugin;

impl ParamsPlugin {
    pub const NAME: &'static str = "params";
}

impl Plugin for ParamsPlugin {
    fn name(&self) -> Option<&str> {
        Some(Self::NAME)
    }

    fn transform<'a>(&'a self, input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
        let route = Route::new(input.route);
        if route.params().is_empty() {
            return Some(ready(None));
        }

        let mut js = input.accumulator.js.clone();
        if !js.is_empty() && !js.ends_with('\n') {
            js.push('\n');
        }
        js.push_str(&params_script(&route));
        Some(ready(Some(TransformOutput::Js(js))))
    }
}

fn params_script(route: &Route) -> String {
    let path = route.url_path();
    let pattern: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let pattern = serde_json::to_string(&pattern).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"(function () {{
  var pattern = {pattern};
  var parts = window.location.pathname.split("/").filter(Boolean);
  var params = {{}};
  pattern.forEach(function (segment, i) {{
    var m = /^\[(.+)\]$/.exec(segment);
    if (m) params[m[1]] = decodeURIComponent(parts[i] || "");
  }});
  window.astound = window.astound || {{}};
  window.astound.params = params;
}})();
"#
    )
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::plugin::Accumulator;

    fn run(route: &str, acc: &Accumulator) -> Option<TransformOutput> {
        let input = TransformInput {
            route,
            ext: "html",
            source: "",
            accumulator: acc,
        };
        block_on(ParamsPlugin.transform(input).unwrap()).unwrap()
    }

    #[test]
    fn test_static_route_untouched() {
        assert_eq!(run("about.html", &Accumulator::new()), None);
    }

    #[test]
    fn test_dynamic_route_appends_params_script() {
        let acc = Accumulator {
            js: "main()".into(),
            ..Accumulator::default()
        };

        let Some(TransformOutput::Js(js)) = run("blog/[slug].html", &acc) else {
            panic!("expected js output");
        };

        assert!(js.starts_with("main()\n"));
        assert!(js.contains(r#"var pattern = ["blog","[slug]"];"#));
        assert!(js.contains("window.astound.params = params;"));
    }
}
