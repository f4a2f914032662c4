//! Per-route transform pipeline.

use std::sync::Arc;

use eyre::{Result, WrapErr};

use crate::{
    plugin::{Accumulator, Plugin, TransformInput, display_name},
    routes::Route,
};

/// Runs a route's source through the plugin list.
///
/// Plugins run strictly in registration order. Each transform, synchronous
/// or suspending, completes before the next plugin sees the accumulator, so
/// a later plugin always observes every earlier write.
pub struct TransformPipeline<'p> {
    plugins: &'p [Arc<dyn Plugin>],
}

impl<'p> TransformPipeline<'p> {
    pub fn new(plugins: &'p [Arc<dyn Plugin>]) -> Self {
        Self { plugins }
    }

    /// Transform one route, returning the final accumulator.
    ///
    /// # Errors
    ///
    /// Returns the first transform error, tagged with the plugin and route.
    pub async fn run(&self, route: &Route, source: &str) -> Result<Accumulator> {
        let mut accumulator = Accumulator::new();

        for plugin in self.plugins {
            let output = {
                let input = TransformInput {
                    route: &route.file,
                    ext: &route.ext,
                    source,
                    accumulator: &accumulator,
                };
                let Some(transform) = plugin.transform(input) else {
                    continue;
                };
                transform.await.wrap_err_with(|| {
                    format!(
                        "plugin '{}' failed to transform '{}'",
                        display_name(plugin.as_ref()),
                        route.file
                    )
                })?
            };

            if let Some(output) = output {
                accumulator.apply(output);
            }
        }

        Ok(accumulator)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use eyre::eyre;
    use futures::FutureExt;

    use super::*;
    use crate::plugin::{TransformFuture, TransformOutput, ready};

    /// Returns a fixed output synchronously.
    struct Fixed(TransformOutput);

    impl Plugin for Fixed {
        fn transform<'a>(&'a self, _input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
            Some(ready(Some(self.0.clone())))
        }
    }

    /// Suspends before producing its output.
    struct Suspending(TransformOutput);

    impl Plugin for Suspending {
        fn transform<'a>(&'a self, _input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
            Some(
                async move {
                    for _ in 0..3 {
                        tokio::task::yield_now().await;
                    }
                    Ok(Some(self.0.clone()))
                }
                .boxed(),
            )
        }
    }

    /// Records the accumulator it was given.
    #[derive(Default)]
    struct Observer(Mutex<Vec<Accumulator>>);

    impl Plugin for Observer {
        fn transform<'a>(&'a self, input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
            self.0.lock().unwrap().push(input.accumulator.clone());
            Some(ready(None))
        }
    }

    struct Failing;

    impl Plugin for Failing {
        fn name(&self) -> Option<&str> {
            Some("failing")
        }

        fn transform<'a>(&'a self, _input: TransformInput<'a>) -> Option<TransformFuture<'a>> {
            Some(ready_err())
        }
    }

    fn ready_err<'a>() -> TransformFuture<'a> {
        futures::future::ready(Err(eyre!("boom"))).boxed()
    }

    struct Inert;

    impl Plugin for Inert {}

    fn html(s: &str) -> TransformOutput {
        TransformOutput::Html(s.to_string())
    }

    fn js(s: &str) -> TransformOutput {
        TransformOutput::Js(s.to_string())
    }

    async fn run(plugins: Vec<Arc<dyn Plugin>>) -> Result<Accumulator> {
        TransformPipeline::new(&plugins)
            .run(&Route::new("index.html"), "<h1>src</h1>")
            .await
    }

    #[tokio::test]
    async fn test_different_slots_do_not_clobber() {
        let acc = run(vec![Arc::new(Fixed(html("X"))), Arc::new(Fixed(js("Y")))])
            .await
            .unwrap();

        assert_eq!(acc.html, "X");
        assert_eq!(acc.js, "Y");
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let acc = run(vec![Arc::new(Fixed(js("first"))), Arc::new(Fixed(js("second")))])
            .await
            .unwrap();

        assert_eq!(acc.js, "second");
        assert_eq!(acc.html, "");
    }

    #[tokio::test]
    async fn test_suspending_transform_completes_before_next_plugin() {
        let observer = Arc::new(Observer::default());
        let acc = run(vec![
            Arc::new(Suspending(js("slow"))),
            observer.clone(),
            Arc::new(Fixed(html("fast"))),
        ])
        .await
        .unwrap();

        let seen = observer.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].js, "slow");
        assert_eq!(acc.js, "slow");
        assert_eq!(acc.html, "fast");
    }

    #[tokio::test]
    async fn test_suspending_transform_loses_to_later_writer() {
        let acc = run(vec![Arc::new(Suspending(js("slow"))), Arc::new(Fixed(js("fast")))])
            .await
            .unwrap();

        assert_eq!(acc.js, "fast");
    }

    #[tokio::test]
    async fn test_plugins_without_transform_are_skipped() {
        let acc = run(vec![Arc::new(Inert), Arc::new(Fixed(html("X")))])
            .await
            .unwrap();

        assert_eq!(acc.html, "X");
    }

    #[tokio::test]
    async fn test_no_plugins_yields_empty_accumulator() {
        let acc = run(Vec::new()).await.unwrap();
        assert_eq!(acc, Accumulator::default());
    }

    #[tokio::test]
    async fn test_transform_error_names_plugin_and_route() {
        let err = run(vec![Arc::new(Failing)]).await.unwrap_err();
        let message = format!("{err:#}");

        assert!(message.contains("plugin 'failing' failed to transform 'index.html'"));
        assert!(message.contains("boom"));
    }
}
