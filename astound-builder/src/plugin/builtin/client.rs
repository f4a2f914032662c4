use crate::plugin::Plugin;

const CLIENT_RUNTIME: &str = include_str!("client.js");

/// Client-side navigation runtime, shipped as a worker script.
///
/// Provides `window.astound.__addListener`, which the page loaders call after
/// every render to intercept same-origin links.
pub struct ClientPlugin;

impl ClientPlugin {
    pub const NAME: &'static str = "client";
}

impl Plugin for ClientPlugin {
    fn name(&self) -> Option<&str> {
        Some(Self::NAME)
    }

    fn add_script(&self) -> Option<String> {
        Some(CLIENT_RUNTIME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_defines_listener_hook() {
        let script = ClientPlugin.add_script().unwrap();
        assert!(script.contains("__addListener"));
        assert!(script.contains("astound.load"));
    }
}
