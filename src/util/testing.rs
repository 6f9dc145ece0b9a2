use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Log level for tests when `RUST_LOG` is not set.
pub const DEFAULT_TEST_LOG_LEVEL: &str = "debug";

/// Markup shared by tests: one root with a plain child and a classed child.
pub const SAMPLE_MARKUP: &str = r#"<div class="a"><p>X</p><span class="b">Y</span></div>"#;

/// Markup with nesting deep enough to exercise navigation and search.
pub const NAV_MARKUP: &str = r#"<div class="page">
  <nav class="nav-bar main">
    <ul class="menu"><li class="item">Home</li><li class="item active">About</li></ul>
  </nav>
  <main class="content">
    <article class="post"><p>First</p></article>
    <article class="post featured"><p>Second</p></article>
  </main>
</div>"#;

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        env::set_var("RUST_LOG", test_log_filter(env::var("RUST_LOG").ok()));
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn test_log_filter(configured: Option<String>) -> String {
    configured.unwrap_or_else(|| DEFAULT_TEST_LOG_LEVEL.to_string())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // html5ever reports every tokenizer step at trace level
    let noisy_modules = ["html5ever", "markup5ever", "selectors"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_LOG_LEVEL));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}


#[cfg(test)]
mod filter_tests {
    use super::*;

    #[test]
    fn given_no_rust_log_then_debug_level() {
        assert_eq!(test_log_filter(None), "debug");
    }

    #[test]
    fn given_rust_log_then_kept() {
        assert_eq!(test_log_filter(Some("domscope=trace".into())), "domscope=trace");
    }
}
