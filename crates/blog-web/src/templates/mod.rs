//! HTML templates
//!
//! Templates are compiled into the binary and loaded into one process-wide
//! `minijinja` environment on first use. Names ending in `.html` are
//! auto-escaped.

use std::sync::OnceLock;

use minijinja::Environment;
use serde::Serialize;
use tracing::error;

static ENVIRONMENT: OnceLock<Environment<'static>> = OnceLock::new();

macro_rules! template {
    ($name:literal) => {
        ($name, include_str!(concat!("../../templates/", $name)))
    };
}

const TEMPLATES: &[(&str, &str)] = &[
    template!("base.html"),
    template!("includes/post.html"),
    template!("includes/paginator.html"),
    template!("includes/switcher.html"),
    template!("posts/index.html"),
    template!("posts/follow.html"),
    template!("posts/group_list.html"),
    template!("posts/profile.html"),
    template!("posts/post_detail.html"),
    template!("posts/create_post.html"),
    template!("users/login.html"),
    template!("users/signup.html"),
    template!("core/404.html"),
    template!("core/500.html"),
    template!("core/error.html"),
];

fn init_environment() -> Environment<'static> {
    let mut environment = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(error) = environment.add_template(name, source) {
            error!(?error, name, "failed to load template");
        }
    }
    environment
}

pub fn environment() -> &'static Environment<'static> {
    ENVIRONMENT.get_or_init(init_environment)
}

/// Render a template by name
pub fn render<S>(name: &str, ctx: S) -> Result<String, minijinja::Error>
where
    S: Serialize,
{
    environment().get_template(name)?.render(ctx)
}
