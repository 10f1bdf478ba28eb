//! Route files loaded from TOML resolve the same in both router modes.

use std::io::Write;

use fast_route::config::{load_config, parse_config, ConfigError};
use fast_route::Router;

mod common;

const ROUTES: &str = r#"
[router]
root = "^/"

[[routes]]
pattern = "^$"
handler = "views.index"
name = "index"

[[routes]]
pattern = '^blog/(?P<year>\d{4})/$'
handler = "blog.archive"
name = "blog-archive"

[[routes]]
pattern = '^blog/(?P<year>\d{4})/(?P<slug>[\w-]+)/$'
handler = "blog.post"
kwargs = { comments = true }

[[routes]]
pattern = "^api/"
[routes.include]
[[routes.include.routes]]
pattern = '^users/(?P<id>\d+)/$'
handler = "api.user"
[[routes.include.routes]]
pattern = "^users/$"
handler = "api.users"

[[routes]]
pattern = "^admin/"
[routes.include]
app_name = "admin"
namespace = "staff"
[[routes.include.routes]]
pattern = "^$"
handler = "admin.index"

[[routes]]
pattern = '^legacy/(\d+)$'
handler = "legacy.page"
raw = true
"#;

const PATHS: [&str; 10] = [
    "/",
    "/blog/2024/",
    "/blog/2024/hello-world/",
    "/blog/24/",
    "/api/users/",
    "/api/users/7/",
    "/api/teams/",
    "/admin/",
    "/legacy/12",
    "/missing",
];

fn router(accelerate: bool) -> Router {
    let mut config = parse_config(ROUTES).unwrap();
    config.router.accelerate = accelerate;
    Router::from_config(&config).unwrap()
}

#[test]
fn test_both_modes_agree() {
    let fast = router(true);
    let naive = router(false);
    assert!(fast.is_accelerated());
    assert!(!naive.is_accelerated());

    for path in PATHS {
        common::assert_same(&naive, &fast, path);
    }
}

#[test]
fn test_resolved_values() {
    let fast = router(true);

    let m = fast.resolve("/blog/2024/hello-world/").unwrap();
    assert_eq!(m.handler.name(), "blog.post");
    assert_eq!(m.kwargs["year"], "2024");
    assert_eq!(m.kwargs["slug"], "hello-world");
    assert_eq!(m.kwargs["comments"], true);

    let m = fast.resolve("/blog/2024/").unwrap();
    assert_eq!(m.url_name.as_deref(), Some("blog-archive"));

    let m = fast.resolve("/admin/").unwrap();
    assert_eq!(m.handler.name(), "admin.index");
    assert_eq!(m.app_names, vec!["admin"]);
    assert_eq!(m.namespaces, vec!["staff"]);

    let m = fast.resolve("/legacy/12").unwrap();
    assert_eq!(m.args, vec!["12"]);

    assert!(fast.resolve("/api/teams/").is_none());
    assert!(fast.resolve("/missing").is_none());
}

#[test]
fn test_report_counts() {
    let fast = router(true);
    let report = fast.report().unwrap();
    assert_eq!(report.stats.passthrough, 1);
    assert!(report.stats.duplicates.is_empty());
    // index, blog, api, admin, legacy
    assert_eq!(report.top_level, 5);
    assert!(report.to_string().contains("Generated 5 top level url patterns"));
}

#[test]
fn test_custom_root() {
    let config = parse_config("[router]\nroot = \"^/v2/\"\n\n[[routes]]\npattern = \"^ping$\"\nhandler = \"ping\"\n").unwrap();
    let router = Router::from_config(&config).unwrap();
    assert!(router.resolve("/v2/ping").is_some());
    assert!(router.resolve("/ping").is_none());
}

#[test]
fn test_invalid_regex_surfaces_at_build() {
    let config = parse_config("[[routes]]\npattern = \"^a/(?P<x>b/$\"\nhandler = \"x\"\n");
    // Unbalanced groups are caught by validation before any build.
    assert!(matches!(config, Err(ConfigError::Validation(_))));

    let config = parse_config("[[routes]]\npattern = '^a/\\p{Nope}/$'\nhandler = \"x\"\n").unwrap();
    let err = Router::from_config(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Route(_)));
}

#[test]
fn test_load_from_disk() {
    let path = std::env::temp_dir().join(format!("fast-route-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(ROUTES.as_bytes()).unwrap();
    drop(file);

    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.routes.len(), 6);
    assert!(config.router.accelerate);
}
