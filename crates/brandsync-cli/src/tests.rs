use std::path::Path;
use std::time::Duration;

use brandsync_core::{AppConfig, DedupPolicy, EmptyPolicy, SortOrder};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        source_url: "https://www.example.com/en/brands/".to_string(),
        origin: "https://www.example.com".to_string(),
        output_path: dir.join("brands.json"),
        html_output_path: dir.join("brands.html"),
        name_map_path: None,
        navigation_timeout_secs: 5,
        user_agent: "brandsync-test/0.1".to_string(),
        dedup_policy: DedupPolicy::Name,
        sort_order: SortOrder::Alphabetical,
        empty_policy: EmptyPolicy::Fallback,
        deny_names: vec!["Eyewear".to_string()],
        fetch_stylesheets: false,
        log_level: "info".to_string(),
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(path).expect("report should exist");
    serde_json::from_str(&raw).expect("report should be JSON")
}

const BRAND_PAGE: &str = r#"<html><head><style>
    .brands { display: grid; }
    .tile img { width: 120px; }
    .footer { color: grey; }
  </style></head><body>
  <section class="brands">
    <div class="tile"><img src="/m/184a2d28553c2b50231eb421f7213e45.png"></div>
    <div class="tile"><img src="/logos/persol.svg" alt="Persol"></div>
    <div class="tile"><img src="/logos/vogue.svg" alt="Vogue Eyewear"></div>
    <div class="tile"><img src="/logos/coach.svg" alt="Coach"></div>
    <div class="tile"><img src="/logos/eyewear.svg" alt="Eyewear"></div>
  </section>
  <footer class="footer">(c)</footer>
</body></html>"#;

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_sync_with_defaults() {
    let cli = Cli::try_parse_from(["brandsync-cli", "sync"]).expect("expected valid cli args");
    match cli.command {
        Commands::Sync { run } => {
            assert!(run.html_file.is_none());
            assert!(run.output.is_none());
            assert!(!run.no_fallback);
            assert!(!run.insertion_order);
            assert!(run.dedup.is_none());
        }
        Commands::Capture { .. } => panic!("expected sync"),
    }
}

#[test]
fn parses_sync_policy_overrides() {
    let cli = Cli::try_parse_from([
        "brandsync-cli",
        "sync",
        "--html-file",
        "snapshot.html",
        "--no-fallback",
        "--insertion-order",
        "--dedup",
        "name_and_logo",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Sync {
            run: RunArgs {
                no_fallback: true,
                insertion_order: true,
                dedup: Some(DedupPolicy::NameAndLogo),
                html_file: Some(ref p),
                ..
            }
        } if p == Path::new("snapshot.html")
    ));
}

#[test]
fn parses_capture_html_output() {
    let cli = Cli::try_parse_from([
        "brandsync-cli",
        "capture",
        "--output",
        "out/brands.json",
        "--html-output",
        "out/brands.html",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Capture {
            html_output: Some(ref h),
            run: RunArgs { output: Some(ref o), .. },
        } if h == Path::new("out/brands.html") && o == Path::new("out/brands.json")
    ));
}

#[test]
fn unknown_dedup_policy_is_rejected() {
    assert!(Cli::try_parse_from(["brandsync-cli", "sync", "--dedup", "logo"]).is_err());
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["brandsync-cli"]).is_err());
}

#[test]
fn run_args_override_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    let cli = Cli::try_parse_from([
        "brandsync-cli",
        "sync",
        "--url",
        "https://brands.example.org/all/",
        "--output",
        "elsewhere.json",
        "--no-fallback",
        "--insertion-order",
    ])
    .unwrap();
    let Commands::Sync { run } = cli.command else {
        panic!("expected sync");
    };
    run.apply(&mut config).unwrap();

    assert_eq!(config.source_url, "https://brands.example.org/all/");
    assert_eq!(config.origin, "https://brands.example.org");
    assert_eq!(config.output_path, Path::new("elsewhere.json"));
    assert_eq!(config.empty_policy, EmptyPolicy::Fail);
    assert_eq!(config.sort_order, SortOrder::Insertion);
    assert_eq!(config.dedup_policy, DedupPolicy::Name);
}

#[test]
fn url_override_with_bare_query_keeps_clean_origin() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    let cli = Cli::try_parse_from(["brandsync-cli", "sync", "--url", "https://brands.example.org?lang=en"])
        .unwrap();
    let Commands::Sync { run } = cli.command else {
        panic!("expected sync");
    };
    run.apply(&mut config).unwrap();
    assert_eq!(config.origin, "https://brands.example.org");
}

#[test]
fn non_http_url_override_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    let cli = Cli::try_parse_from(["brandsync-cli", "sync", "--url", "file:///tmp/brands.html"]).unwrap();
    let Commands::Sync { run } = cli.command else {
        panic!("expected sync");
    };
    assert!(run.apply(&mut config).is_err());
    assert_eq!(config.source_url, "https://www.example.com/en/brands/");
}

// ---------------------------------------------------------------------------
// Runs against local snapshots
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sync_from_snapshot_writes_sorted_records() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("page.html");
    std::fs::write(&snapshot, BRAND_PAGE).unwrap();
    let config = test_config(dir.path());

    run::run_sync(&config, Some(&snapshot)).await.expect("sync should succeed");

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "success");
    assert_eq!(report["source_url"], "https://www.example.com/en/brands/");
    assert_eq!(report["mapping_info"], "name map covers 17 brands");
    let names: Vec<&str> = report["brands"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Coach", "Persol", "Ray-Ban", "Vogue Eyewear"]);
    assert_eq!(report["total_brands"], 4);
    assert_eq!(
        report["brands"][2]["logo"],
        "https://www.example.com/m/184a2d28553c2b50231eb421f7213e45.png"
    );
}

#[tokio::test]
async fn empty_snapshot_uses_fallback_records() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("page.html");
    std::fs::write(&snapshot, "<html><body><p>maintenance</p></body></html>").unwrap();
    let config = test_config(dir.path());

    run::run_sync(&config, Some(&snapshot)).await.unwrap();

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "fallback");
    assert_eq!(report["total_brands"], 3);
    assert_eq!(report["message"], "fallback data used - check selectors");
    assert!(report.get("mapping_info").is_none());
}

#[tokio::test]
async fn empty_snapshot_without_fallback_fails_with_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("page.html");
    std::fs::write(&snapshot, "<html><body></body></html>").unwrap();
    let mut config = test_config(dir.path());
    config.empty_policy = EmptyPolicy::Fail;

    assert!(run::run_sync(&config, Some(&snapshot)).await.is_err());

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "error");
    assert_eq!(report["total_brands"], 0);
    assert!(report["error"].as_str().unwrap().contains("no brands found"));
}

#[tokio::test]
async fn missing_snapshot_writes_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let err = run::run_sync(&config, Some(&dir.path().join("absent.html")))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("failed to read HTML snapshot"));

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "error");
    assert!(report["brands"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn capture_from_snapshot_writes_report_and_page() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("page.html");
    std::fs::write(&snapshot, BRAND_PAGE).unwrap();
    let config = test_config(dir.path());

    run::run_capture(&config, Some(&snapshot)).await.expect("capture should succeed");

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "success");
    assert_eq!(report["image_count"], 5);
    assert_eq!(report["total_brands"], 5);
    assert!(report["raw_html"].as_str().unwrap().starts_with(r#"<section class="brands">"#));
    let css = report["raw_css"].as_str().unwrap();
    assert!(css.contains(".tile img"));
    assert!(!css.contains(".footer"));

    let page = std::fs::read_to_string(&config.html_output_path).unwrap();
    assert_eq!(page, report["complete_html"].as_str().unwrap());
    assert!(page.contains(r#"<base href="https://www.example.com/en/brands/">"#));
}

#[tokio::test]
async fn capture_without_container_fails_with_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("page.html");
    std::fs::write(&snapshot, r#"<main><img src="/a.png" alt="A brand"></main>"#).unwrap();
    let config = test_config(dir.path());

    assert!(run::run_capture(&config, Some(&snapshot)).await.is_err());

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "error");
    assert_eq!(report["raw_html"], "");
    assert!(!config.html_output_path.exists());
}

// ---------------------------------------------------------------------------
// Runs against a live server
// ---------------------------------------------------------------------------

fn live_config(dir: &Path, server_uri: &str) -> AppConfig {
    let mut config = test_config(dir);
    config.source_url = format!("{server_uri}/en/brands/");
    config.origin = server_uri.to_string();
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body.to_string())
}

fn brand_page_with(extra: &str) -> String {
    BRAND_PAGE.replace("<body>", &format!("<body>{extra}"))
}

fn relative_grid(count: usize) -> String {
    let figures: String = (0..count)
        .map(|i| format!(r#"<figure><img src="img/b{i}.png" alt="Label {i}"></figure>"#))
        .collect();
    format!(r#"<html><body><div class="wall">{figures}</div></body></html>"#)
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |r| r.len())
}

#[tokio::test]
async fn reveal_link_is_followed_once_and_becomes_the_page_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/brands/"))
        .respond_with(html(r#"<html><body><a href="/en/brands/all/">View all</a></body></html>"#))
        .expect(1)
        .mount(&server)
        .await;
    let all_page = relative_grid(5).replace(
        "<body>",
        r#"<body><a href="/en/brands/more/">See all</a>"#,
    );
    Mock::given(method("GET"))
        .and(path("/en/brands/all/"))
        .respond_with(html(&all_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/en/brands/more/"))
        .respond_with(html("<html></html>"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = live_config(dir.path(), &server.uri());
    run::run_capture(&config, None).await.expect("capture should succeed");

    let report = read_json(&config.output_path);
    assert_eq!(report["image_count"], 5);
    assert_eq!(report["source_url"], config.source_url.as_str());
    let page = std::fs::read_to_string(&config.html_output_path).unwrap();
    assert!(
        page.contains(&format!(r#"<base href="{}/en/brands/all/">"#, server.uri())),
        "standalone page must resolve images against the revealed page"
    );
}

#[tokio::test]
async fn failed_reveal_fetch_keeps_the_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/brands/"))
        .respond_with(html(&brand_page_with(r#"<a href="/gone/">Show all</a>"#)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = live_config(dir.path(), &server.uri());
    run::run_sync(&config, None).await.expect("sync should succeed");

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "success");
    assert_eq!(report["total_brands"], 4);
    assert_eq!(
        report["brands"][0]["logo"],
        format!("{}/logos/coach.svg", server.uri())
    );
}

#[tokio::test]
async fn script_and_same_page_controls_are_not_followed() {
    for control in [
        r#"<a href="javascript:void(0)">View all</a>"#,
        r#"<a href="/en/brands/">Show brands</a>"#,
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/brands/"))
            .respond_with(html(&brand_page_with(control)))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = live_config(dir.path(), &server.uri());
        run::run_sync(&config, None).await.expect("sync should succeed");

        assert_eq!(request_count(&server).await, 1, "{control}");
        assert_eq!(read_json(&config.output_path)["total_brands"], 4);
    }
}

#[tokio::test]
async fn navigation_timeout_writes_error_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(BRAND_PAGE).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = live_config(dir.path(), &server.uri());
    config.navigation_timeout_secs = 1;

    let err = run::run_sync(&config, None).await.unwrap_err();
    assert!(format!("{err:#}").contains("timed out"), "got: {err:#}");

    let report = read_json(&config.output_path);
    assert_eq!(report["status"], "error");
    assert!(report["error"].as_str().unwrap().contains("timed out"));
    assert!(report["brands"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn capture_includes_rules_from_linked_stylesheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/en/brands/"))
        .respond_with(html(&BRAND_PAGE.replace(
            "<head>",
            r#"<head><link rel="stylesheet" href="/static/site.css">"#,
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/static/site.css"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/css")
                .set_body_string(".tile { margin: 4px } .hero { height: 80vh }"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = live_config(dir.path(), &server.uri());
    config.fetch_stylesheets = true;
    run::run_capture(&config, None).await.expect("capture should succeed");

    let css = read_json(&config.output_path)["raw_css"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(css.contains(".tile {"));
    assert!(css.contains("margin: 4px"));
    assert!(!css.contains(".hero"));
}
