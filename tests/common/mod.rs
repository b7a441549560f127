#![allow(dead_code)]

use jobscan::models::{Config, SiteSelectors};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointed at a mock site, with no politeness delay.
pub fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.link_selector = "a.job".to_string();
    config.site.description_selector = "div#desc".to_string();
    config.site.base_url = base_url.to_string();
    config.crawler.request_delay_ms = 0;
    config.crawler.timeout_secs = 5;
    config
}

pub fn selectors(config: &Config) -> SiteSelectors {
    SiteSelectors::from_config(&config.site).unwrap()
}

pub fn results_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<li><a class="job" href="{href}">Job</a></li>"#))
        .collect();
    format!("<html><body><ul>{links}</ul><a href=\"/about\">About</a></body></html>")
}

pub fn posting_page(title: &str, description: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head>
        <body><div id="desc">{description}</div></body></html>"#
    )
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Serve a posting page at `route`, expecting exactly `hits` requests.
pub async fn mount_posting(server: &MockServer, route: &str, description: &str, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(posting_page(&format!("Job {route}"), description)))
        .expect(hits)
        .mount(server)
        .await;
}
