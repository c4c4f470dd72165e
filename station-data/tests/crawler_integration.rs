//! Integration tests for crawler.rs using wiremock
//!
//! Route pages are served by a mock server in place of the timetable site.
#![allow(clippy::unwrap_used)]

use station_data::crawler::RouteCrawler;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn crawler(server: &MockServer) -> RouteCrawler {
    RouteCrawler::new(server.uri(), Duration::from_secs(5)).unwrap()
}

/// Builds a timetable page with one row per stop.
fn timetable_page(stations: &[&str]) -> String {
    let rows: String = stations
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                "<tr><td>{}</td><td><a href=\"/huoche/zhan/{i}.htm\">{name}</a></td><td>08:{i:02}</td></tr>\n",
                i + 1
            )
        })
        .collect();

    format!(
        "<html><head><title>timetable</title></head><body>\
         <div>route info</div>\
         <table><tr><th>No.</th><th>Station</th><th>Time</th></tr>\n{rows}</table>\
         </body></html>"
    )
}

async fn mount_page(server: &MockServer, train: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/huoche/checi/{train}.htm")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

// === crawl_train TESTS ===

#[tokio::test]
async fn test_crawl_train_returns_stops_in_page_order() {
    let mock_server = MockServer::start().await;
    let stations = ["Beijing", "Tianjin", "Jinan", "Nanjing", "Shanghai"];
    mount_page(&mock_server, "G1", timetable_page(&stations)).await;

    let record = crawler(&mock_server).crawl_train("G1").await.unwrap();

    assert_eq!(record.train, "G1");
    assert_eq!(record.stations, stations);
}

#[tokio::test]
async fn test_crawl_train_decodes_gbk_page() {
    let mock_server = MockServer::start().await;

    let mut body = b"<html><body><table><tr><td>1</td><td><a>".to_vec();
    body.extend_from_slice(&[0xb1, 0xb1, 0xbe, 0xa9, 0xc4, 0xcf]); // 北京南
    body.extend_from_slice(b"</a></td></tr><tr><td>2</td><td><a>");
    body.extend_from_slice(&[0xc9, 0xcf, 0xba, 0xa3]); // 上海
    body.extend_from_slice(b"</a></td></tr></table></body></html>");

    Mock::given(method("GET"))
        .and(path("/huoche/checi/G7.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&mock_server)
        .await;

    let record = crawler(&mock_server).crawl_train("G7").await.unwrap();
    assert_eq!(record.stations, vec!["北京南", "上海"]);
}

#[tokio::test]
async fn test_crawl_train_missing_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = crawler(&mock_server).crawl_train("G404").await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_crawl_train_page_without_stop_list() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "K9",
        "<html><body><p>No such train</p></body></html>".to_string(),
    )
    .await;

    assert!(crawler(&mock_server).crawl_train("K9").await.is_err());
}

#[tokio::test]
async fn test_crawl_train_unreachable_host() {
    let crawler = RouteCrawler::new("http://127.0.0.1:9".to_string(), Duration::from_secs(2)).unwrap();
    assert!(crawler.crawl_train("G1").await.is_err());
}

// === crawl_batch TESTS ===

#[tokio::test]
async fn test_crawl_batch_keeps_going_after_failures() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "D1", timetable_page(&["A", "B"])).await;
    mount_page(&mock_server, "D3", timetable_page(&["C", "D", "E"])).await;
    mount_page(
        &mock_server,
        "D4",
        "<html><body><pre>1 [F\n2 [G]</pre></body></html>".to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/huoche/checi/D2.htm"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawler(&mock_server)
        .crawl_batch(&["D1", "D2", "D3", "D4"])
        .await;

    assert_eq!(report.lines(), vec!["D1:A,B", "D3:C,D,E"]);
    assert_eq!(report.failed, vec!["D2", "D4"]);
}

#[tokio::test]
async fn test_crawl_batch_end_to_end_bracketed_page() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "G1",
        "<html><body><pre>G1\n1 [Beijing]\n2 [Shanghai]\n3 [Nanjing]\n</pre></body></html>"
            .to_string(),
    )
    .await;

    let report = crawler(&mock_server).crawl_batch(&["G1"]).await;

    assert_eq!(report.lines(), vec!["G1:Beijing,Shanghai,Nanjing"]);
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn test_crawl_batch_empty_input() {
    let mock_server = MockServer::start().await;
    let report = crawler(&mock_server).crawl_batch::<&str>(&[]).await;

    assert!(report.trains.is_empty());
    assert!(report.failed.is_empty());
}
