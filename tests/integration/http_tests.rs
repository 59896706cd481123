//! HTTP endpoints served by the exporter

use crate::common::ScriptedDriver;
use crate::common::fixtures::{AggregationFactory, MetricFactory};
use actix_web::{App, http::StatusCode, test, web};
use bson::doc;
use mongodb_query_exporter::config::Config;
use mongodb_query_exporter::core::collector::{Collector, CollectorConfig};
use mongodb_query_exporter::monitoring::metrics::query_counter_named;
use mongodb_query_exporter::server::AppState;
use mongodb_query_exporter::server::routes::configure_routes;

fn state() -> web::Data<AppState> {
    let driver = ScriptedDriver::new(vec![doc! { "total": 42 }]);
    let mut collector = Collector::new(CollectorConfig::default())
        .with_counter(query_counter_named("http_query_total").unwrap());
    collector.register_server("main", driver).unwrap();
    collector
        .register_aggregation(AggregationFactory::create(vec![MetricFactory::gauge("app_total")]))
        .unwrap();

    let config = Config {
        metrics_path: "/scrape".to_string(),
        ..Default::default()
    };
    web::Data::new(AppState::new(config, collector))
}

#[actix_web::test]
async fn test_metrics_endpoint() {
    let state = state();
    let path = state.metrics_path().to_string();
    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(|cfg| configure_routes(cfg, &path)),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/scrape").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains(r#"app_total{server="main"} 42"#));
    assert!(text.contains(
        r#"http_query_total{aggregation="aggregation_0",result="SUCCESS",server="main"} 1"#
    ));
}

#[actix_web::test]
async fn test_health_and_index() {
    let state = state();
    let path = state.metrics_path().to_string();
    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(|cfg| configure_routes(cfg, &path)),
    )
    .await;

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "OK");

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "Use the /scrape endpoint");

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
