//! Concurrency tests: parallel requests across routes resolve independently.

use std::time::{Duration, Instant};

use futures_util::future::join_all;
use goal_gateway::config::{GatewayConfig, RouteConfig};
use serde_json::Value;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_requests_to_distinct_routes() {
    const ROUTES: usize = 8;
    const REQUESTS_PER_ROUTE: usize = 25;

    let names: Vec<&'static str> = (0..ROUTES)
        .map(|i| &*Box::leak(format!("svc-{i}").into_boxed_str()))
        .collect();

    let mut upstreams = Vec::new();
    let mut config = GatewayConfig::empty();
    for (i, name) in names.iter().enumerate() {
        upstreams.push((*name, common::start_echo_backend(*name).await));
        config
            .routes
            .push(RouteConfig::new(*name, [format!("/api/r{i}/**")], *name));
    }
    let config = common::with_upstreams(config, &upstreams);
    let (gateway, shutdown) = common::start_gateway(config).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let start = Instant::now();

    let tasks = (0..ROUTES).flat_map(|route| {
        let client = client.clone();
        (0..REQUESTS_PER_ROUTE).map(move |n| {
            let client = client.clone();
            tokio::spawn(async move {
                let path = format!("/api/r{route}/item/{n}");
                let echo: Value = client
                    .get(format!("http://{gateway}{path}"))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                (route, path, echo)
            })
        })
    });

    let results = join_all(tasks).await;
    let elapsed = start.elapsed();

    assert_eq!(results.len(), ROUTES * REQUESTS_PER_ROUTE);
    for result in results {
        let (route, path, echo) = result.unwrap();
        assert_eq!(echo["service"], format!("svc-{route}"), "{path}");
        assert_eq!(echo["path"], path);
    }

    println!(
        "{} requests across {} routes in {:?}",
        ROUTES * REQUESTS_PER_ROUTE,
        ROUTES,
        elapsed
    );
    assert!(elapsed < Duration::from_secs(30));

    shutdown.trigger();
}
