use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use cryosearch::{CompoundSearcher, InMemoryStore};
use cryosearch_data::{DumpLayout, sample_records, write_sample_dump};
use cryosearch_server::{ServerConfig, create_app};
use serde_json::{Value, json};

fn create_test_server() -> TestServer {
    let store = InMemoryStore::new(sample_records().unwrap()).unwrap();
    let searcher = Arc::new(CompoundSearcher::new(Arc::new(store)));
    let app = create_app(searcher, ServerConfig::for_testing());
    TestServer::new(app).expect("Failed to create test server")
}

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_returns_envelope_and_cache_header() {
        let server = create_test_server();
        let response = server
            .post("/search")
            .json(&json!({"search_query": "glycerol"}))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("cache-control"),
            "s-maxage=3600, stale-while-revalidate"
        );
        let body: Value = response.json();
        assert_eq!(body["message"], "Success");
        assert_eq!(body["response"]["dym"], "");
        assert_eq!(body["response"]["search_results"][0]["hash"], "glyc02");
        assert!(body["response"]["search_results"][0].get("score").is_none());
    }

    #[tokio::test]
    async fn test_search_did_you_mean() {
        let server = create_test_server();
        let body: Value = server
            .post("/search")
            .json(&json!({"search_query": "dimethly sulfoxide"}))
            .await
            .json();
        assert_eq!(body["response"]["dym"], "Dimethyl Sulfoxide");
        assert_eq!(body["response"]["dym_href"], "Dimethyl%20Sulfoxide");
    }

    #[tokio::test]
    async fn test_search_validation_statuses() {
        let server = create_test_server();

        let response = server.post("/search").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": "Query is undefined or invalid"})
        );

        server
            .post("/search")
            .json(&json!({"search_query": 42}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/search")
            .json(&json!({"search_query": "a;b"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Invalid characters in query");

        server
            .post("/search")
            .json(&json!({"search_query": "gly%ZZcerol"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/search")
            .json(&json!({"search_query": "ab"}))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let server = create_test_server();
        let response = server
            .post("/search")
            .content_type("application/json")
            .text("{not json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["error"].is_string());
    }

    #[tokio::test]
    async fn test_quick_search() {
        let server = create_test_server();
        let response = server
            .post("/quickSearch")
            .json(&json!({"search_query": "glyc"}))
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!({
                "message": "Success",
                "results": [
                    {"name": "Glycerol", "hash": "glyc02"},
                    {"name": "Ethylene Glycol", "hash": "egly03"},
                    {"name": "Propylene Glycol", "hash": "prop06"}
                ]
            })
        );

        server
            .post("/quickSearch")
            .json(&json!({"search_query": "ab"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

mod catalog {
    use super::*;

    #[tokio::test]
    async fn test_article_lookup() {
        let server = create_test_server();

        let response = server.get("/article/sorb05").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["entry"]["name"], "Sorbitol");

        server
            .get("/article/nothere1")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/article/bad-hash")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_article_index() {
        let server = create_test_server();

        let response = server.get("/article/index?page=1&limit=100").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 6);
        assert_eq!(body["page"], 1);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(body["entries"].as_array().unwrap().len(), 6);
        assert_eq!(body["chemClassFilters"][0], "Diol");
        assert_eq!(body["cellTypeFilters"][0], "Embryo");

        server
            .get("/article/index?page=0")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/article/index?limit=abc")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_references() {
        let server = create_test_server();
        let body: Value = server.get("/references?search=lovelock").await.json();
        assert_eq!(body["totalItems"], 1);
        assert_eq!(body["currentPage"], 1);
        assert_eq!(body["references"][0]["article"][0]["hash"], "dmso01");
    }

    #[tokio::test]
    async fn test_filter() {
        let server = create_test_server();
        let response = server
            .post("/filter")
            .json(&json!({"filters": {"selectedClasses": ["Diol"], "GRAS": "false"}}))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["results"].as_array().unwrap().len(), 1);
        assert_eq!(body["results"][0]["hash"], "egly03");
        assert_eq!(body["results"][0]["sorted_cell_info"][0]["cellType"], "Embryo");
        assert_eq!(body["classes"].as_array().unwrap().len(), 5);
        assert_eq!(body["uniqueCellTypes"].as_array().unwrap().len(), 5);

        server
            .post("/filter")
            .json(&json!({"filters": {"weightRangeMin": "heavy"}}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_health() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({"status": "healthy", "backend": "in-memory", "records": 6})
    );
}

#[tokio::test]
async fn test_app_from_dump_file() {
    let dump = write_sample_dump(DumpLayout::NdJson).unwrap();
    let config = ServerConfig {
        data: dump.path().to_path_buf(),
        ..ServerConfig::for_testing()
    };
    let store = InMemoryStore::from_dump(&config.data).unwrap();
    let searcher = CompoundSearcher::with_config(Arc::new(store), config.searcher_config());
    let server = TestServer::new(create_app(Arc::new(searcher), config)).unwrap();

    let body: Value = server
        .post("/search")
        .json(&json!({"search_query": "56-81-5"}))
        .await
        .json();
    assert_eq!(body["response"]["search_results"][0]["hash"], "glyc02");
}
