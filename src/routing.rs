//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    csv_import::import_transactions_endpoint,
    endpoints,
    summary::get_summary_endpoint,
    transaction::{
        bulk_create_transactions_endpoint, create_transaction_endpoint,
        delete_all_transactions_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// CORS is left wide open so that a browser client served from another origin
/// can call the API.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint)
                .post(create_transaction_endpoint)
                .delete(delete_all_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_BULK,
            post(bulk_create_transactions_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS_IMPORT,
            post(import_transactions_endpoint),
        )
        .route(endpoints::TRANSACTIONS_SUMMARY, get(get_summary_endpoint))
        .route(endpoints::COFFEE, get(get_coffee))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{AppState, Transaction, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory");
        let state = AppState::new(db_connection).expect("Could not create app state");

        TestServer::new(build_router(state)).expect("Could not create test server")
    }

    #[tokio::test]
    async fn coffee_route_responds_with_teapot() {
        let server = get_test_server();

        let response = server.get(endpoints::COFFEE).await;

        response.assert_status(StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_route_responds_with_not_found() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn transactions_round_trip() {
        let server = get_test_server();

        server
            .post(endpoints::TRANSACTIONS)
            .content_type("application/json")
            .json(&json!({
                "text": "Salary",
                "amount": 5000.0,
                "type": "credit",
            }))
            .await
            .assert_status_ok();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].text, "Salary");

        server
            .delete(endpoints::TRANSACTIONS)
            .await
            .assert_status_ok();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions, vec![]);
    }
}
