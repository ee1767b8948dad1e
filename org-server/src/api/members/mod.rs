//! Member API Module
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /api/members | GET | search (`?q=&department_id=`) |
//! | /api/members | POST | create |
//! | /api/members/{id} | GET | profile with manager chain and reports |
//! | /api/members/{id} | PUT | partial update |
//! | /api/members/{id} | DELETE | delete, promoting direct reports |
//! | /api/members/{id}/reports | GET | direct reports |

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

/// Member router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/members", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/reports", get(handler::reports))
}
