mod handlers;
mod jobs;
mod routes;

pub use jobs::{BulkIssueRequest, BulkIssueResponse};
pub use routes::create_router;
