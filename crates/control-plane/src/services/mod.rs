// Services layer for business logic
// Services own business logic, calling storage through the core traits

pub mod bootstrap;
pub mod seed;
pub mod snippet;

pub use bootstrap::{ensure_admin_user, issue_bootstrap_api_key};
pub use seed::{
    seed_sample_snippets, seed_sample_user, SAMPLE_PASSWORD, SAMPLE_SNIPPETS, SAMPLE_USERNAME,
};
pub use snippet::SnippetService;
