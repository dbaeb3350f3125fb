mod api;
mod oauth;
mod types;
mod utils;

use reqwest::{redirect::Policy, Client};

pub use api::*;
pub use oauth::*;
pub use types::*;

// 308 Resume Incomplete must reach the uploader, so redirects are not followed
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().redirect(Policy::none()).build()
}
