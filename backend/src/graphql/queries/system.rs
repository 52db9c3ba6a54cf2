use super::prelude::*;

pub const API_INFO: &str = "This is the API of a Hackernews Clone";

#[derive(Default)]
pub struct SystemQueries;

#[Object]
impl SystemQueries {
    /// Short description of this API
    async fn info(&self) -> &'static str {
        API_INFO
    }
}
