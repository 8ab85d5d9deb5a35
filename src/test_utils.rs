use crate::client::{ClientResponse, PageSource};
use crate::error::{ClientError, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub const INDEX_PATH: &str = "/senate/find-your-state-senator/9392";

pub const NOT_FOUND_PAGE: &str = r#"
<html><body>
<div id="content">
    <h1>Page Not Found</h1>
    <p>The page you are looking for does not exist.</p>
</div>
</body></html>
"#;

/// In-memory site: unknown paths get the legislature's "Page Not Found" page.
#[derive(Default)]
pub struct FixtureSite {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, html: &str) -> Self {
        self.pages.insert(path.to_string(), html.to_string());
        self
    }

    /// `path` fails as if the client had run out of retries.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    /// Every path fetched so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageSource for FixtureSite {
    async fn fetch(&self, path: &str) -> Result<ClientResponse> {
        self.requests.borrow_mut().push(path.to_string());
        if self.failing.contains(path) {
            return Err(ClientError::RetriesExhausted {
                url: path.to_string(),
                attempts: 4,
                reason: "status 503".to_string(),
            }
            .into());
        }
        Ok(match self.pages.get(path) {
            Some(html) => ClientResponse {
                status: 200,
                content: html.clone(),
            },
            None => ClientResponse {
                status: 404,
                content: NOT_FOUND_PAGE.to_string(),
            },
        })
    }
}

pub fn profile_page(email: &str, home_phone: &str, committee: &str) -> String {
    format!(
        r#"
        <html><body>
        <div id="content">
            <h1>Senator Profile</h1>
            <p><strong>Email</strong>: <a href="mailto:{email}">{email}</a></p>
            <p><b>Home</b>: {home_phone}</p>
            <p><strong>State House</strong>: (207) 287-1515</p>
            <p><strong>Committee Assignments</strong>:</p>
            <p>{committee}</p>
        </div>
        </body></html>
        "#
    )
}
