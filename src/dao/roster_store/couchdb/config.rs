const DEFAULT_BASE_URL: &str = "http://localhost:5984";
const DEFAULT_DB: &str = "minigame_scoreboard";

/// Where the roster database lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server root, e.g. `http://localhost:5984`.
    pub base_url: String,
    /// Database holding the roster document.
    pub database: String,
    /// Basic auth username and password.
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    /// Read `COUCH_BASE_URL`, `COUCH_DB`, `COUCH_USERNAME` and `COUCH_PASSWORD`.
    ///
    /// Credentials are only used when both halves are set.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|value| !value.is_empty());

        Self {
            base_url: var("COUCH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            database: var("COUCH_DB").unwrap_or_else(|| DEFAULT_DB.into()),
            credentials: var("COUCH_USERNAME").zip(var("COUCH_PASSWORD")),
        }
    }
}
