use serde::Deserialize;

/// Origin prepended to every related-link href
pub const DEFAULT_BASE_ORIGIN: &str = "https://www.thesaigontimes.vn";

/// Database credentials read from the JSON credentials file
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub dbname: String,

    /// Location of the SQLite database file (defaults to `<dbname>.db`)
    #[serde(default)]
    pub path: Option<String>,
}

impl DatabaseConfig {
    /// Renders the store connection string
    ///
    /// Format: `user:password@tcp(host:port)/dbname?charset=utf8&parseTime=True&loc=Local`
    ///
    /// The SQLite store does not dial this string; it opens the file named by
    /// [`DatabaseConfig::database_path`]. Only the redacted form is logged.
    pub fn connection_string(&self) -> String {
        self.render_connection(&self.password)
    }

    /// Same as `connection_string` with the password masked, for logging
    pub fn redacted_connection_string(&self) -> String {
        self.render_connection("***")
    }

    fn render_connection(&self, password: &str) -> String {
        format!(
            "{}:{}@tcp({}:{})/{}?charset=utf8&parseTime=True&loc=Local",
            self.username, password, self.host, self.port, self.dbname
        )
    }

    /// Path of the SQLite database file backing the store
    pub fn database_path(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => format!("{}.db", self.dbname),
        }
    }
}

/// Harvest behaviour settings, read from an optional TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvestSettings {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// What happens to sibling tasks when one harvest task fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first task error
    #[default]
    Abort,

    /// Let every task finish and report failures at the end
    Collect,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Origin that relative related-link hrefs are appended to
    #[serde(rename = "base-origin", default = "default_base_origin")]
    pub base_origin: String,

    /// Maximum number of tasks running at once; 0 means one per link
    #[serde(rename = "max-concurrent-tasks", default)]
    pub max_concurrent_tasks: usize,

    #[serde(rename = "failure-policy", default)]
    pub failure_policy: FailurePolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_origin: default_base_origin(),
            max_concurrent_tasks: 0,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// CSS selectors for link discovery and field extraction
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    #[serde(rename = "related-links", default = "default_related_links")]
    pub related_links: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(rename = "created-date", default = "default_created_date")]
    pub created_date: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            related_links: default_related_links(),
            title: default_title(),
            author: default_author(),
            created_date: default_created_date(),
        }
    }
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

impl UserAgentConfig {
    /// Format: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

fn default_base_origin() -> String {
    DEFAULT_BASE_ORIGIN.to_string()
}

fn default_related_links() -> String {
    "#ctl00_cphContent_Article_LienQuan .NOtherTitle".to_string()
}

fn default_title() -> String {
    "#ctl00_cphContent_lblTitleHtml".to_string()
}

fn default_author() -> String {
    "#ctl00_cphContent_Lbl_Author".to_string()
}

fn default_created_date() -> String {
    "#ctl00_cphContent_lblCreateDate".to_string()
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
