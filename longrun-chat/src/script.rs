//! The canned conversation: responses played back round-robin, the product
//! link attached to the final one, and the landing-page prompts.
use crate::message::ProductLink;
use thiserror::Error;
use url::Url;

pub const DEFAULT_HEADING: &str = "What are you looking to achieve?";

pub const DEFAULT_SUGGESTIONS: [&str; 3] = [
    "Running a marathon",
    "Building muscle",
    "Improving sports performance",
];

pub const DEFAULT_RESPONSES: [&str; 4] = [
    "How many runs per week are you doing for training?",
    "Nice consistency. How long is your longest run, and are you training in hot conditions?",
    "Long efforts in the heat mean losing a lot of sodium through sweat. Are you replacing electrolytes during your runs?",
    "Based on your training, I'd recommend starting with our Ultra Electrolytes Discovery Pack to stay hydrated For the Long Run.",
];

pub const PRODUCT_LABEL: &str = "Ultra Electrolytes Discovery Pack";
pub const PRODUCT_URL: &str =
    "https://puresport.co/products/ultra-electrolytes-discovery-pack-2x15-pack?variant=45319763099786";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script needs at least one response")]
    NoResponses,
    #[error("response {0} is blank")]
    BlankResponse(usize),
    #[error("final response does not mention the product link label {0:?}")]
    MissingLinkLabel(String),
    #[error("product link label is blank")]
    BlankLinkLabel,
    #[error("invalid product link url {url:?}: {reason}")]
    InvalidLinkUrl { url: String, reason: String },
}

#[derive(Clone, Debug)]
pub struct Script {
    heading: String,
    suggestions: Vec<String>,
    responses: Vec<String>,
    link: ProductLink,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            suggestions: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            responses: DEFAULT_RESPONSES.iter().map(|s| s.to_string()).collect(),
            link: ProductLink {
                label: PRODUCT_LABEL.to_string(),
                url: PRODUCT_URL.to_string(),
            },
        }
    }
}

impl Script {
    /// Build a validated script. The final response must contain the link label
    /// verbatim so it can be split into lead-in and trailing text.
    pub fn new(responses: Vec<String>, link: ProductLink) -> Result<Self, ScriptError> {
        if responses.is_empty() {
            return Err(ScriptError::NoResponses);
        }
        if let Some(idx) = responses.iter().position(|r| r.trim().is_empty()) {
            return Err(ScriptError::BlankResponse(idx));
        }
        if link.label.trim().is_empty() {
            return Err(ScriptError::BlankLinkLabel);
        }
        if let Err(e) = Url::parse(&link.url) {
            return Err(ScriptError::InvalidLinkUrl {
                url: link.url,
                reason: e.to_string(),
            });
        }
        let last = &responses[responses.len() - 1];
        if !last.contains(&link.label) {
            return Err(ScriptError::MissingLinkLabel(link.label));
        }

        let defaults = Script::default();
        Ok(Self {
            heading: defaults.heading,
            suggestions: defaults.suggestions,
            responses,
            link,
        })
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn response(&self, index: usize) -> &str {
        &self.responses[index % self.responses.len()]
    }

    pub fn link(&self) -> &ProductLink {
        &self.link
    }

    pub fn is_product_index(&self, index: usize) -> bool {
        index == self.responses.len() - 1
    }

    /// Split a response around the first occurrence of the link label.
    pub fn split_product<'a>(&self, response: &'a str) -> Option<(&'a str, &'a str)> {
        response.split_once(self.link.label.as_str())
    }
}
