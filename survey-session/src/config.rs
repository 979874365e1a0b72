use survey_session_types::ResponseSlug;
use url::form_urlencoded;

/// Default path of the page that views/edits a recorded response.
pub const DEFAULT_RESPONSE_PATH: &str = "/survey/response";

/// Default query parameter carrying the response slug.
pub const DEFAULT_SLUG_PARAM: &str = "slug";

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Privileged (owner) mode: fetch with a credential, never submit.
    pub preview: bool,

    /// Path the address is replaced with after a response is recorded.
    pub response_path: String,

    /// Query parameter that carries the slug in `response_path`.
    pub slug_param: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preview: false,
            response_path: DEFAULT_RESPONSE_PATH.to_string(),
            slug_param: DEFAULT_SLUG_PARAM.to_string(),
        }
    }
}

impl SessionConfig {
    /// Settings for an owner previewing a survey.
    pub fn preview() -> Self {
        Self {
            preview: true,
            ..Self::default()
        }
    }

    /// The address that resumes the response identified by `slug`.
    pub fn response_address(&self, slug: &ResponseSlug) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(&self.slug_param, slug.as_str())
            .finish();
        format!("{}?{}", self.response_path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_response_address() {
        let config = SessionConfig::default();
        assert_eq!(
            config.response_address(&ResponseSlug::new("R9")),
            "/survey/response?slug=R9"
        );
    }

    #[test]
    fn slug_is_query_encoded() {
        let config = SessionConfig {
            response_path: "/r".into(),
            slug_param: "id".into(),
            ..SessionConfig::default()
        };
        assert_eq!(
            config.response_address(&ResponseSlug::new("a b&c")),
            "/r?id=a+b%26c"
        );
    }
}
