use serde::{Deserialize, Deserializer};
use serde_json::Value;

// --- Requests ---

/// Query parameters for one `/search.json` call. The API key is added by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    params: Vec<(&'static str, String)>,
}

impl SearchRequest {
    fn with_engine(engine: &str, query: &str) -> Self {
        Self {
            params: vec![("engine", engine.to_string()), ("q", query.to_string())],
        }
    }

    /// Standard Google web search (organic results).
    pub fn google(query: &str) -> Self {
        Self::with_engine("google", query)
    }

    /// Google Maps search (`local_results` holds places).
    pub fn google_maps(query: &str) -> Self {
        Self::with_engine("google_maps", query)
    }

    /// Google Local Finder, i.e. the `tbm=lcl` vertical of the web engine.
    pub fn local_finder(query: &str) -> Self {
        Self::with_engine("google", query).set("tbm", "lcl")
    }

    pub fn location(self, location: &str) -> Self {
        self.set("location", location)
    }

    pub fn gl(self, gl: &str) -> Self {
        self.set("gl", gl)
    }

    pub fn hl(self, hl: &str) -> Self {
        self.set("hl", hl)
    }

    pub fn num(self, num: u32) -> Self {
        self.set("num", &num.to_string())
    }

    pub fn start(self, start: u32) -> Self {
        self.set("start", &start.to_string())
    }

    pub fn zoom(self, zoom: u8) -> Self {
        self.set("z", &zoom.to_string())
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    fn set(mut self, key: &'static str, value: &str) -> Self {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.params.push((key, value.to_string())),
        }
        self
    }
}

// --- Responses ---

/// The subset of a SerpApi payload the ranking pipeline reads.
///
/// One type serves every engine, so fields whose shape differs between
/// engines are read leniently rather than failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    /// Places from Maps or Local Finder. The web engine reports its map pack
    /// as `{"places": [...]}`; that is unwrapped, and any other shape is empty.
    #[serde(default, deserialize_with = "lenient_places")]
    pub local_results: Vec<LocalResult>,
    #[serde(default, deserialize_with = "lenient_message")]
    pub error: Option<String>,
}

/// A single organic web result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganicResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: Option<String>,
}

/// A single Maps or Local Finder place.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
}

/// Upstream occasionally emits numbers, nulls or objects where a string is
/// expected. Anything that isn't a JSON string becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// A non-string `error` is still an error; keep its JSON text as the message.
fn lenient_message<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_places<'de, D>(deserializer: D) -> std::result::Result<Vec<LocalResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut pack)) => match pack.remove("places") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    // Every listing keeps its slot, even one that isn't an object.
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value::<LocalResult>(item).unwrap_or_default())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_finder_sets_tbm() {
        let req = SearchRequest::local_finder("cafe").zoom(14);
        assert_eq!(req.param("engine"), Some("google"));
        assert_eq!(req.param("tbm"), Some("lcl"));
        assert_eq!(req.param("z"), Some("14"));
    }

    #[test]
    fn setters_replace_existing_values() {
        let req = SearchRequest::google("cafe").start(0).start(20);
        let starts: Vec<_> = req.params().iter().filter(|(k, _)| *k == "start").collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(req.param("start"), Some("20"));
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let resp: SearchResponse = serde_json::from_str(r#"{"search_metadata": {}}"#).unwrap();
        assert!(resp.organic_results.is_empty());
        assert!(resp.local_results.is_empty());
        assert!(resp.error.is_none());
    }

    #[test]
    fn non_string_fields_become_none() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{
                "organic_results": [{"link": 42}, {"link": null}, {"title": "no link"}],
                "local_results": [{"title": ["x"], "website": {"url": "a.com"}}]
            }"#,
        )
        .unwrap();

        assert!(resp.organic_results.iter().all(|r| r.link.is_none()));
        assert_eq!(resp.organic_results[2].title.as_deref(), Some("no link"));
        assert!(resp.local_results[0].title.is_none());
        assert!(resp.local_results[0].website.is_none());
    }

    #[test]
    fn web_engine_map_pack_is_unwrapped() {
        let resp: SearchResponse = serde_json::from_str(
            r#"{
                "local_results": {
                    "places": [{"position": 1, "title": "Om Kitchen"}, "junk"],
                    "more_locations_link": "https://www.google.com/search?tbm=lcl"
                },
                "organic_results": [{"position": "1", "link": "https://omkitchen.in/"}]
            }"#,
        )
        .unwrap();

        assert_eq!(resp.local_results.len(), 2);
        assert_eq!(resp.local_results[0].title.as_deref(), Some("Om Kitchen"));
        assert!(resp.local_results[1].title.is_none());
        assert_eq!(
            resp.organic_results[0].link.as_deref(),
            Some("https://omkitchen.in/")
        );
    }

    #[test]
    fn unexpected_local_results_shape_is_empty() {
        for body in [
            r#"{"local_results": {"more_locations_link": "x"}}"#,
            r#"{"local_results": "none"}"#,
            r#"{"local_results": null}"#,
        ] {
            let resp: SearchResponse = serde_json::from_str(body).unwrap();
            assert!(resp.local_results.is_empty(), "body: {body}");
        }
    }

    #[test]
    fn structured_error_keeps_its_text() {
        let resp: SearchResponse =
            serde_json::from_str(r#"{"error": {"code": 429, "message": "slow down"}}"#).unwrap();
        assert!(resp.error.unwrap().contains("slow down"));

        let resp: SearchResponse = serde_json::from_str(r#"{"error": null}"#).unwrap();
        assert!(resp.error.is_none());
    }
}
