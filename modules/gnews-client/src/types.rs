use serde::Deserialize;

/// Top-level response from the GNews search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

/// A single article as GNews returns it. Every field is optional upstream;
/// callers normalize through [`RawArticle::into_normalized`].
#[derive(Debug, Deserialize)]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "publishedAt", default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// An article with all fields present, missing values replaced by
/// empty strings.
#[derive(Debug, Clone)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: String,
    pub source: String,
}

impl RawArticle {
    pub fn into_normalized(self) -> NewsArticle {
        NewsArticle {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            source: self.source.and_then(|s| s.name).unwrap_or_default(),
        }
    }
}
