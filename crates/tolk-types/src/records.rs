use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids;
use crate::TranslationSource;

/// Token accounting reported by the upstream provider.
///
/// Any field may be absent when the provider did not report usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    pub fn is_reported(&self) -> bool {
        self.prompt_tokens.is_some() || self.completion_tokens.is_some() || self.total_tokens.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedText {
    pub text: String,
    #[serde(default)]
    pub tokens: TokenUsage,
}

impl TranslatedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: TokenUsage::default(),
        }
    }

    pub fn with_tokens(mut self, tokens: TokenUsage) -> Self {
        self.tokens = tokens;
        self
    }
}

/// Per-source token sums across a set of translations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Translations counted, reported or not.
    pub translations: u64,
    /// Translations whose provider reported no usage at all.
    pub unreported: u64,
}

impl UsageTotals {
    pub fn add(&mut self, usage: &TokenUsage) {
        self.translations += 1;
        if !usage.is_reported() {
            self.unreported += 1;
            return;
        }
        self.prompt_tokens += usage.prompt_tokens.unwrap_or(0);
        self.completion_tokens += usage.completion_tokens.unwrap_or(0);
        self.total_tokens += usage.total_tokens.unwrap_or(0);
    }

    pub fn merge(&mut self, other: &UsageTotals) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.translations += other.translations;
        self.unreported += other.unreported;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    #[serde(deserialize_with = "ids::id")]
    pub id: String,
    /// 0 is the opening question, replies count up from 1.
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(default, deserialize_with = "ids::opt_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub username: String,
    #[serde(rename = "message")]
    pub original_message: String,
    #[serde(rename = "message_english", default)]
    pub translations: BTreeMap<TranslationSource, TranslatedText>,
}

impl PostRecord {
    pub fn is_question(&self) -> bool {
        self.position == 0
    }

    pub fn heading(&self) -> String {
        if self.is_question() {
            "Question".to_string()
        } else {
            format!("Reply {}", self.position)
        }
    }

    pub fn translation(&self, source: &str) -> Option<&TranslatedText> {
        self.translations.get(source)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    #[serde(deserialize_with = "ids::id")]
    pub id: String,
    pub title: String,
    #[serde(rename = "title_english", default)]
    pub title_translations: BTreeMap<TranslationSource, TranslatedText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_post_date: Option<String>,
    #[serde(default, deserialize_with = "ids::opt_id", skip_serializing_if = "Option::is_none")]
    pub forum_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum_title: Option<String>,
    #[serde(default)]
    pub posts: Vec<PostRecord>,
}

impl ThreadRecord {
    /// Label used by the thread selector.
    pub fn display_title(&self) -> String {
        format!("{} - {}", self.id, self.title)
    }

    /// Every source that translated the title or any post, sorted.
    pub fn sources(&self) -> Vec<TranslationSource> {
        let mut sources: BTreeSet<&TranslationSource> = self.title_translations.keys().collect();
        for post in &self.posts {
            sources.extend(post.translations.keys());
        }
        sources.into_iter().cloned().collect()
    }

    /// Like [`ThreadRecord::sources`], but limited to the configured source set.
    /// An empty `allowed` set means no restriction.
    pub fn sources_within(&self, allowed: &[TranslationSource]) -> Vec<TranslationSource> {
        let mut sources = self.sources();
        if !allowed.is_empty() {
            sources.retain(|s| allowed.contains(s));
        }
        sources
    }

    pub fn post(&self, post_id: &str) -> Option<&PostRecord> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn token_usage(&self) -> BTreeMap<TranslationSource, UsageTotals> {
        let mut totals: BTreeMap<TranslationSource, UsageTotals> = BTreeMap::new();
        let all = self
            .title_translations
            .iter()
            .chain(self.posts.iter().flat_map(|p| p.translations.iter()));
        for (source, translated) in all {
            totals.entry(source.clone()).or_default().add(&translated.tokens);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thread() -> ThreadRecord {
        serde_json::from_value(json!({
            "id": 42,
            "title": "Hur byter jag däck?",
            "title_english": {
                "gpt-4o": {"text": "How do I change tyres?", "tokens": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}},
                "deepseek-chat": {"text": "How do I change tires?", "tokens": {}}
            },
            "forum_id": 7,
            "posts": [
                {
                    "id": 100, "position": 0, "user_id": 9, "username": "kalle",
                    "message": "Hjälp",
                    "message_english": {
                        "gpt-4o": {"text": "Help", "tokens": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}},
                        "gemini-2.0-flash-exp": {"text": "Help!"}
                    }
                },
                {
                    "id": "101", "position": 2, "username": "olle",
                    "message": "Ring en verkstad",
                    "message_english": {}
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_numeric_and_string_ids_normalise() {
        let t = thread();
        assert_eq!(t.id, "42");
        assert_eq!(t.forum_id.as_deref(), Some("7"));
        assert_eq!(t.posts[0].id, "100");
        assert_eq!(t.posts[0].user_id.as_deref(), Some("9"));
        assert_eq!(t.posts[1].id, "101");
        assert_eq!(t.posts[1].user_id, None);
    }

    #[test]
    fn test_sources_union_is_sorted() {
        let t = thread();
        assert_eq!(
            t.sources(),
            vec!["deepseek-chat", "gemini-2.0-flash-exp", "gpt-4o"]
        );
        let allowed = vec!["gpt-4o".to_string(), "claude".to_string()];
        assert_eq!(t.sources_within(&allowed), vec!["gpt-4o"]);
        assert_eq!(t.sources_within(&[]).len(), 3);
    }

    #[test]
    fn test_headings() {
        let t = thread();
        assert_eq!(t.display_title(), "42 - Hur byter jag däck?");
        assert_eq!(t.posts[0].heading(), "Question");
        assert_eq!(t.posts[1].heading(), "Reply 2");
        assert!(t.posts[1].translation("gpt-4o").is_none());
    }

    #[test]
    fn test_token_usage_skips_unreported() {
        let usage = thread().token_usage();

        let gpt = usage["gpt-4o"];
        assert_eq!(gpt.total_tokens, 19);
        assert_eq!(gpt.prompt_tokens, 13);
        assert_eq!(gpt.translations, 2);
        assert_eq!(gpt.unreported, 0);

        let deepseek = usage["deepseek-chat"];
        assert_eq!(deepseek.total_tokens, 0);
        assert_eq!(deepseek.unreported, 1);

        let gemini = usage["gemini-2.0-flash-exp"];
        assert_eq!(gemini.translations, 1);
        assert_eq!(gemini.unreported, 1);
    }
}
