use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tolk_types::VoteRecord;

/// Vote document: `{thread_id, post_id, model, user_ip, timestamp}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoVote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub thread_id: String,
    pub post_id: String,
    pub model: String,
    pub user_ip: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub timestamp: DateTime<Utc>,
}

/// One row of the `$group` by model aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelCount {
    #[serde(rename = "_id")]
    pub model: String,
    pub count: i64,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<VoteRecord> for MongoVote {
    fn from(vote: VoteRecord) -> Self {
        Self {
            id: None,
            thread_id: vote.thread_id,
            post_id: vote.post_id,
            model: vote.source,
            user_ip: vote.voter_identity,
            timestamp: vote.timestamp,
        }
    }
}

impl From<MongoVote> for VoteRecord {
    fn from(vote: MongoVote) -> Self {
        Self {
            thread_id: vote.thread_id,
            post_id: vote.post_id,
            source: vote.model,
            voter_identity: vote.user_ip,
            timestamp: vote.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn test_document_shape() {
        let vote = VoteRecord::new("42", "7", "gpt-4o", "203.0.113.5");
        let document = bson::to_document(&MongoVote::from(vote.clone())).unwrap();

        assert_eq!(document.get_str("thread_id").unwrap(), "42");
        assert_eq!(document.get_str("post_id").unwrap(), "7");
        assert_eq!(document.get_str("model").unwrap(), "gpt-4o");
        assert_eq!(document.get_str("user_ip").unwrap(), "203.0.113.5");
        assert!(document.get_datetime("timestamp").is_ok());
        assert!(!document.contains_key("_id"));
    }

    #[test]
    fn test_group_row_accepts_int32_counts() {
        let row: ModelCount = bson::from_document(doc! { "_id": "claude", "count": 3_i32 }).unwrap();
        assert_eq!(row.model, "claude");
        assert_eq!(row.count, 3);
    }
}
