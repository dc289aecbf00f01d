//! Field codecs shared by the domain documents.
//!
//! Ids and timestamps are stored as strings, identical to their JSON form.
//! Timestamps are UTC with millisecond precision and sort chronologically as
//! text.
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct Product {
//!     #[serde(rename = "_id", with = "uuid_as_string")]
//!     id: Uuid,
//!     #[serde(with = "timestamp")]
//!     created_at: DateTime<Utc>,
//! }
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::Bson;
use uuid::Uuid;

/// Render a UUID the way it is stored, for use in filter documents.
pub fn uuid_to_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Render a timestamp the way it is stored, for use in `$set` documents.
pub fn timestamp_to_bson(at: &DateTime<Utc>) -> Bson {
    Bson::String(format_timestamp(at))
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub mod uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Uuid::parse_str(&raw).map_err(D::Error::custom)
    }
}

pub mod option_uuid_as_string {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(id: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Uuid>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| Uuid::parse_str(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::{doc, from_document, to_document};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stored {
        #[serde(rename = "_id", with = "uuid_as_string")]
        id: Uuid,
        #[serde(default, with = "option_uuid_as_string")]
        owner: Option<Uuid>,
        #[serde(with = "timestamp")]
        at: DateTime<Utc>,
    }

    fn sample() -> Stored {
        Stored {
            id: Uuid::now_v7(),
            owner: None,
            at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_bson_and_json_store_the_same_strings() {
        let stored = sample();
        let document = to_document(&stored).unwrap();
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), json["_id"]);
        assert_eq!(document.get_str("at").unwrap(), "2024-05-01T12:00:00.000Z");
        assert_eq!(json["at"], "2024-05-01T12:00:00.000Z");
        assert_eq!(document.get("_id"), Some(&uuid_to_bson(&stored.id)));
        assert_eq!(from_document::<Stored>(document).unwrap(), stored);
    }

    #[test]
    fn test_optional_uuid_round_trips_when_present() {
        let owner = Uuid::now_v7();
        let stored = Stored {
            owner: Some(owner),
            ..sample()
        };
        let document = to_document(&stored).unwrap();
        assert_eq!(document.get_str("owner").unwrap(), owner.to_string());

        let missing = doc! { "_id": stored.id.to_string(), "at": "2024-05-01T12:00:00.000Z" };
        assert_eq!(from_document::<Stored>(missing).unwrap().owner, None);
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = whole + chrono::Duration::milliseconds(1);
        assert!(format_timestamp(&whole) < format_timestamp(&later));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        let bad = doc! { "_id": "not-a-uuid", "at": "2024-05-01T12:00:00.000Z" };
        assert!(from_document::<Stored>(bad).is_err());
    }
}
