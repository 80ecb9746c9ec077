use serde::{Deserialize, Serialize};

use crate::domain::PreferenceInput;

pub const RECOMMEND_PATH: &str = "recommend";

/// Body of `POST /recommend`: every preference field at the top level plus `n`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(flatten)]
    pub preferences: PreferenceInput,
    pub n: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongMetadata {
    pub song: String,
    pub artist: String,
    pub genre: String,
    pub length: String,
    pub album: String,
    pub release_date: String,
    pub similar_song_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_song_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_song_3: Option<String>,
}

impl SongMetadata {
    /// Non-empty similar song names in the order the service listed them.
    pub fn similar_songs(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.similar_song_1.as_str())
            .chain(self.similar_song_2.as_deref())
            .chain(self.similar_song_3.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub metadata: SongMetadata,
    pub score: f64,
}

/// `data` is required: a body without it is not a recommendation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub data: Vec<Recommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_flattens_preferences_next_to_count() {
        let request = RecommendationRequest {
            preferences: PreferenceInput {
                artist: "Drake".to_string(),
                ..PreferenceInput::default()
            },
            n: 20,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["artist"], "Drake");
        assert_eq!(value["tempo"], 120);
        assert_eq!(value["good_for_party"], false);
        assert_eq!(value["n"], 20);
        assert!(value.get("preferences").is_none());
    }

    #[test]
    fn response_without_data_is_rejected() {
        assert!(serde_json::from_str::<RecommendationResponse>(r#"{"items":[]}"#).is_err());
        let empty: RecommendationResponse =
            serde_json::from_str(r#"{"data":[]}"#).expect("empty list is valid");
        assert!(empty.data.is_empty());
    }

    #[test]
    fn optional_similar_songs_are_skipped() {
        let metadata: SongMetadata = serde_json::from_str(
            r#"{"song":"One Dance","artist":"Drake","genre":"Hip Hop, Pop","length":"02:54",
                "album":"Views","release_date":"2016-04-05","similar_song_1":"Hotline Bling",
                "similar_song_3":""}"#,
        )
        .expect("parse");
        assert_eq!(metadata.similar_songs().collect::<Vec<_>>(), vec!["Hotline Bling"]);
    }
}
