use serde::{Deserialize, Serialize};

use crate::error::ParseUpdateError;

pub const SLIDER_DEFAULT: i64 = 50;
pub const TEMPO_DEFAULT: i64 = 120;

macro_rules! preference_field {
    ($name:ident { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Key used for this field in the request body and in the saved record.
            pub fn wire_name(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_wire_name(name: &str) -> Option<Self> {
                match name {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

preference_field!(TextField {
    Artist => ("artist", "Favorite Artist"),
    Genre => ("genre", "Genre"),
    Emotion => ("emotion", "Emotion/Mood"),
});

preference_field!(NumericField {
    Popularity => ("popularity", "Popularity"),
    Energy => ("energy", "Energy"),
    Danceability => ("danceability", "Danceability"),
    Positiveness => ("positiveness", "Positiveness"),
    Speechiness => ("speechiness", "Speechiness"),
    Liveness => ("liveness", "Liveness"),
    Acousticness => ("acousticness", "Acousticness"),
    Instrumentalness => ("instrumentalness", "Instrumentalness"),
    Tempo => ("tempo", "Tempo"),
});

preference_field!(ContextFlag {
    Party => ("good_for_party", "Party"),
    WorkStudy => ("good_for_work_study", "Work/Study"),
    Exercise => ("good_for_exercise", "Exercise"),
    Running => ("good_for_running", "Running"),
    Driving => ("good_for_driving", "Driving"),
    SocialGatherings => ("good_for_social_gatherings", "Social Gatherings"),
    MorningRoutine => ("good_for_morning_routine", "Morning Routine"),
    MeditationStretching => ("good_for_meditation_stretching", "Meditation"),
});

impl NumericField {
    pub fn default_value(self) -> i64 {
        match self {
            NumericField::Tempo => TEMPO_DEFAULT,
            _ => SLIDER_DEFAULT,
        }
    }
}

/// Every user-tunable recommendation parameter.
///
/// `#[serde(default)]` backfills keys missing from a saved record, so a value read
/// back from storage is never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceInput {
    pub artist: String,
    pub genre: String,
    pub emotion: String,

    pub popularity: i64,
    pub energy: i64,
    pub danceability: i64,
    pub positiveness: i64,
    pub speechiness: i64,
    pub liveness: i64,
    pub acousticness: i64,
    pub instrumentalness: i64,

    pub tempo: i64,

    pub good_for_party: bool,
    pub good_for_work_study: bool,
    pub good_for_exercise: bool,
    pub good_for_running: bool,
    pub good_for_driving: bool,
    pub good_for_social_gatherings: bool,
    pub good_for_morning_routine: bool,
    pub good_for_meditation_stretching: bool,
}

impl Default for PreferenceInput {
    fn default() -> Self {
        Self {
            artist: String::new(),
            genre: String::new(),
            emotion: String::new(),
            popularity: NumericField::Popularity.default_value(),
            energy: NumericField::Energy.default_value(),
            danceability: NumericField::Danceability.default_value(),
            positiveness: NumericField::Positiveness.default_value(),
            speechiness: NumericField::Speechiness.default_value(),
            liveness: NumericField::Liveness.default_value(),
            acousticness: NumericField::Acousticness.default_value(),
            instrumentalness: NumericField::Instrumentalness.default_value(),
            tempo: NumericField::Tempo.default_value(),
            good_for_party: false,
            good_for_work_study: false,
            good_for_exercise: false,
            good_for_running: false,
            good_for_driving: false,
            good_for_social_gatherings: false,
            good_for_morning_routine: false,
            good_for_meditation_stretching: false,
        }
    }
}

impl PreferenceInput {
    pub fn flag(&self, flag: ContextFlag) -> bool {
        match flag {
            ContextFlag::Party => self.good_for_party,
            ContextFlag::WorkStudy => self.good_for_work_study,
            ContextFlag::Exercise => self.good_for_exercise,
            ContextFlag::Running => self.good_for_running,
            ContextFlag::Driving => self.good_for_driving,
            ContextFlag::SocialGatherings => self.good_for_social_gatherings,
            ContextFlag::MorningRoutine => self.good_for_morning_routine,
            ContextFlag::MeditationStretching => self.good_for_meditation_stretching,
        }
    }

    fn numeric_mut(&mut self, field: NumericField) -> &mut i64 {
        match field {
            NumericField::Popularity => &mut self.popularity,
            NumericField::Energy => &mut self.energy,
            NumericField::Danceability => &mut self.danceability,
            NumericField::Positiveness => &mut self.positiveness,
            NumericField::Speechiness => &mut self.speechiness,
            NumericField::Liveness => &mut self.liveness,
            NumericField::Acousticness => &mut self.acousticness,
            NumericField::Instrumentalness => &mut self.instrumentalness,
            NumericField::Tempo => &mut self.tempo,
        }
    }

    fn flag_mut(&mut self, flag: ContextFlag) -> &mut bool {
        match flag {
            ContextFlag::Party => &mut self.good_for_party,
            ContextFlag::WorkStudy => &mut self.good_for_work_study,
            ContextFlag::Exercise => &mut self.good_for_exercise,
            ContextFlag::Running => &mut self.good_for_running,
            ContextFlag::Driving => &mut self.good_for_driving,
            ContextFlag::SocialGatherings => &mut self.good_for_social_gatherings,
            ContextFlag::MorningRoutine => &mut self.good_for_morning_routine,
            ContextFlag::MeditationStretching => &mut self.good_for_meditation_stretching,
        }
    }

    /// Returns a copy with exactly one field replaced. Values are stored as given.
    pub fn with_update(&self, update: PreferenceUpdate) -> Self {
        let mut next = self.clone();
        match update {
            PreferenceUpdate::Text(TextField::Artist, value) => next.artist = value,
            PreferenceUpdate::Text(TextField::Genre, value) => next.genre = value,
            PreferenceUpdate::Text(TextField::Emotion, value) => next.emotion = value,
            PreferenceUpdate::Numeric(field, value) => *next.numeric_mut(field) = value,
            PreferenceUpdate::Flag(flag, value) => *next.flag_mut(flag) = value,
        }
        next
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceUpdate {
    Text(TextField, String),
    Numeric(NumericField, i64),
    Flag(ContextFlag, bool),
}

impl PreferenceUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            PreferenceUpdate::Text(field, _) => field.wire_name(),
            PreferenceUpdate::Numeric(field, _) => field.wire_name(),
            PreferenceUpdate::Flag(flag, _) => flag.wire_name(),
        }
    }

    /// Builds an update from a wire field name and a raw textual value.
    pub fn parse(field: &str, raw_value: &str) -> Result<Self, ParseUpdateError> {
        if let Some(text) = TextField::from_wire_name(field) {
            return Ok(PreferenceUpdate::Text(text, raw_value.to_string()));
        }

        if let Some(numeric) = NumericField::from_wire_name(field) {
            let value = raw_value
                .trim()
                .parse::<i64>()
                .map_err(|_| ParseUpdateError::InvalidNumber {
                    field: field.to_string(),
                    value: raw_value.to_string(),
                })?;
            return Ok(PreferenceUpdate::Numeric(numeric, value));
        }

        if let Some(flag) = ContextFlag::from_wire_name(field) {
            let value = match raw_value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => true,
                "false" | "no" | "off" | "0" => false,
                _ => {
                    return Err(ParseUpdateError::InvalidFlag {
                        field: field.to_string(),
                        value: raw_value.to_string(),
                    })
                }
            };
            return Ok(PreferenceUpdate::Flag(flag, value));
        }

        Err(ParseUpdateError::UnknownField(field.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_initial_values() {
        let prefs = PreferenceInput::default();
        assert_eq!(prefs.artist, "");
        assert_eq!(prefs.energy, 50);
        assert_eq!(prefs.tempo, 120);
        assert!(ContextFlag::ALL.iter().all(|flag| !prefs.flag(*flag)));
    }

    #[test]
    fn numeric_defaults_come_from_each_field() {
        let value = serde_json::to_value(PreferenceInput::default()).expect("serialize");
        for field in NumericField::ALL {
            assert_eq!(value[field.wire_name()], field.default_value());
        }
        assert_eq!(NumericField::Tempo.default_value(), TEMPO_DEFAULT);
    }

    #[test]
    fn serialized_keys_match_wire_names() {
        let value = serde_json::to_value(PreferenceInput::default()).expect("serialize");
        let object = value.as_object().expect("object");
        let expected = TextField::ALL.len() + NumericField::ALL.len() + ContextFlag::ALL.len();
        assert_eq!(object.len(), expected);
        for field in TextField::ALL {
            assert!(object.contains_key(field.wire_name()));
        }
        for field in NumericField::ALL {
            assert!(object.contains_key(field.wire_name()));
        }
        for flag in ContextFlag::ALL {
            assert!(object.contains_key(flag.wire_name()));
        }
    }

    #[test]
    fn partial_record_is_backfilled_with_defaults() {
        let prefs: PreferenceInput =
            serde_json::from_str(r#"{"artist":"Drake","energy":80}"#).expect("parse");
        assert_eq!(prefs.artist, "Drake");
        assert_eq!(prefs.energy, 80);
        assert_eq!(prefs.tempo, TEMPO_DEFAULT);
        assert_eq!(prefs.popularity, SLIDER_DEFAULT);
        assert!(!prefs.good_for_party);
    }

    #[test]
    fn with_update_touches_only_the_named_field() {
        let base = PreferenceInput::default();
        let next = base.with_update(PreferenceUpdate::Numeric(NumericField::Tempo, 140));
        assert_eq!(next.tempo, 140);
        assert_eq!(next.with_update(PreferenceUpdate::Numeric(NumericField::Tempo, 120)), base);
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let next = PreferenceInput::default()
            .with_update(PreferenceUpdate::Numeric(NumericField::Energy, 250));
        assert_eq!(next.energy, 250);
    }

    #[test]
    fn parses_updates_from_wire_names() {
        assert_eq!(
            PreferenceUpdate::parse("artist", "Drake").expect("text"),
            PreferenceUpdate::Text(TextField::Artist, "Drake".to_string())
        );
        assert_eq!(
            PreferenceUpdate::parse("tempo", " 140 ").expect("numeric"),
            PreferenceUpdate::Numeric(NumericField::Tempo, 140)
        );
        assert_eq!(
            PreferenceUpdate::parse("good_for_running", "yes").expect("flag"),
            PreferenceUpdate::Flag(ContextFlag::Running, true)
        );
        assert!(matches!(
            PreferenceUpdate::parse("tempo", "fast"),
            Err(ParseUpdateError::InvalidNumber { .. })
        ));
        assert!(matches!(
            PreferenceUpdate::parse("loudness", "3"),
            Err(ParseUpdateError::UnknownField(_))
        ));
    }
}
