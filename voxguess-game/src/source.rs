//! Question sources - local generation and the remote HTTP endpoint
//!
//! Both implementations satisfy one contract so the rest of the game
//! never cares where questions came from.

use crate::question::{Question, VoiceKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

/// Fixed catalog of AI clip identifiers, relative to the asset base.
pub const AI_CATALOG: &[&str] = &[
    "ai/clip_01.mp3",
    "ai/clip_02.mp3",
    "ai/clip_03.mp3",
    "ai/clip_04.mp3",
    "ai/clip_05.mp3",
    "ai/clip_06.mp3",
    "ai/clip_07.mp3",
    "ai/clip_08.mp3",
];

/// Fixed catalog of human clip identifiers, relative to the asset base.
pub const HUMAN_CATALOG: &[&str] = &[
    "human/clip_01.mp3",
    "human/clip_02.mp3",
    "human/clip_03.mp3",
    "human/clip_04.mp3",
    "human/clip_05.mp3",
    "human/clip_06.mp3",
    "human/clip_07.mp3",
    "human/clip_08.mp3",
];

/// Errors from fetching or generating a question batch
#[derive(Error, Debug)]
pub enum QuestionFetchError {
    #[error("question endpoint returned HTTP {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed question payload: {0}")]
    Payload(String),
}

/// A supplier of question batches
pub trait QuestionSource {
    /// Produce `count` questions in presentation order.
    fn fetch(&mut self, count: usize) -> Result<Vec<Question>, QuestionFetchError>;
}

/// In-process generator drawing from the fixed catalogs. No network.
pub struct LocalSource {
    asset_base: String,
    rng: StdRng,
}

impl LocalSource {
    pub fn new(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests.
    pub fn seeded(asset_base: impl Into<String>, seed: u64) -> Self {
        Self {
            asset_base: asset_base.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn asset_url(&self, id: &str) -> String {
        format!("{}/{}", self.asset_base.trim_end_matches('/'), id)
    }

    /// Draw `count` distinct identifiers from a catalog. Truncates to
    /// the catalog size when `count` exceeds it.
    fn draw<'a>(&mut self, catalog: &[&'a str], count: usize) -> Vec<&'a str> {
        let mut ids: Vec<&str> = catalog.to_vec();
        ids.shuffle(&mut self.rng);
        ids.truncate(count.min(catalog.len()));
        ids
    }
}

impl QuestionSource for LocalSource {
    fn fetch(&mut self, count: usize) -> Result<Vec<Question>, QuestionFetchError> {
        let mut ai_count = count / 2;
        let mut human_count = count / 2;
        if count % 2 == 1 {
            // Odd round count: the extra trial goes to either side.
            if self.rng.gen_bool(0.5) {
                ai_count += 1;
            } else {
                human_count += 1;
            }
        }

        let mut questions: Vec<Question> = Vec::with_capacity(count);
        for id in self.draw(AI_CATALOG, ai_count) {
            questions.push(Question {
                id: 0,
                kind: VoiceKind::Ai,
                audio_url: self.asset_url(id),
                video_url: None,
            });
        }
        for id in self.draw(HUMAN_CATALOG, human_count) {
            questions.push(Question {
                id: 0,
                kind: VoiceKind::Human,
                audio_url: self.asset_url(id),
                video_url: None,
            });
        }

        // Shuffle so the AI/HUMAN order is unpredictable, then number
        // the result 1..n the way the server does.
        questions.shuffle(&mut self.rng);
        for (idx, q) in questions.iter_mut().enumerate() {
            q.id = idx as u32 + 1;
        }
        Ok(questions)
    }
}

/// Remote endpoint: `GET {base}/api/questions?count={n}`
pub struct RemoteSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl QuestionSource for RemoteSource {
    fn fetch(&mut self, count: usize) -> Result<Vec<Question>, QuestionFetchError> {
        let url = format!(
            "{}/api/questions?count={}",
            self.base_url.trim_end_matches('/'),
            count
        );
        tracing::debug!(%url, "fetching questions");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| QuestionFetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestionFetchError::Status(status.as_u16()));
        }

        let payload: RemotePayload = response
            .json()
            .map_err(|e| QuestionFetchError::Payload(e.to_string()))?;
        map_payload(payload)
    }
}

/// Wire shape of the question endpoint response
#[derive(Debug, Deserialize)]
struct RemotePayload {
    questions: Vec<RemoteQuestion>,
}

#[derive(Debug, Deserialize)]
struct RemoteQuestion {
    #[serde(default)]
    id: Option<u32>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "audioUrl")]
    audio_url: String,
    #[serde(rename = "videoUrl", default)]
    video_url: Option<String>,
    // Sent by the server, unused here.
    #[serde(default)]
    #[allow(dead_code)]
    name: Option<String>,
}

fn map_payload(payload: RemotePayload) -> Result<Vec<Question>, QuestionFetchError> {
    payload
        .questions
        .into_iter()
        .enumerate()
        .map(|(idx, q)| {
            let kind = match q.kind.as_str() {
                "AI" => VoiceKind::Ai,
                "HUMAN" => VoiceKind::Human,
                other => {
                    return Err(QuestionFetchError::Payload(format!(
                        "unknown question type {other:?}"
                    )))
                }
            };
            Ok(Question {
                id: q.id.unwrap_or(idx as u32 + 1),
                kind,
                audio_url: q.audio_url,
                video_url: q.video_url,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(questions: &[Question]) -> (usize, usize) {
        let ai = questions
            .iter()
            .filter(|q| q.kind == VoiceKind::Ai)
            .count();
        (ai, questions.len() - ai)
    }

    #[test]
    fn test_even_split() {
        let mut source = LocalSource::seeded("assets", 7);
        let questions = source.fetch(6).unwrap();
        assert_eq!(questions.len(), 6);
        assert_eq!(counts(&questions), (3, 3));
    }

    #[test]
    fn test_odd_split_differs_by_one() {
        let mut source = LocalSource::seeded("assets", 11);
        let questions = source.fetch(7).unwrap();
        assert_eq!(questions.len(), 7);
        let (ai, human) = counts(&questions);
        assert_eq!(ai + human, 7);
        assert_eq!((ai as i64 - human as i64).abs(), 1);
    }

    #[test]
    fn test_no_duplicates_within_category() {
        let mut source = LocalSource::seeded("assets", 3);
        let questions = source.fetch(8).unwrap();
        let mut ai_urls: Vec<&str> = questions
            .iter()
            .filter(|q| q.kind == VoiceKind::Ai)
            .map(|q| q.audio_url.as_str())
            .collect();
        let before = ai_urls.len();
        ai_urls.sort();
        ai_urls.dedup();
        assert_eq!(ai_urls.len(), before);
    }

    #[test]
    fn test_oversized_request_truncates_to_catalog() {
        let mut source = LocalSource::seeded("assets", 5);
        let questions = source.fetch(100).unwrap();
        // Both categories are capped at their catalog size.
        assert_eq!(questions.len(), AI_CATALOG.len() + HUMAN_CATALOG.len());
        let (ai, human) = counts(&questions);
        assert_eq!(ai, AI_CATALOG.len());
        assert_eq!(human, HUMAN_CATALOG.len());
    }

    #[test]
    fn test_ids_are_sequential_after_shuffle() {
        let mut source = LocalSource::seeded("assets", 9);
        let questions = source.fetch(5).unwrap();
        let ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_asset_urls_join_cleanly() {
        let mut source = LocalSource::seeded("https://cdn.example.com/clips/", 1);
        let questions = source.fetch(2).unwrap();
        for q in &questions {
            assert!(q.audio_url.starts_with("https://cdn.example.com/clips/"));
            assert!(!q.audio_url.contains("//clips//"));
        }
    }

    #[test]
    fn test_payload_mapping_defaults() {
        let json = r#"{
            "questions": [
                {"type": "AI", "audioUrl": "https://x/a.mp3", "name": "sample-a"},
                {"id": 9, "type": "HUMAN", "audioUrl": "https://x/h.mp3", "videoUrl": "https://x/h.mp4"}
            ]
        }"#;
        let payload: RemotePayload = serde_json::from_str(json).unwrap();
        let questions = map_payload(payload).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id, 1); // missing id falls back to position
        assert_eq!(questions[0].kind, VoiceKind::Ai);
        assert_eq!(questions[0].video_url, None);
        assert_eq!(questions[1].id, 9);
        assert_eq!(questions[1].video_url.as_deref(), Some("https://x/h.mp4"));
    }

    #[test]
    fn test_payload_rejects_unknown_type() {
        let json = r#"{"questions": [{"type": "ROBOT", "audioUrl": "https://x/a.mp3"}]}"#;
        let payload: RemotePayload = serde_json::from_str(json).unwrap();
        assert!(matches!(
            map_payload(payload),
            Err(QuestionFetchError::Payload(_))
        ));
    }
}
