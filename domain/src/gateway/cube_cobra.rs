//! CubeCobra API client for cube card lists and ratings.
//!
//! All outbound calls go through a [`RateLimiter`] so the server stays well
//! under CubeCobra's request tolerance. Failures are reported once to the
//! caller; retry policy belongs to whoever decides the lookup still matters.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::rate_limit::RateLimiter;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client for the CubeCobra cube API.
pub struct CubeCobraClient {
    client: reqwest::Client,
    base_url: String,
    rate_limiter: RateLimiter,
}

/// Response body of `GET {base}/cubeJSON/{cube_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CubeResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cards: CubeCards,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CubeCards {
    #[serde(default)]
    pub mainboard: Vec<BoardCard>,
}

/// A card as it appears on a cube board: a thin identity plus board-level
/// overrides, with the full card record nested under `details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardCard {
    #[serde(rename = "cardID", default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub details: Option<CardDetails>,
}

/// The nested per-card record. When a field exists both here and at the
/// board level, this one wins.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub image_normal: Option<String>,
    #[serde(default)]
    pub elo: Option<f64>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(rename = "type", default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub colors: Option<Vec<String>>,
}

/// Normalized card record keyed by lower-cased name in
/// [`extract_card_data_map`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardData {
    pub name: String,
    pub card_set: String,
    pub collector_number: String,
    pub rarity: String,
    pub image_url: String,
    pub type_line: String,
    pub colors: Vec<String>,
    pub cmc: f64,
    pub elo: i64,
    pub tags: Vec<String>,
}

impl CubeCobraClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.cubecobra_base_url().to_string(),
            rate_limiter: RateLimiter::new(Duration::from_millis(
                config.cubecobra_request_delay_ms,
            )),
        })
    }

    /// Fetches the full card list for a cube. `Ok(None)` means the cube does
    /// not exist (HTTP 404) and is deliberately distinct from failure; any
    /// other non-success status or network error is logged and returned as a
    /// network error. No retries.
    pub async fn fetch_cube(&self, cube_id: &str) -> Result<Option<CubeResponse>, Error> {
        self.rate_limiter.wait().await;

        let url = format!("{}/cubeJSON/{}", self.base_url, cube_id);
        debug!("Fetching cube {cube_id} from CubeCobra");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("CubeCobra request for cube {cube_id} failed: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            info!("Cube {cube_id} not found on CubeCobra");
            return Ok(None);
        }
        if !status.is_success() {
            warn!("CubeCobra returned {status} for cube {cube_id}");
            return Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            });
        }

        let cube = response.json::<CubeResponse>().await.map_err(|e| {
            warn!("Failed to parse CubeCobra response for cube {cube_id}: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Malformed CubeCobra response body".to_string(),
                )),
            }
        })?;

        Ok(Some(cube))
    }

    /// Looks up a single card's rating in a cube. Returns `None` when the
    /// cube fetch fails (logged), the cube does not exist, or the card is
    /// absent from the cube's rating map.
    pub async fn card_elo(&self, card_name: &str, cube_id: &str) -> Option<i64> {
        match self.fetch_cube(cube_id).await {
            Ok(Some(cube)) => extract_elo_map(&cube)
                .get(&card_name.to_lowercase())
                .copied(),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to fetch cube {cube_id} for ELO lookup: {e:?}");
                None
            }
        }
    }
}

/// Builds a map from lower-cased card name to ELO rating rounded to the
/// nearest integer. Cards with no rating are excluded entirely, which makes
/// "unrated" distinguishable from "rated 0". See [`extract_card_data_map`]
/// for the defaulting variant; the two policies are intentionally different.
pub fn extract_elo_map(cube: &CubeResponse) -> HashMap<String, i64> {
    let mut ratings = HashMap::new();

    for card in &cube.cards.mainboard {
        let Some(details) = &card.details else {
            continue;
        };
        let Some(name) = &details.name else { continue };

        if let Some(elo) = details.elo {
            ratings.insert(name.to_lowercase(), elo.round() as i64);
        }
    }

    ratings
}

/// Builds a map from lower-cased card name to a normalized [`CardData`]
/// record. Fields present in the nested `details` record take precedence
/// over board-level fields; missing optional fields default to an empty
/// string, empty list, or zero. Unlike [`extract_elo_map`], a card with no
/// rating is kept with `elo: 0` — callers rely on the difference.
pub fn extract_card_data_map(cube: &CubeResponse) -> HashMap<String, CardData> {
    let mut cards = HashMap::new();

    for card in &cube.cards.mainboard {
        let details = card.details.clone().unwrap_or_default();
        let Some(name) = details.name.clone() else {
            continue;
        };

        let data = CardData {
            card_set: details.set.unwrap_or_default(),
            collector_number: details.collector_number.unwrap_or_default(),
            rarity: details.rarity.unwrap_or_default(),
            image_url: details.image_normal.unwrap_or_default(),
            type_line: details
                .type_line
                .or_else(|| card.type_line.clone())
                .unwrap_or_default(),
            colors: details
                .colors
                .or_else(|| card.colors.clone())
                .unwrap_or_default(),
            cmc: details.cmc.or(card.cmc).unwrap_or_default(),
            elo: details.elo.map(|elo| elo.round() as i64).unwrap_or(0),
            tags: card.tags.clone().unwrap_or_default(),
            name: name.clone(),
        };

        cards.insert(name.to_lowercase(), data);
    }

    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use service::config::Config;

    fn cube_fixture() -> CubeResponse {
        serde_json::from_value(json!({
            "name": "Dynasty Vintage Cube",
            "cards": {
                "mainboard": [
                    {
                        "cardID": "aaa-1",
                        "cmc": 1.0,
                        "type_line": "Instant",
                        "tags": ["burn"],
                        "details": {
                            "name": "Lightning Bolt",
                            "set": "lea",
                            "collector_number": "161",
                            "rarity": "common",
                            "image_normal": "https://cards.example/bolt.jpg",
                            "elo": 1650.4,
                            "cmc": 1.0,
                            "type": "Instant — Arcane",
                            "colors": ["R"]
                        }
                    },
                    {
                        "cardID": "bbb-2",
                        "cmc": 2.0,
                        "type_line": "Creature — Bear",
                        "details": {
                            "name": "Grizzly Bears",
                            "set": "lea"
                        }
                    },
                    {
                        "cardID": "ccc-3"
                    }
                ]
            }
        }))
        .expect("fixture should deserialize")
    }

    fn test_config(base_url: &str) -> Config {
        let mut config = Config::default().set_cubecobra_base_url(base_url.to_string());
        config.cubecobra_request_delay_ms = 0;
        config
    }

    #[test]
    fn extract_elo_map_excludes_unrated_cards() {
        let elo_map = extract_elo_map(&cube_fixture());

        // Three mainboard entries, one rated: exactly one entry survives.
        assert_eq!(elo_map.len(), 1);
        assert_eq!(elo_map.get("lightning bolt"), Some(&1650));
        assert!(!elo_map.contains_key("grizzly bears"));
    }

    #[test]
    fn extract_card_data_map_defaults_missing_fields() {
        let cards = extract_card_data_map(&cube_fixture());

        // The detail-less entry has no name and is skipped.
        assert_eq!(cards.len(), 2);

        let bears = cards.get("grizzly bears").expect("bears should be mapped");
        assert_eq!(bears.elo, 0);
        assert_eq!(bears.rarity, "");
        assert_eq!(bears.image_url, "");
        assert!(bears.colors.is_empty());
        // No details-level type: the board-level field fills in.
        assert_eq!(bears.type_line, "Creature — Bear");
    }

    #[test]
    fn extract_card_data_map_prefers_details_over_board_fields() {
        let cards = extract_card_data_map(&cube_fixture());

        let bolt = cards.get("lightning bolt").expect("bolt should be mapped");
        assert_eq!(bolt.type_line, "Instant — Arcane");
        assert_eq!(bolt.elo, 1650);
        assert_eq!(bolt.tags, vec!["burn".to_string()]);
    }

    #[tokio::test]
    async fn fetch_cube_returns_none_on_404() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cubeJSON/missing-cube")
            .with_status(404)
            .create_async()
            .await;

        let client = CubeCobraClient::new(&test_config(&server.url())).unwrap();
        let result = client.fetch_cube("missing-cube").await;

        mock.assert_async().await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn fetch_cube_parses_successful_response() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "name": "Dynasty Vintage Cube",
            "cards": {
                "mainboard": [
                    {"details": {"name": "Ponder", "elo": 1480.6}}
                ]
            }
        });
        let mock = server
            .mock("GET", "/cubeJSON/dynasty")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let client = CubeCobraClient::new(&test_config(&server.url())).unwrap();
        let cube = client
            .fetch_cube("dynasty")
            .await
            .unwrap()
            .expect("cube should exist");

        mock.assert_async().await;
        assert_eq!(cube.name.as_deref(), Some("Dynasty Vintage Cube"));
        assert_eq!(cube.cards.mainboard.len(), 1);
    }

    #[tokio::test]
    async fn fetch_cube_surfaces_server_errors_as_network_failures() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cubeJSON/dynasty")
            .with_status(500)
            .create_async()
            .await;

        let client = CubeCobraClient::new(&test_config(&server.url())).unwrap();
        let err = client.fetch_cube("dynasty").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Network)
        );
    }

    #[tokio::test]
    async fn card_elo_rounds_ratings_and_misses_cleanly() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "cards": {
                "mainboard": [
                    {"details": {"name": "Ponder", "elo": 1480.6}}
                ]
            }
        });
        let _mock = server
            .mock("GET", "/cubeJSON/dynasty")
            .with_status(200)
            .with_body(body.to_string())
            .expect(2)
            .create_async()
            .await;

        let client = CubeCobraClient::new(&test_config(&server.url())).unwrap();

        assert_eq!(client.card_elo("PONDER", "dynasty").await, Some(1481));
        assert_eq!(client.card_elo("Brainstorm", "dynasty").await, None);
    }

    #[tokio::test]
    async fn card_elo_returns_none_when_the_fetch_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/cubeJSON/dynasty")
            .with_status(503)
            .create_async()
            .await;

        let client = CubeCobraClient::new(&test_config(&server.url())).unwrap();
        assert_eq!(client.card_elo("Ponder", "dynasty").await, None);
    }
}
