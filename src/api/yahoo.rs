// ============================================================================
// API Client : Yahoo Finance (fondamentaux)
// ============================================================================
// Récupère les ratios financiers d'un ticker via l'endpoint quoteSummary
//
// AUTHENTIFICATION YAHOO :
// 1. Visite de https://fc.yahoo.com : pose un cookie de session (cookie jar)
// 2. GET /v1/test/getcrumb : renvoie un "crumb" à passer en paramètre
// 3. Le crumb est gardé pour la session, invalidé sur 401/403
//
// CONCEPTS RUST :
// 1. async/await : requêtes HTTP non-bloquantes
// 2. serde_json::Value : champs au format variable ({raw, fmt}, {}, nombre)
// 3. tokio::sync::Mutex : cache du crumb, verrou tenu à travers un .await
// ============================================================================

use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{Config, MetricDefaults};
use crate::models::{Fundamentals, ProviderFields, Scorecard};
use crate::rubric;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const REFERER: &str = "https://finance.yahoo.com/";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SUMMARY_MODULES: &str = "financialData,price";

// ============================================================================
// Structures pour parser la réponse JSON de quoteSummary
// ============================================================================
// {"quoteSummary": {"result": [{"financialData": {...}, "price": {...}}],
//                   "error": null}}
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooSummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

/// Erreur renvoyée par Yahoo (ex: ticker inconnu)
#[derive(Debug, Deserialize)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    /// Champs hétérogènes : on garde des Value et on extrait les nombres
    #[serde(default)]
    financial_data: HashMap<String, Value>,
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
}

/// Données brutes d'un ticker, avant conversion
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSummary {
    pub symbol: String,

    /// Nom de l'entreprise (longName, sinon shortName)
    pub name: Option<String>,

    /// Champs numériques de financialData
    pub fields: ProviderFields,
}

// ============================================================================
// Structure : YahooClient
// ============================================================================

/// Client Yahoo Finance pour une session
pub struct YahooClient {
    http: reqwest::Client,
    crumb: Mutex<Option<String>>,
    defaults: MetricDefaults,
}

impl YahooClient {
    /// Crée le client HTTP (cookie jar + User-Agent + timeout)
    pub fn new(config: &Config) -> Result<Self> {
        debug!(timeout = ?config.fetch_timeout, "Creating HTTP client");
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(config.fetch_timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            crumb: Mutex::new(None),
            defaults: config.defaults.clone(),
        })
    }

    /// Récupère les fondamentaux d'un ticker et applique le barème
    pub async fn fetch_scorecard(&self, symbol: &str) -> Result<Scorecard> {
        let summary = self.fetch_summary(symbol).await?;
        let fundamentals = Fundamentals::from_provider(&summary.fields, &self.defaults);
        let scorecard = rubric::evaluate(symbol, &fundamentals).with_name(summary.name);

        info!(ticker = %symbol, score = scorecard.composite(), "Ticker scored");
        Ok(scorecard)
    }

    /// Récupère les champs bruts de quoteSummary pour un ticker
    ///
    /// CONCEPT : Retry unique sur 401/403
    /// - Le crumb a pu expirer : on l'invalide, on en redemande un
    /// - Second échec : erreur remontée à l'appelant
    #[instrument(skip(self))]
    pub async fn fetch_summary(&self, symbol: &str) -> Result<QuoteSummary> {
        let crumb = self.crumb().await?;
        let mut response = self.send_summary_request(symbol, &crumb).await?;

        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(status = %response.status(), "Yahoo rejected crumb, refreshing");
            self.invalidate_crumb().await;
            let crumb = self.crumb().await?;
            response = self.send_summary_request(symbol, &crumb).await?;
        }

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response
            .text()
            .await
            .context("Échec de la lecture de la réponse Yahoo")?;

        if !status.is_success() {
            let detail = provider_error(&body).unwrap_or_default();
            error!(status = %status, detail = %detail, "Yahoo Finance returned error status");
            anyhow::bail!(
                "Yahoo Finance a retourné une erreur : HTTP {} {}",
                status,
                detail
            );
        }

        let summary = parse_quote_summary(&body, symbol)?;
        debug!(fields = summary.fields.len(), "Parsed quoteSummary");
        Ok(summary)
    }

    async fn send_summary_request(&self, symbol: &str, crumb: &str) -> Result<reqwest::Response> {
        let url = build_summary_url(symbol, crumb)?;
        debug!(url = %url, "Sending quoteSummary request");

        self.http
            .get(url)
            .header(reqwest::header::REFERER, REFERER)
            .send()
            .await
            .context("Échec de la requête HTTP vers Yahoo Finance")
    }

    /// Crumb en cache, ou nouveau crumb si absent
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let fresh = self.fetch_crumb().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }

    /// Cookie de session puis crumb
    async fn fetch_crumb(&self) -> Result<String> {
        debug!("Fetching Yahoo session cookie");
        // fc.yahoo.com répond souvent 404 mais pose quand même le cookie
        self.http
            .get(COOKIE_URL)
            .header(reqwest::header::REFERER, REFERER)
            .send()
            .await
            .context("Échec de la récupération du cookie Yahoo")?;

        for endpoint in CRUMB_URLS {
            let response = match self
                .http
                .get(endpoint)
                .header(reqwest::header::REFERER, REFERER)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!(endpoint, error = %e, "Crumb request failed");
                    continue;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                anyhow::bail!("Yahoo Finance limite les requêtes (HTTP 429)");
            }
            if !response.status().is_success() {
                warn!(endpoint, status = %response.status(), "Crumb endpoint returned error");
                continue;
            }

            if let Some(crumb) = crumb_from_body(endpoint, response.text().await) {
                info!("Obtained Yahoo crumb");
                return Ok(crumb);
            }
        }

        anyhow::bail!("Impossible d'obtenir un crumb Yahoo Finance")
    }
}

// ============================================================================
// Fonctions utilitaires (pures, testées sans réseau)
// ============================================================================

/// Construit l'URL quoteSummary
///
/// CONCEPT : Url plutôt que format!
/// - Le symbole est poussé comme segment de chemin (encodage automatique)
/// - Le crumb peut contenir "/" : encodé par query_pairs_mut
fn build_summary_url(symbol: &str, crumb: &str) -> Result<Url> {
    let mut url = Url::parse(QUOTE_SUMMARY_URL).context("URL Yahoo invalide")?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("URL Yahoo invalide"))?
        .push(symbol);
    url.query_pairs_mut()
        .append_pair("modules", SUMMARY_MODULES)
        .append_pair("crumb", crumb);
    Ok(url)
}

/// Crumb extrait du corps de la réponse getcrumb
///
/// Une erreur de lecture et un corps inattendu sont loggés séparément :
/// dans les deux cas on passe à l'endpoint suivant
fn crumb_from_body<E: std::fmt::Display>(
    endpoint: &str,
    body: std::result::Result<String, E>,
) -> Option<String> {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            warn!(endpoint, error = %e, "Failed to read crumb response body");
            return None;
        }
    };

    if is_valid_crumb(&body) {
        Some(body.trim().to_string())
    } else {
        warn!(endpoint, "Crumb endpoint returned an unexpected body");
        None
    }
}

/// Un crumb est court, sans espace, et pas une page HTML
fn is_valid_crumb(body: &str) -> bool {
    let body = body.trim();
    !body.is_empty()
        && body.len() < 100
        && !body.contains(' ')
        && !body.contains('<')
        && !body.to_lowercase().contains("too many requests")
}

/// Extrait un nombre d'un champ Yahoo
/// - {"raw": 0.34, "fmt": "34%"} => 0.34
/// - 0.34 => 0.34
/// - {} ou "USD" => None
fn extract_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("raw").and_then(Value::as_f64),
        _ => None,
    }
}

/// Description de l'erreur renvoyée par Yahoo, si le corps en contient une
fn provider_error(body: &str) -> Option<String> {
    let response: YahooSummaryResponse = serde_json::from_str(body).ok()?;
    let error = response.quote_summary.error?;
    error.description.or(error.code)
}

/// Parse la réponse quoteSummary
fn parse_quote_summary(body: &str, symbol: &str) -> Result<QuoteSummary> {
    let response: YahooSummaryResponse =
        serde_json::from_str(body).context("Échec du parsing JSON de la réponse Yahoo")?;

    if let Some(error) = response.quote_summary.error {
        let detail = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "erreur inconnue".to_string());
        anyhow::bail!("Yahoo Finance : {}", detail);
    }

    let result = response
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .with_context(|| format!("Aucune donnée retournée par Yahoo Finance pour {}", symbol))?;

    let fields: ProviderFields = result
        .financial_data
        .iter()
        .filter_map(|(key, value)| extract_number(value).map(|n| (key.clone(), n)))
        .collect();

    let name = result
        .price
        .and_then(|price| price.long_name.or(price.short_name))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    Ok(QuoteSummary {
        symbol: symbol.to_string(),
        name,
        fields,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    const AAPL_BODY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "financialData": {
                    "maxAge": 86400,
                    "financialCurrency": "USD",
                    "ebitdaMargins": {"raw": 0.34, "fmt": "34.00%"},
                    "profitMargins": {"raw": 0.24, "fmt": "24.00%"},
                    "debtToEquity": {"raw": 151.86, "fmt": "151.86"},
                    "currentRatio": {"raw": 0.87, "fmt": "0.87"},
                    "quickRatio": {"raw": 0.75, "fmt": "0.75"},
                    "returnOnAssets": {"raw": 0.22, "fmt": "22.00%"},
                    "returnOnEquity": {"raw": 1.6, "fmt": "160.00%"},
                    "recommendationMean": 2.0,
                    "targetMeanPrice": {}
                },
                "price": {"longName": "Apple Inc.", "shortName": "Apple"}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_build_summary_url() {
        let url = build_summary_url("AAPL", "abc.123").unwrap().to_string();
        assert!(url.contains("yahoo.com"));
        assert!(url.contains("/quoteSummary/AAPL?"));
        assert!(url.contains("modules=financialData"));
        assert!(url.contains("crumb=abc.123"));
    }

    #[test]
    fn test_parse_quote_summary() {
        let summary = parse_quote_summary(AAPL_BODY, "AAPL").unwrap();

        assert_eq!(summary.name.as_deref(), Some("Apple Inc."));
        assert_eq!(summary.fields.get("ebitdaMargins"), Some(&0.34));
        assert_eq!(summary.fields.get("debtToEquity"), Some(&151.86));
        // Nombre nu
        assert_eq!(summary.fields.get("recommendationMean"), Some(&2.0));
        // {} et chaînes ignorés
        assert!(!summary.fields.contains_key("targetMeanPrice"));
        assert!(!summary.fields.contains_key("financialCurrency"));
    }

    #[test]
    fn test_parse_then_score() {
        let summary = parse_quote_summary(AAPL_BODY, "AAPL").unwrap();
        let fundamentals = Fundamentals::from_provider(&summary.fields, &MetricDefaults::default());
        let scorecard = rubric::evaluate("AAPL", &fundamentals);

        assert!((fundamentals.get(Metric::DebtToEquity) - 1.5186).abs() < 1e-9);
        // EBITDA 34 => Silver, marge 24 => Silver, D/E 1.52 => Chocolate,
        // current 0.87 => Chocolate, quick 0.75 => Chocolate, ROA 22 => Gold,
        // ROE 160 => Gold, analystes 2.0 => Silver
        assert_eq!(scorecard.composite(), 12.5);
    }

    #[test]
    fn test_parse_unknown_ticker_error() {
        let body = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: ZZZZ"}}}"#;
        let err = parse_quote_summary(body, "ZZZZ").unwrap_err();
        assert!(err.to_string().contains("Quote not found"));
        assert_eq!(provider_error(body).as_deref(), Some("Quote not found for symbol: ZZZZ"));
    }

    #[test]
    fn test_parse_empty_result() {
        let body = r#"{"quoteSummary":{"result":[],"error":null}}"#;
        assert!(parse_quote_summary(body, "AAPL").is_err());
    }

    #[test]
    fn test_parse_missing_modules() {
        let body = r#"{"quoteSummary":{"result":[{}],"error":null}}"#;
        let summary = parse_quote_summary(body, "AAPL").unwrap();
        assert!(summary.fields.is_empty());
        assert_eq!(summary.name, None);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_quote_summary("<html>blocked</html>", "AAPL").is_err());
    }

    #[test]
    fn test_is_valid_crumb() {
        assert!(is_valid_crumb("AbCd.eF/12\n"));
        assert!(!is_valid_crumb(""));
        assert!(!is_valid_crumb("<!DOCTYPE html>"));
        assert!(!is_valid_crumb("Too Many Requests"));
    }

    #[test]
    fn test_crumb_from_body() {
        let endpoint = CRUMB_URLS[0];

        assert_eq!(
            crumb_from_body::<String>(endpoint, Ok("AbCd.eF/12\n".to_string())),
            Some("AbCd.eF/12".to_string())
        );
        assert_eq!(
            crumb_from_body::<String>(endpoint, Ok("<html></html>".to_string())),
            None
        );
        // Erreur de lecture du corps : pas de crumb, pas de panique
        assert_eq!(
            crumb_from_body(endpoint, Err("connection reset".to_string())),
            None
        );
    }

    // Test réseau : ne fait échouer la suite que si Yahoo répond des données
    // incohérentes (pas de connexion => test skippé)
    #[tokio::test]
    async fn test_fetch_scorecard() {
        let client = YahooClient::new(&Config::default()).unwrap();

        match client.fetch_scorecard("AAPL").await {
            Ok(scorecard) => {
                assert_eq!(scorecard.symbol, "AAPL");
                assert_eq!(scorecard.lines.len(), 8);
                println!("✓ AAPL : {}/20", scorecard.display_score());
            }
            Err(e) => {
                println!("⚠ Test skippé (pas de connexion?) : {}", e);
            }
        }
    }
}
