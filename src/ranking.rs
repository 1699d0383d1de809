// ============================================================================
// Classement des tickers
// ============================================================================
// Note chaque ticker de la liste, puis trie par note décroissante
//
// RÈGLES :
// - Un ticker en erreur (réseau, ticker inconnu, timeout) n'arrête pas
//   le classement : sa ligne porte le marqueur "Erreur données"
// - Les lignes en erreur sont toujours après les lignes notées
// - Tri stable : à note égale, l'ordre d'insertion est conservé
// - Le détail est celui du dernier ticker ajouté (pas de second fetch)
//
// CONCEPTS RUST :
// 1. Générique sur une closure async : FnMut(String) -> Fut
//    => en prod YahooClient, en test un faux fournisseur
// 2. tokio::time::timeout : un fetch trop long devient une erreur
// 3. sort_by : tri stable (merge sort) de la std
// ============================================================================

use std::cmp::Ordering;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::models::{Scorecard, TickerList};

/// Marqueur affiché à la place de la note
pub const ERROR_MARKER: &str = "Erreur données";

/// Message affiché quand le détail du dernier ticker est indisponible
pub const DETAIL_UNAVAILABLE: &str = "Impossible de récupérer les données détaillées.";

/// Résultat de la notation d'un ticker
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scored(Scorecard),
    Failed(String),
}

/// Une ligne du classement
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub symbol: String,
    pub outcome: Outcome,
}

impl RankedRow {
    pub fn scorecard(&self) -> Option<&Scorecard> {
        match &self.outcome {
            Outcome::Scored(card) => Some(card),
            Outcome::Failed(_) => None,
        }
    }

    /// Note en dixièmes (None si erreur)
    pub fn score_tenths(&self) -> Option<u32> {
        self.scorecard().map(Scorecard::total_tenths)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }

    /// Colonne "Entreprise"
    pub fn entity_label(&self) -> String {
        match &self.outcome {
            Outcome::Scored(card) => card.entity_label(),
            Outcome::Failed(_) => self.symbol.clone(),
        }
    }

    /// Colonne "Note sur 20" : "15.20" ou "Erreur données"
    pub fn display_score(&self) -> String {
        match &self.outcome {
            Outcome::Scored(card) => card.display_score(),
            Outcome::Failed(_) => ERROR_MARKER.to_string(),
        }
    }
}

/// Détail affiché sous le classement
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail<'a> {
    Card(&'a Scorecard),
    Unavailable { symbol: &'a str, reason: &'a str },
}

/// Classement complet d'une session
#[derive(Debug, Clone)]
pub struct Ranking {
    rows: Vec<RankedRow>,
    detail_symbol: Option<String>,
    scored_at: DateTime<Local>,
}

impl Ranking {
    /// Trie les lignes et garde le symbole du détail
    pub fn new(mut rows: Vec<RankedRow>, detail_symbol: Option<String>) -> Self {
        rows.sort_by(compare_rows);
        Self {
            rows,
            detail_symbol,
            scored_at: Local::now(),
        }
    }

    /// Lignes triées (meilleure note en premier, erreurs à la fin)
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_error()).count()
    }

    pub fn scored_at(&self) -> DateTime<Local> {
        self.scored_at
    }

    /// Détail du dernier ticker ajouté
    pub fn detail(&self) -> Option<Detail<'_>> {
        let symbol = self.detail_symbol.as_deref()?;
        let row = self.rows.iter().find(|row| row.symbol == symbol)?;

        Some(match &row.outcome {
            Outcome::Scored(card) => Detail::Card(card),
            Outcome::Failed(reason) => Detail::Unavailable {
                symbol: &row.symbol,
                reason,
            },
        })
    }
}

/// Ordre du classement
///
/// CONCEPT : Comparaison sur des entiers (dixièmes)
/// - Pas de partial_cmp sur des f64 : l'ordre est total
/// - Note décroissante, puis les erreurs
fn compare_rows(a: &RankedRow, b: &RankedRow) -> Ordering {
    match (a.score_tenths(), b.score_tenths()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ============================================================================
// Construction du classement
// ============================================================================

/// Paramètres de la boucle de fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    /// Timeout par ticker
    pub timeout: Duration,

    /// Pause entre deux tickers (rate limiting)
    pub delay: Duration,
}

impl From<&Config> for RankingOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.fetch_timeout,
            delay: config.request_delay,
        }
    }
}

/// Note tous les tickers de la liste, un par un, et construit le classement
///
/// CONCEPT RUST : Closure qui retourne une Future
/// - fetch("AAPL".to_string()) retourne une Future<Output = Result<Scorecard>>
/// - On l'enveloppe dans tokio::time::timeout
/// - Erreur ou timeout : la ligne est marquée en erreur, on continue
pub async fn build_ranking<F, Fut>(
    tickers: &TickerList,
    options: RankingOptions,
    mut fetch: F,
) -> Ranking
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Scorecard>>,
{
    let total = tickers.len();
    let mut rows = Vec::with_capacity(total);

    for (i, symbol) in tickers.iter().enumerate() {
        debug!(ticker = %symbol, progress = i + 1, total, "Scoring ticker");

        let outcome = match tokio::time::timeout(options.timeout, fetch(symbol.to_string())).await
        {
            Ok(Ok(card)) => Outcome::Scored(card),
            Ok(Err(e)) => {
                error!(ticker = %symbol, error = ?e, "Failed to score ticker");
                Outcome::Failed(format!("{:#}", e))
            }
            Err(_) => {
                error!(ticker = %symbol, timeout = ?options.timeout, "Ticker fetch timed out");
                Outcome::Failed(format!(
                    "Délai dépassé ({} ms)",
                    options.timeout.as_millis()
                ))
            }
        };

        rows.push(RankedRow {
            symbol: symbol.to_string(),
            outcome,
        });

        // Petit délai entre les requêtes (rate limiting)
        if i + 1 < total && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    let ranking = Ranking::new(rows, tickers.last().map(str::to_string));
    info!(
        tickers = total,
        failed = ranking.failed_count(),
        "Ranking built"
    );
    ranking
}

// ============================================================================
// Tests
// ============================================================================
