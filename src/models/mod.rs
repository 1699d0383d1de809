// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
// ============================================================================

pub mod metric;       // Les huit ratios notés
pub mod tier;         // Paliers Chocolate / Bronze / Silver / Gold
pub mod fundamentals; // Valeurs d'un ticker (unités du barème)
pub mod scorecard;    // Résultat du barème
pub mod ticker_list;  // Liste des tickers de la session

// Re-export des structures principales pour simplifier les imports
// On peut faire : use lazyrank::models::Metric;
pub use metric::{Direction, Metric, Unit, METRIC_COUNT};
pub use tier::Tier;
pub use fundamentals::{Fundamentals, ProviderFields};
pub use scorecard::{ScoreLine, Scorecard, MAX_SCORE, MIN_SCORE};
pub use ticker_list::TickerList;
