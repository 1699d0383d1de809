// ============================================================================
// Barème de notation
// ============================================================================
// Associe chaque valeur de métrique à un palier (0..=3), puis additionne
// les points des huit paliers pour obtenir une note sur 20
//
// CONCEPTS RUST :
// 1. Tableau constant : les seuils sont de la configuration statique
// 2. Fonctions pures : aucune I/O, aucune erreur possible
// 3. match sur enum : sens ascendant / descendant
//
// SEUILS :
// - Ascending  : x < t0 => 0, x < t1 => 1, x < t2 => 2, sinon 3
// - Descending : x > t0 => 0, x > t1 => 1, x > t2 => 2, sinon 3
// Comparaisons strictes : une valeur pile sur un seuil passe au palier suivant
// (EBITDA 20.0 => Silver, D/E 1.0 => Bronze, analystes 1.5 => Gold)
// ============================================================================

use crate::models::{Direction, Fundamentals, Metric, ScoreLine, Scorecard, Tier};

/// Seuils [t0, t1, t2] d'une métrique, dans l'unité du barème
pub fn thresholds(metric: Metric) -> [f64; 3] {
    match metric {
        Metric::EbitdaMargin => [10.0, 20.0, 35.0],
        Metric::NetMargin => [8.0, 15.0, 25.0],
        Metric::DebtToEquity => [1.0, 0.5, 0.25],
        Metric::CurrentRatio => [1.2, 1.5, 3.0],
        Metric::QuickRatio => [1.0, 1.5, 3.0],
        Metric::ReturnOnAssets => [5.0, 8.0, 12.0],
        Metric::ReturnOnEquity => [10.0, 15.0, 25.0],
        Metric::AnalystRating => [3.5, 2.5, 1.5],
    }
}

/// Palier d'une valeur pour une métrique
pub fn bucket(metric: Metric, value: f64) -> Tier {
    let limits = thresholds(metric);

    // CONCEPT RUST : position() sur un itérateur
    // - Premier seuil "non franchi" => index du palier
    // - Aucun : palier 3 (Gold)
    let index = match metric.direction() {
        Direction::Ascending => limits.iter().position(|&t| value < t),
        Direction::Descending => limits.iter().position(|&t| value > t),
    };

    Tier::from_index(index.unwrap_or(3))
}

/// Note un ticker à partir de ses fondamentaux
pub fn evaluate(symbol: &str, fundamentals: &Fundamentals) -> Scorecard {
    let lines = fundamentals
        .iter()
        .map(|(metric, value)| ScoreLine {
            metric,
            value,
            tier: bucket(metric, value),
        })
        .collect();

    Scorecard::new(symbol.to_string(), lines)
}

// ============================================================================
// Tests unitaires
// ============================================================================
