// ============================================================================
// Structure : Fundamentals
// ============================================================================
// Les huit valeurs d'un ticker, converties dans les unités du barème
//
// CONCEPTS RUST :
// 1. Tableau de taille fixe [f64; 8] : une valeur par Metric, jamais absente
// 2. HashMap<String, f64> : champs bruts renvoyés par le fournisseur
// 3. Les défauts sont appliqués ici, à la frontière avec le fournisseur
// ============================================================================

use std::collections::HashMap;

use tracing::debug;

use crate::config::MetricDefaults;
use crate::models::metric::{Metric, METRIC_COUNT};

/// Champs numériques bruts du fournisseur (ex: "ebitdaMargins" -> 0.34)
pub type ProviderFields = HashMap<String, f64>;

/// Valeurs des huit métriques pour un ticker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fundamentals {
    values: [f64; METRIC_COUNT],
}

impl Fundamentals {
    /// Crée les fondamentaux depuis des valeurs déjà dans l'unité du barème
    ///
    /// L'ordre des valeurs est celui de Metric::ALL
    pub fn new(values: [f64; METRIC_COUNT]) -> Self {
        Self { values }
    }

    /// Construit les fondamentaux depuis les champs bruts du fournisseur
    ///
    /// CONCEPT : Défaut puis conversion
    /// - Champ absent ou non fini : valeur par défaut de la table
    /// - Ensuite conversion d'unité (x100 pour les marges, /100 pour D/E)
    pub fn from_provider(fields: &ProviderFields, defaults: &MetricDefaults) -> Self {
        let mut values = [0.0; METRIC_COUNT];

        for metric in Metric::ALL {
            let raw = match fields.get(metric.provider_key()).copied() {
                Some(v) if v.is_finite() => v,
                _ => {
                    debug!(metric = %metric, "Missing provider field, using default");
                    defaults.get(metric)
                }
            };
            values[metric.index()] = metric.convert(raw);
        }

        Self { values }
    }

    /// Valeur d'une métrique
    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// Itère sur (métrique, valeur) dans l'ordre de Metric::ALL
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.get(m)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, f64)]) -> ProviderFields {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_from_provider_converts_units() {
        let raw = fields(&[
            ("ebitdaMargins", 0.34),
            ("profitMargins", 0.25),
            ("debtToEquity", 150.0),
            ("currentRatio", 1.1),
            ("quickRatio", 0.9),
            ("returnOnAssets", 0.2),
            ("returnOnEquity", 1.5),
            ("recommendationMean", 2.0),
        ]);

        let f = Fundamentals::from_provider(&raw, &MetricDefaults::default());

        assert!((f.get(Metric::EbitdaMargin) - 34.0).abs() < 1e-9);
        assert!((f.get(Metric::NetMargin) - 25.0).abs() < 1e-9);
        assert!((f.get(Metric::DebtToEquity) - 1.5).abs() < 1e-9);
        assert_eq!(f.get(Metric::CurrentRatio), 1.1);
        assert_eq!(f.get(Metric::QuickRatio), 0.9);
        assert!((f.get(Metric::ReturnOnEquity) - 150.0).abs() < 1e-9);
        assert_eq!(f.get(Metric::AnalystRating), 2.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let f = Fundamentals::from_provider(&ProviderFields::new(), &MetricDefaults::default());

        assert_eq!(f.get(Metric::EbitdaMargin), 0.0);
        assert_eq!(f.get(Metric::DebtToEquity), 0.0);
        assert_eq!(f.get(Metric::AnalystRating), 3.0);
    }

    #[test]
    fn test_debt_to_equity_zero_fallback_from_provider() {
        let tiny = f64::from_bits(1);
        let f = Fundamentals::from_provider(
            &fields(&[("debtToEquity", tiny)]),
            &MetricDefaults::default(),
        );

        assert_eq!(f.get(Metric::DebtToEquity), tiny);
    }

    #[test]
    fn test_non_finite_is_missing() {
        let raw = fields(&[("recommendationMean", f64::NAN), ("quickRatio", f64::INFINITY)]);
        let f = Fundamentals::from_provider(&raw, &MetricDefaults::default());

        assert_eq!(f.get(Metric::AnalystRating), 3.0);
        assert_eq!(f.get(Metric::QuickRatio), 0.0);
    }

    #[test]
    fn test_iter_order() {
        let f = Fundamentals::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let collected: Vec<(Metric, f64)> = f.iter().collect();

        assert_eq!(collected.len(), METRIC_COUNT);
        assert_eq!(collected[0], (Metric::EbitdaMargin, 1.0));
        assert_eq!(collected[7], (Metric::AnalystRating, 8.0));
    }
}
