// ============================================================================
// Enum : Metric
// ============================================================================
// Les huit ratios financiers notés par le barème
//
// CONCEPTS RUST :
// 1. Enum sans données + tableau constant ALL : itération dans un ordre fixe
// 2. Copy : un Metric se copie comme un entier (pas de move)
// 3. Ord : permet d'utiliser Metric comme clé de BTreeMap
// ============================================================================

use std::fmt;

/// Nombre de métriques notées
pub const METRIC_COUNT: usize = 8;

/// Convention d'unité de la valeur renvoyée par le fournisseur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Fraction côté fournisseur (0.34), notée en pourcentage (34.0)
    Percentage,

    /// Ratio que Yahoo renvoie multiplié par 100 (debtToEquity = 150.0 pour 1.5)
    Ratio,

    /// Valeur sans unité, notée telle quelle (current ratio, note analystes)
    Dimensionless,
}

/// Sens de lecture d'une métrique
///
/// CONCEPT : Ascending = plus c'est haut, mieux c'est
/// - Descending : dette et note analystes (1 = achat fort, 5 = vente)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ratio financier noté par le barème
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    EbitdaMargin,
    NetMargin,
    DebtToEquity,
    CurrentRatio,
    QuickRatio,
    ReturnOnAssets,
    ReturnOnEquity,
    AnalystRating,
}

impl Metric {
    /// Toutes les métriques, dans l'ordre d'affichage du détail
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::EbitdaMargin,
        Metric::NetMargin,
        Metric::DebtToEquity,
        Metric::CurrentRatio,
        Metric::QuickRatio,
        Metric::ReturnOnAssets,
        Metric::ReturnOnEquity,
        Metric::AnalystRating,
    ];

    /// Position dans Metric::ALL
    pub fn index(self) -> usize {
        match self {
            Metric::EbitdaMargin => 0,
            Metric::NetMargin => 1,
            Metric::DebtToEquity => 2,
            Metric::CurrentRatio => 3,
            Metric::QuickRatio => 4,
            Metric::ReturnOnAssets => 5,
            Metric::ReturnOnEquity => 6,
            Metric::AnalystRating => 7,
        }
    }

    /// Libellé affiché dans la colonne "Critère"
    pub fn label(self) -> &'static str {
        match self {
            Metric::EbitdaMargin => "EBITDA",
            Metric::NetMargin => "Marge nette",
            Metric::DebtToEquity => "D/E ratio",
            Metric::CurrentRatio => "Current ratio",
            Metric::QuickRatio => "Quick ratio",
            Metric::ReturnOnAssets => "ROA",
            Metric::ReturnOnEquity => "ROE",
            Metric::AnalystRating => "Analystes",
        }
    }

    /// Nom du champ dans le module `financialData` de Yahoo
    pub fn provider_key(self) -> &'static str {
        match self {
            Metric::EbitdaMargin => "ebitdaMargins",
            Metric::NetMargin => "profitMargins",
            Metric::DebtToEquity => "debtToEquity",
            Metric::CurrentRatio => "currentRatio",
            Metric::QuickRatio => "quickRatio",
            Metric::ReturnOnAssets => "returnOnAssets",
            Metric::ReturnOnEquity => "returnOnEquity",
            Metric::AnalystRating => "recommendationMean",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            Metric::EbitdaMargin
            | Metric::NetMargin
            | Metric::ReturnOnAssets
            | Metric::ReturnOnEquity => Unit::Percentage,
            Metric::DebtToEquity => Unit::Ratio,
            Metric::CurrentRatio | Metric::QuickRatio | Metric::AnalystRating => {
                Unit::Dimensionless
            }
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Metric::DebtToEquity | Metric::AnalystRating => Direction::Descending,
            _ => Direction::Ascending,
        }
    }

    /// Convertit une valeur brute du fournisseur dans l'unité du barème
    ///
    /// CONCEPT : Le cas D/E
    /// - Yahoo renvoie debtToEquity en pourcentage (150.0 => 1.5)
    /// - Si la conversion donne exactement 0, on garde la valeur brute
    ///   (certains fournisseurs renvoient déjà un ratio)
    pub fn convert(self, raw: f64) -> f64 {
        match self.unit() {
            Unit::Percentage => raw * 100.0,
            Unit::Ratio => {
                let ratio = raw / 100.0;
                if ratio == 0.0 {
                    raw
                } else {
                    ratio
                }
            }
            Unit::Dimensionless => raw,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================
