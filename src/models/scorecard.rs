// ============================================================================
// Structure : Scorecard
// ============================================================================
// Résultat du barème pour un ticker : une ligne par critère + note sur 20
//
// CONCEPTS RUST :
// 1. Composition : Scorecard contient des ScoreLine
// 2. Iterator::sum : somme des points en dixièmes (entiers, donc exacte)
// 3. Option<String> : le nom de l'entreprise n'est pas toujours fourni
// ============================================================================

use crate::models::{Metric, Tier};

/// Note maximale (8 critères au palier Gold)
pub const MAX_SCORE: f64 = 20.0;

/// Note minimale (8 critères au palier Chocolate)
pub const MIN_SCORE: f64 = 4.8;

/// Une ligne du détail : critère, valeur, palier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreLine {
    pub metric: Metric,
    pub value: f64,
    pub tier: Tier,
}

impl ScoreLine {
    pub fn points(&self) -> f64 {
        self.tier.points()
    }
}

/// Notation complète d'un ticker
#[derive(Debug, Clone, PartialEq)]
pub struct Scorecard {
    /// Symbole du ticker (ex: "AAPL")
    pub symbol: String,

    /// Nom de l'entreprise si le fournisseur le renvoie (ex: "Apple Inc.")
    pub name: Option<String>,

    /// Lignes dans l'ordre de Metric::ALL
    pub lines: Vec<ScoreLine>,
}

impl Scorecard {
    pub fn new(symbol: String, lines: Vec<ScoreLine>) -> Self {
        Self {
            symbol,
            name: None,
            lines,
        }
    }

    /// Ajoute le nom de l'entreprise (builder)
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Somme des points en dixièmes
    pub fn total_tenths(&self) -> u32 {
        self.lines.iter().map(|line| line.tier.points_tenths()).sum()
    }

    /// Note composite sur 20
    ///
    /// CONCEPT : Division unique à la fin
    /// - 48 / 10.0 == 4.8 et 200 / 10.0 == 20.0, sans erreur d'arrondi cumulée
    pub fn composite(&self) -> f64 {
        f64::from(self.total_tenths()) / 10.0
    }

    /// Note arrondie à deux décimales pour l'affichage
    pub fn display_score(&self) -> String {
        format!("{:.2}", self.composite())
    }

    /// Libellé de l'entreprise : "AAPL  Apple Inc." ou juste "AAPL"
    pub fn entity_label(&self) -> String {
        match &self.name {
            Some(name) => format!("{}  {}", self.symbol, name),
            None => self.symbol.clone(),
        }
    }
}
