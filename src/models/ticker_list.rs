// ============================================================================
// Structure : TickerList
// ============================================================================
// Liste des tickers saisis pendant la session (un seul propriétaire : App)
//
// CONCEPTS RUST :
// 1. Encapsulation : le Vec est privé, seules add/clear le modifient
// 2. Invariants : symboles en majuscules, sans doublon, ordre d'insertion
// 3. &str en entrée, String stockée (le TickerList possède ses données)
// ============================================================================

/// Ensemble ordonné de symboles boursiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerList {
    symbols: Vec<String>,
}

impl TickerList {
    /// Crée une liste vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise un symbole saisi : espaces retirés, majuscules
    pub fn normalize(input: &str) -> String {
        input.trim().to_uppercase()
    }

    /// Ajoute un ticker à la fin de la liste
    ///
    /// Retourne true si la liste a changé
    /// - Saisie vide : ignorée
    /// - Ticker déjà présent (insensible à la casse) : ignoré
    pub fn add(&mut self, input: &str) -> bool {
        let symbol = Self::normalize(input);
        if symbol.is_empty() || self.symbols.contains(&symbol) {
            return false;
        }
        self.symbols.push(symbol);
        true
    }

    /// Vide la liste (sans effet si elle est déjà vide)
    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn contains(&self, input: &str) -> bool {
        let symbol = Self::normalize(input);
        self.symbols.contains(&symbol)
    }

    /// Dernier ticker ajouté
    pub fn last(&self) -> Option<&str> {
        self.symbols.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Itère dans l'ordre d'insertion
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

// ============================================================================
// Tests
// ============================================================================
