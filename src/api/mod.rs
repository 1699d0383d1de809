// ============================================================================
// Module : api
// ============================================================================
// Clients API pour récupérer les données financières (Yahoo Finance)
// ============================================================================

pub mod yahoo;  // Client API Yahoo Finance (quoteSummary)

// Re-export des types principaux
pub use yahoo::YahooClient;
