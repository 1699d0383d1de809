// ============================================================================
// LazyRank - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // API Yahoo Finance (fondamentaux)
pub mod config;    // Configuration (variables d'environnement)
pub mod models;    // Structures de données
pub mod rubric;    // Barème de notation
pub mod ranking;   // Classement des tickers
pub mod app;       // État de l'application
pub mod ui;        // Interface utilisateur
