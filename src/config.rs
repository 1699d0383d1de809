// ============================================================================
// Configuration
// ============================================================================
// Paramètres lus depuis les variables d'environnement au démarrage
//
// Variables :
// - LAZYRANK_FETCH_TIMEOUT_SECS : timeout par ticker (défaut 10)
// - LAZYRANK_REQUEST_DELAY_MS   : pause entre deux requêtes Yahoo (défaut 250)
// - LAZYRANK_LOG_DIR            : répertoire des logs
//
// CONCEPTS RUST :
// 1. Lookup injectable : from_lookup() prend une closure, testable sans env
// 2. anyhow::Context : message clair si une variable est mal formée
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::Metric;

pub const ENV_FETCH_TIMEOUT: &str = "LAZYRANK_FETCH_TIMEOUT_SECS";
pub const ENV_REQUEST_DELAY: &str = "LAZYRANK_REQUEST_DELAY_MS";
pub const ENV_LOG_DIR: &str = "LAZYRANK_LOG_DIR";

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_DELAY_MS: u64 = 250;

// ============================================================================
// Table des valeurs par défaut
// ============================================================================
// Valeur utilisée quand le fournisseur n'envoie pas un champ
// Exprimée dans l'unité du fournisseur (avant conversion)
// ============================================================================

/// Valeurs par défaut des métriques, par métrique
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefaults {
    values: BTreeMap<Metric, f64>,
}

impl MetricDefaults {
    /// Valeur par défaut d'une métrique (0 si absente de la table)
    pub fn get(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }
}

impl Default for MetricDefaults {
    /// 0 partout, sauf la note analystes : 3 (conserver / neutre)
    fn default() -> Self {
        let mut values: BTreeMap<Metric, f64> =
            Metric::ALL.iter().map(|&metric| (metric, 0.0)).collect();
        values.insert(Metric::AnalystRating, 3.0);
        Self { values }
    }
}

// ============================================================================
// Structure : Config
// ============================================================================

/// Configuration de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// Timeout d'un fetch (au-delà : ticker en erreur)
    pub fetch_timeout: Duration,

    /// Pause entre deux requêtes (rate limiting Yahoo)
    pub request_delay: Duration,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,

    /// Valeurs par défaut des champs manquants
    pub defaults: MetricDefaults,
}

impl Config {
    /// Charge la configuration depuis l'environnement du processus
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration depuis une fonction de lookup
    ///
    /// CONCEPT RUST : Closure générique
    /// - F: Fn(&str) -> Option<String>
    /// - En prod : std::env::var, en test : une HashMap
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_var(&lookup, ENV_FETCH_TIMEOUT)?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let delay_ms: u64 = parse_var(&lookup, ENV_REQUEST_DELAY)?
            .unwrap_or(DEFAULT_REQUEST_DELAY_MS);

        if timeout_secs == 0 {
            anyhow::bail!("{} doit être supérieur à 0", ENV_FETCH_TIMEOUT);
        }

        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        Ok(Self {
            fetch_timeout: Duration::from_secs(timeout_secs),
            request_delay: Duration::from_millis(delay_ms),
            log_dir,
            defaults: MetricDefaults::default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            log_dir: default_log_dir(),
            defaults: MetricDefaults::default(),
        }
    }
}

/// Lit et parse une variable optionnelle
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Valeur invalide pour {} : {:?}", key, raw))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Répertoire de logs par défaut
/// - Linux : ~/.local/share/lazyrank/logs
/// - Sinon : ./logs
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("lazyrank").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.request_delay, Duration::from_millis(250));
        assert!(config.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_FETCH_TIMEOUT, "3"),
            (ENV_REQUEST_DELAY, " 0 "),
            (ENV_LOG_DIR, "/tmp/lazyrank"),
        ]))
        .unwrap();

        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/lazyrank"));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[(ENV_FETCH_TIMEOUT, "dix")])).unwrap_err();
        assert!(err.to_string().contains(ENV_FETCH_TIMEOUT));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[(ENV_FETCH_TIMEOUT, "0")])).is_err());
    }

    #[test]
    fn test_metric_defaults() {
        let defaults = MetricDefaults::default();
        assert_eq!(defaults.get(Metric::EbitdaMargin), 0.0);
        assert_eq!(defaults.get(Metric::DebtToEquity), 0.0);
        assert_eq!(defaults.get(Metric::AnalystRating), 3.0);
    }
}
