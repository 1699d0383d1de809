// ============================================================================
// LazyRank - Classement de tickers par analyse fondamentale
// ============================================================================
// Programme TUI : saisie de tickers, notation sur 20 via Yahoo Finance,
// classement trié et détail du dernier ticker ajouté
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : runtime.block_on() pour les appels API
// 4. Un seul thread : App est possédée par la boucle, sans Arc/Mutex
// ============================================================================

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

use lazyrank::api::YahooClient;
use lazyrank::app::{App, AppCommand};
use lazyrank::config::Config;
use lazyrank::ranking::{build_ranking, RankingOptions};
use lazyrank::ui::{render, EventHandler};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - LAZYRANK_LOG_DIR si défini
/// - Linux : ~/.local/share/lazyrank/logs/lazyrank.log
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/lazyrank/logs/lazyrank.log
/// RUST_LOG=lazyrank=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(&config.log_dir)
        .context("Échec de la création du répertoire de logs")?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, config.log_dir.clone(), "lazyrank.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour lazyrank, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyrank=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = ?config.log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::from_env().context("Configuration invalide")?;

    // Logging avant tout le reste ; en cas d'échec on continue sans logs
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "LazyRank starting up");

    let runtime = Runtime::new().context("Échec de la création du runtime tokio")?;
    let client = YahooClient::new(&config)?;
    let options = RankingOptions::from(&config);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &runtime, &client, options);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Dessiner l'interface (render)
//   2. Traiter l'événement (input)
//   3. Exécuter la commande éventuelle (notation bloquante)
// ============================================================================

fn run(
    terminal: &mut Tui,
    app: &mut App,
    events: &EventHandler,
    runtime: &Runtime,
    client: &YahooClient,
    options: RankingOptions,
) -> Result<()> {
    while app.is_running() {
        terminal.draw(|frame| render(frame, app))?;

        let event = match events.next() {
            Ok(event) => event,
            Err(e) => {
                error!(error = ?e, "Failed to read terminal event");
                continue;
            }
        };

        if let Some(command) = app.handle_event(&event) {
            execute_command(terminal, app, command, runtime, client, options)?;
        }
    }

    Ok(())
}

/// Exécute une commande : ici, la notation complète de la liste
///
/// CONCEPT : Requête synchrone par interaction
/// - On affiche d'abord l'indicateur de chargement
/// - Puis runtime.block_on() : fetch séquentiel de chaque ticker
/// - Un ticker en erreur n'interrompt pas les autres
fn execute_command(
    terminal: &mut Tui,
    app: &mut App,
    command: AppCommand,
    runtime: &Runtime,
    client: &YahooClient,
    options: RankingOptions,
) -> Result<()> {
    match command {
        AppCommand::Rescore => {
            if app.tickers.is_empty() {
                app.ranking = None;
                return Ok(());
            }

            app.start_loading(Some(format!(
                "Notation de {} ticker(s)...",
                app.tickers.len()
            )));
            terminal.draw(|frame| render(frame, app))?;

            info!(tickers = app.tickers.len(), "Rescoring ticker list");
            let ranking = runtime.block_on(build_ranking(
                &app.tickers,
                options,
                move |symbol| async move { client.fetch_scorecard(&symbol).await },
            ));

            app.apply_ranking(ranking);
            app.stop_loading();
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
