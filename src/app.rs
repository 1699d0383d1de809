// ============================================================================
// Structure : App
// ============================================================================
// État de la session interactive (une instance = une session utilisateur)
//
// CONCEPTS RUST :
// 1. State Management : toute l'UI lit depuis App
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Ownership : App possède sa TickerList, aucun état global
// 4. Dispatch des touches : handle_event() retourne une commande,
//    la boucle principale l'exécute (fetch bloquant)
// ============================================================================

use tracing::{debug, info};

use crate::models::TickerList;
use crate::ranking::Ranking;
use crate::ui::events::{
    get_char_from_event, is_add_event, is_backspace_event, is_clear_event, is_enter_event,
    is_escape_event, is_quit_event, is_refresh_event, is_ticker_char_event, Event,
};

/// Prompt du mode saisie
pub const INPUT_PROMPT: &str = "Ticker US (ex: AAPL) : ";

/// Commande produite par un événement, exécutée par la boucle principale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Renoter tous les tickers de la liste
    Rescore,
}

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : classement + détail
    Ranking,

    /// Mode saisie : capture du ticker à ajouter
    /// - Enter valide, ESC annule
    InputMode,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Tickers saisis pendant la session
    pub tickers: TickerList,

    /// Dernier classement calculé (None tant que la liste est vide)
    pub ranking: Option<Ranking>,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' arme, seconde quitte
    pub confirm_quit: bool,

    /// Two-step clear : première pression de 'c' arme, seconde vide la liste
    pub confirm_clear: bool,

    /// Notation en cours (affiche un indicateur)
    pub is_loading: bool,

    /// Message affiché pendant la notation
    pub loading_message: Option<String>,

    /// Buffer de saisie pour le mode Input
    pub input_buffer: String,

    /// Prompt affiché en mode Input (ex: "Ticker US (ex: AAPL) : ")
    pub input_prompt: String,

    /// Dernier message d'information (ex: ticker déjà présent)
    pub status_message: Option<String>,
}

impl App {
    /// Crée une session vide
    pub fn new() -> Self {
        Self {
            running: true,
            tickers: TickerList::new(),
            ranking: None,
            current_screen: Screen::Ranking,
            confirm_quit: false,
            confirm_clear: false,
            is_loading: false,
            loading_message: None,
            input_buffer: String::new(),
            input_prompt: String::new(),
            status_message: None,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Liste des tickers
    // ========================================================================

    /// Ajoute un ticker à la session
    ///
    /// Retourne true si la liste a changé. Un doublon ou une saisie vide
    /// laisse la liste intacte et pose un message de statut.
    pub fn add_ticker(&mut self, input: &str) -> bool {
        let symbol = TickerList::normalize(input);

        if symbol.is_empty() {
            self.status_message = Some("Saisie vide, rien à ajouter".to_string());
            return false;
        }
        if self.tickers.contains(&symbol) {
            self.status_message = Some(format!("{} est déjà dans la liste", symbol));
            return false;
        }

        self.status_message = None;
        self.tickers.add(&symbol)
    }

    /// Vide la liste et le classement
    pub fn clear_tickers(&mut self) {
        self.tickers.clear();
        self.ranking = None;
        self.confirm_clear = false;
        self.status_message = None;
    }

    /// Remplace le classement affiché
    pub fn apply_ranking(&mut self, ranking: Ranking) {
        self.ranking = Some(ranking);
    }

    // ========================================================================
    // Confirmations two-step
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn request_clear(&mut self) {
        self.confirm_clear = true;
    }

    pub fn is_awaiting_clear_confirmation(&self) -> bool {
        self.confirm_clear
    }

    pub fn cancel_clear(&mut self) {
        self.confirm_clear = false;
    }

    /// Annule toute confirmation en attente (autre touche pressée)
    pub fn cancel_confirmations(&mut self) {
        self.cancel_quit();
        self.cancel_clear();
    }

    // ========================================================================
    // Chargement
    // ========================================================================

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    // ========================================================================
    // Input Mode Management
    // ========================================================================

    /// Entre en mode input avec un prompt donné
    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    /// Annule le mode input et retourne au classement
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Ranking;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Récupère la valeur saisie et retourne au classement
    ///
    /// CONCEPT RUST : std::mem::take
    /// - Prend le contenu du buffer et le remplace par String::new()
    /// - Pas de clone
    pub fn submit_input(&mut self) -> String {
        self.current_screen = Screen::Ranking;
        self.input_prompt.clear();
        std::mem::take(&mut self.input_buffer)
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    // ========================================================================
    // Gestion des événements
    // ========================================================================

    /// Traite un événement clavier et met à jour l'état
    ///
    /// Retourne la commande à exécuter (notation) le cas échéant.
    /// Une liste vide ne déclenche jamais de notation.
    pub fn handle_event(&mut self, event: &Event) -> Option<AppCommand> {
        if matches!(event, Event::Tick) {
            return None;
        }

        if self.is_in_input_mode() {
            return self.handle_input_event(event);
        }

        if is_quit_event(event) {
            self.cancel_clear();
            if self.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                self.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                self.request_quit();
            }
            return None;
        }

        if is_clear_event(event) {
            self.cancel_quit();
            if self.is_awaiting_clear_confirmation() {
                info!(tickers = self.tickers.len(), "User confirmed clear");
                self.clear_tickers();
            } else {
                info!("User requested clear (awaiting confirmation)");
                self.request_clear();
            }
            return None;
        }

        // Toute autre touche annule les confirmations
        self.cancel_confirmations();

        if is_add_event(event) {
            info!("User requested add ticker");
            self.status_message = None;
            self.start_input(INPUT_PROMPT.to_string());
            None
        } else if is_refresh_event(event) {
            info!("User requested rescore");
            self.rescore_command()
        } else {
            None
        }
    }

    /// Input Mode : saisie du ticker
    fn handle_input_event(&mut self, event: &Event) -> Option<AppCommand> {
        if is_escape_event(event) {
            info!("User cancelled input");
            self.cancel_input();
        } else if is_enter_event(event) {
            let input = self.submit_input();
            if self.add_ticker(&input) {
                info!(ticker = %TickerList::normalize(&input), "Ticker added");
            } else {
                debug!(input = %input, "Ticker ignored (empty or duplicate)");
            }
            // Chaque soumission renote toute la liste
            return self.rescore_command();
        } else if is_backspace_event(event) {
            self.backspace();
        } else if is_ticker_char_event(event) {
            if let Some(c) = get_char_from_event(event) {
                self.append_char(c);
            }
        }
        None
    }

    fn rescore_command(&self) -> Option<AppCommand> {
        if self.tickers.is_empty() {
            None
        } else {
            Some(AppCommand::Rescore)
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Fundamentals, Scorecard};
    use crate::ranking::{Outcome, RankedRow};
    use crate::rubric;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn char_key(c: char) -> Event {
        key(KeyCode::Char(c))
    }

    /// Ouvre la saisie, tape le texte puis valide
    fn submit(app: &mut App, text: &str) -> Option<AppCommand> {
        assert_eq!(app.handle_event(&char_key('a')), None);
        for c in text.chars() {
            app.handle_event(&char_key(c));
        }
        app.handle_event(&key(KeyCode::Enter))
    }

    fn scored(symbol: &str) -> RankedRow {
        let card: Scorecard = rubric::evaluate(
            symbol,
            &Fundamentals::new([40.0, 30.0, 0.2, 3.5, 3.5, 15.0, 30.0, 1.2]),
        );
        RankedRow {
            symbol: symbol.to_string(),
            outcome: Outcome::Scored(card),
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.tickers.is_empty());
        assert!(app.ranking.is_none());
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_add_ticker_and_duplicate() {
        let mut app = App::new();
        assert!(app.add_ticker("aapl"));
        assert!(app.status_message.is_none());

        assert!(!app.add_ticker("AAPL"));
        assert_eq!(app.tickers.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("AAPL est déjà dans la liste"));
    }

    #[test]
    fn test_add_empty_ticker() {
        let mut app = App::new();
        assert!(!app.add_ticker("  "));
        assert!(app.tickers.is_empty());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_clear_drops_ranking() {
        let mut app = App::new();
        app.add_ticker("GOLD");
        app.apply_ranking(Ranking::new(vec![scored("GOLD")], Some("GOLD".to_string())));
        app.request_clear();

        app.clear_tickers();

        assert!(app.tickers.is_empty());
        assert!(app.ranking.is_none());
        assert!(!app.is_awaiting_clear_confirmation());

        // Clear sur une session vide : rien ne casse
        app.clear_tickers();
        assert!(app.tickers.is_empty());
    }

    #[test]
    fn test_confirmations() {
        let mut app = App::new();
        app.request_quit();
        app.request_clear();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_awaiting_clear_confirmation());

        app.cancel_confirmations();
        assert!(!app.is_awaiting_quit_confirmation());
        assert!(!app.is_awaiting_clear_confirmation());
    }

    #[test]
    fn test_input_mode() {
        let mut app = App::new();
        app.start_input("Ticker : ".to_string());
        assert!(app.is_in_input_mode());

        app.append_char('m');
        app.append_char('s');
        app.append_char('x');
        app.backspace();
        app.append_char('f');
        app.append_char('t');

        let value = app.submit_input();
        assert_eq!(value, "msft");
        assert!(app.input_buffer.is_empty());
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_cancel_input() {
        let mut app = App::new();
        app.start_input("Ticker : ".to_string());
        app.append_char('a');
        app.cancel_input();

        assert!(!app.is_in_input_mode());
        assert!(app.input_buffer.is_empty());
        assert!(app.input_prompt.is_empty());
    }

    #[test]
    fn test_loading_state() {
        let mut app = App::new();
        app.start_loading(Some("Notation...".to_string()));
        assert!(app.is_loading);
        app.stop_loading();
        assert!(!app.is_loading);
        assert!(app.loading_message.is_none());
    }

    #[test]
    fn test_enter_adds_and_rescores() {
        let mut app = App::new();
        assert_eq!(submit(&mut app, "aapl"), Some(AppCommand::Rescore));
        assert_eq!(app.tickers.last(), Some("AAPL"));
        assert!(!app.is_in_input_mode());
    }

    #[test]
    fn test_enter_with_duplicate_or_empty_still_rescores_non_empty_list() {
        let mut app = App::new();
        submit(&mut app, "MSFT");

        assert_eq!(submit(&mut app, "msft"), Some(AppCommand::Rescore));
        assert_eq!(app.tickers.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("MSFT est déjà dans la liste"));

        assert_eq!(submit(&mut app, ""), Some(AppCommand::Rescore));
        assert_eq!(app.tickers.len(), 1);
    }

    #[test]
    fn test_empty_list_never_rescores() {
        let mut app = App::new();
        assert_eq!(submit(&mut app, ""), None);
        assert_eq!(app.handle_event(&char_key('r')), None);
        assert!(app.tickers.is_empty());
    }

    #[test]
    fn test_refresh_rescores_non_empty_list() {
        let mut app = App::new();
        submit(&mut app, "GOLD");
        assert_eq!(app.handle_event(&char_key('r')), Some(AppCommand::Rescore));
    }

    #[test]
    fn test_clear_is_two_step_and_does_not_rescore() {
        let mut app = App::new();
        submit(&mut app, "GOLD");
        app.apply_ranking(Ranking::new(vec![scored("GOLD")], Some("GOLD".to_string())));

        assert_eq!(app.handle_event(&char_key('c')), None);
        assert!(app.is_awaiting_clear_confirmation());
        assert_eq!(app.tickers.len(), 1);

        assert_eq!(app.handle_event(&char_key('c')), None);
        assert!(app.tickers.is_empty());
        assert!(app.ranking.is_none());
        assert!(!app.is_awaiting_clear_confirmation());
    }

    #[test]
    fn test_other_key_cancels_confirmations() {
        let mut app = App::new();
        submit(&mut app, "GOLD");

        app.handle_event(&char_key('c'));
        app.handle_event(&char_key('x'));
        assert!(!app.is_awaiting_clear_confirmation());

        // 'c' après annulation : ré-arme seulement, la liste reste intacte
        app.handle_event(&char_key('c'));
        assert_eq!(app.tickers.len(), 1);

        app.handle_event(&char_key('q'));
        assert!(app.is_awaiting_quit_confirmation());
        assert!(!app.is_awaiting_clear_confirmation());

        app.handle_event(&key(KeyCode::Esc));
        assert!(!app.is_awaiting_quit_confirmation());
        assert!(app.is_running());
    }

    #[test]
    fn test_quit_is_two_step() {
        let mut app = App::new();
        app.handle_event(&char_key('q'));
        assert!(app.is_running());
        app.handle_event(&char_key('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_escape_cancels_input() {
        let mut app = App::new();
        app.handle_event(&char_key('a'));
        app.handle_event(&char_key('z'));
        app.handle_event(&char_key(' '));

        assert_eq!(app.input_buffer, "z");
        assert_eq!(app.handle_event(&key(KeyCode::Esc)), None);
        assert!(!app.is_in_input_mode());
        assert!(app.tickers.is_empty());
    }

    #[test]
    fn test_tick_is_ignored() {
        let mut app = App::new();
        app.request_quit();
        assert_eq!(app.handle_event(&Event::Tick), None);
        assert!(app.is_awaiting_quit_confirmation());
    }
}
