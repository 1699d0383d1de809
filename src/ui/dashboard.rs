// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le classement des tickers et le détail du dernier ajouté
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Table / Row / Cell : tableaux avec colonnes
// 3. Layout : découpage de l'espace en zones
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::{Scorecard, Tier};
use crate::ranking::{Detail, Ranking, DETAIL_UNAVAILABLE};

/// Hauteur du tableau de détail : 8 critères + en-tête + bordures
const DETAIL_HEIGHT: u16 = 11;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let show_detail = app
        .ranking
        .as_ref()
        .map(|ranking| ranking.detail().is_some())
        .unwrap_or(false);

    let chunks = create_layout(frame.size(), show_detail);

    render_header(frame, app, chunks[0]);
    render_ranking(frame, app, chunks[1]);
    if show_detail {
        render_detail(frame, app, chunks[2]);
    }

    if let Some(&footer) = chunks.last() {
        match app.current_screen {
            Screen::Ranking => render_footer(frame, app, footer),
            Screen::InputMode => render_input_footer(frame, app, footer),
        }
    }
}

/// Crée le layout principal (header, classement, [détail], footer)
fn create_layout(area: Rect, show_detail: bool) -> Vec<Rect> {
    let mut constraints = vec![Constraint::Length(4), Constraint::Min(5)];
    if show_detail {
        constraints.push(Constraint::Length(DETAIL_HEIGHT));
    }
    constraints.push(Constraint::Length(4));

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre + statut
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyRank ")
        .title_alignment(Alignment::Center);

    let title = Line::from(Span::styled(
        "📊 Classement de tickers US (scoring auto)",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ));

    // Ligne de statut : chargement > message > heure de notation
    let status = if let (true, Some(message)) = (app.is_loading, app.loading_message.as_ref()) {
        Line::from(Span::styled(
            format!("⏳ {}", message),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(message) = &app.status_message {
        Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(ranking) = &app.ranking {
        Line::from(Span::styled(
            format!(
                "{} ticker(s) notés à {}",
                ranking.rows().len(),
                ranking.scored_at().format("%H:%M:%S")
            ),
            Style::default().fg(Color::Gray),
        ))
    } else {
        Line::from(Span::styled(
            "Ajoutez vos tickers, ils sont classés selon leur note sur 20",
            Style::default().fg(Color::Gray),
        ))
    };

    let paragraph = Paragraph::new(vec![title, status])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Classement
// ============================================================================

fn render_ranking(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Classement des entreprises ");

    let ranking = match &app.ranking {
        Some(ranking) if !app.tickers.is_empty() => ranking,
        _ => {
            let message = if app.tickers.is_empty() {
                "Ajoutez un ou plusieurs tickers pour commencer la comparaison."
            } else {
                "Notation en attente..."
            };
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
            ])
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    frame.render_widget(ranking_table(ranking).block(block), area);
}

/// Tableau {Rang, Entreprise, Note sur 20}
fn ranking_table(ranking: &Ranking) -> Table<'static> {
    let header = Row::new(vec!["#", "Entreprise", "Note sur 20"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = ranking
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let style = match row.scorecard() {
                Some(card) => Style::default().fg(score_color(card)),
                None => Style::default().fg(Color::Red),
            };

            Row::new(vec![
                Cell::from(format!("{}", index + 1)),
                Cell::from(row.entity_label()),
                Cell::from(row.display_score()),
            ])
            .style(style)
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(16),
        ],
    )
    .header(header)
}

/// Couleur de la note : vert au-dessus de 15, jaune au-dessus de 10
fn score_color(card: &Scorecard) -> Color {
    let tenths = card.total_tenths();
    if tenths >= 150 {
        Color::Green
    } else if tenths >= 100 {
        Color::Yellow
    } else {
        Color::Red
    }
}

// ============================================================================
// Détail du dernier ticker ajouté
// ============================================================================

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let detail = match app.ranking.as_ref().and_then(Ranking::detail) {
        Some(detail) => detail,
        None => return,
    };

    match detail {
        Detail::Card(card) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(
                    " Détail des scores pour : {} ({}/20) ",
                    card.symbol,
                    card.display_score()
                ));
            frame.render_widget(detail_table(card).block(block), area);
        }
        Detail::Unavailable { symbol, reason } => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(format!(" Détail des scores pour : {} ", symbol));
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    DETAIL_UNAVAILABLE,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(reason.to_string(), Style::default().fg(Color::Gray))),
            ])
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
    }
}

/// Tableau {Critère, Valeur, Score, Points}
fn detail_table(card: &Scorecard) -> Table<'static> {
    let header = Row::new(vec!["Critère", "Valeur", "Score", "Points"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = card
        .lines
        .iter()
        .map(|line| {
            Row::new(vec![
                Cell::from(line.metric.label()),
                Cell::from(format!("{:.2}", line.value)),
                Cell::from(line.tier.label()).style(Style::default().fg(tier_color(line.tier))),
                Cell::from(format!("{:.1}", line.points())),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header)
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::Chocolate => Color::Rgb(123, 63, 0),
        Tier::Bronze => Color::Rgb(205, 127, 50),
        Tier::Silver => Color::Gray,
        Tier::Gold => Color::Yellow,
    }
}

// ============================================================================
// Footer : raccourcis / confirmations
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let warning = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let blinking_key = Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::SLOW_BLINK);
    let key = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_clear_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", warning),
            Span::styled("[c]", blinking_key),
            Span::styled(
                format!(
                    " à nouveau pour effacer {} ticker(s), ou autre touche pour annuler ⚠",
                    app.tickers.len()
                ),
                warning,
            ),
        ])
    } else if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", warning),
            Span::styled("[q]", blinking_key),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                warning,
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled("[a]", key(Color::Green)),
            Span::raw(" Ajouter  "),
            Span::styled("[c]", key(Color::Red)),
            Span::raw(" Clear  "),
            Span::styled("[r]", key(Color::Yellow)),
            Span::raw(" Renoter  "),
            Span::styled("[q]", key(Color::Yellow)),
            Span::raw(" Quit"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.input_buffer.to_uppercase(),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            "█",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled(
            "[Enter]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Ajouter  "),
        Span::styled(
            "[ESC]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Annuler"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests : rendu sur un TestBackend (pas de vrai terminal)
// ============================================================================
