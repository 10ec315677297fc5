//! Cookie Bakery rendering: stats, the cookie, and the shop.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::*;
use super::logic::{
    self, can_afford_generator, can_afford_upgrade, format_clock, format_eta, format_number,
};
use super::session::Session;

const COOKIE_ART: &[&str] = &["╭━●━●━╮", "━●━━●━●━", "╰━●━●━╯"];

pub fn render(session: &Session, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(area);

    if narrow {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),
                Constraint::Length(5),
                Constraint::Length(session.state().generators.len() as u16 + 3),
                Constraint::Min(3),
            ])
            .split(outer[0]);
        render_stats(session, f, chunks[0], click_state, narrow);
        render_cookie(session, f, chunks[1], click_state);
        render_generators(session, f, chunks[2], click_state, narrow);
        render_upgrades(session, f, chunks[3], click_state, narrow);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer[0]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(11), Constraint::Min(5)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(session.state().generators.len() as u16 * 2 + 3),
                Constraint::Min(3),
            ])
            .split(columns[1]);
        render_stats(session, f, left[0], click_state, narrow);
        render_cookie(session, f, left[1], click_state);
        render_generators(session, f, right[0], click_state, narrow);
        render_upgrades(session, f, right[1], click_state, narrow);
    }

    render_help(session, f, outer[1]);
}

fn render_stats(
    session: &Session,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let state = session.state();
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(
            format_number(state.cookies.floor()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" cookies", Style::default().fg(Color::Yellow)),
    ]));
    cl.push(Line::from(vec![
        Span::styled("per click ", label),
        Span::styled(format_number(state.cookies_per_click), value),
        Span::styled("  per second ", label),
        Span::styled(format_number(state.cookies_per_second), value),
    ]));
    if !narrow {
        cl.push(Line::from(vec![
            Span::styled("per minute ", label),
            Span::styled(format_number(logic::cookies_per_minute(state)), value),
        ]));
    }
    cl.push(Line::from(vec![
        Span::styled("baked all-time ", label),
        Span::styled(format_number(state.cookies_all_time.floor()), value),
    ]));
    cl.push(Line::from(vec![
        Span::styled("play time ", label),
        Span::styled(format_clock(session.play_time_ms()), value),
    ]));

    let goal = match logic::next_goal(state) {
        Some((generator, cost)) => {
            let eta = logic::seconds_until_affordable(state, cost as f64);
            format!("{} in {}", generator.name, format_eta(eta))
        }
        None => "everything affordable".to_string(),
    };
    cl.push(Line::from(vec![
        Span::styled("next ", label),
        Span::styled(goal, Style::default().fg(Color::Cyan)),
    ]));

    if session.offline_earnings > 0.0 && !narrow {
        cl.push(Line::from(Span::styled(
            format!(
                "+{} baked while you were away",
                format_number(session.offline_earnings.floor())
            ),
            Style::default().fg(Color::Green),
        )));
    }

    let save_line = if session.is_running() {
        let saved = match session.since_last_save_ms() {
            Some(ms) => format!(" Save now (saved {} ago)", format_clock(ms)),
            None => " Save now (not saved this session)".to_string(),
        };
        Line::from(vec![
            Span::styled("[S]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(saved, label),
        ])
    } else {
        Line::from(Span::styled(
            "Saved. The bakery is closed.",
            Style::default().fg(Color::Red),
        ))
    };
    cl.push_clickable(save_line, SAVE_NOW);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Cookie Bakery ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    drop(cs);

    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_cookie(
    session: &Session,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let color = if session.is_running() { Color::Yellow } else { Color::DarkGray };
    let mut lines: Vec<Line> = COOKIE_ART
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(color))))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("[C] +{} per click", format_number(session.state().cookies_per_click)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    // The whole panel is the cookie.
    click_state.borrow_mut().add_click_target(area, CLICK_COOKIE);

    f.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_generators(
    session: &Session,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let state = session.state();
    let mut cl = ClickableList::new();

    for (i, generator) in state.generators.iter().enumerate() {
        let cost = session
            .generator_cost(&generator.id)
            .unwrap_or_else(|| logic::generator_cost(generator));
        let affordable = can_afford_generator(state, generator);
        let (key_style, text_style) = if affordable {
            (
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };

        let line = Line::from(vec![
            Span::styled(format!("[{}] ", i + 1), key_style),
            Span::styled(format!("{:<8}", generator.name), text_style),
            Span::styled(format!(" x{:<3}", generator.owned), text_style),
            Span::styled(format!(" {} cookies", format_number(cost as f64)), text_style),
            Span::styled(
                format!("  +{}/s", format_number(generator.unit_yield)),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        cl.push_clickable(line, BUY_GENERATOR_BASE + i as u16);

        if !narrow {
            let mut detail = vec![Span::styled(
                format!("    {}", generator.description),
                Style::default().fg(Color::DarkGray),
            )];
            if generator.owned > 0 {
                detail.push(Span::styled(
                    format!("  ({}/s)", format_number(logic::generator_output(generator))),
                    Style::default().fg(Color::Cyan),
                ));
            }
            cl.push(Line::from(detail));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Generators ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    drop(cs);

    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_upgrades(
    session: &Session,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let state = session.state();
    let available = logic::available_upgrades(state);
    let mut cl = ClickableList::new();

    if available.is_empty() {
        cl.push(Line::from(Span::styled(
            "All upgrades purchased!",
            Style::default().fg(Color::Green),
        )));
    }

    for (i, upgrade) in available.iter().enumerate() {
        let key_hint = match UPGRADE_KEYS.get(i) {
            Some(key) => format!("[{}] ", key),
            None => "    ".to_string(),
        };
        let style = if can_afford_upgrade(state, upgrade) {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
            Span::styled(key_hint, style),
            Span::styled(upgrade.name.clone(), style),
            Span::styled(
                format!(" {} cookies", format_number(upgrade.cost as f64)),
                style,
            ),
        ]);
        cl.push_clickable(line, BUY_UPGRADE_BASE + i as u16);

        if !narrow {
            cl.push(Line::from(Span::styled(
                format!("    {}", upgrade.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Upgrades ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1);
    drop(cs);

    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_help(session: &Session, f: &mut Frame, area: Rect) {
    let text = if session.is_running() {
        " C/Space: bake  1-4: generator  Q/W/E: upgrade  S: save  Esc: close"
    } else {
        " R: reopen the bakery"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}
