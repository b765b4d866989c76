// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drawing a [`SessionView`] with ratatui.

use keyward_session::{Field, Level, Mode, Screen, SessionView};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Paragraph};

const NAV_HINT: &str =
    "s search | enter copy | e edit | n new | d delete | m passphrase | hjkl move | ctrl+c quit";
const SEARCH_HINT: &str = "type to search | tab complete | enter done";
const EDIT_HINT: &str = "tab/down next field | up previous | enter save | esc discard";
const PASSPHRASE_HINT: &str = "enter submit | esc back | ctrl+c quit";

pub fn draw(frame: &mut Frame, view: &SessionView<'_>) {
    let [body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    match view.screen {
        Screen::Entry => draw_passphrase(frame, body, view, "Unlock vault"),
        Screen::ChangePassphrase => draw_passphrase(frame, body, view, "Change passphrase"),
        Screen::Unlocked => draw_unlocked(frame, body, view),
    }
    draw_status(frame, status, view);
}

fn mask(len: usize) -> String {
    "*".repeat(len)
}

fn draw_passphrase(frame: &mut Frame, area: Rect, view: &SessionView<'_>, title: &str) {
    let state = view.passphrase;
    let first_label = if view.screen == Screen::Entry && !state.new_vault {
        "Passphrase"
    } else {
        "New passphrase"
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{first_label}: ")),
        Span::raw(mask(state.first_len)),
    ])];
    if state.confirming {
        lines.push(Line::from(vec![
            Span::raw("Confirm: "),
            Span::raw(mask(state.second_len)),
        ]));
    }
    if view.screen == Screen::Entry && state.new_vault {
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "No vault found; a new one will be created.",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let [_, centered, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(title.to_owned())),
        centered,
    );
}

fn draw_unlocked(frame: &mut Frame, area: Rect, view: &SessionView<'_>) {
    let [query_area, main] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(main);

    let mut query = vec![Span::raw(view.query.to_owned())];
    if view.mode == Mode::Search {
        if let Some(completion) = view.completion {
            let rest = completion.chars().skip(view.query.chars().count()).collect::<String>();
            query.push(Span::styled(rest, Style::default().fg(Color::DarkGray)));
        }
    }
    let query_style = if view.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    frame.render_widget(
        Paragraph::new(Line::from(query))
            .block(Block::bordered().title("Search").border_style(query_style)),
        query_area,
    );

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .map(|row| {
            let style = if row.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(row.source.to_owned(), style.add_modifier(Modifier::BOLD)),
                Span::styled(format!("  {}", row.username), style),
            ]))
        })
        .collect();
    let list_title = format!(
        "Credentials ({} of {}, {} total)",
        view.page + 1,
        view.pages,
        view.total_results
    );
    frame.render_widget(List::new(items).block(Block::bordered().title(list_title)), list_area);

    draw_detail(frame, detail_area, view);
}

fn draw_detail(frame: &mut Frame, area: Rect, view: &SessionView<'_>) {
    let Some(detail) = &view.detail else {
        frame.render_widget(Block::bordered().title("Details"), area);
        return;
    };

    let label = |field: Field, name: &str| {
        if detail.focus == Some(field) {
            Span::styled(format!("> {name}: "), Style::default().fg(Color::Yellow))
        } else {
            Span::raw(format!("  {name}: "))
        }
    };
    let lines = vec![
        Line::from(vec![label(Field::Source, "Source"), Span::raw(detail.source.to_owned())]),
        Line::from(vec![
            label(Field::Username, "Username"),
            Span::raw(detail.username.to_owned()),
        ]),
        Line::from(vec![
            label(Field::Password, "Password"),
            Span::raw(mask(detail.password_len)),
        ]),
    ];
    let title = match (detail.focus, detail.is_new) {
        (Some(_), true) => "New credential",
        (Some(_), false) => "Edit credential",
        (None, _) => "Details",
    };
    frame.render_widget(Paragraph::new(lines).block(Block::bordered().title(title)), area);
}

fn draw_status(frame: &mut Frame, area: Rect, view: &SessionView<'_>) {
    let line = match view.notification {
        Some(notification) => {
            let color = match notification.level {
                Level::Error => Color::Red,
                Level::Success => Color::Green,
                Level::Info => Color::Cyan,
            };
            Line::styled(notification.message.clone(), Style::default().fg(color))
        }
        None => {
            let hint = match (view.screen, view.mode) {
                (Screen::Unlocked, Mode::Navigate) => NAV_HINT,
                (Screen::Unlocked, Mode::Search) => SEARCH_HINT,
                (Screen::Unlocked, Mode::Edit) => EDIT_HINT,
                _ => PASSPHRASE_HINT,
            };
            Line::styled(hint, Style::default().fg(Color::DarkGray))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}
