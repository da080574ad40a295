use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame;

use crate::core::{DialogBody, DialogButton, DialogView, FilterMode, ListSnapshot};
use crate::tui::constants::{APP_VERSION, EMPTY_STATE};
use crate::tui::helpers::{
    accent_title, build_help_lines, button_caption, button_rects, centered_rect, inset_rect,
    BG_ACCENT, BG_BASE, BG_DONE, BG_PANEL, FG_ACCENT, FG_DONE,
};

use super::{App, DialogHitboxes, Focus};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let snapshot = self.controller.snapshot();
        let dialog = self.controller.modal().current();

        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0], &snapshot);
        self.draw_filters(f, chunks[1], snapshot.filter);
        self.draw_input(f, chunks[2], &snapshot, dialog.is_none());
        self.draw_input_error(f, chunks[3], &snapshot);
        self.draw_body(f, chunks[4], &snapshot);
        self.draw_footer(f, chunks[5], dialog.as_ref());

        if self.show_help {
            self.draw_help_overlay(f, size);
        }

        let hitboxes = dialog.map(|view| self.draw_dialog(f, size, &view));
        self.hitboxes = hitboxes;
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect, snapshot: &ListSnapshot) {
        let line = Line::from(vec![
            Span::styled(
                format!(" tasklet v{} ✅ ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "· {} tasks, {} done",
                snapshot.total(),
                snapshot.done_count()
            )),
        ]);
        f.render_widget(
            Paragraph::new(line).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_filters(&self, f: &mut Frame<'_>, area: Rect, filter: FilterMode) {
        let titles: Vec<Line> = FilterMode::ALL
            .iter()
            .enumerate()
            .map(|(idx, mode)| Line::from(format!("{} {}", idx + 1, mode.label())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(filter.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Filter"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_input(&self, f: &mut Frame<'_>, area: Rect, snapshot: &ListSnapshot, active: bool) {
        let focused = self.focus == Focus::Input;
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("➕ New Task"))
            .border_style(border_style)
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(snapshot.input.as_str()).style(Style::default().bg(BG_PANEL)),
            inner,
        );

        if focused && active && !self.show_help && inner.width > 0 {
            let column = min(snapshot.input_cursor as u16, inner.width - 1);
            f.set_cursor(inner.x + column, inner.y);
        }
    }

    fn draw_input_error(&self, f: &mut Frame<'_>, area: Rect, snapshot: &ListSnapshot) {
        let Some(err) = snapshot.input_error else {
            return;
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(
                format!(" {err}"),
                Style::default().fg(FG_DONE),
            )])),
            area,
        );
    }

    fn draw_body(&mut self, f: &mut Frame<'_>, area: Rect, snapshot: &ListSnapshot) {
        let border_style = if self.focus == Focus::List {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("Tasks"))
            .border_style(border_style)
            .style(Style::default().bg(BG_PANEL));

        if snapshot.empty_state || snapshot.visible_count() == 0 {
            let inner = block.inner(area);
            f.render_widget(block, area);
            if inner.width == 0 || inner.height == 0 {
                return;
            }
            let lines = self.placeholder_lines(snapshot);
            let height = (lines.len() as u16).min(inner.height);
            let content_area = centered_rect(inner.width, height, inner);
            f.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .alignment(Alignment::Center)
                    .style(Style::default().bg(BG_PANEL)),
                content_area,
            );
            return;
        }

        let items: Vec<ListItem> = snapshot
            .visible()
            .map(|row| {
                let (mark, style) = if row.done {
                    (
                        "[x]",
                        Style::default()
                            .fg(FG_DONE)
                            .bg(BG_DONE)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    ("[ ]", Style::default())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{mark} "), Style::default().fg(Color::Gray)),
                    Span::styled(row.text.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn placeholder_lines(&self, snapshot: &ListSnapshot) -> Vec<Line<'static>> {
        let hint_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);

        if snapshot.empty_state {
            return vec![
                Line::from(vec![Span::styled(
                    EMPTY_STATE,
                    Style::default().fg(Color::Gray),
                )]),
                Line::default(),
                Line::from(vec![Span::styled(
                    "Type a task above and press Enter to add it.",
                    hint_style,
                )]),
            ];
        }

        vec![Line::from(vec![Span::styled(
            format!(
                "Nothing under '{}'. Press 1 to show all tasks.",
                snapshot.filter.label()
            ),
            hint_style,
        )])]
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect, dialog: Option<&DialogView>) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match (dialog, self.focus) {
            (Some(view), _) if view.is_prompt() => {
                "Enter to save ✏️ • Esc or click outside to cancel"
            }
            (Some(_), _) => "←/→ choose • Enter activates • y/n • Esc or click outside cancels",
            (None, _) if self.show_help => "Enter/Esc to close ❔",
            (None, Focus::Input) => "Enter add ✚ • Esc to the list • Ctrl+C quit",
            (None, Focus::List) => {
                "j/k move | space done ✅ | e rename ✏️ | x delete 🗑️ | D delete done | X delete all | 1/2/3 filter 🔍 | i input | h help | q quit"
            }
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(
                help,
                Style::default().fg(Color::DarkGray),
            )])),
            lines[1],
        );
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 90);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2));
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(format!("{combo:<16}"), Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::raw(desc),
                ])
            })
            .collect();
        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_dialog(&self, f: &mut Frame<'_>, area: Rect, view: &DialogView) -> DialogHitboxes {
        let width = min(area.width.saturating_sub(10), 60).max(min(area.width, 36));
        let height = if view.is_prompt() { 10 } else { 8 };
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let border = if view.is_prompt() {
            Style::default().fg(FG_ACCENT)
        } else {
            Style::default().fg(Color::Red)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&view.title))
            .border_style(border)
            .style(Style::default().bg(BG_PANEL));
        let inner = inset_rect(block.inner(popup_area), 1);
        f.render_widget(block, popup_area);

        let buttons_area = match &view.body {
            DialogBody::Message(message) => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(1), Constraint::Length(1)])
                    .split(inner);
                f.render_widget(
                    Paragraph::new(message.as_str())
                        .wrap(Wrap { trim: true })
                        .alignment(Alignment::Center)
                        .style(Style::default().fg(Color::White)),
                    rows[0],
                );
                rows[1]
            }
            DialogBody::Field {
                value,
                cursor_column,
                selected_all,
                error,
            } => {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(1),
                        Constraint::Min(0),
                        Constraint::Length(1),
                    ])
                    .split(inner);

                let field_block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray));
                let field_inner = field_block.inner(rows[0]);
                f.render_widget(field_block, rows[0]);
                let field_style = if *selected_all {
                    Style::default().fg(Color::Black).bg(FG_ACCENT)
                } else {
                    Style::default()
                };
                f.render_widget(
                    Paragraph::new(Line::from(vec![Span::styled(value.clone(), field_style)])),
                    field_inner,
                );
                if field_inner.width > 0 {
                    let column = min(*cursor_column as u16, field_inner.width - 1);
                    f.set_cursor(field_inner.x + column, field_inner.y);
                }

                if let Some(err) = error {
                    f.render_widget(
                        Paragraph::new(Line::from(vec![Span::styled(
                            err.to_string(),
                            Style::default().fg(FG_DONE),
                        )])),
                        rows[1],
                    );
                }
                rows[3]
            }
        };

        let (primary, secondary) =
            button_rects(buttons_area, &view.confirm_label, &view.cancel_label);
        let focused = Style::default()
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        let (primary_style, secondary_style) = match view.focus {
            DialogButton::Primary => (
                focused.bg(Color::Green),
                Style::default().fg(Color::Gray),
            ),
            DialogButton::Secondary => (
                Style::default().fg(Color::Green),
                focused.bg(Color::Gray),
            ),
        };
        f.render_widget(
            Paragraph::new(button_caption(&view.confirm_label)).style(primary_style),
            primary,
        );
        f.render_widget(
            Paragraph::new(button_caption(&view.cancel_label)).style(secondary_style),
            secondary,
        );

        DialogHitboxes {
            popup: popup_area,
            primary,
            secondary,
        }
    }
}
