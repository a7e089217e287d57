use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Wrap,
        block::{Position, Title},
    },
};

use crate::app::App;
use crate::models::{COPY_ALL_KEY, FocusArea, format_hashtags};
use crate::theme::Theme;

const PLACEHOLDER: &str = "Enter a topic, e.g., 'summer travel'";

/// Draws the whole screen from `app`.
pub fn render(f: &mut Frame, app: &App) {
    let theme = app.theme.palette();
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.root_bg).fg(theme.text)),
        area,
    );

    let error_height = if app.request.error().is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(error_height),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, app, &theme, chunks[0]);
    render_topic(f, app, &theme, chunks[1]);
    if let Some(error) = app.request.error() {
        let banner = Paragraph::new(error)
            .style(theme.error)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(theme.error));
        f.render_widget(banner, chunks[2]);
    }
    render_results(f, app, &theme, chunks[3]);
    render_footer(f, app, &theme, chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled("AI Hashtag Generator", theme.title),
            Span::styled(
                format!("   theme: {}", app.theme.label()),
                Style::default().fg(theme.text_secondary),
            ),
        ]),
        Line::from(Span::styled(
            "Boost your social media presence with perfectly crafted hashtags.",
            Style::default().fg(theme.text_secondary),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn border_style(theme: &Theme, focused: bool) -> Style {
    if focused {
        Style::default().fg(theme.focus_border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.blurred_border)
    }
}

fn render_topic(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let focused = app.focus == FocusArea::Topic;
    let title = if app.is_loading() {
        "Topic (generating...)"
    } else {
        "Topic [Enter to generate]"
    };

    let line = if app.topic.is_empty() && !app.is_loading() {
        Line::from(vec![
            Span::styled(if focused { "▏" } else { "" }, Style::default().fg(theme.accent)),
            Span::styled(PLACEHOLDER, Style::default().fg(theme.text_secondary).add_modifier(Modifier::ITALIC)),
        ])
    } else {
        let text_style = if app.is_loading() {
            Style::default().fg(theme.text_secondary).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(theme.text)
        };
        let mut spans = vec![Span::styled(app.topic.clone(), text_style)];
        if focused && !app.is_loading() {
            spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
        }
        Line::from(spans)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(theme, focused));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_results(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    if app.is_loading() {
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Generating awesome hashtags...", Style::default().fg(theme.accent))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border_style(theme, false)));
        f.render_widget(para, area);
        return;
    }

    let Some(hashtags) = app.hashtags() else {
        if app.request.error().is_none() {
            let para = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Ready to trend?", theme.category)),
                Line::from(Span::styled(
                    "Enter a topic above to generate your hashtags.",
                    Style::default().fg(theme.text_secondary),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border_style(theme, false)));
            f.render_widget(para, area);
        }
        return;
    };

    let focused = app.focus == FocusArea::Results;
    let selected_count = app.selected_hashtags().len();
    let copy_all_label = if app.copied_key() == Some(COPY_ALL_KEY) {
        Span::styled(" Copied! ", theme.copied)
    } else {
        Span::styled(
            format!(" Copy all selected ({}) [a] ", selected_count),
            Style::default().fg(theme.accent),
        )
    };

    // Room for borders and the highlight symbol plus checkbox indent.
    let tag_width = area.width.saturating_sub(2 + 2 + 4) as usize;
    let categories = app.visible_categories();
    let items: Vec<ListItem> = categories
        .iter()
        .map(|category| {
            let checked = app.is_selected(&category.name);
            let copied = app.copied_key() == Some(category.name.as_str());
            let mut lines = vec![Line::from(vec![
                Span::raw(if checked { "[x] " } else { "[ ] " }),
                Span::styled(
                    capitalize(&category.name),
                    if checked { theme.category } else { theme.category_unchecked },
                ),
                Span::raw("  "),
                if copied {
                    Span::styled("Copied", theme.copied)
                } else {
                    Span::styled("[c] Copy", Style::default().fg(theme.text_secondary))
                },
            ])];
            if checked {
                for row in wrap_tags(&format_hashtags(&category.tags), tag_width) {
                    lines.push(Line::from(vec![Span::raw("    "), Span::styled(row, theme.hashtag)]));
                }
            }
            ListItem::new(lines)
        })
        .collect();

    let block = Block::default()
        .title(Title::from(Span::styled(" Your Hashtags ", theme.title)))
        .title(Title::from(copy_all_label).alignment(Alignment::Right))
        .title(
            Title::from(Span::styled(
                format!(" {} tags in {} categories ", hashtags.total_tags(), hashtags.categories().len()),
                Style::default().fg(theme.text_secondary),
            ))
            .position(Position::Bottom)
            .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_style(border_style(theme, focused));

    let list = List::new(items)
        .block(block)
        .highlight_symbol("→ ")
        .highlight_style(Style::default().fg(theme.selection_fg));
    let mut state = ListState::default();
    if focused && !categories.is_empty() {
        state.select(Some(app.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn render_footer(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let hints = match app.focus {
        FocusArea::Topic => "Enter Generate | Tab Results | Ctrl+U Clear | Ctrl+T Theme | Esc Quit",
        FocusArea::Results => {
            "↑/↓ or j/k Move | Space Toggle | c Copy category | a Copy selected | t Theme | Tab Topic | q Quit"
        }
    };
    let footer = Paragraph::new(hints)
        .block(Block::default().borders(Borders::ALL).border_style(border_style(theme, false)))
        .style(theme.footer);
    f.render_widget(footer, area);
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Breaks `#a #b #c` into rows no wider than `width`, never splitting a tag.
pub fn wrap_tags(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::mock::MockClipboard;
    use crate::models::sample_hashtags;
    use crate::theme::ThemeMode;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Instant;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn wrap_keeps_tags_whole() {
        assert_eq!(wrap_tags("#aa #bb #cc", 7), vec!["#aa #bb", "#cc"]);
        assert_eq!(wrap_tags("#averylongtag", 4), vec!["#averylongtag"]);
        assert!(wrap_tags("", 10).is_empty());
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("popular"), "Popular");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn idle_screen_shows_empty_state() {
        let app = App::new(ThemeMode::Dark);
        let text = screen(&app);
        assert!(text.contains("AI Hashtag Generator"));
        assert!(text.contains("Ready to trend?"));
        assert!(text.contains(PLACEHOLDER));
    }

    #[test]
    fn loading_screen() {
        let mut app = App::new(ThemeMode::Dark);
        app.topic = "cats".to_string();
        app.submit();
        let text = screen(&app);
        assert!(text.contains("Generating awesome hashtags..."));
        assert!(!text.contains("Ready to trend?"));
    }

    #[test]
    fn results_screen_lists_non_empty_categories() {
        let mut app = App::new(ThemeMode::Dark);
        app.topic = "summer travel".to_string();
        app.submit();
        app.finish_generation(Ok(sample_hashtags()));
        app.toggle_category("niche");

        let text = screen(&app);
        assert!(text.contains("[x] Popular"));
        assert!(text.contains("[ ] Niche"));
        assert!(!text.contains("Community"));
        assert!(text.contains("#sun #beach"));
        assert!(!text.contains("#coastalhiking"));
        assert!(text.contains("Copy all selected (3)"));

        let mut cb = MockClipboard::default();
        app.copy_all(&mut cb, Instant::now());
        assert!(screen(&app).contains("Copied!"));
    }

    #[test]
    fn error_banner_replaces_empty_state() {
        let mut app = App::new(ThemeMode::Light);
        app.topic = "cats".to_string();
        app.submit();
        app.finish_generation(Err(crate::error::ServiceError::EmptyResponse));
        let text = screen(&app);
        assert!(text.contains("Failed to generate hashtags"));
        assert!(!text.contains("Ready to trend?"));
        assert!(text.contains("theme: light"));
    }
}
