//! One page per view.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Padding, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::LinkRegion;
use crate::{
    content::{Contact, Game, Link, Project, SiteContent, SkillCategory},
    view::View,
};

const PANEL: Color = Color::Black;
const ACCENT: Color = Color::LightGreen;
const MUTED: Color = Color::Gray;
const LINK: Color = Color::LightCyan;

/// Widest a page column gets.
const MAX_WIDTH: u16 = 96;

/// Renders `view` into `area`, registering every link it draws.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: View,
    content: &SiteContent,
    links: &mut Vec<LinkRegion>,
) {
    let area = centered(area.inner(ratatui::layout::Margin::new(1, 1)), MAX_WIDTH);
    if area.is_empty() {
        return;
    }
    match view {
        View::Home => home(frame, area, content, links),
        View::About => about(frame, area, content),
        View::Skills => skills(frame, area, &content.skills),
        View::Projects => projects(frame, area, &content.projects, links),
        View::Games => games(frame, area, &content.games, links),
        View::Contact => contact(frame, area, &content.contact, links),
    }
}

fn centered(area: Rect, max_width: u16) -> Rect {
    let [_, column, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(max_width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(area);
    column
}

fn panel(title: &str) -> Block<'_> {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(Color::DarkGray))
        .padding(Padding::horizontal(1))
        .style(Style::new().bg(PANEL).fg(Color::White));
    if title.is_empty() {
        block
    } else {
        block.title(Line::from(format!(" {title} ")).bold().fg(ACCENT).centered())
    }
}

/// Draws `label` as a link on the first row of `row` and records where.
fn link(
    frame: &mut Frame,
    row: Rect,
    label: &str,
    url: &str,
    alignment: Alignment,
    links: &mut Vec<LinkRegion>,
) {
    let width = (label.width() as u16).min(row.width);
    let x = match alignment {
        Alignment::Left => row.x,
        Alignment::Center => row.x + (row.width - width) / 2,
        Alignment::Right => row.right() - width,
    };
    let area = Rect::new(x, row.y, width, row.height.min(1));
    if area.is_empty() {
        return;
    }
    frame.render_widget(Span::styled(label, Style::new().fg(LINK).underlined()), area);
    links.push(LinkRegion {
        area,
        url: url.to_owned(),
    });
}

/// Draws `items` side by side, centered on `row`.
fn link_row(frame: &mut Frame, row: Rect, items: &[Link], links: &mut Vec<LinkRegion>) {
    const GAP: u16 = 4;
    let total = items
        .iter()
        .map(|item| item.label.width() as u16)
        .sum::<u16>()
        + GAP * (items.len() as u16).saturating_sub(1);
    let mut x = row.x + row.width.saturating_sub(total) / 2;
    for item in items {
        let width = item.label.width() as u16;
        let slot = Rect::new(x, row.y, width.min(row.right().saturating_sub(x)), 1);
        link(frame, slot, &item.label, &item.url, Alignment::Left, links);
        x = x.saturating_add(width + GAP);
    }
}

/// Rows `text` takes when word-wrapped to `width`.
///
/// Follows `Wrap { trim: true }`: words move to the next row whole, and only a
/// word wider than the row is broken.
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut rows = 0usize;
    let mut column = 0;
    for word in text.split_whitespace() {
        let word_width = word.width();
        if column > 0 && column + 1 + word_width <= width {
            column += 1 + word_width;
            continue;
        }
        rows += word_width.div_ceil(width).max(1);
        column = match word_width % width {
            0 => width,
            rest => rest,
        };
    }
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn heading(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let [heading, rest] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(area);
    frame.render_widget(
        Line::from(title)
            .bold()
            .fg(ACCENT)
            .centered()
            .bg(PANEL),
        Rect::new(heading.x, heading.y, heading.width, 1),
    );
    rest
}

fn home(frame: &mut Frame, area: Rect, content: &SiteContent, links: &mut Vec<LinkRegion>) {
    let profile = &content.profile;
    let column = centered(area, 60);
    let tagline_height = wrapped_height(&profile.tagline, column.width.saturating_sub(4)).max(1);
    let [_, card, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(tagline_height + 7),
        Constraint::Fill(1),
    ])
    .areas(column);
    let block = panel("");
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let [greeting, name, _, tagline, _, row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(tagline_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);
    frame.render_widget(Line::from("Hello, I'm").fg(MUTED).centered(), greeting);
    frame.render_widget(
        Line::from(profile.name.as_str()).bold().fg(ACCENT).centered(),
        name,
    );
    frame.render_widget(
        Paragraph::new(profile.tagline.as_str())
            .centered()
            .wrap(Wrap { trim: true }),
        tagline,
    );
    link_row(frame, row, &profile.links, links);
}

fn about(frame: &mut Frame, area: Rect, content: &SiteContent) {
    let about = &content.about;
    let mut lines = Vec::new();
    for (i, paragraph) in about.paragraphs.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(paragraph.as_str()));
    }
    let column = centered(area, 80);
    let inner_width = column.width.saturating_sub(4);
    let height = about
        .paragraphs
        .iter()
        .map(|p| wrapped_height(p, inner_width))
        .sum::<u16>()
        + about.paragraphs.len().saturating_sub(1) as u16
        + 2;
    let [card, _] = Layout::vertical([Constraint::Length(height), Constraint::Fill(1)])
        .areas(column);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(&about.title)),
        card,
    );
}

fn skill_card(category: &SkillCategory) -> Paragraph<'_> {
    let mut lines = Vec::new();
    if !category.description.is_empty() {
        lines.push(Line::from(category.description.as_str()).fg(MUTED).italic());
    }
    lines.extend(
        category
            .items
            .iter()
            .map(|item| Line::from(vec![Span::from("• ").fg(ACCENT), Span::from(item.as_str())])),
    );
    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(panel(&category.category))
}

fn skills(frame: &mut Frame, area: Rect, skills: &[SkillCategory]) {
    let area = heading(frame, area, "My Skills");
    let columns = match area.width {
        90.. => 3,
        56.. => 2,
        _ => 1,
    };
    let rows: Vec<&[SkillCategory]> = skills.chunks(columns).collect();
    let heights: Vec<Constraint> = rows
        .iter()
        .map(|row| {
            let tallest = row
                .iter()
                .map(|c| c.items.len() + usize::from(!c.description.is_empty()))
                .max()
                .unwrap_or(0);
            Constraint::Length(tallest as u16 + 2)
        })
        .collect();
    let row_areas = Layout::vertical(heights).spacing(1).split(area);
    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cells = Layout::horizontal(vec![Constraint::Fill(1); columns])
            .spacing(2)
            .split(*row_area);
        for (category, cell) in row.iter().zip(cells.iter()) {
            frame.render_widget(skill_card(category), *cell);
        }
    }
}

fn chips(tags: &[String]) -> Line<'_> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for tag in tags {
        if !spans.is_empty() {
            spans.push(Span::from(" "));
        }
        spans.push(Span::from(format!(" {tag} ")).fg(Color::White).bg(Color::Blue));
    }
    Line::from(spans)
}

/// Stacks one card per entry, each holding a description, an optional line of
/// tags and an optional link.
fn cards<'a, T>(
    frame: &mut Frame,
    area: Rect,
    entries: &'a [T],
    fields: impl Fn(&'a T) -> Card<'a>,
    links: &mut Vec<LinkRegion>,
) {
    let column = centered(area, 80);
    let inner_width = column.width.saturating_sub(4);
    let cards: Vec<Card<'a>> = entries.iter().map(fields).collect();
    let heights: Vec<Constraint> = cards
        .iter()
        .map(|card| Constraint::Length(card.height(inner_width)))
        .collect();
    let areas = Layout::vertical(heights).spacing(1).split(column);
    for (card, area) in cards.iter().zip(areas.iter()) {
        card.render(frame, *area, links);
    }
}

struct Card<'a> {
    title: &'a str,
    description: &'a str,
    tags: &'a [String],
    link: Option<(&'static str, &'a str)>,
}

impl Card<'_> {
    fn height(&self, width: u16) -> u16 {
        let tag_width = self
            .tags
            .iter()
            .map(|tag| tag.width() as u16 + 3)
            .sum::<u16>();
        wrapped_height(self.description, width)
            + tag_width.div_ceil(width.max(1))
            + u16::from(self.link.is_some())
            + 2
    }

    fn render(&self, frame: &mut Frame, area: Rect, links: &mut Vec<LinkRegion>) {
        let block = panel(self.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(u16::from(self.link.is_some())),
        ])
        .areas(inner);
        let mut lines = Vec::new();
        if !self.description.is_empty() {
            lines.push(Line::from(self.description).fg(MUTED));
        }
        if !self.tags.is_empty() {
            lines.push(chips(self.tags));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
        if let Some((label, url)) = self.link {
            link(frame, footer, label, url, Alignment::Right, links);
        }
    }
}

fn projects(frame: &mut Frame, area: Rect, projects: &[Project], links: &mut Vec<LinkRegion>) {
    let area = heading(frame, area, "My Projects");
    cards(
        frame,
        area,
        projects,
        |project| Card {
            title: &project.title,
            description: &project.description,
            tags: &project.tags,
            link: project.url.as_deref().map(|url| ("View project ↗", url)),
        },
        links,
    );
}

fn games(frame: &mut Frame, area: Rect, games: &[Game], links: &mut Vec<LinkRegion>) {
    let area = heading(frame, area, "Games");
    if games.is_empty() {
        let [card, _] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(centered(area, 50));
        frame.render_widget(
            Paragraph::new("No games yet. Check back soon.")
                .fg(MUTED)
                .centered()
                .block(panel("")),
            card,
        );
        return;
    }
    cards(
        frame,
        area,
        games,
        |game| Card {
            title: &game.title,
            description: &game.description,
            tags: &[],
            link: game.url.as_deref().map(|url| ("Play ↗", url)),
        },
        links,
    );
}

fn contact(frame: &mut Frame, area: Rect, contact: &Contact, links: &mut Vec<LinkRegion>) {
    let area = heading(frame, area, "Contact");
    let tallest = contact.social.len().max(2) as u16 + 2;
    let areas = if area.width >= 72 {
        let [row, _] =
            Layout::vertical([Constraint::Length(tallest), Constraint::Fill(1)]).areas(area);
        Layout::horizontal([Constraint::Fill(1); 3])
            .spacing(2)
            .split(row)
    } else {
        Layout::vertical([
            Constraint::Length(contact.social.len() as u16 + 2),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .spacing(1)
        .split(area)
    };
    let [social, reach, address] = [areas[0], areas[1], areas[2]];

    let block = panel("Social Media");
    let inner = block.inner(social);
    frame.render_widget(block, social);
    for (i, item) in contact.social.iter().enumerate() {
        let row = Rect::new(inner.x, inner.y + i as u16, inner.width, 1).intersection(inner);
        link(
            frame,
            row,
            &format!("{} ↗", item.label),
            &item.url,
            Alignment::Center,
            links,
        );
    }

    let block = panel("Mail & Phone");
    let inner = block.inner(reach);
    frame.render_widget(block, reach);
    let [mail, phone] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);
    if let Some(email) = &contact.email {
        link(
            frame,
            mail,
            email,
            &format!("mailto:{email}"),
            Alignment::Center,
            links,
        );
    }
    if let Some(number) = &contact.phone {
        frame.render_widget(Line::from(number.as_str()).centered(), phone);
    }

    frame.render_widget(
        Paragraph::new(contact.address.as_deref().unwrap_or_default())
            .centered()
            .wrap(Wrap { trim: true })
            .block(panel("Address")),
        address,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn draw(view: View, content: &SiteContent, width: u16) -> (Buffer, Vec<LinkRegion>) {
        let mut terminal = Terminal::new(TestBackend::new(width, 30)).unwrap();
        let mut links = Vec::new();
        terminal
            .draw(|frame| render(frame, frame.area(), view, content, &mut links))
            .unwrap();
        (terminal.backend().buffer().clone(), links)
    }

    fn text(buffer: &Buffer, area: Rect) -> String {
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer[(x, y)].symbol());
            }
        }
        text
    }

    fn screen(buffer: &Buffer) -> String {
        text(buffer, buffer.area)
    }

    fn bundled() -> SiteContent {
        SiteConfig::bundled().unwrap().content
    }

    #[test]
    fn test_home_registers_profile_links() {
        let content = bundled();
        let (buffer, links) = draw(View::Home, &content, 100);
        let screen = screen(&buffer);
        assert!(screen.contains(&content.profile.name));
        assert_eq!(
            links.iter().map(|l| l.url.as_str()).collect::<Vec<_>>(),
            content
                .profile
                .links
                .iter()
                .map(|l| l.url.as_str())
                .collect::<Vec<_>>()
        );
        for (region, profile_link) in links.iter().zip(&content.profile.links) {
            assert_eq!(text(&buffer, region.area), profile_link.label);
        }
    }

    #[test]
    fn test_every_view_renders_something() {
        let content = bundled();
        for view in View::ALL {
            for width in [40, 100] {
                let (buffer, _) = draw(view, &content, width);
                assert!(!screen(&buffer).trim().is_empty(), "{view} at {width}");
            }
        }
    }

    #[test]
    fn test_skills_show_every_category() {
        let content = bundled();
        let (buffer, _) = draw(View::Skills, &content, 120);
        let screen = screen(&buffer);
        for category in &content.skills {
            assert!(screen.contains(&category.category), "{}", category.category);
        }
    }

    #[test]
    fn test_project_link_is_clickable() {
        let mut content = bundled();
        content.projects[0].url = Some("https://example.com/parking".into());
        let (buffer, links) = draw(View::Projects, &content, 100);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/parking");
        assert_eq!(text(&buffer, links[0].area), "View project ↗");
        assert!(screen(&buffer).contains(" Python "));
    }

    #[test]
    fn test_empty_games_fallback() {
        let mut content = bundled();
        content.games.clear();
        let (buffer, links) = draw(View::Games, &content, 100);
        assert!(screen(&buffer).contains("No games yet"));
        assert!(links.is_empty());
    }

    #[test]
    fn test_contact_links() {
        let content = bundled();
        let (buffer, links) = draw(View::Contact, &content, 100);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert!(urls.contains(&"mailto:hello@example.com"));
        assert!(urls.contains(&content.contact.social[0].url.as_str()));
        assert!(screen(&buffer).contains("Istanbul / Besiktas"));
    }

    #[test]
    fn test_wrapped_height() {
        assert_eq!(wrapped_height("", 10), 0);
        assert_eq!(wrapped_height("abc", 10), 1);
        assert_eq!(wrapped_height("abcdefghijk", 10), 2);
        assert_eq!(wrapped_height("abc", 0), 3);
        assert_eq!(wrapped_height("   ", 10), 0);
    }

    #[test]
    fn test_wrapped_height_breaks_at_words() {
        // 14 columns of text, but no two words share an 8 column row.
        assert_eq!(wrapped_height("aaaa bbbb cccc", 8), 3);
        assert_eq!(wrapped_height("aaaa bbbb cccc", 9), 2);
        assert_eq!(wrapped_height("aa bbbbbbbbbbbb c", 5), 4);
        assert_eq!(wrapped_height("ab  cd", 5), 1);
    }
}
