//! Navigation bar with one tab per view.

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{content::Profile, view::View};

/// Height of the navigation bar in rows.
pub const HEIGHT: u16 = 3;

/// Columns between two tabs.
const TAB_GAP: u16 = 2;

/// A rendered tab and the row it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    /// Cells covered by the tab label.
    pub area: Rect,
    /// The view the tab selects.
    pub view: View,
}

fn label(view: View) -> String {
    format!(" {} ", view.title())
}

/// Places the tabs centered on `row`, right of the first `reserved` columns.
///
/// Tabs that do not fit are left out.
pub fn layout(row: Rect, reserved: u16) -> Vec<Tab> {
    let widths: Vec<u16> = View::ALL
        .iter()
        .map(|view| label(*view).width() as u16)
        .collect();
    let total = widths.iter().sum::<u16>() + TAB_GAP * (widths.len() as u16 - 1);
    let min_x = if reserved == 0 {
        row.x
    } else {
        row.x + reserved + TAB_GAP
    };
    let mut x = (row.x + row.width.saturating_sub(total) / 2).max(min_x);

    let mut tabs = Vec::with_capacity(View::ALL.len());
    for (view, width) in View::ALL.into_iter().zip(widths) {
        if x + width > row.right() {
            break;
        }
        tabs.push(Tab {
            area: Rect::new(x, row.y, width, 1),
            view,
        });
        x += width + TAB_GAP;
    }
    tabs
}

/// Returns the view whose tab column contains the cell, anywhere inside the bar.
pub fn tab_at(tabs: &[Tab], bar: Rect, col: u16, row: u16) -> Option<View> {
    if !bar.contains(Position::new(col, row)) {
        return None;
    }
    tabs.iter()
        .find(|tab| (tab.area.left()..tab.area.right()).contains(&col))
        .map(|tab| tab.view)
}

/// Renders the bar and returns the tabs it drew.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    profile: &Profile,
    selected: View,
    hovered: Option<View>,
) -> Vec<Tab> {
    let block = Block::new()
        .borders(Borders::BOTTOM)
        .border_style(Style::new().fg(Color::DarkGray))
        .padding(Padding::new(2, 2, 1, 0))
        .style(Style::new().bg(Color::Black).fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.is_empty() {
        return Vec::new();
    }

    let logo_width = (profile.logo.width() as u16).min(inner.width);
    frame.render_widget(
        Line::from(profile.logo.as_str()).bold().fg(Color::LightGreen),
        Rect::new(inner.x, inner.y, logo_width, 1),
    );

    let tabs = layout(Rect::new(inner.x, inner.y, inner.width, 1), logo_width);
    for tab in &tabs {
        let style = if tab.view == selected {
            Style::new().fg(Color::Black).bg(Color::LightGreen).bold()
        } else if Some(tab.view) == hovered {
            Style::new().fg(Color::LightGreen).underlined()
        } else {
            Style::new().fg(Color::Gray)
        };
        frame.render_widget(Line::styled(label(tab.view), style), tab.area);
    }
    tabs
}

/// Renders the tagline of `tab` in a box below the bar.
pub fn render_tooltip(frame: &mut Frame, bounds: Rect, bar: Rect, tab: &Tab) {
    let text = tab.view.tagline();
    let width = (text.width() as u16 + 4).min(bounds.width);
    let height = 3.min(bounds.bottom().saturating_sub(bar.bottom()));
    if width == 0 || height == 0 {
        return;
    }
    let center = tab.area.x + tab.area.width / 2;
    let x = center
        .saturating_sub(width / 2)
        .clamp(bounds.x, bounds.right() - width);
    let area = Rect::new(x, bar.bottom(), width, height);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text).centered().block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::new().fg(Color::LightGreen)),
        ),
        area,
    );
    frame.buffer_mut().set_style(area, Style::new().bg(Color::Black));
}
