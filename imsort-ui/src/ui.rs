use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, Clear, HighlightSpacing, List, ListItem, Paragraph, StatefulWidget, Widget, Wrap,
    },
};

use crate::{
    View,
    app::{InputMode, StatusLevel, Ui},
    preview::{HalfBlocks, Preview},
};

const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(50, 50, 50))
    .add_modifier(Modifier::BOLD);

const FOLDER_PANEL_WIDTH: u16 = 40;

pub fn render(ui: &mut Ui, view: &View, area: Rect, buf: &mut Buffer) {
    let [main_area, info_area, footer_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);
    let [image_area, side_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(FOLDER_PANEL_WIDTH)])
            .areas(main_area);
    let [folder_area, input_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(side_area);

    render_image(ui, view, image_area, buf);
    render_folders(ui, view, folder_area, buf);
    render_input(ui, input_area, buf);
    render_info(ui, view, info_area, buf);
    render_footer(footer_area, buf);

    if let InputMode::ConfirmCollision { file, folder, .. } = &ui.input_mode {
        render_collision_prompt(file, folder, area, buf);
    }
}

fn render_image(ui: &mut Ui, view: &View, area: Rect, buf: &mut Buffer) {
    let title = match &view.image {
        Some(image) => Line::from(Span::from(format!(" {} ", image.name)).bold()),
        None => Line::from(" imsort ".bold()),
    };
    let block = Block::bordered().title(title.left_aligned());
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(image) = &view.image else {
        let message = if view.undo_depth > 0 {
            "All images classified!"
        } else {
            "No images found"
        };
        render_centered_text(message, inner, buf);
        return;
    };

    let max_width = u32::from(inner.width);
    let max_height = u32::from(inner.height) * 2;
    match ui.preview.get(&image.path, max_width, max_height) {
        Preview::Bitmap(bitmap) => HalfBlocks(bitmap).render(inner, buf),
        Preview::Fallback(message) => render_centered_text(message, inner, buf),
    }
}

fn render_centered_text(text: &str, area: Rect, buf: &mut Buffer) {
    let [line_area] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);
    Paragraph::new(text)
        .centered()
        .wrap(Wrap { trim: true })
        .render(line_area, buf);
}

fn render_folders(ui: &mut Ui, view: &View, area: Rect, buf: &mut Buffer) {
    let title = Line::from(" Folders (1-9) ".bold()).left_aligned();
    let block = Block::bordered().title(title);

    let list_items: Vec<ListItem> = view
        .folders
        .iter()
        .map(|folder| {
            let prefix = match folder.shortcut {
                Some(shortcut) => format!("[{shortcut}] "),
                None => "    ".to_string(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Blue)),
                Span::raw(&folder.name),
            ]))
        })
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(SELECTED_STYLE)
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);

    StatefulWidget::render(list, area, buf, &mut ui.folder_state);
}

fn render_input(ui: &Ui, area: Rect, buf: &mut Buffer) {
    let block = Block::bordered().title(Line::from(" New folder ").left_aligned());
    let content = match &ui.input_mode {
        InputMode::NewFolder(name) => Line::from(vec![
            Span::raw(name.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        _ => Line::from("press n to create".dark_gray()),
    };
    Paragraph::new(content).block(block).render(area, buf);
}

fn render_info(ui: &Ui, view: &View, area: Rect, buf: &mut Buffer) {
    let [position_area, status_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(area);

    let position = match &view.image {
        Some(image) => format!(
            "Image {} / {}    |    {}",
            image.position, image.total, image.name
        ),
        None => "0 images".to_string(),
    };
    Paragraph::new(position).render(position_area, buf);

    if let Some(status) = &ui.status {
        let color = match status.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Warning => Color::Yellow,
            StatusLevel::Error => Color::Red,
        };
        Paragraph::new(status.text.as_str().fg(color))
            .right_aligned()
            .render(status_area, buf);
    }
}

fn render_footer(area: Rect, buf: &mut Buffer) {
    Paragraph::new(
        "↑↓: image | ←→: folder | 1-9/Enter: move | n: new folder | u: undo | r: rescan | q: quit",
    )
    .centered()
    .render(area, buf);
}

fn render_collision_prompt(file: &str, folder: &str, area: Rect, buf: &mut Buffer) {
    let [popup_area] = Layout::vertical([Constraint::Length(7)])
        .flex(Flex::Center)
        .areas(area);
    let [popup_area] = Layout::horizontal([Constraint::Length(60)])
        .flex(Flex::Center)
        .areas(popup_area);

    let text = vec![
        Line::from(format!("'{file}' already exists in '{folder}'.")),
        Line::default(),
        Line::from(vec![
            "o".bold(),
            Span::raw(": overwrite   "),
            "s".bold(),
            Span::raw(": skip   "),
            "c".bold(),
            Span::raw(": cancel"),
        ]),
    ];

    Clear.render(popup_area, buf);
    Paragraph::new(text)
        .centered()
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(Line::from(" File exists ".bold()).centered())
                .fg(Color::Yellow),
        )
        .render(popup_area, buf);
}
