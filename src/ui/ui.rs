use log::debug;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol, Resize, StatefulImage};

use crate::backend::reveal::RevealTimer;
use crate::backend::session::{DisplayCount, Session};
use crate::backend::updater::{LoadedComic, RequestSeq};
use crate::backend::window::comic_numbers;
use crate::config::Config;
use crate::error::PagerError;

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Phase {
    #[default]
    Loading,
    Revealed,
}

#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum InputMode {
    #[default]
    Browse,
    Search,
}

/// One display position: title, picture and comic number.
#[derive(Default)]
pub struct Slot {
    pub title: String,
    pub index: Option<u32>,
    pub alt: String,
    pub image: Option<StatefulProtocol>,
}

impl Slot {
    fn from_comic(comic: LoadedComic, picker: Option<&Picker>) -> Self {
        let image = match (picker, comic.image) {
            (Some(picker), Some(image)) => Some(picker.new_resize_protocol(image)),
            _ => None,
        };

        Self {
            title: comic.record.title,
            index: Some(comic.record.num),
            alt: comic.record.alt,
            image,
        }
    }
}

fn empty_slots(count: usize) -> Vec<Slot> {
    (0..count).map(|_| Slot::default()).collect()
}

pub struct App {
    pub session: Session,
    pub phase: Phase,
    pub input_mode: InputMode,
    pub slots: Vec<Slot>,
    pub error: Option<String>,
    pub failed: bool,
    pub loading_message: String,
    pub requests: RequestSeq,
    pub reveal: RevealTimer,
    pub picker: Option<Picker>,
}

impl App {
    pub fn new(config: &Config, picker: Option<Picker>) -> Self {
        let count = config.display_count();

        Self {
            session: Session::new(config.initial_comic, count),
            phase: Phase::Loading,
            input_mode: InputMode::Browse,
            slots: empty_slots(count.value()),
            error: None,
            failed: false,
            loading_message: "Initializing...".to_string(),
            requests: RequestSeq::default(),
            reveal: RevealTimer::default(),
            picker,
        }
    }

    /// Switches to the spinner and returns the id of the new page update.
    /// Any reveal still pending from an earlier update is cancelled.
    pub fn begin_loading(&mut self) -> u64 {
        if self.reveal.is_pending() {
            debug!("cancelling pending reveal for request {}", self.requests.latest());
        }
        self.reveal.cancel();
        self.error = None;
        self.failed = false;
        self.phase = Phase::Loading;

        let numbers = comic_numbers(self.session.center, self.session.count.value());
        let numbers: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
        self.loading_message = format!("Fetching comics {}", numbers.join(", "));

        self.requests.next()
    }

    /// Puts a finished page into the slots. Returns false (and changes
    /// nothing) when a newer update has started since `request`.
    pub fn apply_page(&mut self, request: u64, comics: Vec<LoadedComic>) -> bool {
        if !self.requests.is_current(request) {
            return false;
        }

        let picker = self.picker.as_ref();
        for (slot, comic) in self.slots.iter_mut().zip(comics) {
            *slot = Slot::from_comic(comic, picker);
        }
        true
    }

    pub fn fail_page(&mut self, request: u64, error: &PagerError) -> bool {
        if !self.requests.is_current(request) {
            return false;
        }

        self.phase = Phase::Revealed;
        self.failed = true;
        self.error = Some(format!("Could not load comics: {error}"));
        true
    }

    pub fn reveal_page(&mut self, request: u64) -> bool {
        if !self.requests.is_current(request) || self.phase != Phase::Loading {
            return false;
        }
        self.phase = Phase::Revealed;
        true
    }

    pub fn change_display_count(&mut self, count: DisplayCount) {
        self.session.set_display_count(count);
        self.slots = empty_slots(count.value());
    }

    pub fn show_error(&mut self, error: &PagerError) {
        self.error = Some(error.to_string());
    }

    pub fn can_retry(&self) -> bool {
        self.failed
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    match app.phase {
        Phase::Loading => draw_loading_screen(f, app),
        Phase::Revealed => draw_main_ui(f, app),
    }
}

fn draw_loading_screen(f: &mut Frame, app: &App) {
    let area = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .title("xkcd pager")
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let center_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Percentage(40),
        ])
        .split(inner);

    let spinner_frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let frame_idx = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / 100) as usize
        % spinner_frames.len();

    let loading_text = Line::from(vec![
        Span::styled(
            format!(" {} ", spinner_frames[frame_idx]),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let loading_paragraph = Paragraph::new(loading_text).alignment(Alignment::Center);
    f.render_widget(loading_paragraph, center_layout[1]);

    let message = Paragraph::new(&*app.loading_message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(message, center_layout[2]);
}

fn draw_main_ui(f: &mut Frame, app: &mut App) {
    let area = f.area();

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header + search box
            Constraint::Min(10),   // comic tiles
            Constraint::Length(1), // error bar
            Constraint::Length(3), // footer
        ])
        .split(area);

    draw_header(f, root[0], app);
    draw_comic_section(f, root[1], &mut app.slots);
    draw_error_bar(f, root[2], app.error.as_deref());
    draw_footer(f, root[3]);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let searching = app.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if searching { "▏" } else { "" };

    let line = Line::from(vec![
        Span::styled("Comic ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("#{}", app.session.center),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Per page ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.session.count.value().to_string(),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("   Go to ", Style::default().fg(Color::DarkGray)),
        Span::styled(format!("[{}{}]", app.session.search_text, cursor), search_style),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("xkcd pager")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn draw_comic_section(f: &mut Frame, area: Rect, slots: &mut [Slot]) {
    if slots.is_empty() {
        return;
    }

    let count = slots.len() as u32;
    let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();

    let tile_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let middle = slots.len() / 2;
    for (i, (slot, tile_area)) in slots.iter_mut().zip(tile_areas.iter()).enumerate() {
        draw_comic_tile(f, *tile_area, slot, i == middle);
    }
}

fn draw_comic_tile(f: &mut Frame, area: Rect, slot: &mut Slot, selected: bool) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 4 || inner.width < 5 {
        return;
    }

    let tile_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Min(2),    // image
            Constraint::Length(1), // index
        ])
        .split(inner);

    let title = truncate_text(&slot.title, inner.width as usize);
    let title_paragraph = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title_paragraph, tile_layout[0]);

    if let Some(state) = slot.image.as_mut() {
        let image_widget = StatefulImage::new().resize(Resize::Scale(None));
        f.render_stateful_widget(image_widget, tile_layout[1], state);
    } else {
        // No graphics protocol or no picture: fall back to the alt text.
        let alt = Paragraph::new(slot.alt.as_str())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(alt, tile_layout[1]);
    }

    let index = slot.index.map(|n| format!("#{n}")).unwrap_or_default();
    let index_paragraph = Paragraph::new(Span::styled(index, Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);
    f.render_widget(index_paragraph, tile_layout[2]);
}

fn draw_error_bar(f: &mut Frame, area: Rect, error: Option<&str>) {
    let Some(error) = error else {
        return;
    };

    let bar = Paragraph::new(error)
        .style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(bar, area);
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        format!(
            "{}...",
            text.chars()
                .take(max_len.saturating_sub(3))
                .collect::<String>()
        )
    }
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let text = Line::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(": prev/next  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(": random  "),
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(": go to  "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(": per page  "),
        Span::styled("o", Style::default().fg(Color::Yellow)),
        Span::raw(": open  "),
        Span::styled("R", Style::default().fg(Color::Yellow)),
        Span::raw(": retry  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(": quit"),
    ]);

    let p = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    f.render_widget(p, area);
}
