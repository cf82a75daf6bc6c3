use crate::aggregate::TableOverview;
use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::{heat_color, LinearColormap, MapLayers, Rgb};
use crate::present::{BarFigure, Figure, LineFigure, MapFigure, Orientation, Section, WordCloud, CAPTION, SOURCE};
use num_format::{Locale, ToFormattedString};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
        Row, Table, Tabs, Widget, Wrap,
    },
    Frame,
};

const SIDEBAR_WIDTH: u16 = 44;
const SUMMARY_HEIGHT: u16 = 3;
/// Heat cells below this normalized intensity are left blank
const HEAT_THRESHOLD: f64 = 0.05;
const LEGEND_WIDTH: u16 = 24;
/// Horizontal bar labels take at most this fraction of the chart width
const LABEL_SHARE: u16 = 3;

/// Screen regions of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub sidebar: Rect,
    pub tabs: Rect,
    pub summary: Rect,
    pub figure: Rect,
    pub status: Rect,
}

/// Split the terminal into sidebar, view tabs, summary, figure and status bar
pub fn layout(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(SUMMARY_HEIGHT),
            Constraint::Min(3),
        ])
        .split(body[1]);

    Areas {
        sidebar: body[0],
        tabs: main[0],
        summary: main[1],
        figure: main[2],
        status: rows[1],
    }
}

/// Drawable area inside the figure border
pub fn figure_inner(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(layout(area).figure)
}

fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let areas = layout(frame.area());

    render_sidebar(frame, app, areas.sidebar);
    render_tabs(frame, app, areas.tabs);
    render_summary(frame, app, areas.summary);
    render_figure(frame, app, areas.figure);
    render_status_bar(frame, app, areas.status);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Navigation ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let lines: Vec<Line> = Section::ALL
        .iter()
        .map(|&section| {
            let text = format!(" {}. {}", section.number(), section.label());
            if section == app.selection.section {
                Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::REVERSED),
                ))
            } else {
                Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
            }
        })
        .collect();

    let inner = block.inner(area);
    frame.render_widget(Paragraph::new(lines).block(block), area);

    // Attribution pinned to the bottom of the sidebar
    let credits = Paragraph::new(vec![
        Line::from(Span::styled(SOURCE, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(CAPTION, Style::default().fg(Color::DarkGray))),
    ])
    .wrap(Wrap { trim: true });
    let rows = 4.min(inner.height.saturating_sub(Section::ALL.len() as u16));
    let footer = Rect { y: inner.bottom() - rows, height: rows, ..inner };
    frame.render_widget(credits, footer);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .selection
        .section
        .views()
        .map(|v| Line::from(format!(" {} ", v.name)))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.selection.view)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider(Span::styled("|", Style::default().fg(Color::DarkGray)));
    frame.render_widget(tabs, area);
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = Paragraph::new(app.selection.section.summary())
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_figure(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", app.figure.title()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.figure.is_empty() {
        let placeholder = Paragraph::new("No data for this view")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        let middle = Rect { y: inner.y + inner.height / 2, height: 1.min(inner.height), ..inner };
        frame.render_widget(placeholder, middle);
        return;
    }

    match &app.figure {
        Figure::Overview(overview) => render_overview(frame, overview, inner),
        Figure::WordCloud(cloud) => render_word_cloud(frame, cloud, inner),
        Figure::Map(map) => render_map(frame, app, map, inner),
        Figure::Bars(bars) => render_bars(frame, bars, inner),
        Figure::Lines(lines) => render_lines(frame, lines, inner),
    }

    if app.show_insights {
        render_insights(frame, app, area);
    }
}

/// Commentary for the current section, drawn over the figure
fn render_insights(frame: &mut Frame, app: &App, area: Rect) {
    let section = app.selection.section;
    let mut lines = Vec::new();
    for note in section.insights() {
        lines.push(Line::from(Span::styled(
            note.heading,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(note.body, Style::default().fg(Color::Gray))));
        lines.push(Line::default());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {} ", section.label()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" j/k:scroll i:close ").right_aligned());
    let popup = Rect {
        x: area.x + area.width / 10,
        y: area.y + area.height / 10,
        width: area.width - area.width / 5,
        height: area.height - area.height / 5,
    };
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .scroll((app.insights_scroll, 0)),
        popup,
    );
}

fn render_overview(frame: &mut Frame, overview: &TableOverview, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(2)])
        .split(area);

    let stamp = |t: Option<chrono::NaiveDateTime>| {
        t.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    };
    let stats = vec![
        Line::from(vec![
            Span::styled(" Rows: ", Style::default().fg(Color::DarkGray)),
            Span::styled(group_digits(overview.rows as f64, 0), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::styled(" From: ", Style::default().fg(Color::DarkGray)),
            Span::styled(stamp(overview.first), Style::default().fg(Color::Cyan)),
            Span::styled("  To: ", Style::default().fg(Color::DarkGray)),
            Span::styled(stamp(overview.last), Style::default().fg(Color::Cyan)),
        ]),
    ];
    frame.render_widget(Paragraph::new(stats), chunks[0]);

    let header = Row::new([
        "Toll Hour",
        "Detection Group",
        "Region",
        "Vehicle Class",
        "Period",
        "Day",
        "CRZ",
        "Excluded",
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows = overview.head.iter().map(|e| {
        Row::new(vec![
            e.toll_hour.format("%m/%d %H:%M").to_string(),
            e.detection_group.clone(),
            e.detection_region.clone(),
            e.vehicle_class.clone(),
            e.time_period.clone(),
            e.day_of_week.to_string(),
            e.crz_entries.to_string(),
            e.excluded_roadway_entries.to_string(),
        ])
    });

    let widths = [
        Constraint::Length(11),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths).header(header).column_spacing(1);
    frame.render_widget(table, chunks[1]);
}

fn render_word_cloud(frame: &mut Frame, cloud: &WordCloud, area: Rect) {
    let mut spans = Vec::with_capacity(cloud.words.len() * 2);
    for word in &cloud.words {
        let mut style = Style::default().fg(rgb(word.color));
        let text = match word.size {
            5 => {
                style = style.add_modifier(Modifier::BOLD);
                word.text.to_uppercase()
            }
            4 => {
                style = style.add_modifier(Modifier::BOLD);
                word.text.clone()
            }
            1 => {
                style = style.add_modifier(Modifier::DIM);
                word.text.clone()
            }
            _ => word.text.clone(),
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("   "));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    // Leave a blank line on top so the cloud floats
    let padded = Rect { y: area.y + 1.min(area.height), height: area.height.saturating_sub(1), ..area };
    frame.render_widget(paragraph, padded);
}

fn render_map(frame: &mut Frame, app: &App, map: &MapFigure, inner: Rect) {
    // Update viewport size for rendering
    let mut viewport = app.viewport.clone();
    // Braille gives 2x4 resolution per character
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app
        .map_renderer
        .render(inner.width as usize, inner.height as usize, &viewport, &map.overlay);

    // Get mouse cursor position for marker
    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        if cx < inner.width && cy < inner.height {
            Some((cx, cy))
        } else {
            None
        }
    });

    let map_widget = MapWidget {
        layers,
        legend: map.legend.clone(),
        cursor_pos,
    };
    frame.render_widget(map_widget, inner);
}

/// Custom widget that renders the braille map, heat cells and labels
struct MapWidget {
    layers: MapLayers,
    legend: Option<LinearColormap>,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Render a braille canvas layer; tinted cells keep their own color
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..canvas.height().min(area.height as usize) {
            for col in 0..canvas.width().min(area.width as usize) {
                let (ch, tint) = canvas.cell(col, row);
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let fg = tint.map_or(color, rgb);
                buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(fg);
            }
        }
    }

    fn render_heat(&self, area: Rect, buf: &mut Buffer) {
        let Some(grid) = &self.layers.heat else {
            return;
        };
        for (col, row, intensity) in grid.iter_hot(HEAT_THRESHOLD) {
            if col >= area.width || row >= area.height {
                continue;
            }
            let glyph = match intensity {
                i if i < 0.4 => '░',
                i if i < 0.7 => '▒',
                i if i < 0.9 => '▓',
                _ => '█',
            };
            buf[(area.x + col, area.y + row)]
                .set_char(glyph)
                .set_fg(rgb(heat_color(intensity)));
        }
    }

    /// Gradient bar with its value range, bottom-left corner
    fn render_legend(&self, cmap: &LinearColormap, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < LEGEND_WIDTH {
            return;
        }
        let y = area.y + area.height - 1;
        for i in 0..LEGEND_WIDTH {
            let t = i as f64 / (LEGEND_WIDTH - 1) as f64;
            let value = cmap.vmin + t * (cmap.vmax - cmap.vmin);
            buf[(area.x + i, y)].set_char('█').set_fg(rgb(cmap.color(value)));
        }
        let caption = format!(
            "{} - {} entries",
            group_digits(cmap.vmin, 0),
            group_digits(cmap.vmax, 0)
        );
        buf.set_string(area.x, y - 1, caption, Style::default().fg(Color::White));
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: heat, basemap, bubbles/markers, labels
        self.render_heat(area, buf);
        self.render_layer(&self.layers.basemap, Color::DarkGray, area, buf);
        self.render_layer(&self.layers.shapes, Color::LightBlue, area, buf);

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            // Truncate label to fit screen
            let max_len = area.width.saturating_sub(*lx) as usize;
            let display_text: String = text.chars().take(max_len.min(32)).collect();
            buf.set_string(area.x + *lx, area.y + *ly, display_text, label_style);
        }

        if let Some(cmap) = &self.legend {
            self.render_legend(cmap, area, buf);
        }

        // Render cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::Red);
        }
    }
}

/// Legend line: one colored swatch per series, then the axis titles
fn legend_line<'a>(names: impl Iterator<Item = (&'a str, Rgb)>, x_title: &str, y_title: &str) -> Line<'a> {
    let mut spans = Vec::new();
    for (name, color) in names {
        spans.push(Span::styled(" ■ ", Style::default().fg(rgb(color))));
        spans.push(Span::styled(name, Style::default().fg(Color::Gray)));
    }
    spans.push(Span::styled(
        format!("   x: {x_title}  y: {y_title}"),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn split_footer(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Bar values are stored scaled by 100 so fractional percentages keep their
/// relative heights
fn bar_value(v: f64) -> u64 {
    (v.max(0.0) * 100.0).round() as u64
}

fn render_bars(frame: &mut Frame, figure: &BarFigure, area: Rect) {
    let (chart_area, footer) = split_footer(area);

    let single = figure.series.len() == 1;
    let legend: Box<dyn Iterator<Item = (&str, Rgb)> + '_> = if single {
        Box::new(
            figure
                .categories
                .iter()
                .filter_map(|c| c.color.map(|col| (c.label.as_str(), col))),
        )
    } else {
        Box::new(figure.series.iter().map(|s| (s.name.as_str(), s.color)))
    };
    frame.render_widget(
        Paragraph::new(legend_line(legend, &figure.x_title, &figure.y_title)),
        footer,
    );

    if figure.stacked {
        frame.render_widget(StackedBars { figure }, chart_area);
        return;
    }

    let horizontal = figure.orientation == Orientation::Horizontal;
    // ratatui reserves the widest label in full, so it must leave room for the bars
    let label_room = (chart_area.width / LABEL_SHARE) as usize;
    let groups: Vec<BarGroup> = figure
        .categories
        .iter()
        .map(|category| {
            let bars: Vec<Bar> = figure
                .series
                .iter()
                .zip(&category.values)
                .enumerate()
                .map(|(i, (series, value))| {
                    let color = rgb(category.color.unwrap_or(series.color));
                    let mut bar = Bar::default()
                        .value(value.map_or(0, bar_value))
                        .text_value(value.map_or_else(String::new, |v| group_digits(v, figure.precision)))
                        .style(Style::default().fg(color))
                        .value_style(Style::default().fg(Color::Black).bg(color));
                    if horizontal && i == 0 && label_room > 0 {
                        bar = bar.label(Line::from(fit_label(&category.label, label_room)));
                    }
                    bar
                })
                .collect();

            let group = BarGroup::default().bars(&bars);
            if horizontal {
                group
            } else {
                group.label(Line::from(category.label.clone()).centered())
            }
        })
        .collect();

    let group_count = figure.categories.len().max(1) as u16;
    let per_group = figure.series.len().max(1) as u16;
    let (bar_width, bar_gap, group_gap) = if horizontal {
        (1, 0, 1)
    } else {
        let slot = chart_area.width / group_count;
        let width = (slot.saturating_sub(2) / per_group).clamp(1, 16);
        (width, 0, 2)
    };

    let mut chart = BarChart::default()
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .group_gap(group_gap)
        .label_style(Style::default().fg(Color::Gray));
    if horizontal {
        chart = chart.direction(Direction::Horizontal);
    }
    for group in groups {
        chart = chart.data(group);
    }
    frame.render_widget(chart, chart_area);
}

/// Cut `label` to `max` chars, marking the cut with an ellipsis
fn fit_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Columns with one colored segment per series, first series at the bottom
struct StackedBars<'a> {
    figure: &'a BarFigure,
}

impl Widget for StackedBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let categories = &self.figure.categories;
        if categories.is_empty() || area.height < 2 {
            return;
        }
        let plot_height = (area.height - 1) as f64;
        let max_total = categories
            .iter()
            .map(|c| c.values.iter().flatten().sum::<f64>())
            .fold(0.0, f64::max);
        if max_total <= 0.0 {
            return;
        }

        let slot = (area.width / categories.len() as u16).max(1);
        let width = slot.saturating_sub(1).max(1);
        let base = area.y + area.height - 1;

        for (idx, category) in categories.iter().enumerate() {
            let x = area.x + idx as u16 * slot;
            if x >= area.x + area.width {
                break;
            }
            let mut cumulative = 0.0;
            let mut drawn = 0u16;
            for (series, value) in self.figure.series.iter().zip(&category.values) {
                cumulative += value.unwrap_or(0.0);
                let top = (cumulative / max_total * plot_height).round() as u16;
                for row in drawn..top {
                    for dx in 0..width.min(area.x + area.width - x) {
                        buf[(x + dx, base - 1 - row)].set_char('█').set_fg(rgb(series.color));
                    }
                }
                drawn = drawn.max(top);
            }

            let label: String = category.label.chars().take(width as usize).collect();
            buf.set_string(x, base, label, Style::default().fg(Color::Gray));
        }
    }
}

fn render_lines(frame: &mut Frame, figure: &LineFigure, area: Rect) {
    let (chart_area, footer) = split_footer(area);

    let note = figure.note.clone().unwrap_or_default();
    let mut footer_spans = vec![Span::styled(
        format!(" x: {}  y: {}", figure.x_title, figure.y_title),
        Style::default().fg(Color::DarkGray),
    )];
    if !note.is_empty() {
        footer_spans.push(Span::styled(format!("   {note}"), Style::default().fg(Color::Gray)));
    }
    frame.render_widget(Paragraph::new(Line::from(footer_spans)), footer);

    let y_top = match figure.y_max() {
        m if m > 0.0 => m * 1.1,
        _ => 1.0,
    };
    let [x0, x1] = figure.x_bounds;

    // Bands are dense vertical bars, one per braille column
    let step = (x1 - x0) / (chart_area.width.max(1) as f64 * 2.0);
    let band_points: Vec<Vec<(f64, f64)>> = figure
        .bands
        .iter()
        .map(|band| {
            let mut points = Vec::new();
            let mut x = band.x0;
            while x <= band.x1 && step > 0.0 {
                points.push((x, y_top));
                x += step;
            }
            points
        })
        .collect();

    let mut datasets = Vec::new();
    for (band, points) in figure.bands.iter().zip(&band_points) {
        let mut dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(rgb(band.color)))
            .data(points);
        if let Some(label) = &band.label {
            dataset = dataset.name(label.clone());
        }
        datasets.push(dataset);
    }
    for series in &figure.series {
        datasets.push(
            Dataset::default()
                .name(series.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(rgb(series.color)))
                .data(&series.points),
        );
        if figure.markers {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(rgb(series.color)))
                    .data(&series.points),
            );
        }
    }

    let axis_style = Style::default().fg(Color::DarkGray);
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([x0, x1])
                .labels(figure.x_labels.iter().map(|l| Span::raw(l.clone())).collect::<Vec<_>>()),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, y_top])
                .labels([0.0, y_top / 2.0, y_top].map(|v| Span::raw(group_digits(v, 0))).to_vec()),
        )
        .hidden_legend_constraints((Constraint::Percentage(60), Constraint::Percentage(40)));
    frame.render_widget(chart, chart_area);
}

/// Format with thousands separators: 1234567.8 -> "1,234,567.8"
pub fn group_digits(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value.abs());
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));

    let mut out = whole.parse::<u128>().unwrap_or(0).to_formatted_string(&Locale::en);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.insert(0, '-');
    }
    out
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let section = app.selection.section;
    let mut spans = vec![
        Span::styled(" Section ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/{}", section.number(), Section::ALL.len()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" View ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{}/{}", app.selection.view + 1, section.view_count()),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" | Rows: ", Style::default().fg(Color::DarkGray)),
        Span::styled(group_digits(app.table.len() as f64, 0), Style::default().fg(Color::Magenta)),
    ];

    if app.is_map() {
        let settings = &app.map_renderer.settings;
        spans.extend([
            Span::styled(" | Zoom: ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
            Span::styled(" ", Style::default()),
            Span::styled(
                if settings.show_basemap { "[B]asemap " } else { "[b]asemap " },
                Style::default().fg(if settings.show_basemap { Color::Green } else { Color::DarkGray }),
            ),
            Span::styled(
                if settings.show_labels { "[L]abels " } else { "[l]abels " },
                Style::default().fg(if settings.show_labels { Color::Green } else { Color::DarkGray }),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
            Span::styled(
                " | hjkl:pan +/-:zoom r:reset",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
    }

    spans.push(Span::styled(
        " | 1-7/Tab:section v:view i:insights q:quit",
        Style::default().fg(Color::DarkGray),
    ));

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::crz;
    use crate::data::EntryTable;
    use crate::present::Selection;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> Buffer {
        draw_sized(app, 120, 40)
    }

    fn draw_sized(app: &App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn contains(buf: &Buffer, needle: &str) -> bool {
        let area = buf.area;
        (0..area.height).any(|y| {
            let row: String = (0..area.width).map(|x| buf[(x, y)].symbol()).collect();
            row.contains(needle)
        })
    }

    fn sample() -> EntryTable {
        EntryTable::new(vec![
            crz("2025-01-06 08:00", "Brooklyn Bridge", 1_200),
            crz("2025-01-11 09:10", "Holland Tunnel", 400),
        ])
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0.0, 0), "0");
        assert_eq!(group_digits(999.0, 0), "999");
        assert_eq!(group_digits(1_234_567.0, 0), "1,234,567");
        assert_eq!(group_digits(12_345.678, 1), "12,345.7");
        assert_eq!(group_digits(-4_500.0, 0), "-4,500");
        assert_eq!(group_digits(-0.04, 1), "0.0");
        assert_eq!(group_digits(1_000.5, 2), "1,000.50");
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Holland Tunnel", 20), "Holland Tunnel");
        assert_eq!(fit_label("West Side Highway at 60th St", 8), "West Si…");
        assert_eq!(fit_label("Brooklyn Bridge", 1), "…");
    }

    #[test]
    fn test_horizontal_bars_fit_narrow_terminals() {
        let table = EntryTable::new(vec![
            crz("2025-01-06 08:00", "West Side Highway at 60th St", 900),
            crz("2025-01-06 09:00", "Brooklyn Bridge", 300),
        ]);
        let mut app = App::new(table, Selection::new(Section::EntriesByTime, 0), 70, 24);
        for width in [100, 75, 74, 70, 60, 50] {
            app.resize(width, 24);
            let buf = draw_sized(&app, width, 24);
            assert_eq!(buf.area.width, width);
        }
        let buf = draw_sized(&app, 70, 24);
        assert!(contains(&buf, "Peak"));
    }

    #[test]
    fn test_every_view_draws_small() {
        let mut app = App::new(sample(), Selection::default(), 70, 24);
        for section in Section::ALL {
            app.select_section(section);
            for _ in 0..section.view_count() {
                draw_sized(&app, 70, 24);
                app.next_view();
            }
        }
    }

    #[test]
    fn test_sidebar_shows_attribution() {
        let app = App::new(sample(), Selection::default(), 120, 40);
        let buf = draw(&app);
        assert!(contains(&buf, "new.mta.info"));
        assert!(contains(&buf, "Group_G"));
    }

    #[test]
    fn test_insights_panel() {
        let mut app = App::new(sample(), Selection::new(Section::RegionShare, 0), 120, 40);
        assert!(!contains(&draw(&app), "Recommended Policy Improvement"));

        app.toggle_insights();
        let buf = draw(&app);
        assert!(contains(&buf, "Key Insights"));
        assert!(contains(&buf, "Recommended Policy Improvement"));
    }

    #[test]
    fn test_layout_regions() {
        let areas = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(areas.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(areas.status.y, 39);
        assert_eq!(areas.figure.x, SIDEBAR_WIDTH);
        assert_eq!(figure_inner(Rect::new(0, 0, 120, 40)).x, SIDEBAR_WIDTH + 1);
    }

    #[test]
    fn test_every_view_draws() {
        let mut app = App::new(sample(), Selection::default(), 120, 40);
        for section in Section::ALL {
            app.select_section(section);
            for _ in 0..section.view_count() {
                let buf = draw(&app);
                assert!(contains(&buf, app.figure.title()), "{section:?}");
                app.next_view();
            }
        }
    }

    #[test]
    fn test_empty_figure_placeholder() {
        let app = App::new(EntryTable::default(), Selection::new(Section::RegionShare, 0), 120, 40);
        assert!(contains(&draw(&app), "No data for this view"));
    }

    #[test]
    fn test_word_cloud_sizes_words() {
        let table = EntryTable::new(vec![
            crz("2025-01-06 08:00", "Brooklyn Bridge", 1),
            crz("2025-01-07 08:00", "Brooklyn Bridge", 1),
            crz("2025-01-11 09:10", "Holland Tunnel", 1),
        ]);
        let app = App::new(table, Selection::new(Section::WordCloud, 0), 120, 40);
        let buf = draw(&app);
        assert!(contains(&buf, "BROOKLYN BRIDGE"));
        assert!(contains(&buf, "Holland Tunnel"));
    }
}
