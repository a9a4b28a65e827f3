//! iced rendering of a [`TreeModel`]
//!
//! Rendering only reads the model: every cell's text and colors were computed
//! by the node update, so no domain access happens here.
//!
//! ## Usage
//!
//! ```ignore
//! let files = tree_view(&panel.files.tree, &columns, &widths, |msg| {
//!     Message::Tree(ViewSide::Files, msg)
//! });
//! ```

use iced::font::Weight;
use iced::widget::{button, column, container, mouse_area, row, scrollable, text, Space};
use iced::{Background, Border, Color, Element, Font, Length, Padding, Point, Theme};
use tagpanel_core::ColumnSchema;

use crate::theme::to_color;
use crate::tree::{NodeId, Row, TreeModel};

/// Horizontal indent per tree level, in pixels
pub const ROW_INDENT: f32 = 16.0;

/// Width of the expand arrow slot
const ARROW_WIDTH: f32 = 22.0;

/// Grab area on the right edge of each resizable header cell
pub const HANDLE_WIDTH: f32 = 4.0;

/// Horizontal gap between two columns: spacing, handle, spacing
const COLUMN_GAP: f32 = HANDLE_WIDTH + 2.0;

/// Distance from the view's left edge to the first header cell
pub const HEADER_LEFT: f32 = 8.0 + ARROW_WIDTH + 8.0;

/// Columns never shrink below this while dragged
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

/// Messages emitted by the tree view
#[derive(Debug, Clone, PartialEq)]
pub enum TreeMessage {
    /// Toggle expand/collapse state of a node
    Toggle(NodeId),
    /// Mouse press on a row (modifier handling happens in the app's update)
    Select(NodeId),
    /// Double click on a row
    Activate(NodeId),
    /// Context menu request
    RightClick(NodeId),
    /// Mouse released over a row while a drag is in progress
    DropReceived(NodeId),
    /// Header click on a column
    SortBy(usize),
    /// Press on the resize handle right of a column
    StartColumnResize(usize),
    /// Cursor moved while a column is resized; x relative to the view
    ColumnDragged(f32),
}

/// Width that puts the right edge of `column` under the cursor at `x`
pub fn column_width_at(x: f32, widths: &[f32], column: usize) -> f32 {
    let start: f32 = HEADER_LEFT + widths.iter().take(column).map(|w| w + COLUMN_GAP).sum::<f32>();
    (x - start).max(MIN_COLUMN_WIDTH)
}

/// Build the view of one tree.
///
/// `widths` holds the pixel widths of every column except the last, which
/// fills the remaining space. Missing entries fall back to a fill portion.
pub fn tree_view<'a, Message>(
    model: &'a TreeModel,
    columns: &'a ColumnSchema,
    widths: &[f32],
    on_message: impl Fn(TreeMessage) -> Message + 'a + Clone,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let lengths = column_lengths(columns.len(), widths);

    let headers = build_headers(model, columns, &lengths, on_message.clone());

    let rows: Vec<Element<'a, Message>> = model
        .visible_rows()
        .into_iter()
        .filter_map(|r| build_row(model, r, &lengths, on_message.clone()))
        .collect();

    let content = column![
        container(headers).style(|theme: &Theme| container::Style {
            background: Some(Background::Color(
                theme.extended_palette().background.weak.color,
            )),
            ..Default::default()
        }),
        scrollable(column(rows).spacing(1).padding(Padding::from([4, 8]))).height(Length::Fill),
    ]
    .spacing(2);

    // Only track the cursor while a column edge is held
    let mut area = mouse_area(content);
    if model.resizing_column().is_some() {
        area = area.on_move(move |point: Point| on_message(TreeMessage::ColumnDragged(point.x)));
    }
    area.into()
}

fn column_lengths(count: usize, widths: &[f32]) -> Vec<Length> {
    (0..count)
        .map(|i| {
            if i + 1 == count {
                Length::Fill
            } else {
                widths
                    .get(i)
                    .map(|w| Length::Fixed(*w))
                    .unwrap_or(Length::FillPortion(1))
            }
        })
        .collect()
}

fn build_headers<'a, Message>(
    model: &'a TreeModel,
    columns: &'a ColumnSchema,
    lengths: &[Length],
    on_message: impl Fn(TreeMessage) -> Message + 'a,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let sort = model.sort_spec();
    let resizing = model.resizing_column();
    let last = columns.len().saturating_sub(1);
    let mut cells: Vec<Element<'a, Message>> = Vec::with_capacity(columns.len() * 2);
    for (i, (col, &width)) in columns.iter().zip(lengths).enumerate() {
        let arrow = match sort {
            Some(s) if s.column == i && s.ascending => " \u{25B2}", // ▲
            Some(s) if s.column == i => " \u{25BC}",                // ▼
            _ => "",
        };
        let header = button(text(format!("{}{}", col.label, arrow)).size(11))
            .padding(Padding::from([2, 4]))
            .width(width)
            .style(|theme: &Theme, _status| {
                let palette = theme.extended_palette();
                button::Style {
                    background: Some(Background::Color(Color::TRANSPARENT)),
                    text_color: palette.background.base.text,
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .on_press(on_message(TreeMessage::SortBy(i)));
        cells.push(header.into());
        if i < last {
            cells.push(resize_handle(resizing == Some(i), on_message(TreeMessage::StartColumnResize(i))));
        }
    }

    let indent = ARROW_WIDTH + 8.0;
    row![Space::new().width(Length::Fixed(indent)), row(cells).spacing(1)]
        .padding(Padding::from([4, 8]))
        .into()
}

fn resize_handle<'a, Message>(active: bool, on_press: Message) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let handle = container(Space::new())
        .width(Length::Fixed(HANDLE_WIDTH))
        .height(Length::Fixed(18.0))
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            let color = if active {
                palette.primary.strong.color
            } else {
                palette.background.strong.color
            };
            container::Style {
                background: Some(Background::Color(color)),
                ..Default::default()
            }
        });
    mouse_area(handle).on_press(on_press).into()
}

fn build_row<'a, Message>(
    model: &'a TreeModel,
    r: Row,
    lengths: &[Length],
    on_message: impl Fn(TreeMessage) -> Message + 'a + Clone,
) -> Option<Element<'a, Message>>
where
    Message: Clone + 'a,
{
    let node = model.node(r.node)?;
    let id = r.node;
    let is_selected = model.is_selected(id);

    let indent = Space::new().width(Length::Fixed(r.depth as f32 * ROW_INDENT));

    let arrow: Element<'a, Message> = if node.children.is_empty() {
        Space::new().width(Length::Fixed(ARROW_WIDTH)).into()
    } else {
        let arrow_text = if model.is_expanded(id) { "\u{25BC}" } else { "\u{25B6}" }; // ▼ or ▶
        button(text(arrow_text).size(10))
            .padding(Padding::from([2, 4]))
            .style(|theme: &Theme, _status| {
                let palette = theme.extended_palette();
                button::Style {
                    background: Some(Background::Color(Color::TRANSPARENT)),
                    text_color: palette.background.base.text,
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .on_press(on_message(TreeMessage::Toggle(id)))
            .into()
    };

    let font = if node.bold {
        Font {
            weight: Weight::Bold,
            ..Font::DEFAULT
        }
    } else {
        Font::DEFAULT
    };

    let cells: Vec<Element<'a, Message>> = lengths
        .iter()
        .enumerate()
        .map(|(i, &width)| {
            let cell = node.cells.get(i);
            let label = cell.map(|c| c.text.as_str()).unwrap_or("");
            let mut label = text(label).size(12).font(font);
            if let Some(fg) = cell.and_then(|c| c.foreground) {
                if !is_selected {
                    label = label.color(to_color(fg));
                }
            }
            let content: Element<'a, Message> = match (i, node.icon) {
                (0, Some(icon)) => row![text(icon.glyph()).size(13), label].spacing(6).into(),
                _ => label.into(),
            };
            let background = cell.and_then(|c| c.background).map(to_color);
            container(content)
                .width(width)
                .padding(Padding::from([1, 4]))
                .style(move |_| container::Style {
                    background: match (is_selected, background) {
                        (false, Some(bg)) => Some(bg.into()),
                        _ => None,
                    },
                    ..Default::default()
                })
                .into()
        })
        .collect();

    // Button is used for visual styling only; events go through mouse_area
    let row_button = button(row(cells).spacing(COLUMN_GAP))
        .padding(0)
        .width(Length::Fill)
        .style(move |theme: &Theme, status| {
            let palette = theme.extended_palette();
            let bg = if is_selected {
                palette.primary.weak.color
            } else {
                match status {
                    button::Status::Hovered => palette.background.weak.color,
                    _ => Color::TRANSPARENT,
                }
            };
            let text_color = if is_selected {
                palette.primary.weak.text
            } else {
                palette.background.base.text
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color,
                border: Border::default(),
                ..Default::default()
            }
        });

    let on_msg = on_message.clone();
    let on_msg_activate = on_message.clone();
    let on_msg_drop = on_message.clone();
    let row_area = mouse_area(row_button)
        .on_press(on_msg(TreeMessage::Select(id)))
        .on_double_click(on_msg_activate(TreeMessage::Activate(id)))
        .on_release(on_msg_drop(TreeMessage::DropReceived(id)))
        .on_right_press(on_message(TreeMessage::RightClick(id)));

    Some(
        row![indent, arrow, row_area]
            .spacing(2)
            .align_y(iced::Alignment::Center)
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_column_fills() {
        let lengths = column_lengths(3, &[250.0, 40.0]);
        assert_eq!(
            lengths,
            vec![Length::Fixed(250.0), Length::Fixed(40.0), Length::Fill]
        );
    }

    #[test]
    fn test_column_width_follows_cursor() {
        let widths = [250.0, 40.0];
        assert_eq!(column_width_at(HEADER_LEFT + 300.0, &widths, 0), 300.0);
        let second_start = HEADER_LEFT + 250.0 + COLUMN_GAP;
        assert_eq!(column_width_at(second_start + 75.0, &widths, 1), 75.0);
        assert_eq!(column_width_at(0.0, &widths, 0), MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_missing_widths_use_fill_portion() {
        let lengths = column_lengths(3, &[120.0]);
        assert_eq!(lengths[1], Length::FillPortion(1));
        assert_eq!(lengths[2], Length::Fill);
    }
}
