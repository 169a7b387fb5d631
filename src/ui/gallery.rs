//! Gallery view: the scrolling column of cells, the sentinel frame around
//! the last one, and the loading indicator.
use iced::alignment;
use iced::widget::{column, container, scrollable, text, Column};
use iced::{Background, Border, Color, Element, Length, Size, Theme};

use super::cell::{ImageCell, CELL_SIZE};
use crate::state::gallery::Gallery;
use crate::state::observer::SentinelTarget;
use crate::Message;

/// Identifier of the scrollable the whole gallery is mounted into
pub const MOUNT_NODE: &str = "mountNode";

const SENTINEL_BORDER: f32 = 4.0;

/// Full size of the framed sentinel cell
pub const SENTINEL_SIZE: Size = Size::new(
    CELL_SIZE.width + 2.0 * SENTINEL_BORDER,
    CELL_SIZE.height + 2.0 * SENTINEL_BORDER,
);

/// Widget id of the container framing `target`
pub fn sentinel_id(target: &SentinelTarget) -> container::Id {
    container::Id::new(sentinel_name(target))
}

fn sentinel_name(target: &SentinelTarget) -> String {
    format!("sentinel-{}", target.key)
}

pub fn mount_node() -> scrollable::Id {
    scrollable::Id::new(MOUNT_NODE)
}

/// One entry of the rendered gallery, top to bottom
#[derive(Debug)]
enum Row<'a> {
    Cell(ImageCell<'a>),
    /// The cell carrying the observation binding, drawn with a red frame
    Sentinel(ImageCell<'a>, &'a SentinelTarget),
    /// The "loading..." indicator below the cells
    Loading,
}

fn rows(gallery: &Gallery) -> Vec<Row<'_>> {
    let sentinel = gallery.sentinel();

    let mut rows: Vec<Row<'_>> = gallery
        .images()
        .iter()
        .enumerate()
        .map(|(ordinal, record)| {
            let cell = ImageCell::new(record, ordinal);
            match sentinel {
                Some(target) if target.ordinal == ordinal && target.key == cell.key() => {
                    Row::Sentinel(cell, target)
                }
                _ => Row::Cell(cell),
            }
        })
        .collect();

    if gallery.is_loading() {
        rows.push(Row::Loading);
    }
    rows
}

pub fn view<'a>(
    gallery: &'a Gallery,
    placeholder: Option<&'a iced::widget::image::Handle>,
) -> Element<'a, Message> {
    let mut cells = Column::new();
    let mut loading = false;

    for row in rows(gallery) {
        match row {
            Row::Cell(cell) => cells = cells.push(cell.view(placeholder)),
            Row::Sentinel(cell, target) => {
                cells = cells.push(sentinel_frame(cell.view(placeholder), target))
            }
            Row::Loading => loading = true,
        }
    }

    let mut content = column![cells].padding(24);

    if loading {
        content = content.push(
            text("loading...")
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        );
    }

    let list = container(content)
        .width(Length::Fill)
        .style(|_theme: &Theme| container::Style {
            background: Some(Background::Color(Color::from_rgb8(0xf3, 0xf4, 0xf6))),
            text_color: Some(Color::from_rgb8(0x11, 0x18, 0x27)),
            ..container::Style::default()
        });

    scrollable(list)
        .id(mount_node())
        .on_scroll(Message::Scrolled)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn sentinel_frame<'a>(
    cell: Element<'a, Message>,
    target: &SentinelTarget,
) -> Element<'a, Message> {
    container(cell)
        .id(sentinel_id(target))
        .padding(SENTINEL_BORDER)
        .width(Length::Fixed(SENTINEL_SIZE.width))
        .height(Length::Fixed(SENTINEL_SIZE.height))
        .style(|_theme: &Theme| container::Style {
            border: Border {
                color: Color::from_rgb8(0xef, 0x44, 0x44),
                width: SENTINEL_BORDER,
                radius: 0.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}
