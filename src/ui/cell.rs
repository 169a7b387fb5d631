//! A single image cell: placeholder image plus its 1-based position
use iced::widget::{container, image, row, text, Space};
use iced::{Alignment, Element, Length, Size};

use crate::state::data::ImageRecord;
use crate::Message;

/// Size the placeholder image is drawn at
pub const IMAGE_SIZE: Size = Size::new(200.0, 300.0);

const MARGIN: f32 = 8.0;
const CAPTION_WIDTH: f32 = 56.0;

/// Outer size of every cell. Cells never grow, so the sentinel's full
/// size is known without asking the layout.
pub const CELL_SIZE: Size = Size::new(
    IMAGE_SIZE.width + CAPTION_WIDTH + 3.0 * MARGIN,
    IMAGE_SIZE.height + 2.0 * MARGIN,
);

#[derive(Debug, Clone, Copy)]
pub struct ImageCell<'a> {
    record: &'a ImageRecord,
    ordinal: usize,
}

impl<'a> ImageCell<'a> {
    pub fn new(record: &'a ImageRecord, ordinal: usize) -> Self {
        Self { record, ordinal }
    }

    /// Render key, matching the sentinel binding's key for the same record
    pub fn key(&self) -> String {
        self.record.key(self.ordinal)
    }

    pub fn caption(&self) -> String {
        (self.ordinal + 1).to_string()
    }

    /// Build the cell.
    ///
    /// The record's own URL is not loaded; every cell shows the shared
    /// `placeholder`, or an empty box of the same size until it arrives.
    pub fn view(self, placeholder: Option<&image::Handle>) -> Element<'a, Message> {
        let picture: Element<'a, Message> = match placeholder {
            Some(handle) => image::Image::<image::Handle>::new(handle.clone())
                .width(Length::Fixed(IMAGE_SIZE.width))
                .height(Length::Fixed(IMAGE_SIZE.height))
                .into(),
            None => Space::new(
                Length::Fixed(IMAGE_SIZE.width),
                Length::Fixed(IMAGE_SIZE.height),
            )
            .into(),
        };

        let content = row![
            picture,
            text(self.caption())
                .size(16)
                .width(Length::Fixed(CAPTION_WIDTH)),
        ]
        .spacing(MARGIN)
        .align_y(Alignment::End);

        container(content)
            .padding(MARGIN)
            .width(Length::Fixed(CELL_SIZE.width))
            .height(Length::Fixed(CELL_SIZE.height))
            .into()
    }
}
