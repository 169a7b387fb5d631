use iced::widget::scrollable::Viewport;
use iced::widget::{column, container, image, text};
use iced::{window, Color, Element, Length, Rectangle, Size, Subscription, Task, Theme};
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

mod error;
mod net;
mod state;
mod ui;

use error::GalleryError;
use net::ListingClient;
use state::config::GalleryConfig;
use state::data::ImageRecord;
use state::gallery::{Effect, Gallery};
use state::observer::SentinelTarget;

/// Main application state
struct InfiniteScroll {
    /// The pagination engine
    gallery: Gallery,
    /// Shared HTTP client for listing pages and the placeholder
    client: ListingClient,
    /// Image drawn by every cell, once downloaded
    placeholder: Option<image::Handle>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// A listing fetch finished
    PageLoaded {
        page: u32,
        result: Result<Vec<ImageRecord>, GalleryError>,
    },
    /// The placeholder download finished
    PlaceholderLoaded(Result<image::Handle, GalleryError>),
    /// The gallery was scrolled
    Scrolled(Viewport),
    /// The window changed size, which can bring the sentinel into view
    WindowResized(Size),
    /// Visible part of the sentinel cell rendered under `key`
    SentinelVisibility {
        key: String,
        visible: Option<Rectangle>,
    },
    /// The user asked to close the window
    CloseRequested,
}

impl InfiniteScroll {
    /// Create the application and mount the gallery
    fn new() -> (Self, Task<Message>) {
        let config = GalleryConfig::load();
        info!(
            base_url = %config.base_url,
            page_size = config.page_size,
            dispatch = ?config.dispatch,
            "🖼️  Infinite scroll gallery starting"
        );

        let client = ListingClient::new(&config);
        let mut gallery = Gallery::new(&config);
        let first_page = gallery.mount();

        let placeholder = Task::perform(
            client.clone().fetch_bytes(config.placeholder_url.clone()),
            |result| Message::PlaceholderLoaded(result.map(image::Handle::from_bytes)),
        );

        let app = InfiniteScroll {
            gallery,
            client,
            placeholder: None,
        };
        let first_page = app.run(first_page);

        (app, Task::batch([first_page, placeholder]))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::PageLoaded { page, result } => {
                self.gallery.fetch_completed(page, result);
                debug!(
                    images = self.gallery.images().len(),
                    phase = ?self.gallery.phase(),
                    last_error = self.gallery.last_error().map(tracing::field::display),
                    "Gallery updated"
                );
                Task::none()
            }
            Message::PlaceholderLoaded(Ok(handle)) => {
                self.placeholder = Some(handle);
                Task::none()
            }
            Message::PlaceholderLoaded(Err(e)) => {
                warn!(error = %e, "Placeholder image unavailable, cells stay blank");
                Task::none()
            }
            Message::Scrolled(viewport) => {
                trace!(offset = viewport.absolute_offset().y, "Scrolled");
                self.probe_sentinel()
            }
            Message::WindowResized(size) => {
                debug!(width = size.width, height = size.height, "Window resized");
                self.probe_sentinel()
            }
            Message::SentinelVisibility { key, visible } => {
                let effect = self.gallery.report_visibility(
                    &key,
                    visible,
                    ui::gallery::SENTINEL_SIZE,
                );
                self.run(effect)
            }
            Message::CloseRequested => {
                self.gallery.unmount();
                iced::exit()
            }
        };

        // Bind the observer to whatever is last now
        let rebound = match self.gallery.bind_sentinel() {
            Some(target) => probe(&target),
            None => Task::none(),
        };

        Task::batch([task, rebound])
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content = column![
            text("Infinite Scrolling")
                .size(48)
                .color(Color::from_rgb8(0xb9, 0x1c, 0x1c)),
            ui::gallery::view(&self.gallery, self.placeholder.as_ref()),
        ]
        .spacing(16)
        .padding(16);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
            window::close_requests().map(|_id| Message::CloseRequested),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }

    /// Turn a state transition's effect into a task
    fn run(&self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::None => Task::none(),
            Effect::Fetch(request) => Task::perform(
                self.client.clone().fetch_page(request),
                move |result| Message::PageLoaded {
                    page: request.page,
                    result,
                },
            ),
        }
    }

    fn probe_sentinel(&self) -> Task<Message> {
        match self.gallery.sentinel() {
            Some(target) => probe(target),
            None => Task::none(),
        }
    }
}

/// Ask the runtime how much of the sentinel cell is inside the viewport
fn probe(target: &SentinelTarget) -> Task<Message> {
    let key = target.key.clone();
    container::visible_bounds(ui::gallery::sentinel_id(target)).map(move |visible| {
        Message::SentinelVisibility {
            key: key.clone(),
            visible,
        }
    })
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> iced::Result {
    init_logging();

    iced::application(
        "Infinite Scrolling",
        InfiniteScroll::update,
        InfiniteScroll::view,
    )
    .subscription(InfiniteScroll::subscription)
    .theme(InfiniteScroll::theme)
    .window_size((960.0, 720.0))
    .exit_on_close_request(false)
    .centered()
    .run_with(InfiniteScroll::new)
}
