use iced::widget::{button, column, row, scrollable, text};
use iced::{Alignment, Element, Length, Task, Theme};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod detect;
mod state;
mod ui;

use config::AppConfig;
use detect::{DetectClient, DetectResult, ErrorKind};
use state::data::SelectedImage;
use state::view::DetectView;

/// Main application state
struct ObjectDetector {
    /// Selection, result and request bookkeeping
    view: DetectView,
    /// Shared HTTP client for every detection call
    client: DetectClient,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked the "Choose Image" button
    ChooseImage,
    /// Picker closed; None if cancelled
    ImageChosen(Option<SelectedImage>),
    /// User clicked the "Detect Objects" button
    DetectObjects,
    /// A detection call resolved (generation, outcome)
    DetectionFinished(u64, DetectResult<Vec<u8>>),
    NoticeDismissed,
}

impl ObjectDetector {
    fn new(config: &AppConfig, client: DetectClient) -> (Self, Task<Message>) {
        (
            ObjectDetector {
                view: DetectView::new(config.response_order),
                client,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseImage => Task::perform(ui::picker::pick_image(), Message::ImageChosen),
            Message::ImageChosen(file) => {
                self.view.select_file(file);
                Task::none()
            }
            Message::DetectObjects => match self.view.begin_detection() {
                Ok(request) => {
                    let client = self.client.clone();
                    let generation = request.generation;
                    info!(generation, file_name = %request.image.file_name, "Submitting image for detection");

                    Task::perform(
                        async move { client.detect(request.image).await },
                        move |result| Message::DetectionFinished(generation, result),
                    )
                }
                Err(err) => notify(err.kind()),
            },
            Message::DetectionFinished(generation, result) => {
                let notice = self.view.finish_detection(generation, result);
                debug!(generation, in_flight = self.view.in_flight(), "Detection resolved");

                match notice {
                    Some(kind) => notify(kind),
                    None => Task::none(),
                }
            }
            Message::NoticeDismissed => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let selected = match self.view.selected_image() {
            Some(image) => format!("Selected: {}", image.file_name),
            None => "No image selected".to_string(),
        };

        let status = text(self.view.status_line()).size(16);
        let status = if self.view.notice().is_some() {
            status.style(text::danger)
        } else {
            status
        };

        let mut content = column![
            text("Object Detection App").size(32),
            row![
                button("Choose Image")
                    .on_press(Message::ChooseImage)
                    .padding(10),
                text(selected),
            ]
            .spacing(10)
            .align_y(Alignment::Center),
            button("Detect Objects")
                .on_press(Message::DetectObjects)
                .padding(10),
            status,
        ]
        .spacing(20)
        .padding(20);

        if let Some(processed) = self.view.processed_image() {
            content = content.push(
                column![
                    text("Processed Image").size(24),
                    iced::widget::image(processed.handle.clone()).width(Length::Fill),
                ]
                .spacing(10),
            );
        }

        scrollable(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Show a notice without holding up the update loop
fn notify(kind: ErrorKind) -> Task<Message> {
    Task::perform(ui::notice::show_notice(kind), |_| Message::NoticeDismissed)
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("object_detect=info"));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}

fn main() -> iced::Result {
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);

    let client = match DetectClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        endpoint = %client.endpoint(),
        timeout = ?config.timeout,
        order = ?config.response_order,
        "Object Detection App starting"
    );

    iced::application("Object Detection App", ObjectDetector::update, ObjectDetector::view)
        .theme(ObjectDetector::theme)
        .centered()
        .run_with(move || ObjectDetector::new(&config, client))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ObjectDetector {
        let config = AppConfig::default();
        let client = DetectClient::new(&config).unwrap();
        ObjectDetector::new(&config, client).0
    }

    #[test]
    fn test_detect_without_image_sends_nothing() {
        let mut app = app();

        let _task = app.update(Message::DetectObjects);

        assert_eq!(app.view.notice(), Some(ErrorKind::MissingInput));
        assert_eq!(app.view.in_flight(), 0);
        assert!(app.view.processed_image().is_none());
    }

    #[test]
    fn test_detect_round_trip_through_messages() {
        let mut app = app();
        let image = SelectedImage::new("cat.png", b"cat".to_vec());

        let _ = app.update(Message::ImageChosen(Some(image)));
        let _task = app.update(Message::DetectObjects);
        assert_eq!(app.view.in_flight(), 1);
        assert!(app.view.notice().is_none());

        let _ = app.update(Message::DetectionFinished(1, Ok(b"annotated cat".to_vec())));
        assert_eq!(app.view.in_flight(), 0);
        assert_eq!(app.view.processed_image().unwrap().bytes(), b"annotated cat");
    }
}
