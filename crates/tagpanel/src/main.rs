//! tagpanel - file and album tree panel, hosted on an in-memory catalog
//!
//! Loads a YAML catalog fixture (or starts empty), shows both views and
//! applies drops and menu actions to the catalog. View geometry is restored
//! from the panel config at startup and saved when the window closes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossbeam::channel::{unbounded, Receiver};
use iced::keyboard::key::Named;
use iced::{event, keyboard, mouse, time, window, Element, Event, Size, Subscription, Task, Theme};

use tagpanel::panel::DEFAULT_PANEL_WIDTH;
use tagpanel::{ActionId, MainPanel, PanelEvent, PanelMessage};
use tagpanel_core::config::{default_config_path, load_config, save_config, PanelConfig};
use tagpanel_core::{ColumnSchema, MemoryCatalog, ObjectRef};
use tagpanel_widgets::{SelectModifiers, StyleContext};

#[derive(Parser, Debug, Clone)]
#[command(name = "tagpanel", about = "File and album tree panel")]
struct Args {
    /// YAML catalog fixture to load
    catalog: Option<PathBuf>,

    /// Panel config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone)]
enum Message {
    Panel(PanelMessage),
    /// Poll for asynchronously delivered menu contents
    Tick,
    CloseRequested(window::Id),
}

struct TagpanelApp {
    catalog: MemoryCatalog,
    panel: MainPanel,
    panel_events: Receiver<PanelEvent>,
    config: PanelConfig,
    config_path: PathBuf,
}

impl TagpanelApp {
    fn new(args: Args) -> (Self, Task<Message>) {
        let config_path = args
            .config
            .clone()
            .unwrap_or_else(|| default_config_path("panel.yaml"));
        let config: PanelConfig = load_config(&config_path);

        let mut catalog = match &args.catalog {
            Some(path) => load_catalog(path),
            None => MemoryCatalog::new(),
        };
        catalog.drain_events();

        let (tx, rx) = unbounded();
        let mut panel = MainPanel::new(&catalog, &config, ColumnSchema::default(), tx);
        panel.set_style(StyleContext::from_theme(&config.setting, &Theme::Light));

        let app = Self {
            catalog,
            panel,
            panel_events: rx,
            config,
            config_path,
        };
        (app, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Panel(msg) => {
                self.panel.update(&mut self.catalog, msg);
                self.pump();
                Task::none()
            }
            Message::Tick => {
                // Nothing to look releases up with here: answer with no versions
                let delivered = self.catalog.complete_lookups(&[]);
                if delivered > 0 {
                    log::debug!("update: answered {} release group lookups", delivered);
                }
                self.panel.update(&mut self.catalog, PanelMessage::PollMenu);
                Task::none()
            }
            Message::CloseRequested(id) => {
                self.panel.save_state(&mut self.config.persist);
                if let Err(e) = save_config(&self.config, &self.config_path) {
                    log::error!("update: failed to save panel config: {:#}", e);
                }
                window::close(id)
            }
        }
    }

    /// Feed catalog changes into the panel and act on panel notifications
    /// until both sides are quiet
    fn pump(&mut self) {
        loop {
            let events = self.catalog.drain_events();
            for event in &events {
                self.panel.handle_catalog_event(&self.catalog, event);
            }
            let notifications: Vec<PanelEvent> = self.panel_events.try_iter().collect();
            if events.is_empty() && notifications.is_empty() {
                break;
            }
            for notification in notifications {
                self.handle_panel_event(notification);
            }
        }
    }

    fn handle_panel_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::SelectionChanged(objects) => {
                log::info!("selection: {} objects", objects.len());
            }
            PanelEvent::Action {
                action: ActionId::Remove,
                objects,
            } => {
                for object in objects {
                    match object {
                        ObjectRef::Album(id) => self.catalog.remove_album(id),
                        ObjectRef::Cluster(id) => self.catalog.remove_cluster(id),
                        other => log::info!("remove: {} is not removable here", other),
                    }
                }
            }
            other => log::info!("panel event: {:?}", other),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.panel.view().map(Message::Panel)
    }

    fn subscription(&self) -> Subscription<Message> {
        let input = event::listen_with(|event, _status, _window| match event {
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::Panel(PanelMessage::ModifiersChanged(SelectModifiers {
                    shift: modifiers.shift(),
                    ctrl: modifiers.control(),
                })))
            }
            // Alt+Left/Right nudges the splitter
            Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) if modifiers.alt() => {
                match key.as_ref() {
                    keyboard::Key::Named(Named::ArrowLeft) => {
                        Some(Message::Panel(PanelMessage::ResizeSplitter(-1)))
                    }
                    keyboard::Key::Named(Named::ArrowRight) => {
                        Some(Message::Panel(PanelMessage::ResizeSplitter(1)))
                    }
                    _ => None,
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                Some(Message::Panel(PanelMessage::MouseReleased))
            }
            Event::Window(window::Event::Opened { size, .. })
            | Event::Window(window::Event::Resized(size)) => {
                Some(Message::Panel(PanelMessage::Resized(size.width)))
            }
            Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::Panel(PanelMessage::FilesDropped(vec![path])))
            }
            _ => None,
        });
        let close = window::close_requests().map(Message::CloseRequested);
        let poll = if self.panel.menu_waiting() {
            time::every(Duration::from_millis(100)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };
        Subscription::batch([input, close, poll])
    }
}

fn load_catalog(path: &Path) -> MemoryCatalog {
    let loaded = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|yaml| MemoryCatalog::from_yaml_str(&yaml).map_err(anyhow::Error::from));
    match loaded {
        Ok(catalog) => {
            log::info!("load_catalog: loaded {:?}", path);
            catalog
        }
        Err(e) => {
            log::warn!("load_catalog: {:?}: {}, starting empty", path, e);
            MemoryCatalog::new()
        }
    }
}

fn title(_app: &TagpanelApp) -> String {
    String::from("tagpanel")
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    log::info!("tagpanel starting up");

    iced::application(
        move || TagpanelApp::new(args.clone()),
        TagpanelApp::update,
        TagpanelApp::view,
    )
    .title(title)
    .subscription(TagpanelApp::subscription)
    .exit_on_close_request(false)
    .window_size(Size::new(DEFAULT_PANEL_WIDTH, 800.0))
    .run()
}
