use crate::commands::{self, Action};
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::EntityTab;
use color_eyre::{eyre::eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use entab::config::Config;
use entab::engine::EntityModule;
use entab::notify::{Notifier, Toast, ToastLog, ToastVariant};
use entab::prefs::{NoopPreferences, PreferenceStore, SqlitePreferences};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
/// How long a toast stays in the footer
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
  title: String,
  tabs: Vec<EntityTab>,
  active: usize,
  command: CommandInput,
  toasts: ToastLog,
  current_toast: Option<(Toast, Instant)>,
  should_quit: bool,
}

impl App {
  /// Build one tab per configured entity type.
  ///
  /// Must run inside the tokio runtime; every tab starts loading immediately.
  pub fn new(config: Config, initial_tab: Option<&str>) -> Result<Self> {
    let store: Arc<dyn PreferenceStore> = match SqlitePreferences::open() {
      Ok(store) => Arc::new(store),
      Err(e) => {
        warn!(error = %e, "view preferences unavailable, changes will not persist");
        Arc::new(NoopPreferences)
      }
    };
    let toasts = ToastLog::new();
    let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
    let client = reqwest::Client::builder()
      .user_agent(concat!("entab/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;
    let settings = config.cache.fetch_settings();

    let mut tabs = Vec::with_capacity(config.tabs.len());
    for tab in &config.tabs {
      let sdk = config.build_sdk(tab, &client)?;
      let module = EntityModule::new(
        tab.entity_config(sdk, config.page_size()),
        Arc::clone(&store),
        Arc::clone(&notifier),
        settings,
      );
      tabs.push(EntityTab::new(module, tab.clone(), Arc::clone(&notifier)));
    }

    let active = match initial_tab {
      Some(key) => config
        .tabs
        .iter()
        .position(|t| t.key == key)
        .ok_or_else(|| eyre!("Unknown tab '{}'", key))?,
      None => 0,
    };

    let labels: Vec<(String, String)> = config.tabs.iter().map(|t| (t.key.clone(), t.plural())).collect();
    let command = CommandInput::new(commands::command_list(
      labels.iter().map(|(key, plural)| (key.as_str(), plural.as_str())),
    ));

    info!(tabs = tabs.len(), active, "app started");
    Ok(Self {
      title: config.title.clone().unwrap_or_else(|| "entab".to_string()),
      tabs,
      active,
      command,
      toasts,
      current_toast: None,
      should_quit: false,
    })
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {}
      Event::Tick => self.tick(),
    }
  }

  fn tick(&mut self) {
    // Background tabs keep collecting results so their state is current when shown
    for tab in &mut self.tabs {
      tab.tick();
    }
    if let Some(toast) = self.toasts.drain().pop() {
      self.current_toast = Some((toast, Instant::now()));
    }
    if self
      .current_toast
      .as_ref()
      .is_some_and(|(_, shown)| shown.elapsed() > TOAST_TTL)
    {
      self.current_toast = None;
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let view_captures = self.tabs[self.active].captures_input();
    if self.command.is_active() || !view_captures {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(line)) => {
          self.execute(&line);
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }
    }

    if !view_captures {
      if let KeyCode::Char(c @ '1'..='9') = key.code {
        let idx = c as usize - '1' as usize;
        if idx < self.tabs.len() {
          self.switch_to(idx);
        }
        return;
      }
    }

    if self.tabs[self.active].handle_key(key) == ViewAction::Quit {
      self.should_quit = true;
    }
  }

  fn switch_to(&mut self, idx: usize) {
    if idx != self.active {
      self.active = idx;
      self.tabs[idx].on_focus();
    }
  }

  fn execute(&mut self, line: &str) {
    let action = commands::parse(self.command.commands(), line);
    let active = self.active;
    match action {
      Action::Tab(key) => {
        if let Some(idx) = self.tabs.iter().position(|t| t.key() == key) {
          self.switch_to(idx);
        }
      }
      Action::View(mode) => self.tabs[active].set_view_mode(mode),
      Action::CycleView => self.tabs[active].cycle_view_mode(),
      Action::Refresh => self.tabs[active].refresh(true),
      Action::ResetFilters => self.tabs[active].reset_filters(),
      Action::Quit => self.should_quit = true,
      Action::Unknown(word) => {
        self.toasts.toast(Toast::new(
          "Unknown command",
          format!("'{}' is not a command.", word),
          ToastVariant::Destructive,
        ));
      }
    }
  }

  // Accessors for UI rendering

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn tab_labels(&self) -> Vec<String> {
    self
      .tabs
      .iter()
      .enumerate()
      .map(|(i, tab)| format!("{}:{}", i + 1, tab.plural()))
      .collect()
  }

  pub fn active_index(&self) -> usize {
    self.active
  }

  pub fn current_view(&mut self) -> &mut EntityTab {
    &mut self.tabs[self.active]
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn toast(&self) -> Option<&Toast> {
    self.current_toast.as_ref().map(|(toast, _)| toast)
  }
}
