use super::cards::render_cards;
use super::kanban::{self, render_kanban, KanbanColumn};
use super::table::render_table;
use super::PageContext;
use crate::task::TaskSet;
use crate::ui::components::{
  FilterBar, FilterBarEvent, FormDialog, FormEvent, FormField, KeyResult, SearchEvent, SearchInput,
};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use entab::bulk::BulkOutcome;
use entab::cache::FetchResult;
use entab::config::{FieldConfig, TabConfig};
use entab::dialog::DialogOutcome;
use entab::engine::{EntityModule, LoadState, PageView};
use entab::entity::{Entity, EntityId, ID_FIELD};
use entab::mutation::MutationKind;
use entab::notify::{Notifier, Toast, ToastVariant};
use entab::pipeline::{FieldKind, SEARCH_FILTER};
use entab::prefs::ViewMode;
use entab::sdk::SdkError;
use entab::selection::{BulkIntent, SelectionCheck};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::sync::Arc;
use tracing::debug;

const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Results of background work started by a tab
pub enum TabEvent {
  Loaded(FetchResult),
  Saved {
    kind: MutationKind,
    result: Result<Entity, SdkError>,
  },
  Deleted(BulkOutcome),
}

/// One configured entity type: list, filters, selection and form
pub struct EntityTab {
  module: EntityModule,
  tab: TabConfig,
  notifier: Arc<dyn Notifier>,
  tasks: TaskSet<TabEvent>,
  /// Row within the current page, or within the focused kanban column
  cursor: usize,
  kanban_column: usize,
  search: SearchInput,
  filter_bar: FilterBar,
  form: Option<FormDialog>,
  confirm_delete: Option<Vec<EntityId>>,
}

impl EntityTab {
  /// Build the tab and start loading its list
  pub fn new(module: EntityModule, tab: TabConfig, notifier: Arc<dyn Notifier>) -> Self {
    let mut view = Self {
      filter_bar: FilterBar::new(tab.filters.clone()),
      module,
      tab,
      notifier,
      tasks: TaskSet::new(),
      cursor: 0,
      kanban_column: 0,
      search: SearchInput::new(),
      form: None,
      confirm_delete: None,
    };
    view.refresh(false);
    view
  }

  pub fn key(&self) -> &str {
    self.module.key()
  }

  pub fn plural(&self) -> &str {
    &self.module.config().entity_name_plural
  }

  /// Fetch through the cache; a fresh cache answers without a request
  pub fn refresh(&mut self, force: bool) {
    let actions = self.module.actions();
    self
      .tasks
      .spawn(async move { TabEvent::Loaded(actions.refresh(force).await) });
  }

  pub fn set_view_mode(&mut self, mode: ViewMode) {
    self.module.set_view_mode(mode);
    self.reset_cursor();
  }

  pub fn cycle_view_mode(&mut self) {
    self.set_view_mode(self.module.view_mode().cycle());
  }

  pub fn reset_filters(&mut self) {
    self.module.reset_filters();
    self.reset_cursor();
  }

  fn reset_cursor(&mut self) {
    self.cursor = 0;
    self.kanban_column = 0;
  }

  fn toast(&self, title: &str, description: String) {
    self
      .notifier
      .toast(Toast::new(title, description, ToastVariant::Default));
  }

  fn title_field(&self) -> Option<&str> {
    self.module.config().title_field.as_deref()
  }

  /// Table columns; falls back to id and title when no fields are configured
  fn columns(&self) -> Vec<FieldConfig> {
    let columns: Vec<FieldConfig> = self.tab.fields.iter().filter(|f| f.column).cloned().collect();
    if !columns.is_empty() {
      return columns;
    }
    std::iter::once(ID_FIELD)
      .chain(self.title_field())
      .map(|name| FieldConfig {
        name: name.to_string(),
        kind: FieldKind::Text,
        label: None,
        form: true,
        column: true,
      })
      .collect()
  }

  fn form_fields(&self) -> Vec<FormField> {
    self
      .tab
      .fields
      .iter()
      .filter(|f| f.form && f.name != ID_FIELD)
      .map(|f| FormField {
        name: f.name.clone(),
        label: f.label().to_string(),
        kind: f.kind,
      })
      .collect()
  }

  fn kanban_columns(&self, items: &[Entity]) -> Vec<KanbanColumn> {
    let Some(field) = &self.tab.kanban_field else {
      return Vec::new();
    };
    let known = self
      .tab
      .filters
      .iter()
      .find(|f| &f.name == field)
      .map(|f| f.values.clone())
      .unwrap_or_default();
    kanban::group(items, field, &known)
  }

  /// Records the cursor moves over in the current layout
  fn cursor_items(&self, view: &PageView) -> Vec<Entity> {
    match self.module.view_mode() {
      ViewMode::Kanban => self
        .kanban_columns(&view.items)
        .into_iter()
        .nth(self.kanban_column)
        .map(|c| c.items)
        .unwrap_or_default(),
      ViewMode::Card | ViewMode::Table => view.items.clone(),
    }
  }

  fn current_entity(&self) -> Option<Entity> {
    self.cursor_items(&self.module.view()).into_iter().nth(self.cursor)
  }

  fn move_cursor(&mut self, delta: i32) {
    let len = self.cursor_items(&self.module.view()).len();
    if len == 0 {
      self.cursor = 0;
      return;
    }
    self.cursor = (self.cursor as i32 + delta).clamp(0, len as i32 - 1) as usize;
  }

  fn move_column(&mut self, delta: i32) {
    let count = self.kanban_columns(&self.module.view().items).len();
    if count == 0 {
      return;
    }
    self.kanban_column = (self.kanban_column as i32 + delta).clamp(0, count as i32 - 1) as usize;
    self.cursor = 0;
  }

  fn cycle_page_size(&mut self) {
    let current = self.module.page_size();
    let next = PAGE_SIZES
      .iter()
      .copied()
      .find(|size| *size > current)
      .unwrap_or(PAGE_SIZES[0]);
    self.module.set_page_size(next);
    self.reset_cursor();
  }

  /// Sort by the column after the current primary sort column
  fn next_sort_field(&mut self) {
    let columns = self.columns();
    if columns.is_empty() {
      return;
    }
    let next = match self.module.sort_config().primary() {
      Some(primary) => columns
        .iter()
        .position(|c| c.name == primary.id)
        .map(|idx| (idx + 1) % columns.len())
        .unwrap_or(0),
      None => 0,
    };
    self.module.toggle_sort(&columns[next].name);
  }

  fn flip_sort(&mut self) {
    let field = self.module.sort_config().primary().map(|k| k.id.clone());
    if let Some(field) = field {
      self.module.toggle_sort(&field);
    }
  }

  fn open_form(&mut self) {
    let dialog = self.module.dialog();
    if !dialog.is_open() {
      return;
    }
    let title = match dialog.current_item() {
      Some(entity) => format!("Edit {}", entity.display_name(self.title_field())),
      None => format!("New {}", self.module.config().entity_name),
    };
    self.form = Some(FormDialog::new(title, self.form_fields(), dialog.current_item()));
  }

  fn add(&mut self) {
    self.module.add_new();
    self.open_form();
  }

  fn edit(&mut self) {
    if self.module.selection().is_active() {
      if let SelectionCheck::Ready(_) = self.module.edit_selected() {
        self.open_form();
      }
      return;
    }
    if let Some(entity) = self.current_entity() {
      self.module.edit(entity);
      self.open_form();
    }
  }

  fn save(&mut self, payload: serde_json::Value) {
    let id = self.module.dialog().current_item().and_then(Entity::id);
    let kind = if id.is_some() {
      MutationKind::Update
    } else {
      MutationKind::Create
    };
    let actions = self.module.actions();
    self.tasks.spawn(async move {
      let result = actions.save(id.as_ref(), payload).await;
      TabEvent::Saved { kind, result }
    });
  }

  fn toggle_current(&mut self) {
    if let Some(id) = self.current_entity().and_then(|e| e.id()) {
      self.module.toggle_selected(id);
    }
  }

  /// Ask for confirmation before deleting the selection or the record under the cursor
  fn request_delete(&mut self) {
    if !self.module.selection().is_active() {
      if let Some(id) = self.current_entity().and_then(|e| e.id()) {
        self.confirm_delete = Some(vec![id]);
      }
      return;
    }
    match self.module.selection().check(BulkIntent::Delete) {
      SelectionCheck::Ready(ids) => self.confirm_delete = Some(ids),
      SelectionCheck::NothingSelected | SelectionCheck::SelectOnlyOne => {
        let plural = self.plural().to_lowercase();
        self.toast("Nothing selected", format!("Select the {} to delete.", plural));
      }
    }
  }

  fn delete(&mut self, ids: Vec<EntityId>) {
    let actions = self.module.actions();
    self
      .tasks
      .spawn(async move { TabEvent::Deleted(actions.delete_all(&ids).await) });
  }

  fn handle_event(&mut self, event: TabEvent) {
    match event {
      TabEvent::Loaded(Ok(records)) => {
        debug!(key = %self.module.key(), count = records.len(), "list loaded");
      }
      TabEvent::Loaded(Err(e)) => {
        debug!(key = %self.module.key(), error = %e, "list load failed");
      }
      TabEvent::Saved { kind, result } => match result {
        Ok(entity) => {
          let name = entity.display_name(self.title_field());
          self.form = None;
          if let Some(closed) = self.module.end_dialog(DialogOutcome::saved(kind, name)) {
            let actions = self.module.actions();
            self
              .tasks
              .spawn(async move { TabEvent::Loaded(actions.finish_dialog(closed).await) });
          }
        }
        Err(e) => {
          if let Some(form) = &mut self.form {
            form.set_error(e.to_string());
          }
        }
      },
      TabEvent::Deleted(outcome) => {
        debug!(key = %self.module.key(), ok = outcome.success_count, failed = outcome.fail_count, "delete finished");
        self.module.cancel_selection();
        self.move_cursor(0);
      }
    }
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> ViewAction {
    let kanban = self.module.view_mode() == ViewMode::Kanban;
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1),
      KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1),
      KeyCode::Char('h') | KeyCode::Left if kanban => self.move_column(-1),
      KeyCode::Char('l') | KeyCode::Right if kanban => self.move_column(1),
      KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
      KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
      KeyCode::Char(']') => {
        self.module.next_page();
        self.reset_cursor();
      }
      KeyCode::Char('[') => {
        self.module.prev_page();
        self.reset_cursor();
      }
      KeyCode::Char('p') => self.cycle_page_size(),
      KeyCode::Char('o') => self.next_sort_field(),
      KeyCode::Char('O') => self.flip_sort(),
      KeyCode::Char('v') => self.cycle_view_mode(),
      KeyCode::Char('a') => self.add(),
      KeyCode::Char('e') | KeyCode::Enter => self.edit(),
      KeyCode::Char(' ') => self.toggle_current(),
      KeyCode::Char('x') => self.module.start_selection(BulkIntent::Delete),
      KeyCode::Char('A') => self.module.select_all_visible(),
      KeyCode::Char('d') => self.request_delete(),
      KeyCode::Char('r') => self.refresh(true),
      KeyCode::Esc if self.module.selection().is_active() => self.module.cancel_selection(),
      KeyCode::Char('q') => return ViewAction::Quit,
      _ => {}
    }
    ViewAction::None
  }

  fn status_line(&self, view: &PageView) -> Line<'static> {
    if let Some(ids) = &self.confirm_delete {
      let noun = if ids.len() == 1 {
        self.module.config().entity_name.to_lowercase()
      } else {
        self.plural().to_lowercase()
      };
      return Line::from(Span::styled(
        format!(" Delete {} {}? (y/n)", ids.len(), noun),
        Style::default().fg(Color::Red).bold(),
      ));
    }

    let pagination = &view.pagination;
    let mut parts = vec![
      format!("Page {}/{}", pagination.current_page, pagination.total_pages.max(1)),
      format!("{} records", pagination.total_count),
      format!("{} per page", pagination.page_size),
    ];
    if let Some(primary) = self.module.sort_config().primary() {
      parts.push(format!("sort {} {}", primary.id, if primary.desc { "▼" } else { "▲" }));
    }
    if let Some(query) = self.module.filters().get(SEARCH_FILTER).filter(|q| !q.is_empty()) {
      parts.push(format!("search \"{}\"", query));
    }

    let mut spans = vec![Span::styled(format!(" {}", parts.join(" · ")), Style::default().fg(Color::DarkGray))];
    let selection = self.module.selection();
    if selection.is_active() {
      let intent = match selection.intent() {
        Some(BulkIntent::Delete) => " to delete",
        Some(BulkIntent::Edit) => " to edit",
        None => "",
      };
      spans.push(Span::styled(
        format!("   {} selected{}", selection.len(), intent),
        Style::default().fg(Color::Cyan).bold(),
      ));
    }
    Line::from(spans)
  }

  fn render_content(&self, frame: &mut Frame, area: Rect, view: &PageView) {
    let plural = self.plural();
    let title = if self.module.loading() {
      format!(" {} ({}) (refreshing...) ", plural, view.pagination.total_count)
    } else {
      format!(" {} ({}) ", plural, view.pagination.total_count)
    };
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let area = match self.module.load_state() {
      LoadState::Loading => {
        let text = match self.module.error() {
          Some(error) => format!("Loading {}... {}", plural.to_lowercase(), error),
          None => format!("Loading {}...", plural.to_lowercase()),
        };
        let paragraph = Paragraph::new(text)
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
      LoadState::Blocked(error) => {
        let paragraph = Paragraph::new(format!(
          "Failed to load {}: {}\n\nPress 'r' to retry.",
          plural.to_lowercase(),
          error
        ))
        .block(block)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
      }
      LoadState::Ready { warning: Some(warning) } => {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(area);
        let banner = Paragraph::new(format!(" Showing cached data. {}", warning)).style(Style::default().fg(Color::Yellow));
        frame.render_widget(banner, chunks[0]);
        chunks[1]
      }
      LoadState::Ready { warning: None } => area,
    };

    if view.items.is_empty() {
      let paragraph = Paragraph::new(format!("No {} found.", plural.to_lowercase()))
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let fields = self.columns();
    let ctx = PageContext {
      items: &view.items,
      fields: &fields,
      title_field: self.title_field(),
      cursor: self.cursor,
      selection: self.module.selection(),
      sort: self.module.sort_config(),
    };
    match self.module.view_mode() {
      ViewMode::Table => render_table(frame, area, block, &ctx),
      ViewMode::Card => render_cards(frame, area, block, &ctx),
      ViewMode::Kanban => {
        if self.tab.kanban_field.is_none() {
          let paragraph = Paragraph::new("No kanban_field configured for this tab.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
          frame.render_widget(paragraph, area);
          return;
        }
        let columns = self.kanban_columns(&view.items);
        render_kanban(frame, area, block, &columns, self.kanban_column, &ctx);
      }
    }
  }
}

impl View for EntityTab {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if let Some(ids) = self.confirm_delete.take() {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => self.delete(ids),
        KeyCode::Char('n') | KeyCode::Esc => {}
        _ => self.confirm_delete = Some(ids),
      }
      return ViewAction::None;
    }

    if let Some(form) = &mut self.form {
      match form.handle_key(key) {
        KeyResult::Event(FormEvent::Submitted(payload)) => self.save(payload),
        KeyResult::Event(FormEvent::Cancelled) => {
          self.form = None;
          self.module.end_dialog(DialogOutcome::dismissed());
        }
        KeyResult::Handled | KeyResult::NotHandled => {}
      }
      return ViewAction::None;
    }

    let query = self.module.filters().get(SEARCH_FILTER).unwrap_or("").to_string();
    match self.search.handle_key(key, &query) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        self.module.set_filter(SEARCH_FILTER, &query);
        self.reset_cursor();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match self.filter_bar.handle_key(key, self.module.filters()) {
      KeyResult::Event(FilterBarEvent::Changed { name, value }) => {
        self.module.set_filter(&name, &value);
        self.reset_cursor();
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    self.handle_list_key(key)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.move_cursor(0);
    let view = self.module.view();

    let mut constraints = Vec::new();
    if !self.filter_bar.is_empty() {
      constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));
    let chunks = Layout::vertical(constraints).split(area);

    let mut next = 0;
    if !self.filter_bar.is_empty() {
      self.filter_bar.render(frame, chunks[0], self.module.filters());
      next = 1;
    }
    self.render_content(frame, chunks[next], &view);
    frame.render_widget(Paragraph::new(self.status_line(&view)), chunks[next + 1]);

    self.search.render_overlay(frame, area);
    if let Some(form) = &self.form {
      form.render_overlay(frame, area);
    }
  }

  fn breadcrumb_label(&self) -> String {
    format!("{} [{}]", self.plural(), self.module.view_mode())
  }

  fn tick(&mut self) {
    for event in self.tasks.poll() {
      self.handle_event(event);
    }
  }

  fn on_focus(&mut self) {
    self.refresh(false);
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.form.is_some() || self.confirm_delete.is_some()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("a", "add").with_priority(30),
      ShortcutInfo::new("e", "edit").with_priority(31),
      ShortcutInfo::new("d", "delete").with_priority(32),
      ShortcutInfo::new("v", "layout").with_priority(40),
      ShortcutInfo::new("[/]", "page").with_priority(50),
      ShortcutInfo::new("q", "quit").with_priority(90),
    ];
    if !self.filter_bar.is_empty() {
      shortcuts.push(ShortcutInfo::new("PgUp/Dn", "filter").with_priority(21));
    }
    if self.module.selection().is_active() {
      shortcuts.push(ShortcutInfo::new("space", "select").with_priority(33));
      shortcuts.push(ShortcutInfo::new("A", "page").with_priority(34));
      shortcuts.push(ShortcutInfo::new("Esc", "cancel").with_priority(35));
    } else {
      shortcuts.push(ShortcutInfo::new("x", "select").with_priority(33));
    }
    shortcuts
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;
  use entab::cache::FetchSettings;
  use entab::config::Config;
  use entab::notify::ToastLog;
  use entab::prefs::NoopPreferences;
  use entab::sdk::MemorySdk;
  use std::time::Duration;

  const CONFIG: &str = r#"
tabs:
  - key: tariffs
    name: Tariff
    title_field: code
    search_fields: [code]
    page_size: 2
    kanban_field: status
    filters:
      - name: status
        values: [active, draft]
    fields:
      - name: code
      - name: price
        kind: number
      - name: status
    records:
      - { id: 1, code: T-01, price: 10, status: active }
      - { id: 2, code: T-02, price: 20, status: draft }
      - { id: 3, code: T-03, price: 30, status: active }
"#;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn press(tab: &mut EntityTab, keys: &str) {
    for c in keys.chars() {
      tab.handle_key(key(KeyCode::Char(c)));
    }
  }

  /// Let background work and the fetch cooldown run to completion
  async fn settle(tab: &mut EntityTab) {
    for _ in 0..4 {
      tokio::time::sleep(Duration::from_millis(300)).await;
      tab.tick();
    }
  }

  async fn tariffs() -> (EntityTab, ToastLog) {
    let config = Config::parse(CONFIG).unwrap();
    let tab = config.tabs[0].clone();
    let records = tab.records.iter().cloned().filter_map(Entity::from_value).collect();
    let sdk = Arc::new(MemorySdk::with_records(records));
    let log = ToastLog::new();
    let module = EntityModule::new(
      tab.entity_config(sdk, config.page_size()),
      Arc::new(NoopPreferences),
      Arc::new(log.clone()),
      FetchSettings::default(),
    );
    let mut view = EntityTab::new(module, tab, Arc::new(log.clone()));
    settle(&mut view).await;
    (view, log)
  }

  #[tokio::test(start_paused = true)]
  async fn test_loads_first_page() {
    let (tab, _) = tariffs().await;
    let view = tab.module.view();
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.pagination.total_pages, 2);
    assert_eq!(tab.breadcrumb_label(), "Tariffs [table]");
  }

  #[tokio::test(start_paused = true)]
  async fn test_search_filters_and_resets_page() {
    let (mut tab, _) = tariffs().await;
    press(&mut tab, "]");
    assert_eq!(tab.module.pagination().current_page, 2);

    press(&mut tab, "/03");
    assert!(tab.captures_input());
    tab.handle_key(key(KeyCode::Enter));

    assert_eq!(tab.module.pagination().current_page, 1);
    let codes: Vec<String> = tab.module.items().iter().filter_map(|e| e.text("code")).collect();
    assert_eq!(codes, ["T-03"]);
  }

  #[tokio::test(start_paused = true)]
  async fn test_filter_bar_changes_filter() {
    let (mut tab, _) = tariffs().await;
    tab.handle_key(key(KeyCode::PageDown));
    assert_eq!(tab.module.filters().get("status"), Some("active"));
    assert_eq!(tab.module.pagination().total_count, 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_add_saves_and_refreshes() {
    let (mut tab, log) = tariffs().await;
    press(&mut tab, "a");
    assert!(tab.form.is_some());
    press(&mut tab, "T-04");
    tab.handle_key(key(KeyCode::Enter));
    settle(&mut tab).await;

    assert!(tab.form.is_none());
    assert!(!tab.module.dialog().is_open());
    assert_eq!(tab.module.pagination().total_count, 4);
    let toasts = log.drain();
    assert!(toasts.iter().any(|t| t.title == "Tariff created" && t.description == "T-04 has been created successfully."));
  }

  #[tokio::test(start_paused = true)]
  async fn test_bulk_delete_with_confirmation() {
    let (mut tab, log) = tariffs().await;
    press(&mut tab, "xA");
    assert_eq!(tab.module.selection().len(), 2);

    press(&mut tab, "d");
    assert_eq!(tab.confirm_delete.as_ref().map(Vec::len), Some(2));
    press(&mut tab, "y");
    settle(&mut tab).await;

    assert!(!tab.module.selection().is_active());
    assert_eq!(tab.module.pagination().total_count, 1);
    assert!(log.drain().iter().any(|t| t.title == "Tariffs deleted"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_delete_declined_keeps_records() {
    let (mut tab, _) = tariffs().await;
    press(&mut tab, "dn");
    settle(&mut tab).await;
    assert!(tab.confirm_delete.is_none());
    assert_eq!(tab.module.pagination().total_count, 3);
  }

  #[tokio::test(start_paused = true)]
  async fn test_kanban_columns_follow_filter_values() {
    let (mut tab, _) = tariffs().await;
    tab.set_view_mode(ViewMode::Kanban);
    let columns = tab.kanban_columns(&tab.module.view().items);
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["active", "draft"]);

    press(&mut tab, "l");
    assert_eq!(tab.current_entity().and_then(|e| e.text("code")).as_deref(), Some("T-02"));
  }
}
