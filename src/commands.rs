//! Command palette entries and autocomplete logic.

use entab::prefs::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
  pub name: String,
  pub aliases: Vec<String>,
  pub description: String,
}

impl Command {
  fn new(name: &str, aliases: &[&str], description: &str) -> Self {
    Self {
      name: name.to_string(),
      aliases: aliases.iter().map(|a| a.to_string()).collect(),
      description: description.to_string(),
    }
  }
}

/// What a submitted command asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
  /// Switch to the tab with this key
  Tab(String),
  View(ViewMode),
  /// `:view` without a valid mode
  CycleView,
  Refresh,
  ResetFilters,
  Quit,
  Unknown(String),
}

const BUILTINS: &[(&str, &[&str], &str)] = &[
  ("view", &["v", "layout"], "Switch layout: card, table, kanban"),
  ("refresh", &["r", "reload"], "Reload the current list"),
  ("reset", &["clear"], "Reset filters to their defaults"),
  ("quit", &["q", "exit"], "Exit entab"),
];

/// Commands for the configured tabs followed by the built-ins.
pub fn command_list<'a>(tabs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<Command> {
  let mut commands: Vec<Command> = tabs
    .into_iter()
    .map(|(key, plural)| Command::new(key, &[], &format!("Browse {}", plural.to_lowercase())))
    .collect();
  commands.extend(
    BUILTINS
      .iter()
      .map(|(name, aliases, description)| Command::new(name, aliases, description)),
  );
  commands
}

/// Get autocomplete suggestions for the command word of `input`
pub fn get_suggestions<'a>(commands: &'a [Command], input: &str) -> Vec<&'a Command> {
  let word = input.split_whitespace().next().unwrap_or("").to_lowercase();

  if word.is_empty() {
    return commands.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = commands
    .iter()
    .filter_map(|cmd| match_priority(cmd, &word).map(|p| (cmd, p)))
    .collect();

  // Stable sort keeps declaration order within a priority
  matches.sort_by_key(|(_, priority)| *priority);
  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

fn match_priority(cmd: &Command, word: &str) -> Option<u32> {
  if cmd.name == word {
    Some(0)
  } else if cmd.aliases.iter().any(|a| a == word) {
    Some(1)
  } else if cmd.name.starts_with(word) {
    Some(2)
  } else if cmd.aliases.iter().any(|a| a.starts_with(word)) {
    Some(3)
  } else if cmd.name.contains(word) {
    Some(4)
  } else if cmd.aliases.iter().any(|a| a.contains(word)) {
    Some(5)
  } else {
    None
  }
}

/// Turn a resolved command line into an action.
pub fn parse(commands: &[Command], line: &str) -> Action {
  let mut words = line.split_whitespace();
  let Some(word) = words.next() else {
    return Action::Unknown(String::new());
  };
  let argument = words.next();

  let Some(cmd) = get_suggestions(commands, word).into_iter().next() else {
    return Action::Unknown(word.to_string());
  };

  match cmd.name.as_str() {
    "view" => argument
      .and_then(|arg| arg.parse::<ViewMode>().ok())
      .map(Action::View)
      .unwrap_or(Action::CycleView),
    "refresh" => Action::Refresh,
    "reset" => Action::ResetFilters,
    "quit" => Action::Quit,
    tab => Action::Tab(tab.to_string()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn commands() -> Vec<Command> {
    command_list([("doctors", "Doctors"), ("tariffs", "Tariffs")])
  }

  #[test]
  fn test_empty_input_returns_all() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "").len(), commands.len());
  }

  #[test]
  fn test_exact_match() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "tariffs")[0].name, "tariffs");
  }

  #[test]
  fn test_alias_match() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "q")[0].name, "quit");
  }

  #[test]
  fn test_prefix_match() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "doc")[0].name, "doctors");
  }

  #[test]
  fn test_fuzzy_match() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "riff")[0].name, "tariffs");
  }

  #[test]
  fn test_argument_does_not_affect_suggestions() {
    let commands = commands();
    assert_eq!(get_suggestions(&commands, "view kanban")[0].name, "view");
  }

  #[test]
  fn test_parse_actions() {
    let commands = commands();
    assert_eq!(parse(&commands, "doctors"), Action::Tab("doctors".to_string()));
    assert_eq!(parse(&commands, "view table"), Action::View(ViewMode::Table));
    assert_eq!(parse(&commands, "v grid"), Action::CycleView);
    assert_eq!(parse(&commands, "quit"), Action::Quit);
    assert_eq!(parse(&commands, "zzz"), Action::Unknown("zzz".to_string()));
  }
}
