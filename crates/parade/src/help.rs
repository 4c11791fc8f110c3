//! Help screen rendering.
//!
//! Pure formatting over the declared tables: the application screen lists
//! global parameters and the sorted command table; per-command usage lines
//! show the command's own parameters and argument placeholders.

use parade_argv::{ArgDef, Command, ParamTable, Parameter, DEFAULT_COMMAND};

use crate::app::App;

/// Renders the application help screen, optionally led by a notice line.
pub(crate) fn application_help(app: &App, info: Option<&str>) -> String {
    let mut screen = String::new();
    screen.push_str(&app.banner());
    screen.push_str(&param_summary(app.globals()));

    let has_default = app.commands().has_default();
    if has_default {
        screen.push_str(" [command] [args]\n\n");
    } else {
        screen.push_str(" command [args]\n\n");
    }

    if let Some(info) = info {
        screen.push_str(info);
        screen.push_str("\n\n");
    }

    screen.push_str("Commands:\n");
    let mut entries: Vec<(&str, &str)> = app
        .commands()
        .iter()
        .filter(|command| command.name() != DEFAULT_COMMAND)
        .map(|command| (command.name(), command.description().unwrap_or("")))
        .collect();
    entries.sort_by_key(|(name, _)| *name);
    let width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in entries {
        screen.push_str(&format!("  {name:<width$}    {description}\n"));
    }

    if let Some(default) = app.commands().get(DEFAULT_COMMAND) {
        if default.name() == DEFAULT_COMMAND {
            screen.push_str("\nYou can also call this application without a command:\n");
            screen.push_str(&command_usage(default, true));
            screen.push('\n');
        }
    }

    screen
}

/// Renders one command's usage line and description.
pub(crate) fn command_usage(command: &Command, show_usage: bool) -> String {
    let mut text = String::new();
    if show_usage {
        if command.name() != DEFAULT_COMMAND {
            text.push_str(command.name());
        }
        text.push_str(&param_summary(command.params()));
        text.push_str(&arg_placeholders(command));
    }
    if let Some(description) = command.description() {
        if !text.is_empty() {
            text.push_str("\n  ");
        }
        text.push_str(description);
    }
    text
}

/// A bracketed summary of every parameter in a table, sorted by name:
/// `[-d|--debug] [--gopt ...]`.
fn param_summary(params: &ParamTable) -> String {
    let mut sorted: Vec<&Parameter> = params.iter().collect();
    sorted.sort_by_key(|param| param.name());

    let mut summary = String::new();
    for param in sorted {
        summary.push_str(" [");
        for (i, name) in std::iter::once(param.name())
            .chain(param.aliases().iter().map(String::as_str))
            .enumerate()
        {
            if i > 0 {
                summary.push('|');
            }
            if name.len() > 1 {
                summary.push_str("--");
            } else {
                summary.push('-');
            }
            summary.push_str(name);
        }
        if param.is_option() {
            summary.push_str(" ...");
        }
        summary.push(']');
    }
    summary
}

fn arg_placeholders(command: &Command) -> String {
    let spec = command.args().spec();
    if spec.is_named() {
        let mut text = String::new();
        for def in spec.names() {
            text.push(' ');
            text.push_str(&placeholder(def));
        }
        return text;
    }
    match (spec.min(), spec.max()) {
        (_, Some(0)) => String::new(),
        (0, _) => " [args...]".to_string(),
        _ => " <args...>".to_string(),
    }
}

fn placeholder(def: &ArgDef) -> String {
    if def.is_remainder() && def.is_optional() {
        format!("[{}...]", def.name())
    } else if def.is_remainder() {
        format!("<{}...>", def.name())
    } else if def.is_optional() {
        format!("[{}]", def.name())
    } else {
        format!("<{}>", def.name())
    }
}
