//! The argument-vector resolver.
//!
//! Turns an expanded token stream into a selected command, the matched
//! global and command-local parameters (with their arguments bound), and an
//! empty stream, or a typed error for whatever could not be claimed. The
//! resolver fills binders but never runs activation callbacks; that is the
//! application shell's activation pass.

use tracing::{debug, trace};

use crate::arguments::Arguments;
use crate::command::{CommandId, CommandTable, ParamId, ParamTable, DEFAULT_COMMAND};
use crate::error::Error;
use crate::tokens::{Token, TokenKind, TokenStream};

/// The outcome of resolving an argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The selected command.
    pub command: CommandId,
    /// Matched global parameters, in match order, deduplicated.
    pub globals: Vec<ParamId>,
    /// Matched command-local parameters, in match order, deduplicated.
    pub locals: Vec<ParamId>,
    /// Whether the command came from the `__default` fallback rather than
    /// an explicit token.
    pub used_default: bool,
}

/// Resolves a token stream against the global parameter table and the
/// command table.
///
/// Binders of matched parameters and of the selected command are filled as
/// a side effect; callers reset the tables between runs.
pub fn resolve(
    mut tokens: TokenStream,
    globals: &mut ParamTable,
    commands: &mut CommandTable,
) -> Result<Resolution, Error> {
    tokens.expand();
    trace!(tokens = ?tokens.texts(), "expanded argument vector");

    let (command_id, mut command_pos, used_default) = select_command(&mut tokens, commands)?;
    debug!(
        command = commands.by_id(command_id).name(),
        used_default, "selected command"
    );

    let global_ids = extract_params(&mut tokens, globals, 0, &mut command_pos);

    let local_ids;
    {
        let command = commands.by_id_mut(command_id);
        let from = command_pos;
        local_ids = extract_params(&mut tokens, command.params_mut(), from, &mut command_pos);
        consume_scoped(&mut tokens, command.args_mut(), from, &mut command_pos);
    }

    check_residual(&tokens, commands.by_id(command_id).name(), used_default)?;

    debug!(
        globals = global_ids.len(),
        locals = local_ids.len(),
        "argument vector resolved"
    );
    Ok(Resolution {
        command: command_id,
        globals: global_ids,
        locals: local_ids,
        used_default,
    })
}

/// Scans for the first token matching a command name or alias.
///
/// The matched token is dequeued and its position returned; scanning stops
/// at the raw region that follows `--`. Without a match the `__default`
/// command is selected at position zero.
fn select_command(
    tokens: &mut TokenStream,
    commands: &CommandTable,
) -> Result<(CommandId, usize, bool), Error> {
    let mut found = None;
    for (i, token) in tokens.tokens().iter().enumerate() {
        if token.kind() == TokenKind::Raw {
            break;
        }
        if token.is_literal() {
            continue;
        }
        if let Some(id) = commands.id_of(token.text()) {
            found = Some((id, i));
            break;
        }
    }

    match found {
        Some((id, index)) => {
            tokens.remove(index);
            Ok((id, index, false))
        }
        None => commands
            .id_of(DEFAULT_COMMAND)
            .map(|id| (id, 0, true))
            .ok_or(Error::NoDefaultCommand),
    }
}

/// Matches dash tokens at or after `from` against a parameter table.
///
/// Matched tokens are dequeued; an option's scoped arguments are consumed
/// starting right behind it. `barrier` (the selected command's position) is
/// kept in step as earlier tokens disappear.
fn extract_params(
    tokens: &mut TokenStream,
    table: &mut ParamTable,
    from: usize,
    barrier: &mut usize,
) -> Vec<ParamId> {
    let mut matched = Vec::new();
    let mut i = from;
    while i < tokens.len() {
        let token = &tokens.tokens()[i];
        if !token.is_dash() {
            i += 1;
            continue;
        }
        let text = token.text();
        let bare = text
            .strip_prefix("--")
            .or_else(|| text.strip_prefix('-'))
            .unwrap_or(text);

        match table.id_of(bare) {
            Some(id) => {
                let token = remove_at(tokens, i, barrier);
                trace!(param = table.by_id(id).name(), token = token.text(), "matched parameter");
                if table.by_id(id).is_option() {
                    consume_scoped(tokens, table.by_id_mut(id).args_mut(), i, barrier);
                }
                // One entry per parameter, however often it was supplied.
                if !matched.contains(&id) {
                    matched.push(id);
                }
            }
            None => i += 1,
        }
    }
    matched
}

/// Greedily consumes argument tokens for one binder, starting at `from`.
///
/// Consumption stops at the first plain dash token, when the binder runs
/// out of room, or at the end of the stream.
fn consume_scoped(tokens: &mut TokenStream, args: &mut Arguments, from: usize, barrier: &mut usize) {
    while let Some(token) = tokens.get(from) {
        if token.is_dash() || !args.has_room() {
            break;
        }
        let token = remove_at(tokens, from, barrier);
        args.push_value(token.into_text());
    }
}

fn remove_at(tokens: &mut TokenStream, index: usize, barrier: &mut usize) -> Token {
    if index < *barrier {
        *barrier -= 1;
    }
    tokens.remove(index)
}

/// Turns whatever is still in the stream into the matching error.
fn check_residual(tokens: &TokenStream, command: &str, used_default: bool) -> Result<(), Error> {
    let Some(token) = tokens.get(0) else {
        return Ok(());
    };
    debug!(residual = ?tokens.texts(), "unclaimed tokens remain");
    if token.is_dash() {
        return Err(Error::UnknownParameter(token.text().to_string()));
    }
    if used_default {
        // The token was most likely a mistyped command.
        return Err(Error::UnknownCommand(token.text().to_string()));
    }
    Err(Error::ExtraArgument(command.to_string()))
}
