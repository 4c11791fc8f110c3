//! End-to-end tests over the public App surface: routing, activation,
//! callbacks, built-ins, config, and error reporting.

use std::cell::RefCell;
use std::rc::Rc;

use parade::{
    App, AppBuilder, ArgDef, ArgSpec, CommandDef, Error, Flag, Hooks, Matcher, Opt, Output,
    RunError, SetupError,
};

/// A builder preconfigured for tests: captured output, no config files.
fn test_builder(name: &str) -> (AppBuilder, parade::CaptureBuffer, parade::CaptureBuffer) {
    let (out, out_buffer) = Output::capture();
    let (err, err_buffer) = Output::capture();
    let builder = App::builder(name)
        .without_config()
        .output(out)
        .error_output(err);
    (builder, out_buffer, err_buffer)
}

fn greet_command() -> CommandDef {
    CommandDef::new("greet")
        .describe("Greet someone")
        .option(Opt::new("name", ArgSpec::named([ArgDef::new("who")]).unwrap()))
        .action(|inv| {
            let who = inv
                .param("name")
                .and_then(|p| p.args().get("who"))
                .unwrap_or("world");
            Ok(inv.out().puts(format!("Hello, {who}!"))?)
        })
}

#[test]
fn routed_invocation_with_global_flag_and_local_option() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    let status = app.run(["--debug", "greet", "--name", "Ada"]);

    assert_eq!(status, 0);
    assert_eq!(out.contents(), "Hello, Ada!\n");
    assert!(app.global_param("debug").unwrap().is_active());
    assert!(app.debug_enabled());
    let greet = app.command("greet").unwrap();
    assert!(greet.params().get("name").unwrap().is_active());
    assert_eq!(greet.params().get("name").unwrap().args().get("who"), Some("Ada"));
}

#[test]
fn combined_short_cluster_activates_both_builtin_flags() {
    let (builder, _, _) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    let status = app.run(["-dv", "greet"]);

    assert_eq!(status, 0);
    assert!(app.debug_enabled());
    assert!(app.verbose_enabled());
    assert!(app.global_param("verbose").unwrap().is_active());
}

#[test]
fn reset_isolation_between_runs() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    app.run(["--debug", "greet", "--name", "Ada"]);
    out.clear();
    let status = app.run(["greet"]);

    assert_eq!(status, 0);
    assert_eq!(out.contents(), "Hello, world!\n");
    assert!(!app.debug_enabled());
    assert!(!app.global_param("debug").unwrap().is_active());
    assert!(app.command("greet").unwrap().params().get("name").unwrap().args().is_empty());
}

#[test]
fn default_command_runs_on_bare_invocation() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder
        .default_command(
            CommandDef::new("status")
                .args(ArgSpec::none())
                .action(|inv| Ok(inv.out().puts("all good")?)),
        )
        .build()
        .unwrap();

    assert_eq!(app.run(Vec::<String>::new()), 0);
    assert_eq!(out.contents(), "all good\n");
    // The default is also callable by its own name.
    out.clear();
    assert_eq!(app.run(["status"]), 0);
    assert_eq!(out.contents(), "all good\n");
}

#[test]
fn no_default_command_error_without_builtin_default() {
    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .help_as_default(false)
        .command(greet_command())
        .build()
        .unwrap();

    let err = app.execute(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, RunError::Parse(Error::NoDefaultCommand)));

    let err = app.execute(["unknown"]).unwrap_err();
    assert!(matches!(err, RunError::Parse(Error::NoDefaultCommand)));
}

#[test]
fn unknown_parameter_is_reported() {
    let (builder, _, err_out) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    let err = app.execute(["greet", "--nope"]).unwrap_err();
    assert!(matches!(
        err,
        RunError::Parse(Error::UnknownParameter(ref token)) if token == "--nope"
    ));

    let status = app.run(["greet", "--nope"]);
    assert_eq!(status, 1);
    let report = err_out.contents();
    assert!(report.contains("Error:"));
    assert!(report.contains("Unknown parameter: --nope"));
}

#[test]
fn missing_argument_aborts_before_the_action() {
    let ran = Rc::new(RefCell::new(false));
    let ran_clone = ran.clone();
    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .command(
            CommandDef::new("fetch")
                .option(Opt::new("url", ArgSpec::exact(1)))
                .action(move |_inv| {
                    *ran_clone.borrow_mut() = true;
                    Ok(())
                }),
        )
        .build()
        .unwrap();

    let err = app.execute(["fetch", "--url"]).unwrap_err();
    assert!(matches!(
        err,
        RunError::Parse(Error::MissingArgument(ref name)) if name == "url"
    ));
    assert!(!*ran.borrow());
}

#[test]
fn validator_failure_surfaces_the_value() {
    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .command(
            CommandDef::new("serve")
                .option(Opt::new(
                    "port",
                    ArgSpec::named([ArgDef::new("number").matching(Matcher::Numeric)]).unwrap(),
                ))
                .action(|_inv| Ok(())),
        )
        .build()
        .unwrap();

    assert!(app.execute(["serve", "--port", "8080"]).is_ok());
    let err = app.execute(["serve", "--port", "eighty"]).unwrap_err();
    assert!(matches!(
        err,
        RunError::Parse(Error::UnexpectedArgument(ref value)) if value == "eighty"
    ));
}

#[test]
fn activation_callbacks_run_globals_first_and_see_arguments() {
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let global_log = log.clone();
    let local_log = log.clone();
    let action_log = log.clone();

    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .global_flag(Flag::new("trace").on_activate(move |_inv| {
            global_log.borrow_mut().push("global:trace".into());
            Ok(())
        }))
        .command(
            CommandDef::new("copy")
                .option(
                    Opt::new("to", ArgSpec::named([ArgDef::new("target")]).unwrap())
                        .on_activate(move |inv| {
                            let target = inv
                                .param("to")
                                .and_then(|p| p.args().get("target"))
                                .unwrap_or("?");
                            local_log.borrow_mut().push(format!("local:to={target}"));
                            Ok(())
                        }),
                )
                .action(move |_inv| {
                    action_log.borrow_mut().push("action".into());
                    Ok(())
                }),
        )
        .build()
        .unwrap();

    app.execute(["copy", "--to", "/tmp", "--trace"]).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["global:trace", "local:to=/tmp", "action"]
    );
}

#[test]
fn aliases_resolve_in_a_second_phase() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder
        // Both aliases point at things declared later.
        .global_alias("t", "trace")
        .command_alias("g", "greet")
        .global_flag(Flag::new("trace"))
        .command(greet_command())
        .build()
        .unwrap();

    let status = app.run(["-t", "g", "--name", "Grace"]);
    assert_eq!(status, 0);
    assert_eq!(out.contents(), "Hello, Grace!\n");
    assert!(app.global_param("trace").unwrap().is_active());
}

#[test]
fn dangling_alias_fails_the_build() {
    let (builder, _, _) = test_builder("app");
    let err = builder
        .command(greet_command())
        .command_alias("g", "absent")
        .build()
        .unwrap_err();
    assert!(matches!(err, SetupError::Spec(_)));
}

#[test]
fn command_without_action_fails_the_build() {
    let (builder, _, _) = test_builder("app");
    let err = builder.command(CommandDef::new("stub")).build().unwrap_err();
    assert!(matches!(err, SetupError::MissingAction(ref name) if name == "stub"));
}

#[test]
fn two_defaults_fail_the_build() {
    let (builder, _, _) = test_builder("app");
    let err = builder
        .command(greet_command())
        .default_command(CommandDef::new("status").action(|_| Ok(())))
        .default("greet")
        .build()
        .unwrap_err();
    assert!(matches!(err, SetupError::DuplicateDefault));
}

#[test]
fn help_screen_lists_commands_sorted() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder
        .banner("Usage: app")
        .command(greet_command())
        .command(CommandDef::new("build").describe("Build it").action(|_| Ok(())))
        .build()
        .unwrap();

    let status = app.run(["help"]);
    assert_eq!(status, 0);
    let screen = out.contents();
    assert!(screen.starts_with("Usage: app"));
    assert!(screen.contains("[-d|--debug]") || screen.contains("[--debug|-d]"));
    assert!(screen.contains("Commands:"));
    let build_at = screen.find("build").unwrap();
    let greet_at = screen.find("greet").unwrap();
    let help_at = screen.find("help").unwrap();
    assert!(build_at < greet_at && greet_at < help_at);
}

#[test]
fn help_absorbs_unknown_command_names() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    // help is the default command, so a stray token becomes its argument.
    let status = app.run(["bogus"]);
    assert_eq!(status, 0);
    assert!(out
        .contents()
        .contains("The command \"bogus\" is undefined"));
}

#[test]
fn help_for_a_known_command_shows_its_usage() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder.command(greet_command()).build().unwrap();

    let status = app.run(["help", "greet"]);
    assert_eq!(status, 0);
    let text = out.contents();
    assert!(text.starts_with("greet"));
    assert!(text.contains("[--name ...]"));
    assert!(text.contains("Greet someone"));
}

#[test]
fn verbose_messages_are_gated_by_the_builtin_flag() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder
        .command(CommandDef::new("work").action(|inv| {
            inv.verbose("being chatty")?;
            Ok(inv.out().puts("done")?)
        }))
        .build()
        .unwrap();

    app.run(["work"]);
    assert_eq!(out.contents(), "done\n");

    out.clear();
    app.run(["--verbose", "work"]);
    assert_eq!(out.contents(), "being chatty\ndone\n");
}

#[test]
fn autohelp_renders_help_for_unknown_commands() {
    let (builder, out, _) = test_builder("app");
    let mut app = builder
        .command(greet_command())
        .default_command(
            CommandDef::new("status")
                .args(ArgSpec::none())
                .action(|_| Ok(())),
        )
        .build()
        .unwrap();

    let status = app.run(["bogus"]);
    assert_eq!(status, 1);
    assert!(out
        .contents()
        .contains("The command \"bogus\" is undefined"));
}

#[test]
fn plain_error_for_unknown_commands_without_autohelp() {
    let (builder, _, err_out) = test_builder("app");
    let mut app = builder
        .autohelp(false)
        .command(greet_command())
        .default_command(
            CommandDef::new("status")
                .args(ArgSpec::none())
                .action(|_| Ok(())),
        )
        .build()
        .unwrap();

    let status = app.run(["bogus"]);
    assert_eq!(status, 1);
    assert!(err_out.contents().contains("Unknown command: bogus"));
}

#[test]
fn end_of_flags_marker_makes_dash_tokens_positional() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .command(CommandDef::new("echo").action(move |inv| {
            seen_clone
                .borrow_mut()
                .extend(inv.args().values().iter().cloned());
            Ok(())
        }))
        .build()
        .unwrap();

    app.execute(["echo", "--", "--not-a-flag", "-x"]).unwrap();
    assert_eq!(*seen.borrow(), vec!["--not-a-flag", "-x"]);
}

#[test]
fn config_is_loaded_after_parsing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("app.yml"), "greeting: Ahoy\n").unwrap();

    let (out, out_buffer) = Output::capture();
    let mut app = App::builder("app")
        .clear_config_paths()
        .config_path(dir.path())
        .config_file("app.yml")
        .output(out)
        .command(CommandDef::new("hail").action(|inv| {
            let greeting = inv
                .config()
                .get("greeting")
                .and_then(|v| v.as_str())
                .unwrap_or("Hello");
            Ok(inv.out().puts(greeting)?)
        }))
        .build()
        .unwrap();

    assert_eq!(app.run(["hail"]), 0);
    assert_eq!(out_buffer.contents(), "Ahoy\n");
    assert_eq!(app.config_files().len(), 1);
}

#[test]
fn hooks_wrap_the_action() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let pre = log.clone();
    let post = log.clone();
    let action = log.clone();

    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .hooks(
            Hooks::new()
                .pre_execute(move |_inv| {
                    pre.borrow_mut().push("pre");
                    Ok(())
                })
                .post_execute(move |_inv| {
                    post.borrow_mut().push("post");
                    Ok(())
                }),
        )
        .command(CommandDef::new("work").action(move |_inv| {
            action.borrow_mut().push("action");
            Ok(())
        }))
        .build()
        .unwrap();

    app.execute(["work"]).unwrap();
    assert_eq!(*log.borrow(), vec!["pre", "action", "post"]);
}

#[test]
fn action_errors_propagate_in_execute_mode() {
    let (builder, _, err_out) = test_builder("app");
    let mut app = builder
        .command(
            CommandDef::new("fail").action(|_inv| Err(anyhow::anyhow!("disk on fire"))),
        )
        .build()
        .unwrap();

    let err = app.execute(["fail"]).unwrap_err();
    assert!(matches!(err, RunError::Action(_)));
    assert!(err.to_string().contains("disk on fire"));

    let status = app.run(["fail"]);
    assert_eq!(status, 1);
    assert!(err_out.contents().contains("disk on fire"));
}

#[test]
fn visible_names_enumerate_the_action_scope() {
    let names: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let names_clone = names.clone();
    let (builder, _, _) = test_builder("app");
    let mut app = builder
        .command(
            CommandDef::new("copy")
                .args(ArgSpec::named([ArgDef::new("source")]).unwrap())
                .flag(Flag::new("force"))
                .action(move |inv| {
                    *names_clone.borrow_mut() = inv
                        .visible_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                    Ok(())
                }),
        )
        .build()
        .unwrap();

    app.execute(["copy", "src.txt"]).unwrap();
    let names = names.borrow();
    for expected in ["source", "force", "debug", "verbose"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}
