//! A small parade application: a default greeting, a command with a named
//! option, and a command with validated remainder arguments.
//!
//! ```text
//! greet                       # Hello World!
//! greet --more                # ... and a second line
//! greet hail --name Ada       # Hello Ada!
//! greet -d sum 1 2 3          # prints the sum, with debug chatter
//! greet help sum              # usage for one command
//! ```

use parade::{App, ArgDef, ArgSpec, CommandDef, Flag, Matcher, Opt, SetupError};

fn build_app() -> Result<App, SetupError> {
    App::builder("greet")
        .banner("Usage: greet")
        .global_flag(Flag::new("more"))
        .default_command(
            CommandDef::new("hello")
                .describe("Simple hello world")
                .args(ArgSpec::none())
                .action(|inv| {
                    inv.out().puts("Hello World!")?;
                    if inv.is_active("more") {
                        inv.out().puts("Nice to see you.")?;
                    }
                    Ok(())
                }),
        )
        .command(
            CommandDef::new("hail")
                .describe("Greet someone by name")
                .aliased("h")
                .option(Opt::new(
                    "name",
                    ArgSpec::named([ArgDef::new("who").matching(Matcher::Letters)])?,
                ))
                .action(|inv| {
                    let who = inv
                        .param("name")
                        .and_then(|name| name.args().get("who"))
                        .unwrap_or("stranger");
                    Ok(inv.out().puts(format!("Hello {who}!"))?)
                }),
        )
        .command(
            CommandDef::new("sum")
                .describe("Add numbers together")
                .args(ArgSpec::named([ArgDef::new("numbers")
                    .remainder()
                    .matching(Matcher::Numeric)])?)
                .action(|inv| {
                    let numbers = inv.arg_all("numbers").unwrap_or_default();
                    let mut total: i64 = 0;
                    for number in numbers {
                        total += number.parse::<i64>()?;
                    }
                    inv.debug(format!("adding {} numbers", numbers.len()))?;
                    Ok(inv.out().puts(total.to_string())?)
                }),
        )
        .build()
}

fn main() {
    let mut app = match build_app() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    std::process::exit(app.run(std::env::args().skip(1)));
}
