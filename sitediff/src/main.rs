use colored::Colorize;
use commands::command_argument_builder;

mod commands;
mod handlers;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("createbase", sub_matches)) => handlers::handle_createbase(sub_matches, quiet).await,
        Some(("comparetobase", sub_matches)) => {
            handlers::handle_comparetobase(sub_matches, quiet).await
        }
        None => {
            // No subcommand provided, the banner is all there is to show.
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

fn print_banner() {
    println!("{}", "sitediff".bright_blue().bold());
    println!(
        "{}",
        format!(
            "visual regression testing for whole websites - v{}\n",
            env!("CARGO_PKG_VERSION")
        )
        .bright_white()
    );
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
