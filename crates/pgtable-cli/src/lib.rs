mod cli;
mod commands;
mod config;
mod input;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Ddl(args) => commands::ddl(args),
        cli::Command::Templates(args) => commands::templates(args),
        cli::Command::Query(args) => commands::query(args),
    }
}
