use clap::Parser;
use miette::Result;
use partsmith::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    if global.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Generate(args) => partsmith::cli::commands::generate::run(args, &global),
        Commands::Parse(args) => partsmith::cli::commands::parse::run(args, &global),
        Commands::Build(args) => partsmith::cli::commands::build::run(args, &global),
        Commands::Menu(args) => partsmith::cli::commands::menu::run(args, &global),
        Commands::Log(args) => partsmith::cli::commands::log::run(args, &global),
        Commands::Config(cmd) => partsmith::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => partsmith::cli::commands::completions::run(args),
    }
}
